use std::path::Path;

use serde::Deserialize;

/// Configuration loaded from `repograph.toml` at the project root.
#[derive(Debug, Deserialize, Default)]
pub struct RepographConfig {
    /// Additional path patterns to exclude from indexing (beyond .gitignore
    /// and node_modules).
    pub exclude: Option<Vec<String>>,
    /// Parse worker count. Defaults to hardware concurrency (min 2).
    pub workers: Option<usize>,
    /// Files per worker sub-batch.
    pub sub_batch_size: Option<usize>,
}

impl RepographConfig {
    /// Load configuration from `repograph.toml` in the given root directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or
    /// cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join("repograph.toml");

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("warning: failed to parse repograph.toml: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("warning: failed to read repograph.toml: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RepographConfig::load(dir.path());
        assert!(config.exclude.is_none());
        assert!(config.workers.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("repograph.toml"),
            "exclude = [\"generated\"]\nworkers = 4\nsub_batch_size = 50\n",
        )
        .unwrap();
        let config = RepographConfig::load(dir.path());
        assert_eq!(config.exclude.as_deref(), Some(&["generated".to_string()][..]));
        assert_eq!(config.workers, Some(4));
        assert_eq!(config.sub_batch_size, Some(50));
    }

    #[test]
    fn test_malformed_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("repograph.toml"), "exclude = not-toml").unwrap();
        let config = RepographConfig::load(dir.path());
        assert!(config.exclude.is_none());
    }
}
