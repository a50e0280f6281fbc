//! Swift import resolution: a module name maps to an SPM target directory,
//! and the import expands to every Swift file under it. Unknown modules are
//! external frameworks and are dropped.

use std::collections::HashMap;

use super::suffix::SuffixIndex;

pub fn resolve(
    index: &SuffixIndex,
    targets: &HashMap<String, String>,
    import: &str,
) -> Vec<String> {
    let Some(dir) = targets.get(import) else {
        return Vec::new();
    };
    let prefix = format!("{dir}/");
    index
        .paths()
        .iter()
        .filter(|path| path.starts_with(&prefix) && path.ends_with(".swift"))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_expands_to_all_swift_files() {
        let paths: Vec<String> = [
            "Sources/Networking/Client.swift",
            "Sources/Networking/Request/Builder.swift",
            "Sources/Models/User.swift",
            "Sources/Networking/notes.md",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let idx = SuffixIndex::build(&paths);
        let mut targets = HashMap::new();
        targets.insert("Networking".to_string(), "Sources/Networking".to_string());

        let resolved = resolve(&idx, &targets, "Networking");
        assert_eq!(resolved.len(), 2);
        assert!(resolved.contains(&"Sources/Networking/Client.swift".to_string()));
        assert!(resolved.contains(&"Sources/Networking/Request/Builder.swift".to_string()));
    }

    #[test]
    fn test_external_framework_dropped() {
        let idx = SuffixIndex::build(&["Sources/App/main.swift".to_string()]);
        let targets = HashMap::new();
        assert!(resolve(&idx, &targets, "UIKit").is_empty());
    }
}
