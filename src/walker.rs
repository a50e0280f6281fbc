//! Repository file discovery.
//!
//! Walks the repo with gitignore handling, filters to supported source
//! extensions, applies config exclusions, and reads contents in parallel.
//! Paths are normalized to repo-relative `/`-separated strings — the form
//! every downstream component expects.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::RepographConfig;
use crate::language::Language;
use crate::parser::FileRecord;

/// Discover and read all source files under `root`.
pub fn collect_files(
    root: &Path,
    config: &RepographConfig,
    verbose: bool,
) -> Result<Vec<FileRecord>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("invalid project root {}", root.display()))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    let walker = ignore::WalkBuilder::new(&root)
        .standard_filters(true)
        // Honor .gitignore even outside a git repository (standalone
        // directories, test fixtures).
        .require_git(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                eprintln!("warning: {err}");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }
        if path_contains_component(path, "node_modules") || path_contains_component(path, "target")
        {
            continue;
        }
        if is_excluded_by_config(path, config) {
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !Language::source_extensions().contains(&ext) {
            continue;
        }
        if verbose {
            eprintln!("{}", path.display());
        }
        paths.push(path.to_path_buf());
    }

    // Parallel content reads; unreadable or non-UTF-8 files are skipped with
    // a warning.
    let mut records: Vec<FileRecord> = paths
        .par_iter()
        .filter_map(|path| {
            let rel = path
                .strip_prefix(&root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            match std::fs::read_to_string(path) {
                Ok(content) => Some(FileRecord { path: rel, content }),
                Err(err) => {
                    eprintln!("warning: failed to read {}: {err}", path.display());
                    None
                }
            }
        })
        .collect();

    // Deterministic input order regardless of walk/rayon interleaving.
    records.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(records)
}

/// Returns true if any component of `path` equals `name`.
fn path_contains_component(path: &Path, name: &str) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_str().map(|s| s == name).unwrap_or(false))
}

/// Returns true if `path` matches any exclusion pattern from config.
fn is_excluded_by_config(path: &Path, config: &RepographConfig) -> bool {
    let Some(patterns) = &config.exclude else {
        return false;
    };
    let path_str = path.to_string_lossy();
    for pattern in patterns {
        if let Ok(matcher) = glob::Pattern::new(pattern) {
            if matcher.matches(&path_str) {
                return true;
            }
            for component in path.components() {
                if let Some(s) = component.as_os_str().to_str()
                    && matcher.matches(s)
                {
                    return true;
                }
            }
        }
    }
    false
}
