//! Suffix index over the repository's file paths.
//!
//! Import resolution constantly asks "does any file end with
//! `com/example/Foo.java`?" and "list every `.java` directly inside a
//! directory ending with `com/example/util`". Linear scans would make
//! resolution O(files x imports); this index answers both in O(1) after a
//! single build pass.

use std::collections::{HashMap, HashSet};

/// Read-only after construction; safe to share across phases.
pub struct SuffixIndex {
    /// Every component-suffix of every path -> the path. Ambiguous suffixes
    /// keep the longest path.
    exact: HashMap<String, String>,
    /// Lowercased variant of `exact`, for case-insensitive lookups (PSR-4
    /// class files on case-preserving filesystems).
    insensitive: HashMap<String, String>,
    /// `(directory suffix, extension)` -> files directly in that directory.
    dirs: HashMap<(String, String), Vec<String>>,
    /// Full-path membership.
    path_set: HashSet<String>,
    /// All paths, in input order (prefix scans for Swift targets).
    paths: Vec<String>,
}

impl SuffixIndex {
    /// Build the index from all repo-relative file paths.
    pub fn build(paths: &[String]) -> SuffixIndex {
        let mut index = SuffixIndex {
            exact: HashMap::new(),
            insensitive: HashMap::new(),
            dirs: HashMap::new(),
            path_set: HashSet::new(),
            paths: paths.to_vec(),
        };

        for path in paths {
            index.path_set.insert(path.clone());

            let components: Vec<&str> = path.split('/').collect();
            for start in 0..components.len() {
                let suffix = components[start..].join("/");
                match index.exact.get(&suffix) {
                    Some(existing) if existing.len() >= path.len() => {}
                    _ => {
                        index.exact.insert(suffix.clone(), path.clone());
                    }
                }
                let lower = suffix.to_lowercase();
                match index.insensitive.get(&lower) {
                    Some(existing) if existing.len() >= path.len() => {}
                    _ => {
                        index.insensitive.insert(lower, path.clone());
                    }
                }
            }

            // Directory suffixes of the parent dir, keyed with the leaf's
            // extension. Only the file's own directory is indexed, so lookups
            // never leak subdirectory files.
            let ext = components
                .last()
                .and_then(|leaf| leaf.rsplit_once('.'))
                .map(|(_, e)| e.to_string())
                .unwrap_or_default();
            let dir_components = &components[..components.len().saturating_sub(1)];
            for start in 0..dir_components.len() {
                let dir_suffix = dir_components[start..].join("/");
                index
                    .dirs
                    .entry((dir_suffix, ext.clone()))
                    .or_default()
                    .push(path.clone());
            }
        }

        index
    }

    /// Exact (case-sensitive) suffix lookup.
    pub fn get(&self, suffix: &str) -> Option<&str> {
        self.exact.get(suffix).map(String::as_str)
    }

    /// Case-insensitive suffix lookup.
    pub fn get_insensitive(&self, suffix: &str) -> Option<&str> {
        self.insensitive
            .get(&suffix.to_lowercase())
            .map(String::as_str)
    }

    /// All files with extension `ext` directly inside a directory whose
    /// suffix is `dir_suffix`.
    pub fn files_in_dir(&self, dir_suffix: &str, ext: &str) -> &[String] {
        self.dirs
            .get(&(dir_suffix.to_string(), ext.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Full-path membership test.
    pub fn contains(&self, path: &str) -> bool {
        self.path_set.contains(path)
    }

    /// All indexed paths.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}
