//! Go import resolution: module-internal package imports expand to every
//! non-test source file in the package directory; everything else is an
//! external module and is dropped.

use super::suffix::SuffixIndex;

pub fn resolve(index: &SuffixIndex, go_module: Option<&str>, import: &str) -> Vec<String> {
    let Some(module) = go_module else {
        return Vec::new();
    };
    let Some(rest) = import.strip_prefix(module) else {
        return Vec::new();
    };
    // `m.example/xy` must not claim imports of module `m.example/xyz`.
    if !rest.is_empty() && !rest.starts_with('/') {
        return Vec::new();
    }

    let rel = rest.trim_start_matches('/');
    if rel.is_empty() {
        return Vec::new();
    }

    index
        .files_in_dir(rel, "go")
        .iter()
        .filter(|path| !path.ends_with("_test.go"))
        .cloned()
        .collect()
}
