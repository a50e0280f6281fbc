//! Rust `use`-path resolution over the repository's path set.
//!
//! Prefix dispatch on `crate::` / `super::` / `self::`; module paths probe
//! `<mod>.rs`, `<mod>/mod.rs`, and `<mod>/lib.rs` under `src/` and the repo
//! root. A trailing symbol segment (the imported item) is stripped and the
//! lookup retried.

use super::suffix::SuffixIndex;

pub fn resolve(index: &SuffixIndex, current_file: &str, import: &str) -> Vec<String> {
    let cleaned = clean_use_path(import);

    if let Some(rest) = cleaned.strip_prefix("crate::") {
        return resolve_from_roots(index, &segments(rest)).into_iter().collect();
    }

    if cleaned.starts_with("super::") {
        let mut dir = parent_dir(current_file);
        let mut rest = cleaned.as_str();
        while let Some(stripped) = rest.strip_prefix("super::") {
            dir = parent_of(&dir);
            rest = stripped;
        }
        return resolve_in_dir(index, &dir, &segments(rest))
            .into_iter()
            .collect();
    }

    if let Some(rest) = cleaned.strip_prefix("self::") {
        let dir = parent_dir(current_file);
        return resolve_in_dir(index, &dir, &segments(rest))
            .into_iter()
            .collect();
    }

    // `util::inner` without a prefix keyword: treat the path segments like a
    // crate-rooted module path.
    if cleaned.contains("::") {
        return resolve_from_roots(index, &segments(&cleaned))
            .into_iter()
            .collect();
    }

    Vec::new()
}

/// Strip brace groups, glob suffixes, and `as` renames so only the module
/// path remains: `crate::util::{a, b}` -> `crate::util`.
fn clean_use_path(import: &str) -> String {
    let mut path = import.trim();
    if let Some(idx) = path.find('{') {
        path = path[..idx].trim_end_matches("::").trim();
    }
    if let Some(idx) = path.find(" as ") {
        path = path[..idx].trim();
    }
    path.trim_end_matches("::*").trim_end_matches("::").to_string()
}

fn segments(rest: &str) -> Vec<&str> {
    rest.split("::").filter(|s| !s.is_empty() && *s != "*").collect()
}

/// Try `src/` first, then the repo root; retry with the trailing symbol
/// segment stripped.
fn resolve_from_roots(index: &SuffixIndex, segs: &[&str]) -> Option<String> {
    if segs.is_empty() {
        return None;
    }
    for segs in [segs, &segs[..segs.len() - 1]] {
        if segs.is_empty() {
            continue;
        }
        for root in ["src/", ""] {
            if let Some(hit) = try_module_candidates(index, root, segs) {
                return Some(hit);
            }
        }
    }
    None
}

/// Resolve relative to a directory (for `super::` / `self::` paths), with
/// the same symbol-stripping retry.
fn resolve_in_dir(index: &SuffixIndex, dir: &str, segs: &[&str]) -> Option<String> {
    if segs.is_empty() {
        return None;
    }
    let base = if dir.is_empty() {
        String::new()
    } else {
        format!("{dir}/")
    };
    for segs in [segs, &segs[..segs.len() - 1]] {
        if segs.is_empty() {
            continue;
        }
        if let Some(hit) = try_module_candidates(index, &base, segs) {
            return Some(hit);
        }
    }
    None
}

fn try_module_candidates(index: &SuffixIndex, base: &str, segs: &[&str]) -> Option<String> {
    let joined = segs.join("/");
    for candidate in [
        format!("{base}{joined}.rs"),
        format!("{base}{joined}/mod.rs"),
        format!("{base}{joined}/lib.rs"),
    ] {
        if index.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn parent_dir(file: &str) -> String {
    match file.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}

fn parent_of(dir: &str) -> String {
    match dir.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}
