//! Language-agnostic fallback resolution: relative-path walking and
//! progressive suffix matching.

use super::suffix::SuffixIndex;

/// Extensions probed against candidate paths, in priority order. The empty
/// entry matches paths that already carry their extension; `/index.*`,
/// `/__init__.py` and `/mod.rs` cover directory-module conventions.
pub const EXTENSION_PROBES: &[&str] = &[
    "",
    ".tsx",
    ".ts",
    ".jsx",
    ".js",
    "/index.tsx",
    "/index.ts",
    "/index.jsx",
    "/index.js",
    ".py",
    "/__init__.py",
    ".java",
    ".c",
    ".h",
    ".cpp",
    ".hpp",
    ".cc",
    ".cxx",
    ".hxx",
    ".hh",
    ".cs",
    ".go",
    ".rs",
    "/mod.rs",
    ".php",
    ".phtml",
    ".swift",
];

/// Fallback resolution for an import that no language-specific strategy
/// claimed. Returns zero or one target.
pub fn resolve(index: &SuffixIndex, current_file: &str, import: &str) -> Vec<String> {
    if import.starts_with('.') {
        return resolve_relative(index, current_file, import)
            .into_iter()
            .collect();
    }

    // Java wildcards are handled upstream; any other `.*` import has no
    // file-level meaning.
    if import.ends_with(".*") {
        return Vec::new();
    }

    // Try the import as written first (keeps real extensions like `foo.h`
    // intact), then the dotted-module form (`pkg.mod` -> `pkg/mod`).
    let mut candidates = vec![import.to_string()];
    if !import.contains('/') && import.contains('.') {
        candidates.push(import.replace('.', "/"));
    }
    for candidate in &candidates {
        if let Some(hit) = suffix_resolve(index, candidate) {
            return vec![hit];
        }
    }
    Vec::new()
}

/// Walk `.`/`..` segments from the current file's directory, then probe the
/// extension list against the full path set.
pub fn resolve_relative(index: &SuffixIndex, current_file: &str, import: &str) -> Option<String> {
    let current_dir = match current_file.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    };

    let mut components: Vec<&str> = if current_dir.is_empty() {
        Vec::new()
    } else {
        current_dir.split('/').collect()
    };
    for segment in import.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                components.pop()?;
            }
            other => components.push(other),
        }
    }
    let base = components.join("/");

    for probe in EXTENSION_PROBES {
        let candidate = format!("{base}{probe}");
        if index.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// For each progressively shorter suffix of `path`, try every extension
/// probe against the suffix index.
pub fn suffix_resolve(index: &SuffixIndex, path: &str) -> Option<String> {
    let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
    for start in 0..components.len() {
        let suffix = components[start..].join("/");
        for probe in EXTENSION_PROBES {
            if let Some(hit) = index.get(&format!("{suffix}{probe}")) {
                return Some(hit.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(paths: &[&str]) -> SuffixIndex {
        let owned: Vec<String> = paths.iter().map(|s| s.to_string()).collect();
        SuffixIndex::build(&owned)
    }

    #[test]
    fn test_relative_same_dir() {
        let idx = index(&["src/a.ts", "src/b.ts"]);
        assert_eq!(
            resolve(&idx, "src/a.ts", "./b"),
            vec!["src/b.ts".to_string()]
        );
    }

    #[test]
    fn test_relative_parent_dir() {
        let idx = index(&["src/util/x.ts", "src/app/main.ts"]);
        assert_eq!(
            resolve(&idx, "src/app/main.ts", "../util/x"),
            vec!["src/util/x.ts".to_string()]
        );
    }

    #[test]
    fn test_relative_index_file() {
        let idx = index(&["src/components/index.ts", "src/main.ts"]);
        assert_eq!(
            resolve(&idx, "src/main.ts", "./components"),
            vec!["src/components/index.ts".to_string()]
        );
    }

    #[test]
    fn test_relative_escaping_root_fails() {
        let idx = index(&["a.ts"]);
        assert!(resolve(&idx, "a.ts", "../../nope").is_empty());
    }

    #[test]
    fn test_dotted_module_form() {
        let idx = index(&["pkg/mod.py"]);
        assert_eq!(resolve(&idx, "main.py", "pkg.mod"), vec!["pkg/mod.py"]);
    }

    #[test]
    fn test_include_with_real_extension() {
        let idx = index(&["lib/foo.h", "src/main.c"]);
        assert_eq!(resolve(&idx, "src/main.c", "lib/foo.h"), vec!["lib/foo.h"]);
    }

    #[test]
    fn test_wildcard_dropped() {
        let idx = index(&["x/y.java"]);
        assert!(resolve(&idx, "m.java", "a.b.*").is_empty());
    }

    #[test]
    fn test_progressive_suffix_shortening() {
        // `vendor/pkg/mod` doesn't exist, but dropping the leading component
        // leaves `pkg/mod` which does.
        let idx = index(&["pkg/mod.py"]);
        assert_eq!(
            suffix_resolve(&idx, "vendor/pkg/mod"),
            Some("pkg/mod.py".to_string())
        );
    }
}
