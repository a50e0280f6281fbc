//! TypeScript/JavaScript import resolution: tsconfig path aliases first,
//! then the shared relative/suffix fallback.

use crate::metadata::TsconfigPaths;

use super::generic::{self, EXTENSION_PROBES};
use super::suffix::SuffixIndex;

pub fn resolve(
    index: &SuffixIndex,
    tsconfig: Option<&TsconfigPaths>,
    current_file: &str,
    import: &str,
) -> Vec<String> {
    if let Some(config) = tsconfig
        && !import.starts_with('.')
    {
        for (alias, target) in &config.aliases {
            if let Some(remainder) = strip_alias(import, alias) {
                let rewritten = format!("{target}{remainder}");
                let full = join_base_url(&config.base_url, &rewritten);

                for probe in EXTENSION_PROBES {
                    let candidate = format!("{full}{probe}");
                    if index.contains(&candidate) {
                        return vec![candidate];
                    }
                }
                if let Some(hit) = generic::suffix_resolve(index, &rewritten) {
                    return vec![hit];
                }
                break; // alias matched but nothing on disk; fall through
            }
        }
    }

    generic::resolve(index, current_file, import)
}

/// Match an import against an alias prefix. A prefix ending in `/` (from
/// `"@/*"`) matches any continuation; a bare prefix (from `"lib"`) must match
/// exactly or at a `/` boundary.
fn strip_alias<'a>(import: &'a str, alias: &str) -> Option<&'a str> {
    if alias.ends_with('/') {
        return import.strip_prefix(alias);
    }
    if import == alias {
        return Some("");
    }
    import
        .strip_prefix(alias)
        .and_then(|rest| rest.strip_prefix('/'))
}

fn join_base_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_start_matches("./").trim_end_matches('/');
    if base.is_empty() || base == "." {
        path.to_string()
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(paths: &[&str]) -> SuffixIndex {
        let owned: Vec<String> = paths.iter().map(|s| s.to_string()).collect();
        SuffixIndex::build(&owned)
    }

    fn config(aliases: &[(&str, &str)], base_url: &str) -> TsconfigPaths {
        TsconfigPaths {
            base_url: base_url.to_string(),
            aliases: aliases
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_alias_resolution() {
        let idx = index(&["src/util/x.ts", "app.ts"]);
        let cfg = config(&[("@/", "src/")], ".");
        let targets = resolve(&idx, Some(&cfg), "app.ts", "@/util/x");
        assert_eq!(targets, vec!["src/util/x.ts"]);
    }

    #[test]
    fn test_alias_with_base_url() {
        let idx = index(&["web/src/util/x.ts"]);
        let cfg = config(&[("@/", "src/")], "web");
        let targets = resolve(&idx, Some(&cfg), "web/app.ts", "@/util/x");
        assert_eq!(targets, vec!["web/src/util/x.ts"]);
    }

    #[test]
    fn test_relative_import_skips_aliases() {
        let idx = index(&["src/a.ts", "src/b.ts"]);
        let cfg = config(&[("@/", "src/")], ".");
        let targets = resolve(&idx, Some(&cfg), "src/a.ts", "./b");
        assert_eq!(targets, vec!["src/b.ts"]);
    }

    #[test]
    fn test_alias_index_file() {
        let idx = index(&["src/components/index.tsx"]);
        let cfg = config(&[("@/", "src/")], ".");
        let targets = resolve(&idx, Some(&cfg), "app.ts", "@/components");
        assert_eq!(targets, vec!["src/components/index.tsx"]);
    }

    #[test]
    fn test_unaliased_bare_import_unresolved() {
        let idx = index(&["src/util/x.ts"]);
        let cfg = config(&[("@/", "src/")], ".");
        assert!(resolve(&idx, Some(&cfg), "app.ts", "react").is_empty());
    }
}
