//! PHP import resolution via Composer PSR-4 mappings, with a generic suffix
//! fallback.

use super::generic;
use super::suffix::SuffixIndex;

pub fn resolve(
    index: &SuffixIndex,
    psr4: &[(String, String)],
    current_file: &str,
    import: &str,
) -> Vec<String> {
    let path = import.replace('\\', "/");

    if !psr4.is_empty() {
        // Longest prefix first so `App\Admin\` beats `App\`.
        let mut mappings: Vec<&(String, String)> = psr4.iter().collect();
        mappings.sort_by_key(|(ns, _)| std::cmp::Reverse(ns.len()));

        for (namespace, dir) in mappings {
            let ns_path = namespace.replace('\\', "/");
            let remainder = if path == ns_path {
                ""
            } else if let Some(rest) = path.strip_prefix(&format!("{ns_path}/")) {
                rest
            } else {
                continue;
            };

            let candidate = format!("{dir}{remainder}.php");
            if index.contains(&candidate) {
                return vec![candidate];
            }
            if let Some(hit) = index.get_insensitive(&candidate) {
                return vec![hit.to_string()];
            }
            break; // first matching prefix decides
        }
    }

    generic::resolve(index, current_file, &path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(paths: &[&str]) -> SuffixIndex {
        let owned: Vec<String> = paths.iter().map(|s| s.to_string()).collect();
        SuffixIndex::build(&owned)
    }

    fn psr4(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_psr4_prefix_match() {
        let idx = index(&["app/Http/Controllers/UserController.php"]);
        let map = psr4(&[("App", "app/")]);
        let targets = resolve(
            &idx,
            &map,
            "routes/web.php",
            "App\\Http\\Controllers\\UserController",
        );
        assert_eq!(targets, vec!["app/Http/Controllers/UserController.php"]);
    }

    #[test]
    fn test_psr4_longest_prefix_wins() {
        let idx = index(&["modules/admin/Panel.php", "app/Admin/Panel.php"]);
        let map = psr4(&[("App", "app/"), ("App\\Admin", "modules/admin/")]);
        let targets = resolve(&idx, &map, "index.php", "App\\Admin\\Panel");
        assert_eq!(targets, vec!["modules/admin/Panel.php"]);
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let idx = index(&["app/models/user.php"]);
        let map = psr4(&[("App", "app/")]);
        let targets = resolve(&idx, &map, "index.php", "App\\Models\\User");
        assert_eq!(targets, vec!["app/models/user.php"]);
    }

    #[test]
    fn test_generic_fallback_without_composer() {
        let idx = index(&["lib/Helper.php"]);
        let targets = resolve(&idx, &[], "index.php", "Lib\\Helper");
        assert_eq!(targets, vec!["lib/Helper.php"]);
    }
}
