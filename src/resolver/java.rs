//! Java import resolution: package wildcards, static imports, and plain
//! class imports.

use std::sync::OnceLock;

use regex::Regex;

use super::suffix::SuffixIndex;

/// `MAX_VALUE`-style constant segments mark a static member import.
fn all_caps_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z_]+$").expect("static regex"))
}

/// Resolve a Java import. Returns `None` to fall through to the generic
/// strategy (plain class imports), `Some(targets)` when the wildcard or
/// static form was handled here — even when it matched nothing.
pub fn resolve(index: &SuffixIndex, import: &str) -> Option<Vec<String>> {
    // `import com.ex.util.*;` — every class directly in the package.
    if let Some(package) = import.strip_suffix(".*") {
        let dir = package.replace('.', "/");
        return Some(index.files_in_dir(&dir, "java").to_vec());
    }

    // `import static com.ex.Foo.bar;` / `...Foo.MAX_SIZE;` / `...Foo.*;` —
    // the member segment is dropped and the class file looked up.
    let segments: Vec<&str> = import.split('.').collect();
    if let Some(last) = segments.last() {
        let is_member = *last == "*"
            || last.chars().next().map(|c| c.is_lowercase()).unwrap_or(false)
            || all_caps_re().is_match(last);
        if is_member && segments.len() > 1 {
            let class_path = format!("{}.java", segments[..segments.len() - 1].join("/"));
            return Some(index.get(&class_path).map(str::to_string).into_iter().collect());
        }
    }

    None
}
