//! Project metadata loaders: TS path aliases, the Go module path, Composer
//! PSR-4 mappings, and Swift SPM targets.
//!
//! Each loader is independent and runs once per pipeline at the repo root.
//! A missing or malformed file means "no config" — never an error.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde_json::Value;

/// TypeScript path-alias configuration from `tsconfig*.json`.
#[derive(Debug, Clone, Default)]
pub struct TsconfigPaths {
    /// `compilerOptions.baseUrl`, defaulting to `"."`.
    pub base_url: String,
    /// `(alias prefix, target prefix)` pairs with trailing `*` removed,
    /// e.g. `("@/", "src/")` for `"@/*": ["src/*"]`.
    pub aliases: Vec<(String, String)>,
}

/// Everything the resolver needs from the repository's metadata files.
#[derive(Debug, Clone, Default)]
pub struct ProjectMetadata {
    pub tsconfig: Option<TsconfigPaths>,
    /// The module line from `go.mod`.
    pub go_module: Option<String>,
    /// PSR-4 namespace prefix -> directory, merged from `autoload` and
    /// `autoload-dev`, keys stripped of their trailing `\`.
    pub psr4: Vec<(String, String)>,
    /// SPM target name -> repo-relative source directory.
    pub swift_targets: HashMap<String, String>,
}

impl ProjectMetadata {
    /// Load all metadata from `repo_root`. Never fails.
    pub fn load(repo_root: &Path) -> ProjectMetadata {
        ProjectMetadata {
            tsconfig: load_tsconfig(repo_root),
            go_module: load_go_module(repo_root),
            psr4: load_composer_psr4(repo_root),
            swift_targets: load_swift_targets(repo_root),
        }
    }
}

// ---------------------------------------------------------------------------
// tsconfig
// ---------------------------------------------------------------------------

/// Candidate tsconfig files, tried in order.
const TSCONFIG_CANDIDATES: &[&str] = &["tsconfig.json", "tsconfig.app.json", "tsconfig.base.json"];

fn load_tsconfig(root: &Path) -> Option<TsconfigPaths> {
    for candidate in TSCONFIG_CANDIDATES {
        let path = root.join(candidate);
        let Ok(contents) = std::fs::read_to_string(&path) else {
            continue;
        };
        let stripped = strip_json_comments(&contents);
        let parsed: Value = match serde_json::from_str(&stripped) {
            Ok(v) => v,
            Err(_) => continue, // malformed -> try the next candidate
        };
        let options = &parsed["compilerOptions"];
        let base_url = options["baseUrl"].as_str().unwrap_or(".").to_string();

        let mut aliases = Vec::new();
        if let Some(paths) = options["paths"].as_object() {
            for (pattern, targets) in paths {
                let target = targets
                    .as_array()
                    .and_then(|arr| arr.first())
                    .and_then(|t| t.as_str());
                if let Some(target) = target {
                    aliases.push((
                        pattern.trim_end_matches('*').to_string(),
                        target.trim_end_matches('*').to_string(),
                    ));
                }
            }
        }
        return Some(TsconfigPaths { base_url, aliases });
    }
    None
}

/// Remove `//` and `/* ... */` comments from JSONC without touching string
/// literals. tsconfig files use comments routinely, so this runs before every
/// JSON parse.
pub fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    let mut in_string = false;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < bytes.len() {
                out.push(bytes[i + 1] as char);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            '/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            '/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// go.mod
// ---------------------------------------------------------------------------

fn load_go_module(root: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(root.join("go.mod")).ok()?;
    let re = Regex::new(r"(?m)^module\s+(\S+)").expect("static regex");
    re.captures(&contents)
        .map(|caps| caps[1].to_string())
}

// ---------------------------------------------------------------------------
// composer.json
// ---------------------------------------------------------------------------

fn load_composer_psr4(root: &Path) -> Vec<(String, String)> {
    let Ok(contents) = std::fs::read_to_string(root.join("composer.json")) else {
        return Vec::new();
    };
    let Ok(parsed) = serde_json::from_str::<Value>(&contents) else {
        return Vec::new();
    };

    let mut mappings = Vec::new();
    for section in ["autoload", "autoload-dev"] {
        if let Some(psr4) = parsed[section]["psr-4"].as_object() {
            for (namespace, dir) in psr4 {
                let dir = match dir {
                    Value::String(s) => Some(s.as_str()),
                    Value::Array(arr) => arr.first().and_then(|v| v.as_str()),
                    _ => None,
                };
                if let Some(dir) = dir {
                    let namespace = namespace.trim_end_matches('\\').to_string();
                    let mut dir = dir.replace('\\', "/");
                    if !dir.is_empty() && !dir.ends_with('/') {
                        dir.push('/');
                    }
                    mappings.push((namespace, dir));
                }
            }
        }
    }
    mappings
}

// ---------------------------------------------------------------------------
// Swift SPM
// ---------------------------------------------------------------------------

/// Directories scanned for SPM targets; each direct subdirectory `T` becomes
/// the target `T -> <dir>/T`.
const SWIFT_SOURCE_DIRS: &[&str] = &["Sources", "Package/Sources", "src"];

fn load_swift_targets(root: &Path) -> HashMap<String, String> {
    let mut targets = HashMap::new();
    for source_dir in SWIFT_SOURCE_DIRS {
        let dir = root.join(source_dir);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            if entry.path().is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                targets
                    .entry(name.to_string())
                    .or_insert_with(|| format!("{source_dir}/{name}"));
            }
        }
    }
    targets
}
