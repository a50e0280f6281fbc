use tree_sitter::Language as TsLanguage;

/// A source language handled by repograph.
///
/// Closed enumeration: the parse workers, the resolver dispatch, and the
/// capture queries all pattern-match on this. Cheap to copy.
///
/// `.tsx` gets its own variant because the grammar differs: the TypeScript
/// grammar cannot parse JSX, and the TSX grammar breaks angle-bracket type
/// assertions (`<T>expr`). Mixing them causes parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    TypeScript,
    TypeScriptTsx,
    Python,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    Php,
    Swift,
}

impl Language {
    /// Map a file extension to its language, or `None` if unsupported.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "js" | "jsx" => Some(Language::JavaScript),
            "ts" => Some(Language::TypeScript),
            "tsx" => Some(Language::TypeScriptTsx),
            "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Some(Language::Cpp),
            "cs" => Some(Language::CSharp),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            "php" | "phtml" => Some(Language::Php),
            "swift" => Some(Language::Swift),
            _ => None,
        }
    }

    /// Map a repo-relative path to its language via the extension table.
    pub fn from_path(path: &str) -> Option<Language> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let ext = match name.rsplit_once('.') {
            Some((_, e)) => e,
            None => return None,
        };
        Language::from_extension(ext)
    }

    /// The tree-sitter grammar handle for this language.
    pub fn grammar(&self) -> TsLanguage {
        match self {
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::TypeScriptTsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Language::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            Language::Swift => tree_sitter_swift::LANGUAGE.into(),
        }
    }

    /// The wire tag stored on graph nodes (`language` property).
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::TypeScriptTsx => "typescript-tsx",
            Language::Python => "python",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Swift => "swift",
        }
    }

    /// All supported source extensions, used by the walker's discovery filter.
    pub fn source_extensions() -> &'static [&'static str] {
        &[
            "js", "jsx", "ts", "tsx", "py", "java", "c", "h", "cpp", "cc", "cxx", "hpp", "hxx",
            "hh", "cs", "go", "rs", "php", "phtml", "swift",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_table() {
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(
            Language::from_extension("tsx"),
            Some(Language::TypeScriptTsx)
        );
        assert_eq!(Language::from_extension("jsx"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("h"), Some(Language::C));
        assert_eq!(Language::from_extension("hh"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("phtml"), Some(Language::Php));
        assert_eq!(Language::from_extension("md"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Language::from_path("src/app/main.swift"),
            Some(Language::Swift)
        );
        assert_eq!(Language::from_path("Makefile"), None);
        assert_eq!(Language::from_path("a/b.test.go"), Some(Language::Go));
    }

    #[test]
    fn test_grammars_load() {
        // Every grammar handle must be constructible; a failure here means a
        // grammar crate version is incompatible with the tree-sitter runtime.
        for lang in [
            Language::JavaScript,
            Language::TypeScript,
            Language::TypeScriptTsx,
            Language::Python,
            Language::Java,
            Language::C,
            Language::Cpp,
            Language::CSharp,
            Language::Go,
            Language::Rust,
            Language::Php,
            Language::Swift,
        ] {
            let _ = lang.grammar();
        }
    }
}
