//! Per-language export detection.
//!
//! `is_exported` is always computed from AST context, never guessed. Each
//! rule walks outward from the entity's name node; the walks are shallow in
//! practice (declaration → modifiers → file).

use tree_sitter::Node;

use crate::language::Language;

/// Extract the UTF-8 text of a node from the original source bytes.
pub(crate) fn node_text<'a>(node: Node<'a>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Decide whether the entity whose name is `name_node` is exported, per the
/// language's visibility rules.
pub fn is_exported(language: Language, name_node: Node, name: &str, source: &[u8]) -> bool {
    match language {
        Language::JavaScript | Language::TypeScript | Language::TypeScriptTsx => {
            js_is_exported(name_node, source)
        }
        Language::Python => !name.starts_with('_'),
        Language::Java => java_is_exported(name_node, source),
        Language::CSharp => ancestor_modifier_contains(name_node, source, &["public"]),
        Language::Go => name
            .chars()
            .next()
            .map(|c| c.is_uppercase() && c.to_lowercase().next() != Some(c))
            .unwrap_or(false),
        Language::Rust => rust_is_exported(name_node, source),
        // No reliable heuristic for C/C++ linkage without a full translation
        // unit model.
        Language::C | Language::Cpp => false,
        Language::Swift => ancestor_modifier_contains(name_node, source, &["public", "open"]),
        Language::Php => php_is_exported(name_node, source),
    }
}

/// JS/TS: exported when any ancestor is an `export_statement` or
/// `export_specifier`, or a lexical declaration whose parent is an export
/// statement, or an ancestor's text begins with `export `.
fn js_is_exported(node: Node, source: &[u8]) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        match n.kind() {
            "export_statement" | "export_specifier" => return true,
            "lexical_declaration" | "variable_declaration" => {
                if n.parent().map(|p| p.kind() == "export_statement") == Some(true) {
                    return true;
                }
            }
            _ => {}
        }
        // The root spans the whole file; its text starting with `export `
        // says nothing about this particular declaration.
        if n.kind() != "program" && node_text(n, source).starts_with("export ") {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Java: exported when an ancestor carries a `modifiers` child containing
/// `public`, or the enclosing method/constructor declaration starts with
/// `public`.
fn java_is_exported(node: Node, source: &[u8]) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        let mut cursor = n.walk();
        for child in n.children(&mut cursor) {
            if child.kind() == "modifiers" && node_text(child, source).contains("public") {
                return true;
            }
        }
        if matches!(n.kind(), "method_declaration" | "constructor_declaration")
            && node_text(n, source).starts_with("public")
        {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Rust: exported when any ancestor has a `visibility_modifier` child
/// containing `pub`.
fn rust_is_exported(node: Node, source: &[u8]) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        let mut cursor = n.walk();
        for child in n.children(&mut cursor) {
            if child.kind() == "visibility_modifier" && node_text(child, source).contains("pub") {
                return true;
            }
        }
        current = n.parent();
    }
    false
}

/// Shared C#/Swift rule: any ancestor is (or carries) a modifier node whose
/// text contains one of `keywords`.
fn ancestor_modifier_contains(node: Node, source: &[u8], keywords: &[&str]) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if matches!(n.kind(), "modifier" | "modifiers" | "visibility_modifier") {
            let text = node_text(n, source);
            if keywords.iter().any(|k| text.contains(k)) {
                return true;
            }
        }
        let mut cursor = n.walk();
        for child in n.children(&mut cursor) {
            if matches!(child.kind(), "modifier" | "modifiers" | "visibility_modifier") {
                let text = node_text(child, source);
                if keywords.iter().any(|k| text.contains(k)) {
                    return true;
                }
            }
        }
        current = n.parent();
    }
    false
}

/// PHP: top-level class-like declarations and top-level functions are
/// exported; class members need a `public` visibility modifier.
fn php_is_exported(node: Node, source: &[u8]) -> bool {
    // Find the enclosing declaration for the name node.
    let mut decl = node;
    while let Some(parent) = decl.parent() {
        if matches!(
            decl.kind(),
            "class_declaration"
                | "interface_declaration"
                | "trait_declaration"
                | "enum_declaration"
                | "function_definition"
                | "method_declaration"
                | "property_declaration"
        ) {
            break;
        }
        decl = parent;
    }

    match decl.kind() {
        "class_declaration" | "interface_declaration" | "trait_declaration"
        | "enum_declaration" => top_level_php(decl),
        "function_definition" => top_level_php(decl),
        "method_declaration" | "property_declaration" => {
            let mut cursor = decl.walk();
            for child in decl.children(&mut cursor) {
                if child.kind() == "visibility_modifier" {
                    return node_text(child, source) == "public";
                }
            }
            // PHP defaults to public visibility when no modifier is written.
            true
        }
        _ => false,
    }
}

/// True when no ancestor of `decl` is a class-like declaration (i.e. the
/// declaration sits at the top level of the compilation unit).
fn top_level_php(decl: Node) -> bool {
    let mut current = decl.parent();
    while let Some(n) = current {
        if matches!(
            n.kind(),
            "class_declaration" | "interface_declaration" | "trait_declaration" | "enum_declaration"
        ) {
            return false;
        }
        current = n.parent();
    }
    true
}
