//! PHP-specific node enrichment.
//!
//! Laravel Eloquent models carry most of their schema in array properties
//! (`$fillable`, `$casts`, …) and relation methods (`$this->hasMany(...)`).
//! Summarizing those into a `description` makes the Property/Method nodes
//! far more useful to downstream consumers than bare names.

use tree_sitter::Node;

use crate::parser::exports::node_text;

/// Eloquent array properties whose values are summarized.
const META_PROPERTIES: &[&str] = &["fillable", "casts", "hidden", "guarded", "with", "appends"];

/// Eloquent relation builders recognized inside method bodies.
const RELATION_METHODS: &[&str] = &[
    "hasMany",
    "hasOne",
    "belongsTo",
    "belongsToMany",
    "morphTo",
    "morphMany",
    "morphOne",
    "morphToMany",
    "morphedByMany",
    "hasManyThrough",
    "hasOneThrough",
];

/// For a `Property` named in `META_PROPERTIES`, walk into its array literal
/// and produce a comma-joined value summary (`key:value` pairs for `casts`).
pub fn property_description(name: &str, name_node: Node, source: &[u8]) -> Option<String> {
    if !META_PROPERTIES.contains(&name) {
        return None;
    }

    // Ascend to the property_element that holds the default value.
    let mut element = name_node;
    while element.kind() != "property_element" {
        element = element.parent()?;
    }

    let array = find_descendant(element, "array_creation_expression")?;
    let mut parts = Vec::new();
    let mut cursor = array.walk();
    for child in array.named_children(&mut cursor) {
        if child.kind() != "array_element_initializer" {
            continue;
        }
        let mut values = Vec::new();
        let mut inner = child.walk();
        for value in child.named_children(&mut inner) {
            values.push(unquote(node_text(value, source)));
        }
        match values.as_slice() {
            [single] => parts.push(single.clone()),
            [key, value] => parts.push(format!("{key}:{value}")),
            _ => {}
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// For a `Method` whose body calls an Eloquent relation builder on `$this`,
/// produce e.g. `hasMany(Post)`.
pub fn method_relation_description(name_node: Node, source: &[u8]) -> Option<String> {
    let mut method = name_node;
    while method.kind() != "method_declaration" {
        method = method.parent()?;
    }
    let body = method.child_by_field_name("body")?;
    find_relation_call(body, source)
}

fn find_relation_call(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() == "member_call_expression"
        && let Some(object) = node.child_by_field_name("object")
        && node_text(object, source) == "$this"
        && let Some(name) = node.child_by_field_name("name")
    {
        let relation = node_text(name, source);
        if RELATION_METHODS.contains(&relation) {
            let class = node
                .child_by_field_name("arguments")
                .and_then(|args| find_descendant(args, "class_constant_access_expression"))
                .map(|access| {
                    let text = node_text(access, source);
                    text.split("::").next().unwrap_or(text).to_string()
                })
                .unwrap_or_default();
            return Some(format!("{relation}({class})"));
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_relation_call(child, source) {
            return Some(found);
        }
    }
    None
}

/// Depth-first search for the first descendant of `kind`.
fn find_descendant<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_descendant(child, kind) {
            return Some(found);
        }
    }
    None
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '\'' || c == '"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use tree_sitter::Parser;

    fn parse_php(src: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser.set_language(&Language::Php.grammar()).unwrap();
        parser.parse(src, None).unwrap()
    }

    fn find<'a>(n: Node<'a>, kind: &str) -> Option<Node<'a>> {
        find_descendant(n, kind)
    }

    #[test]
    fn test_fillable_summary() {
        let src = r#"<?php
class User {
    protected $fillable = ['name', 'email'];
}
"#;
        let tree = parse_php(src);
        let element = find(tree.root_node(), "property_element").unwrap();
        let name = find(element, "name").unwrap();
        let desc = property_description("fillable", name, src.as_bytes());
        assert_eq!(desc.as_deref(), Some("name, email"));
    }

    #[test]
    fn test_casts_key_value_summary() {
        let src = r#"<?php
class User {
    protected $casts = ['active' => 'boolean', 'age' => 'integer'];
}
"#;
        let tree = parse_php(src);
        let element = find(tree.root_node(), "property_element").unwrap();
        let name = find(element, "name").unwrap();
        let desc = property_description("casts", name, src.as_bytes());
        assert_eq!(desc.as_deref(), Some("active:boolean, age:integer"));
    }

    #[test]
    fn test_non_meta_property_skipped() {
        let src = r#"<?php
class User {
    protected $table = 'users';
}
"#;
        let tree = parse_php(src);
        let element = find(tree.root_node(), "property_element").unwrap();
        let name = find(element, "name").unwrap();
        assert!(property_description("table", name, src.as_bytes()).is_none());
    }

    #[test]
    fn test_relation_method_summary() {
        let src = r#"<?php
class User {
    public function posts() {
        return $this->hasMany(Post::class);
    }
}
"#;
        let tree = parse_php(src);
        let method = find(tree.root_node(), "method_declaration").unwrap();
        let name = method.child_by_field_name("name").unwrap();
        let desc = method_relation_description(name, src.as_bytes());
        assert_eq!(desc.as_deref(), Some("hasMany(Post)"));
    }
}
