use serde::{Deserialize, Serialize};

/// The label of a node in the code graph.
///
/// Closed set; the loader creates one database table per label, so adding a
/// variant here means adding a schema statement in `loader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    File,
    Folder,
    Function,
    Class,
    Interface,
    Method,
    Struct,
    Enum,
    Namespace,
    Module,
    Trait,
    Impl,
    TypeAlias,
    Const,
    Static,
    Typedef,
    Macro,
    Union,
    Property,
    Record,
    Delegate,
    Annotation,
    Constructor,
    Template,
    CodeElement,
}

impl NodeLabel {
    /// The label's string form — used as the id prefix and the table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::File => "File",
            NodeLabel::Folder => "Folder",
            NodeLabel::Function => "Function",
            NodeLabel::Class => "Class",
            NodeLabel::Interface => "Interface",
            NodeLabel::Method => "Method",
            NodeLabel::Struct => "Struct",
            NodeLabel::Enum => "Enum",
            NodeLabel::Namespace => "Namespace",
            NodeLabel::Module => "Module",
            NodeLabel::Trait => "Trait",
            NodeLabel::Impl => "Impl",
            NodeLabel::TypeAlias => "TypeAlias",
            NodeLabel::Const => "Const",
            NodeLabel::Static => "Static",
            NodeLabel::Typedef => "Typedef",
            NodeLabel::Macro => "Macro",
            NodeLabel::Union => "Union",
            NodeLabel::Property => "Property",
            NodeLabel::Record => "Record",
            NodeLabel::Delegate => "Delegate",
            NodeLabel::Annotation => "Annotation",
            NodeLabel::Constructor => "Constructor",
            NodeLabel::Template => "Template",
            NodeLabel::CodeElement => "CodeElement",
        }
    }

    /// All labels, in schema-creation order (plain tables first, then the
    /// multi-language tables that require identifier quoting).
    pub fn all() -> &'static [NodeLabel] {
        &[
            NodeLabel::File,
            NodeLabel::Folder,
            NodeLabel::Function,
            NodeLabel::Class,
            NodeLabel::Interface,
            NodeLabel::Method,
            NodeLabel::CodeElement,
            NodeLabel::Struct,
            NodeLabel::Enum,
            NodeLabel::Macro,
            NodeLabel::Typedef,
            NodeLabel::Union,
            NodeLabel::Namespace,
            NodeLabel::Trait,
            NodeLabel::Impl,
            NodeLabel::TypeAlias,
            NodeLabel::Const,
            NodeLabel::Static,
            NodeLabel::Property,
            NodeLabel::Record,
            NodeLabel::Delegate,
            NodeLabel::Annotation,
            NodeLabel::Constructor,
            NodeLabel::Template,
            NodeLabel::Module,
        ]
    }
}

/// Build a deterministic node or edge id from a label and a key.
///
/// Node keys are `filePath` for files/folders and `filePath:name` for code
/// entities, so identical inputs always produce identical ids across runs.
/// The text before the first `:` is the label — the loader derives each edge
/// endpoint's table from it.
pub fn generate_id(label: &str, key: &str) -> String {
    format!("{label}:{key}")
}

/// Properties carried by every node. Entity nodes fill all fields; `File`
/// and `Folder` nodes leave the line/export fields at their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeProperties {
    pub name: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub language: String,
    pub is_exported: bool,
    /// Extra metadata; today only PHP Eloquent summaries (`hasMany(Post)`,
    /// `name, email`) populate this.
    pub description: Option<String>,
}

/// A node in the code graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: NodeLabel,
    pub properties: NodeProperties,
}

impl GraphNode {
    /// Build a `File` node for a repo-relative path.
    pub fn file(path: &str, language: &str) -> GraphNode {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        GraphNode {
            id: generate_id(NodeLabel::File.as_str(), path),
            label: NodeLabel::File,
            properties: NodeProperties {
                name,
                file_path: path.to_string(),
                language: language.to_string(),
                ..NodeProperties::default()
            },
        }
    }

    /// Build a `Folder` node for a repo-relative directory path.
    pub fn folder(path: &str) -> GraphNode {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        GraphNode {
            id: generate_id(NodeLabel::Folder.as_str(), path),
            label: NodeLabel::Folder,
            properties: NodeProperties {
                name,
                file_path: path.to_string(),
                ..NodeProperties::default()
            },
        }
    }

    /// Build a code-entity node. The id key is `filePath:name`.
    pub fn entity(
        label: NodeLabel,
        name: &str,
        file_path: &str,
        start_line: usize,
        end_line: usize,
        language: &str,
        is_exported: bool,
    ) -> GraphNode {
        GraphNode {
            id: generate_id(label.as_str(), &format!("{file_path}:{name}")),
            label,
            properties: NodeProperties {
                name: name.to_string(),
                file_path: file_path.to_string(),
                start_line,
                end_line,
                language: language.to_string(),
                is_exported,
                description: None,
            },
        }
    }
}

/// A flat symbol row, emitted alongside every entity node for downstream
/// search tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub id: String,
    pub name: String,
    pub label: NodeLabel,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub language: String,
    pub is_exported: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_ids() {
        let a = GraphNode::entity(NodeLabel::Function, "f", "src/a.ts", 1, 3, "typescript", true);
        let b = GraphNode::entity(NodeLabel::Function, "f", "src/a.ts", 1, 3, "typescript", true);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, "Function:src/a.ts:f");
    }

    #[test]
    fn test_file_node_name_is_leaf() {
        let f = GraphNode::file("src/util/x.ts", "typescript");
        assert_eq!(f.properties.name, "x.ts");
        assert_eq!(f.id, "File:src/util/x.ts");
    }

    #[test]
    fn test_label_prefix_roundtrip() {
        // The loader recovers the label from the id prefix; the prefix must be
        // exactly the label string for every variant.
        for label in NodeLabel::all() {
            let id = generate_id(label.as_str(), "k");
            let prefix = id.split(':').next().unwrap();
            assert_eq!(prefix, label.as_str());
        }
    }
}
