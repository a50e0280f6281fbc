use serde::{Deserialize, Serialize};

use super::node::generate_id;

/// The type of a directed edge between two nodes in the code graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// File -> entity: the file defines this code entity.
    Defines,
    /// File -> file: the source file imports the target file.
    Imports,
    /// Folder -> folder/file: filesystem containment.
    Contains,
    /// Entity -> entity: class extends class, interface extends interface.
    Extends,
    /// Entity -> entity: class implements interface.
    Implements,
    /// Entity -> entity: Rust `impl Trait for Type`, PHP `use Trait`.
    TraitImpl,
}

impl EdgeType {
    /// Wire form, stored in the `type` column of `CodeRelation`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Defines => "DEFINES",
            EdgeType::Imports => "IMPORTS",
            EdgeType::Contains => "CONTAINS",
            EdgeType::Extends => "EXTENDS",
            EdgeType::Implements => "IMPLEMENTS",
            EdgeType::TraitImpl => "TRAIT_IMPL",
        }
    }
}

/// A directed, typed edge. `confidence` is 1.0 for structural facts
/// (DEFINES, CONTAINS, resolved IMPORTS) and lower for name-matched
/// heritage links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub edge_type: EdgeType,
    pub confidence: f64,
    pub reason: String,
    pub step: Option<u32>,
}

impl GraphEdge {
    /// Build an edge with a deterministic id of the form
    /// `<TYPE>:<source>-><target>`.
    pub fn new(edge_type: EdgeType, source_id: &str, target_id: &str) -> GraphEdge {
        GraphEdge {
            id: generate_id(edge_type.as_str(), &format!("{source_id}->{target_id}")),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            edge_type,
            confidence: 1.0,
            reason: String::new(),
            step: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> GraphEdge {
        self.confidence = confidence;
        self
    }

    pub fn with_reason(mut self, reason: &str) -> GraphEdge {
        self.reason = reason.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_deterministic() {
        let a = GraphEdge::new(EdgeType::Imports, "File:app.ts", "File:src/util/x.ts");
        let b = GraphEdge::new(EdgeType::Imports, "File:app.ts", "File:src/util/x.ts");
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, "IMPORTS:File:app.ts->File:src/util/x.ts");
        assert_eq!(a.confidence, 1.0);
    }
}
