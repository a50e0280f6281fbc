pub mod edge;
pub mod node;

use std::collections::{HashMap, HashSet};

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};

use edge::{EdgeType, GraphEdge};
use node::{GraphNode, NodeLabel};

/// The in-memory code graph: a directed petgraph StableGraph with O(1)
/// id-based dedup.
///
/// This is a passive container — producers (the structure phase, the parse
/// workers, the resolver) enforce the semantic invariants; insertion here
/// only guarantees id uniqueness and `(source, type, target)` uniqueness.
pub struct CodeGraph {
    /// The underlying directed graph.
    pub graph: StableGraph<GraphNode, GraphEdge, Directed>,
    /// Maps node ids to indices for O(1) lookup and dedup.
    pub id_index: HashMap<String, NodeIndex>,
    /// Maps entity names to all node indices bearing that name.
    /// Used by the heritage pass; File/Folder nodes are not indexed here.
    pub name_index: HashMap<String, Vec<NodeIndex>>,
    /// Dedup set for `(source_id, type, target_id)` triples.
    edge_triples: HashSet<(String, EdgeType, String)>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            id_index: HashMap::new(),
            name_index: HashMap::new(),
            edge_triples: HashSet::new(),
        }
    }

    /// Insert a node, deduplicating by id. Returns the node's index.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&existing) = self.id_index.get(&node.id) {
            return existing;
        }
        let id = node.id.clone();
        let name = node.properties.name.clone();
        let is_entity = !matches!(node.label, NodeLabel::File | NodeLabel::Folder);
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        if is_entity && !name.is_empty() {
            self.name_index.entry(name).or_default().push(idx);
        }
        idx
    }

    /// Insert an edge, deduplicating by `(source, type, target)`.
    ///
    /// Both endpoints must already be present; edges referencing unknown ids
    /// are dropped (returns `false`), so every stored edge connects real
    /// nodes.
    pub fn add_edge(&mut self, edge: GraphEdge) -> bool {
        let triple = (
            edge.source_id.clone(),
            edge.edge_type,
            edge.target_id.clone(),
        );
        if self.edge_triples.contains(&triple) {
            return false;
        }
        let (Some(&src), Some(&tgt)) = (
            self.id_index.get(&edge.source_id),
            self.id_index.get(&edge.target_id),
        ) else {
            return false;
        };
        self.graph.add_edge(src, tgt, edge);
        self.edge_triples.insert(triple);
        true
    }

    pub fn node_by_id(&self, id: &str) -> Option<&GraphNode> {
        self.id_index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_indices().map(|i| &self.graph[i])
    }

    /// Iterate all edges.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.graph.edge_indices().map(|i| &self.graph[i])
    }

    /// Count nodes per label, for the summary.
    pub fn nodes_by_label(&self) -> HashMap<NodeLabel, usize> {
        let mut map = HashMap::new();
        for node in self.nodes() {
            *map.entry(node.label).or_insert(0) += 1;
        }
        map
    }
}

impl Default for CodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::NodeLabel;

    #[test]
    fn test_node_dedup_by_id() {
        let mut g = CodeGraph::new();
        let a = g.add_node(GraphNode::file("app.ts", "typescript"));
        let b = g.add_node(GraphNode::file("app.ts", "typescript"));
        assert_eq!(a, b);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_edge_requires_endpoints() {
        let mut g = CodeGraph::new();
        g.add_node(GraphNode::file("a.ts", "typescript"));
        let dangling = GraphEdge::new(EdgeType::Imports, "File:a.ts", "File:missing.ts");
        assert!(!g.add_edge(dangling));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_edge_triple_dedup() {
        let mut g = CodeGraph::new();
        g.add_node(GraphNode::file("a.ts", "typescript"));
        g.add_node(GraphNode::file("b.ts", "typescript"));
        assert!(g.add_edge(GraphEdge::new(EdgeType::Imports, "File:a.ts", "File:b.ts")));
        assert!(!g.add_edge(GraphEdge::new(EdgeType::Imports, "File:a.ts", "File:b.ts")));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_name_index_tracks_entities_only() {
        let mut g = CodeGraph::new();
        g.add_node(GraphNode::file("a.ts", "typescript"));
        g.add_node(GraphNode::entity(
            NodeLabel::Class,
            "User",
            "a.ts",
            1,
            10,
            "typescript",
            true,
        ));
        assert!(g.name_index.contains_key("User"));
        assert!(!g.name_index.contains_key("a.ts"));
    }
}
