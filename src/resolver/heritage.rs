//! Name-based heritage linking.
//!
//! Extracted heritage records carry class and parent names, not node ids.
//! This pass wires EXTENDS / IMPLEMENTS / TRAIT_IMPL edges between entity
//! nodes: candidates come from the graph's name index, same-file candidates
//! are preferred, and an ambiguous cross-file name fans out to all
//! candidates at reduced confidence.

use crate::graph::CodeGraph;
use crate::graph::edge::{EdgeType, GraphEdge};
use crate::parser::{ExtractedHeritage, HeritageKind};

pub fn resolve_heritage(graph: &mut CodeGraph, records: &[ExtractedHeritage]) -> usize {
    // Collect first: the name index borrows the graph.
    let mut planned: Vec<(String, String, EdgeType, f64, &'static str)> = Vec::new();

    for record in records {
        let Some(class_id) = entity_in_file(graph, &record.class_name, &record.file_path) else {
            continue;
        };

        let candidates: Vec<&str> = graph
            .name_index
            .get(&record.parent_name)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&idx| &graph.graph[idx])
                    .filter(|node| node.id != class_id)
                    .map(|node| (node.id.as_str(), node.properties.file_path.as_str()))
                    .collect::<Vec<_>>()
            })
            .map(|nodes| {
                let same_file: Vec<&str> = nodes
                    .iter()
                    .filter(|(_, file)| *file == record.file_path)
                    .map(|(id, _)| *id)
                    .collect();
                if same_file.is_empty() {
                    nodes.iter().map(|(id, _)| *id).collect()
                } else {
                    same_file
                }
            })
            .unwrap_or_default();

        let edge_type = match record.kind {
            HeritageKind::Extends => EdgeType::Extends,
            HeritageKind::Implements => EdgeType::Implements,
            HeritageKind::TraitImpl => EdgeType::TraitImpl,
        };

        for target_id in candidates {
            let same_file = graph
                .node_by_id(target_id)
                .map(|n| n.properties.file_path == record.file_path)
                .unwrap_or(false);
            let (confidence, reason) = if same_file {
                (0.9, "same-file")
            } else {
                (0.6, "name-match")
            };
            planned.push((
                class_id.clone(),
                target_id.to_string(),
                edge_type,
                confidence,
                reason,
            ));
        }
    }

    let mut added = 0;
    for (source, target, edge_type, confidence, reason) in planned {
        let edge = GraphEdge::new(edge_type, &source, &target)
            .with_confidence(confidence)
            .with_reason(reason);
        if graph.add_edge(edge) {
            added += 1;
        }
    }
    added
}

/// The id of the entity named `name` defined in `file_path`, if any.
fn entity_in_file(graph: &CodeGraph, name: &str, file_path: &str) -> Option<String> {
    graph.name_index.get(name).and_then(|indices| {
        indices
            .iter()
            .map(|&idx| &graph.graph[idx])
            .find(|node| node.properties.file_path == file_path)
            .map(|node| node.id.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{GraphNode, NodeLabel};

    fn entity(label: NodeLabel, name: &str, file: &str) -> GraphNode {
        GraphNode::entity(label, name, file, 1, 5, "typescript", true)
    }

    fn heritage(file: &str, class: &str, parent: &str, kind: HeritageKind) -> ExtractedHeritage {
        ExtractedHeritage {
            file_path: file.to_string(),
            class_name: class.to_string(),
            parent_name: parent.to_string(),
            kind,
        }
    }

    #[test]
    fn test_same_file_extends() {
        let mut g = CodeGraph::new();
        g.add_node(entity(NodeLabel::Class, "Base", "a.ts"));
        g.add_node(entity(NodeLabel::Class, "User", "a.ts"));

        let added = resolve_heritage(
            &mut g,
            &[heritage("a.ts", "User", "Base", HeritageKind::Extends)],
        );
        assert_eq!(added, 1);
        let edge = g.edges().next().unwrap();
        assert_eq!(edge.edge_type, EdgeType::Extends);
        assert_eq!(edge.confidence, 0.9);
        assert_eq!(edge.reason, "same-file");
    }

    #[test]
    fn test_cross_file_lower_confidence() {
        let mut g = CodeGraph::new();
        g.add_node(entity(NodeLabel::Interface, "Runner", "traits.ts"));
        g.add_node(entity(NodeLabel::Class, "Engine", "engine.ts"));

        let added = resolve_heritage(
            &mut g,
            &[heritage(
                "engine.ts",
                "Engine",
                "Runner",
                HeritageKind::Implements,
            )],
        );
        assert_eq!(added, 1);
        let edge = g.edges().next().unwrap();
        assert_eq!(edge.confidence, 0.6);
        assert_eq!(edge.reason, "name-match");
    }

    #[test]
    fn test_unmatched_parent_dropped() {
        let mut g = CodeGraph::new();
        g.add_node(entity(NodeLabel::Class, "User", "a.ts"));
        let added = resolve_heritage(
            &mut g,
            &[heritage("a.ts", "User", "Missing", HeritageKind::Extends)],
        );
        assert_eq!(added, 0);
    }
}
