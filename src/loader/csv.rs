//! CSV staging for the bulk loader.
//!
//! One CSV per non-empty node table plus one relationship CSV, all RFC 4180
//! (comma delimiter, double-quote as both quote and escape, header row) —
//! exactly the dialect the COPY statements declare.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::graph::CodeGraph;
use crate::graph::node::{GraphNode, NodeLabel};

/// Column lists per table shape. Multi-language entity tables share one
/// uniform layout; File and Folder carry only what they need.
pub const FILE_COLUMNS: &[&str] = &["id", "name", "filePath", "language"];
pub const FOLDER_COLUMNS: &[&str] = &["id", "name", "path"];
pub const ENTITY_COLUMNS: &[&str] = &[
    "id",
    "name",
    "filePath",
    "startLine",
    "endLine",
    "language",
    "isExported",
    "description",
];
pub const RELATION_COLUMNS: &[&str] =
    &["sourceId", "targetId", "type", "confidence", "reason", "step"];

/// The columns for a node table.
pub fn columns_for(label: NodeLabel) -> &'static [&'static str] {
    match label {
        NodeLabel::File => FILE_COLUMNS,
        NodeLabel::Folder => FOLDER_COLUMNS,
        _ => ENTITY_COLUMNS,
    }
}

/// Write one CSV per non-empty node label into `dir`. Returns
/// `(label, csv path, row count)` per emitted file.
pub fn emit_node_csvs(graph: &CodeGraph, dir: &Path) -> Result<Vec<(NodeLabel, PathBuf, usize)>> {
    let mut by_label: HashMap<NodeLabel, Vec<&GraphNode>> = HashMap::new();
    for node in graph.nodes() {
        by_label.entry(node.label).or_default().push(node);
    }

    let mut emitted = Vec::new();
    for label in NodeLabel::all() {
        let Some(nodes) = by_label.get(label) else {
            continue;
        };
        let path = dir.join(format!("{}.csv", label.as_str()));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(columns_for(*label))?;
        for node in nodes {
            write_node_row(&mut writer, node)?;
        }
        writer.flush()?;
        emitted.push((*label, path, nodes.len()));
    }
    Ok(emitted)
}

fn write_node_row(writer: &mut csv::Writer<std::fs::File>, node: &GraphNode) -> Result<()> {
    let p = &node.properties;
    match node.label {
        NodeLabel::File => {
            writer.write_record([&node.id, &p.name, &p.file_path, &p.language])?;
        }
        NodeLabel::Folder => {
            writer.write_record([&node.id, &p.name, &p.file_path])?;
        }
        _ => {
            let start_line = p.start_line.to_string();
            let end_line = p.end_line.to_string();
            writer.write_record([
                node.id.as_str(),
                p.name.as_str(),
                p.file_path.as_str(),
                start_line.as_str(),
                end_line.as_str(),
                p.language.as_str(),
                if p.is_exported { "true" } else { "false" },
                p.description.as_deref().unwrap_or(""),
            ])?;
        }
    }
    Ok(())
}

/// Write the relationship CSV. Returns `(csv path, row count)`.
pub fn emit_edge_csv(graph: &CodeGraph, dir: &Path) -> Result<(PathBuf, usize)> {
    let path = dir.join("CodeRelation.csv");
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(RELATION_COLUMNS)?;
    let mut rows = 0;
    for edge in graph.edges() {
        let confidence = edge.confidence.to_string();
        let step = edge.step.map(|s| s.to_string()).unwrap_or_default();
        writer.write_record([
            edge.source_id.as_str(),
            edge.target_id.as_str(),
            edge.edge_type.as_str(),
            confidence.as_str(),
            edge.reason.as_str(),
            step.as_str(),
        ])?;
        rows += 1;
    }
    writer.flush()?;
    Ok((path, rows))
}
