//! Pipeline orchestration: structure -> parse -> imports -> heritage -> load.
//!
//! The orchestrator owns all cross-stage state (graph, suffix index,
//! metadata) and releases large intermediates as each phase completes. It is
//! the only component that touches the graph and the database.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::graph::CodeGraph;
use crate::graph::edge::{EdgeType, GraphEdge};
use crate::graph::node::{GraphNode, generate_id};
use crate::language::Language;
use crate::loader::load_graph;
use crate::metadata::ProjectMetadata;
use crate::output::IndexSummary;
use crate::parser::pool::WorkerPool;
use crate::parser::{FileRecord, MAX_FILE_SIZE};
use crate::resolver::{SuffixIndex, resolve_heritage, resolve_imports};

/// Tunables owned by the caller (CLI flags / repograph.toml).
pub struct PipelineOptions {
    pub workers: usize,
    pub sub_batch_size: usize,
    pub verbose: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: WorkerPool::default_workers(),
            sub_batch_size: 100,
            verbose: false,
        }
    }
}

/// Run the whole ingestion pipeline and persist the graph under `db_dir`.
///
/// Returns the in-memory graph (for callers that keep navigating it) and the
/// run summary.
pub fn run(
    repo_root: &Path,
    files: Vec<FileRecord>,
    db_dir: &Path,
    options: &PipelineOptions,
) -> Result<(CodeGraph, IndexSummary)> {
    let started = Instant::now();
    let files_total = files.len();

    // Eligibility gate shared by the structure and parse phases: a file that
    // is oversized or of unknown language contributes no nodes and no edges.
    let eligible: Vec<FileRecord> = files
        .into_iter()
        .filter(|f| Language::from_path(&f.path).is_some() && f.content.len() <= MAX_FILE_SIZE)
        .collect();

    let mut graph = CodeGraph::new();

    // -----------------------------------------------------------------------
    // Phase: structure. File/Folder nodes and CONTAINS edges from paths.
    // -----------------------------------------------------------------------
    if options.verbose {
        eprintln!("structure: {} of {} files eligible", eligible.len(), files_total);
    }
    build_structure(&mut graph, &eligible);

    // The suffix index covers exactly the eligible paths so every resolution
    // target is backed by a File node.
    let paths: Vec<String> = eligible.iter().map(|f| f.path.clone()).collect();
    let index = SuffixIndex::build(&paths);
    let metadata = ProjectMetadata::load(repo_root);

    // -----------------------------------------------------------------------
    // Phase: parse.
    // -----------------------------------------------------------------------
    if options.verbose {
        eprintln!(
            "parse: {} files across {} workers (sub-batch {})",
            eligible.len(),
            options.workers,
            options.sub_batch_size
        );
    }
    let mut pool = WorkerPool::new(options.workers);
    let verbose = options.verbose;
    let parsed = pool.parse_files(eligible, options.sub_batch_size, |done| {
        if verbose {
            eprintln!("parse: {done} files done");
        }
    })?;
    pool.shutdown();

    let files_parsed = parsed.file_count;
    let symbols = parsed.symbols.len();
    let calls_found = parsed.calls.len();
    let heritage_found = parsed.heritage.len();

    for node in parsed.nodes {
        graph.add_node(node);
    }
    for edge in parsed.defines_edges {
        graph.add_edge(edge);
    }

    // -----------------------------------------------------------------------
    // Phase: imports.
    // -----------------------------------------------------------------------
    let resolution = resolve_imports(&index, &metadata, &parsed.imports, |done| {
        if verbose {
            eprintln!("imports: {done} files resolved");
        }
    });
    let imports_found = resolution.stats.imports_found;
    let imports_resolved = resolution.stats.imports_resolved;
    let mut import_edges = 0;
    for edge in resolution.edges {
        if graph.add_edge(edge) {
            import_edges += 1;
        }
    }
    drop(resolution.import_map);

    // -----------------------------------------------------------------------
    // Phase: heritage.
    // -----------------------------------------------------------------------
    let heritage_edges = resolve_heritage(&mut graph, &parsed.heritage);

    // Parse intermediates are no longer needed; release before the load.
    drop(parsed.imports);
    drop(parsed.heritage);
    drop(parsed.calls);
    drop(index);

    // -----------------------------------------------------------------------
    // Phase: load.
    // -----------------------------------------------------------------------
    if options.verbose {
        eprintln!(
            "load: {} nodes, {} edges -> {}",
            graph.node_count(),
            graph.edge_count(),
            db_dir.display()
        );
    }
    let load_stats = load_graph(&graph, db_dir)?;

    let summary = IndexSummary {
        files_total,
        files_parsed,
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        symbols,
        imports_found,
        imports_resolved,
        import_edges,
        calls_found,
        heritage_found,
        heritage_edges,
        inserted_rels: load_stats.inserted_rels,
        skipped_rels: load_stats.skipped_rels,
        elapsed_secs: started.elapsed().as_secs_f64(),
    };

    Ok((graph, summary))
}

/// Materialize Folder nodes for every directory that holds at least one
/// eligible file, File nodes for the files, and CONTAINS edges for both
/// folder->folder and folder->file relations.
fn build_structure(graph: &mut CodeGraph, files: &[FileRecord]) {
    // BTreeSet gives parents-before-children insertion order.
    let mut dirs: BTreeSet<String> = BTreeSet::new();
    for file in files {
        let mut path = file.path.as_str();
        while let Some((dir, _)) = path.rsplit_once('/') {
            dirs.insert(dir.to_string());
            path = dir;
        }
    }

    for dir in &dirs {
        graph.add_node(GraphNode::folder(dir));
    }
    for dir in &dirs {
        if let Some((parent, _)) = dir.rsplit_once('/') {
            let parent_id = generate_id("Folder", parent);
            let dir_id = generate_id("Folder", dir);
            graph.add_edge(GraphEdge::new(EdgeType::Contains, &parent_id, &dir_id));
        }
    }

    for file in files {
        let language = Language::from_path(&file.path)
            .map(|l| l.as_str())
            .unwrap_or_default();
        let node = GraphNode::file(&file.path, language);
        let file_id = node.id.clone();
        graph.add_node(node);
        if let Some((dir, _)) = file.path.rsplit_once('/') {
            let dir_id = generate_id("Folder", dir);
            graph.add_edge(GraphEdge::new(EdgeType::Contains, &dir_id, &file_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::NodeLabel;

    fn record(path: &str, content: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_structure_folders_and_containment() {
        let mut graph = CodeGraph::new();
        build_structure(
            &mut graph,
            &[
                record("src/util/x.ts", ""),
                record("src/app.ts", ""),
                record("top.ts", ""),
            ],
        );

        assert!(graph.node_by_id("Folder:src").is_some());
        assert!(graph.node_by_id("Folder:src/util").is_some());
        assert!(graph.node_by_id("File:top.ts").is_some());

        let contains: Vec<(&str, &str)> = graph
            .edges()
            .filter(|e| e.edge_type == EdgeType::Contains)
            .map(|e| (e.source_id.as_str(), e.target_id.as_str()))
            .collect();
        assert!(contains.contains(&("Folder:src", "Folder:src/util")));
        assert!(contains.contains(&("Folder:src/util", "File:src/util/x.ts")));
        assert!(contains.contains(&("Folder:src", "File:src/app.ts")));
        // Root-level files have no containment parent.
        assert!(!contains.iter().any(|(_, t)| *t == "File:top.ts"));
    }

    #[test]
    fn test_pipeline_end_to_end_smoke() {
        let db = tempfile::tempdir().unwrap();
        let repo = tempfile::tempdir().unwrap();
        let files = vec![
            record("src/util/x.ts", "export function f() {}\n"),
            record("app.ts", "import { f } from \"./src/util/x\";\n"),
        ];
        let (graph, summary) = run(
            repo.path(),
            files,
            db.path(),
            &PipelineOptions {
                workers: 2,
                sub_batch_size: 10,
                verbose: false,
            },
        )
        .unwrap();

        assert_eq!(summary.files_total, 2);
        assert_eq!(summary.files_parsed, 2);
        assert_eq!(summary.import_edges, 1);
        assert!(graph.node_by_id("File:app.ts").is_some());
        assert!(
            graph
                .nodes()
                .any(|n| n.label == NodeLabel::Function && n.properties.name == "f")
        );
        assert!(db.path().join("graph.duckdb").exists());
    }

    #[test]
    fn test_oversized_file_contributes_nothing() {
        let db = tempfile::tempdir().unwrap();
        let repo = tempfile::tempdir().unwrap();
        let big = "export function big() {}\n".repeat(MAX_FILE_SIZE / 20);
        assert!(big.len() > MAX_FILE_SIZE);
        let (graph, summary) = run(
            repo.path(),
            vec![record("big.ts", &big), record("ok.ts", "export function ok() {}")],
            db.path(),
            &PipelineOptions::default(),
        )
        .unwrap();

        assert!(graph.node_by_id("File:big.ts").is_none());
        assert!(graph.node_by_id("File:ok.ts").is_some());
        assert_eq!(summary.files_parsed, 1);
    }
}
