pub mod csv;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use duckdb::Connection;

use crate::graph::CodeGraph;
use crate::graph::node::NodeLabel;

use self::csv::{columns_for, emit_edge_csv, emit_node_csvs};

/// Counters reported after a load.
#[derive(Debug, Default)]
pub struct LoadStats {
    pub node_rows: usize,
    pub inserted_rels: usize,
    pub skipped_rels: usize,
}

/// Table names that must be identifier-quoted in every statement: they
/// collide with SQL keywords (`Union`, `Enum`) or exist only as the
/// multi-language extension set. Quoting is applied uniformly so a name is
/// never quoted in one statement and bare in another.
const QUOTED_TABLES: &[&str] = &[
    "Struct", "Enum", "Macro", "Typedef", "Union", "Namespace", "Trait", "Impl", "TypeAlias",
    "Const", "Static", "Property", "Record", "Delegate", "Annotation", "Constructor", "Template",
    "Module",
];

fn table_ident(name: &str) -> String {
    if QUOTED_TABLES.contains(&name) {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

/// Bulk-load the in-memory graph into `<db_dir>/graph.duckdb`.
///
/// Phases: schema init (soft), per-table CSV COPY (hard after one retry),
/// per-row edge insertion (each failure counted, never fatal), staging
/// cleanup.
pub fn load_graph(graph: &CodeGraph, db_dir: &Path) -> Result<LoadStats> {
    std::fs::create_dir_all(db_dir)
        .with_context(|| format!("creating database directory {}", db_dir.display()))?;
    let conn = Connection::open(db_dir.join("graph.duckdb")).context("opening graph database")?;

    init_schema(&conn);

    let staging = tempfile::Builder::new()
        .prefix("repograph-csv-")
        .tempdir_in(db_dir)
        .context("creating CSV staging directory")?;

    let mut stats = LoadStats::default();

    // Phase 2: node bulk load.
    let node_csvs = emit_node_csvs(graph, staging.path())?;
    for (label, csv_path, rows) in &node_csvs {
        copy_table(&conn, label.as_str(), columns_for(*label), csv_path)?;
        stats.node_rows += rows;
    }

    // Phase 3: edge insertion, row by row from the relationship CSV.
    let (edge_csv, _) = emit_edge_csv(graph, staging.path())?;
    let valid_tables: HashSet<&str> = NodeLabel::all().iter().map(|l| l.as_str()).collect();
    let mut reader = ::csv::Reader::from_path(&edge_csv)
        .with_context(|| format!("reading {}", edge_csv.display()))?;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                stats.skipped_rels += 1;
                continue;
            }
        };
        match insert_edge_row(&conn, &valid_tables, &record) {
            Ok(true) => stats.inserted_rels += 1,
            Ok(false) => stats.skipped_rels += 1,
            Err(_) => stats.skipped_rels += 1,
        }
    }

    // Phase 4: cleanup. TempDir removal is explicit so a failure surfaces.
    staging.close().context("removing CSV staging directory")?;

    Ok(stats)
}

/// Phase 1: create node tables and the relationship table. Errors that say
/// "already exists" are expected on re-runs and ignored; anything else is
/// logged but not fatal.
fn init_schema(conn: &Connection) {
    let mut statements: Vec<String> = Vec::new();
    for label in NodeLabel::all() {
        let table = table_ident(label.as_str());
        let stmt = match label {
            NodeLabel::File => format!(
                "CREATE TABLE {table}(id VARCHAR PRIMARY KEY, name VARCHAR, filePath VARCHAR, language VARCHAR)"
            ),
            NodeLabel::Folder => format!(
                "CREATE TABLE {table}(id VARCHAR PRIMARY KEY, name VARCHAR, path VARCHAR)"
            ),
            _ => format!(
                "CREATE TABLE {table}(id VARCHAR PRIMARY KEY, name VARCHAR, filePath VARCHAR, \
                 startLine BIGINT, endLine BIGINT, language VARCHAR, isExported BOOLEAN, description VARCHAR)"
            ),
        };
        statements.push(stmt);
    }
    statements.push(
        "CREATE TABLE CodeRelation(sourceId VARCHAR, targetId VARCHAR, type VARCHAR, \
         confidence DOUBLE, reason VARCHAR, step INTEGER)"
            .to_string(),
    );

    for stmt in &statements {
        if let Err(e) = conn.execute(stmt, []) {
            let message = e.to_string();
            if !message.contains("already exists") {
                eprintln!("warning: schema statement failed: {message}");
            }
        }
    }
}

/// Phase 2 worker: COPY one CSV into its table; one retry with
/// IGNORE_ERRORS, then the load aborts.
fn copy_table(conn: &Connection, table: &str, columns: &[&str], csv_path: &Path) -> Result<()> {
    let ident = table_ident(table);
    let cols = columns.join(", ");
    let file = csv_path.to_string_lossy().replace('\'', "''");
    let options = "HEADER true, DELIM ',', QUOTE '\"', ESCAPE '\"', AUTO_DETECT false, PARALLEL false";

    let copy = format!("COPY {ident}({cols}) FROM '{file}' ({options})");
    if conn.execute(&copy, []).is_ok() {
        return Ok(());
    }

    let retry = format!("COPY {ident}({cols}) FROM '{file}' ({options}, IGNORE_ERRORS true)");
    conn.execute(&retry, [])
        .map(|_| ())
        .map_err(|e| anyhow!("bulk load of table {table} failed after retry: {e}"))
}

/// Phase 3 worker: derive both endpoint labels from the id prefixes; skip
/// the row when either label has no backing table (a query against a missing
/// table would take the engine down); otherwise insert guarded on both
/// endpoints existing.
fn insert_edge_row(
    conn: &Connection,
    valid_tables: &HashSet<&str>,
    record: &::csv::StringRecord,
) -> Result<bool> {
    let source_id = record.get(0).unwrap_or_default();
    let target_id = record.get(1).unwrap_or_default();
    let edge_type = record.get(2).unwrap_or_default();
    let confidence: f64 = record.get(3).unwrap_or("1").parse().unwrap_or(1.0);
    let reason = record.get(4).unwrap_or_default();
    let step: Option<i64> = record.get(5).and_then(|s| s.parse().ok());

    let (Some(from_label), Some(to_label)) = (label_from_id(source_id), label_from_id(target_id))
    else {
        return Ok(false);
    };
    if !valid_tables.contains(from_label.as_str()) || !valid_tables.contains(to_label.as_str()) {
        return Ok(false);
    }

    let sql = format!(
        "INSERT INTO CodeRelation(sourceId, targetId, type, confidence, reason, step) \
         SELECT a.id, b.id, ?, ?, ?, ? FROM {} a, {} b WHERE a.id = ? AND b.id = ?",
        table_ident(&from_label),
        table_ident(&to_label),
    );
    let inserted = conn.execute(
        &sql,
        duckdb::params![edge_type, confidence, reason, step, source_id, target_id],
    )?;
    Ok(inserted > 0)
}

/// The node label encoded in an id. `comm_*`/`proc_*` prefixes belong to
/// downstream community/process stages; everything else carries its label
/// before the first `:`.
fn label_from_id(id: &str) -> Option<String> {
    if id.starts_with("comm_") {
        return Some("Community".to_string());
    }
    if id.starts_with("proc_") {
        return Some("Process".to_string());
    }
    id.split(':').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::{EdgeType, GraphEdge};
    use crate::graph::node::GraphNode;

    fn sample_graph() -> CodeGraph {
        let mut g = CodeGraph::new();
        g.add_node(GraphNode::file("src/a.ts", "typescript"));
        g.add_node(GraphNode::file("src/b.ts", "typescript"));
        g.add_node(GraphNode::entity(
            NodeLabel::Function,
            "f",
            "src/a.ts",
            1,
            2,
            "typescript",
            true,
        ));
        g.add_edge(GraphEdge::new(
            EdgeType::Defines,
            "File:src/a.ts",
            "Function:src/a.ts:f",
        ));
        g.add_edge(GraphEdge::new(EdgeType::Imports, "File:src/a.ts", "File:src/b.ts"));
        g
    }

    #[test]
    fn test_label_from_id() {
        assert_eq!(label_from_id("File:src/a.ts").as_deref(), Some("File"));
        assert_eq!(
            label_from_id("Function:src/a.ts:f").as_deref(),
            Some("Function")
        );
        assert_eq!(label_from_id("comm_42").as_deref(), Some("Community"));
        assert_eq!(label_from_id("proc_7").as_deref(), Some("Process"));
        assert_eq!(label_from_id("var:foo.ts:bar").as_deref(), Some("var"));
    }

    #[test]
    fn test_load_round_trip() {
        let g = sample_graph();
        let dir = tempfile::tempdir().unwrap();
        let stats = load_graph(&g, dir.path()).unwrap();
        assert_eq!(stats.node_rows, 3);
        assert_eq!(stats.inserted_rels, 2);
        assert_eq!(stats.skipped_rels, 0);

        let conn = Connection::open(dir.path().join("graph.duckdb")).unwrap();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM CodeRelation", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
        let file_count: i64 = conn
            .query_row("SELECT count(*) FROM File", [], |row| row.get(0))
            .unwrap();
        assert_eq!(file_count, 2);
    }

    #[test]
    fn test_unknown_label_edge_skipped() {
        let mut g = sample_graph();
        // Force an edge with a label that has no table. The graph container
        // would normally reject unknown endpoints, so go through the loader's
        // CSV path by adding matching nodes under a bogus label id.
        let mut rogue = GraphNode::file("x.ts", "typescript");
        rogue.id = "var:foo.ts:bar".to_string();
        g.add_node(rogue);
        let mut edge = GraphEdge::new(EdgeType::Defines, "var:foo.ts:bar", "File:src/a.ts");
        edge.id = "DEFINES:var->file".to_string();
        g.add_edge(edge);

        let dir = tempfile::tempdir().unwrap();
        let stats = load_graph(&g, dir.path()).unwrap();
        assert_eq!(stats.skipped_rels, 1);

        let conn = Connection::open(dir.path().join("graph.duckdb")).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM CodeRelation WHERE sourceId LIKE 'var:%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_reload_on_existing_database_aborts() {
        let g = sample_graph();
        let dir = tempfile::tempdir().unwrap();
        load_graph(&g, dir.path()).unwrap();
        // Second run: "already exists" schema errors are ignored, but the
        // node COPY hits primary-key duplicates and the load must abort —
        // COPY failures are the one fatal error class.
        assert!(load_graph(&g, dir.path()).is_err());
    }
}
