use serde::Serialize;

/// Aggregate statistics produced by an indexing run.
#[derive(Debug, Serialize)]
pub struct IndexSummary {
    /// Files discovered at the boundary.
    pub files_total: usize,
    /// Files that passed the language/size gates and parsed successfully.
    pub files_parsed: usize,
    pub nodes: usize,
    pub edges: usize,
    /// Symbol rows extracted for downstream search.
    pub symbols: usize,
    pub imports_found: usize,
    /// Imports resolved to at least one repository file.
    pub imports_resolved: usize,
    /// IMPORTS edges in the graph (wildcards fan out to several).
    pub import_edges: usize,
    /// Call records that survived the deny-list.
    pub calls_found: usize,
    pub heritage_found: usize,
    pub heritage_edges: usize,
    /// Relationship rows inserted into the database.
    pub inserted_rels: usize,
    /// Relationship rows skipped (unknown label or insertion failure).
    pub skipped_rels: usize,
    pub elapsed_secs: f64,
}

/// Print a summary of the indexing run.
///
/// - `json = true`: pretty-printed JSON object on stdout.
/// - `json = false`: human-readable cargo-style summary.
pub fn print_summary(summary: &IndexSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error serialising summary: {}", e),
        }
        return;
    }

    println!(
        "Indexed {} files in {:.2}s",
        summary.files_parsed, summary.elapsed_secs
    );
    println!(
        "  graph: {} nodes, {} edges ({} symbols)",
        summary.nodes, summary.edges, summary.symbols
    );
    println!(
        "  imports: {} found, {} resolved, {} edges",
        summary.imports_found, summary.imports_resolved, summary.import_edges
    );
    println!(
        "  calls: {}  heritage: {} found, {} linked",
        summary.calls_found, summary.heritage_found, summary.heritage_edges
    );
    println!(
        "  database: {} relations inserted, {} skipped",
        summary.inserted_rels, summary.skipped_rels
    );
    if summary.files_total > summary.files_parsed {
        eprintln!(
            "warning: {} of {} files were skipped (unsupported, oversized, or unparsable)",
            summary.files_total - summary.files_parsed,
            summary.files_total
        );
    }
}
