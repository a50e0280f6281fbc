pub mod calls;
pub mod exports;
pub mod php;
pub mod pool;
pub mod queries;

use std::collections::HashMap;

use tree_sitter::{Node, Parser, Query, QueryCursor, StreamingIterator};

use crate::graph::edge::{EdgeType, GraphEdge};
use crate::graph::node::{GraphNode, NodeLabel, Symbol, generate_id};
use crate::language::Language;

use calls::{enclosing_function_id, is_denied_call};
use exports::{is_exported, node_text};

/// Files larger than this are never parsed — a deliberate bound against
/// pathological tree-sitter memory use on generated/minified sources.
pub const MAX_FILE_SIZE: usize = 512 * 1024;

/// A source file at the ingestion boundary. Paths are repo-relative with
/// `/` separators.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
}

/// An import site as extracted, before resolution.
#[derive(Debug, Clone)]
pub struct ExtractedImport {
    pub file_path: String,
    /// The source text of the import target, stripped of `'"<>` (and of
    /// declaration keywords for Java/C#).
    pub raw_import_path: String,
    pub language: Language,
}

/// A call site that survived the deny-list filter.
#[derive(Debug, Clone)]
pub struct ExtractedCall {
    pub file_path: String,
    pub called_name: String,
    /// The enclosing function's entity id, or the File id for file-scope
    /// calls.
    pub source_id: String,
}

/// The flavor of an inheritance relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeritageKind {
    Extends,
    Implements,
    TraitImpl,
}

/// An inheritance relation by name, resolved to entity nodes post-hoc.
#[derive(Debug, Clone)]
pub struct ExtractedHeritage {
    pub file_path: String,
    pub class_name: String,
    pub parent_name: String,
    pub kind: HeritageKind,
}

/// Everything a worker accumulates across its sub-batches and flushes once.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub nodes: Vec<GraphNode>,
    pub defines_edges: Vec<GraphEdge>,
    pub symbols: Vec<Symbol>,
    pub imports: Vec<ExtractedImport>,
    pub calls: Vec<ExtractedCall>,
    pub heritage: Vec<ExtractedHeritage>,
    pub file_count: usize,
}

impl ParseOutput {
    /// Merge another worker's output into this one. Order across workers is
    /// not meaningful; everything carries its file identity.
    pub fn merge(&mut self, other: ParseOutput) {
        self.nodes.extend(other.nodes);
        self.defines_edges.extend(other.defines_edges);
        self.symbols.extend(other.symbols);
        self.imports.extend(other.imports);
        self.calls.extend(other.calls);
        self.heritage.extend(other.heritage);
        self.file_count += other.file_count;
    }
}

/// Map a `definition.<kind>` capture name to its node label.
fn label_for_capture(capture: &str) -> Option<NodeLabel> {
    let label = match capture {
        "definition.function" => NodeLabel::Function,
        "definition.class" => NodeLabel::Class,
        "definition.interface" => NodeLabel::Interface,
        "definition.method" => NodeLabel::Method,
        "definition.struct" => NodeLabel::Struct,
        "definition.enum" => NodeLabel::Enum,
        "definition.namespace" => NodeLabel::Namespace,
        "definition.module" => NodeLabel::Module,
        "definition.trait" => NodeLabel::Trait,
        "definition.impl" => NodeLabel::Impl,
        "definition.type" => NodeLabel::TypeAlias,
        "definition.const" => NodeLabel::Const,
        "definition.static" => NodeLabel::Static,
        "definition.typedef" => NodeLabel::Typedef,
        "definition.macro" => NodeLabel::Macro,
        "definition.union" => NodeLabel::Union,
        "definition.property" => NodeLabel::Property,
        "definition.record" => NodeLabel::Record,
        "definition.delegate" => NodeLabel::Delegate,
        "definition.annotation" => NodeLabel::Annotation,
        "definition.constructor" => NodeLabel::Constructor,
        "definition.template" => NodeLabel::Template,
        _ => return None,
    };
    Some(label)
}

/// A worker-local parser: one tree-sitter `Parser` per language (stateful,
/// reused across files to amortize grammar setup) and one compiled query per
/// language. Never shared across threads.
pub struct FileParser {
    parsers: HashMap<Language, Parser>,
    /// `None` marks a language whose query failed to compile — its files are
    /// skipped rather than poisoning the worker.
    queries: HashMap<Language, Option<Query>>,
}

impl FileParser {
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
            queries: HashMap::new(),
        }
    }

    /// Parse one file and append its extractions to `out`.
    ///
    /// Every failure mode — unknown extension, oversized content, grammar
    /// setup, parse, query compile — skips the file. Workers never propagate
    /// a single-file error upward.
    pub fn parse_into(&mut self, record: &FileRecord, out: &mut ParseOutput) {
        let Some(language) = Language::from_path(&record.path) else {
            return;
        };
        if record.content.len() > MAX_FILE_SIZE {
            return;
        }

        let parser = self.parsers.entry(language).or_insert_with(|| {
            let mut p = Parser::new();
            // A grammar rejected here disables the language for this worker;
            // parse() below returns None on an unset language.
            let _ = p.set_language(&language.grammar());
            p
        });
        let Some(tree) = parser.parse(&record.content, None) else {
            return;
        };
        // parse() returns a tree with ERROR nodes for malformed source
        // rather than None; a file that did not parse cleanly is dropped
        // whole, like the unknown-extension and oversized cases.
        if tree.root_node().has_error() {
            return;
        }

        let query = self.queries.entry(language).or_insert_with(|| {
            Query::new(&language.grammar(), queries::query_source(language)).ok()
        });
        let Some(query) = query.as_ref() else {
            return;
        };

        let source = record.content.as_bytes();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, tree.root_node(), source);
        while let Some(m) = matches.next() {
            // name -> captured nodes; repeated captures (e.g. several
            // implemented interfaces in one clause) keep their multiplicity.
            let mut captures: HashMap<&str, Vec<Node>> = HashMap::new();
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                captures.entry(name).or_default().push(capture.node);
            }
            dispatch_match(&captures, language, &record.path, source, out);
        }

        out.file_count += 1;
    }
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Route one query match to an import, call, heritage, or definition record.
fn dispatch_match(
    captures: &HashMap<&str, Vec<Node>>,
    language: Language,
    file_path: &str,
    source: &[u8],
    out: &mut ParseOutput,
) {
    if let Some(import_nodes) = captures.get("import") {
        let source_node = captures
            .get("import.source")
            .and_then(|v| v.first())
            .or_else(|| import_nodes.first());
        if let Some(&node) = source_node {
            let raw = clean_raw_import(language, node_text(node, source));
            if !raw.is_empty() {
                out.imports.push(ExtractedImport {
                    file_path: file_path.to_string(),
                    raw_import_path: raw,
                    language,
                });
            }
        }
        return;
    }

    if captures.contains_key("call") {
        let Some(&name_node) = captures.get("call.name").and_then(|v| v.first()) else {
            return;
        };
        let called_name = node_text(name_node, source).to_string();
        if called_name.is_empty() || is_denied_call(&called_name) {
            return;
        }
        let source_id = enclosing_function_id(name_node, file_path, source)
            .unwrap_or_else(|| generate_id(NodeLabel::File.as_str(), file_path));
        out.calls.push(ExtractedCall {
            file_path: file_path.to_string(),
            called_name,
            source_id,
        });
        return;
    }

    if let Some(class_nodes) = captures.get("heritage.class") {
        let Some(&class_node) = class_nodes.first() else {
            return;
        };
        let class_name = node_text(class_node, source).to_string();
        for (capture, kind) in [
            ("heritage.extends", HeritageKind::Extends),
            ("heritage.implements", HeritageKind::Implements),
            ("heritage.trait", HeritageKind::TraitImpl),
        ] {
            for &parent in captures.get(capture).map(|v| v.as_slice()).unwrap_or(&[]) {
                out.heritage.push(ExtractedHeritage {
                    file_path: file_path.to_string(),
                    class_name: class_name.clone(),
                    parent_name: node_text(parent, source).to_string(),
                    kind,
                });
            }
        }
        return;
    }

    emit_definition(captures, language, file_path, source, out);
}

/// Emit a node + symbol row + DEFINES edge for a definition match.
fn emit_definition(
    captures: &HashMap<&str, Vec<Node>>,
    language: Language,
    file_path: &str,
    source: &[u8],
    out: &mut ParseOutput,
) {
    let mut definition: Option<(NodeLabel, Node)> = None;
    for (name, nodes) in captures.iter() {
        if let Some(label) = label_for_capture(name)
            && let Some(&node) = nodes.first()
        {
            definition = Some((label, node));
            break;
        }
    }

    let name_node = captures.get("name").and_then(|v| v.first()).copied();

    let (label, def_node, name) = match (definition, name_node) {
        (Some((label, def_node)), Some(name_node)) => {
            (label, def_node, node_text(name_node, source).to_string())
        }
        // Swift init/deinit carry no name capture; the literal names keep
        // their ids joinable with call source ids.
        (Some((NodeLabel::Constructor, def_node)), None) => {
            let name = if def_node.kind() == "deinit_declaration" {
                "deinit"
            } else {
                "init"
            };
            (NodeLabel::Constructor, def_node, name.to_string())
        }
        (Some(_), None) => return,
        // No definition capture, but a name: a generic code element.
        (None, Some(name_node)) => (
            NodeLabel::CodeElement,
            name_node,
            node_text(name_node, source).to_string(),
        ),
        (None, None) => return,
    };

    if name.is_empty() {
        return;
    }

    let exported = match name_node {
        Some(n) => is_exported(language, n, &name, source),
        None => is_exported(language, def_node, &name, source),
    };

    let mut node = GraphNode::entity(
        label,
        &name,
        file_path,
        def_node.start_position().row + 1,
        def_node.end_position().row + 1,
        language.as_str(),
        exported,
    );

    // Eloquent enrichment: summarize model metadata arrays and relations.
    if language == Language::Php
        && let Some(n) = name_node
    {
        node.properties.description = match label {
            NodeLabel::Property => php::property_description(&name, n, source),
            NodeLabel::Method => php::method_relation_description(n, source),
            _ => None,
        };
    }

    let file_id = generate_id(NodeLabel::File.as_str(), file_path);
    out.defines_edges
        .push(GraphEdge::new(EdgeType::Defines, &file_id, &node.id));
    out.symbols.push(Symbol {
        id: node.id.clone(),
        name: name.clone(),
        label,
        file_path: file_path.to_string(),
        start_line: node.properties.start_line,
        end_line: node.properties.end_line,
        language: language.as_str().to_string(),
        is_exported: exported,
    });
    out.nodes.push(node);
}

/// Normalize the raw import text per language.
///
/// All languages strip quoting characters; Java and C# additionally drop the
/// declaration keywords so only the dotted path remains (which preserves
/// Java's `.*` wildcard suffix and `static` member forms for the resolver).
fn clean_raw_import(language: Language, text: &str) -> String {
    let stripped = text.trim().trim_matches(|c| matches!(c, '\'' | '"' | '<' | '>'));
    match language {
        Language::Java => stripped
            .trim_start_matches("import")
            .trim_end_matches(';')
            .trim()
            .trim_start_matches("static")
            .trim()
            .to_string(),
        Language::CSharp => stripped
            .trim_start_matches("global")
            .trim()
            .trim_start_matches("using")
            .trim_end_matches(';')
            .trim()
            .trim_start_matches("static")
            .trim()
            .to_string(),
        Language::Php => {
            // `use App\Models\User as U;` keeps only the qualified name.
            let no_alias = stripped.split(" as ").next().unwrap_or(stripped);
            no_alias.trim().to_string()
        }
        _ => stripped.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(path: &str, content: &str) -> ParseOutput {
        let mut parser = FileParser::new();
        let mut out = ParseOutput::default();
        parser.parse_into(
            &FileRecord {
                path: path.to_string(),
                content: content.to_string(),
            },
            &mut out,
        );
        out
    }

    #[test]
    fn test_typescript_definitions_and_imports() {
        let out = parse_one(
            "app.ts",
            r#"import { f } from "./util/x";
export function greet(name: string): string { return name; }
export class Server {}
"#,
        );
        assert_eq!(out.file_count, 1);
        assert_eq!(out.imports.len(), 1);
        assert_eq!(out.imports[0].raw_import_path, "./util/x");
        let names: Vec<&str> = out.symbols.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"greet"));
        assert!(names.contains(&"Server"));
        assert!(out.symbols.iter().all(|s| s.is_exported));
        // Every definition produced a DEFINES edge from the File id.
        for edge in &out.defines_edges {
            assert_eq!(edge.source_id, "File:app.ts");
        }
    }

    #[test]
    fn test_oversized_file_produces_nothing() {
        let mut big = String::from("function real() {}\n");
        big.push_str(&"// pad\n".repeat(MAX_FILE_SIZE / 7 + 1));
        assert!(big.len() > MAX_FILE_SIZE);
        let out = parse_one("big.ts", &big);
        assert_eq!(out.file_count, 0);
        assert!(out.nodes.is_empty());
        assert!(out.defines_edges.is_empty());
    }

    #[test]
    fn test_unknown_extension_dropped() {
        let out = parse_one("README.md", "# heading");
        assert_eq!(out.file_count, 0);
        assert!(out.nodes.is_empty());
    }

    #[test]
    fn test_call_denylist_filtering() {
        let out = parse_one("calls.js", "function run() { console.log(x); myFn(); }");
        let called: Vec<&str> = out.calls.iter().map(|c| c.called_name.as_str()).collect();
        assert_eq!(called, vec!["myFn"], "only myFn survives the deny-list");
        assert_eq!(out.calls[0].source_id, "Function:calls.js:run");
    }

    #[test]
    fn test_java_wildcard_import_preserved() {
        let out = parse_one(
            "Main.java",
            "import com.ex.util.*;\npublic class Main {}\n",
        );
        assert_eq!(out.imports.len(), 1);
        assert_eq!(out.imports[0].raw_import_path, "com.ex.util.*");
    }

    #[test]
    fn test_java_static_import_stripped() {
        let out = parse_one(
            "Main.java",
            "import static com.ex.Config.MAX_SIZE;\npublic class Main {}\n",
        );
        assert_eq!(out.imports[0].raw_import_path, "com.ex.Config.MAX_SIZE");
    }

    #[test]
    fn test_rust_definitions() {
        let out = parse_one(
            "src/lib.rs",
            r#"use crate::util::inner;

pub struct Engine { id: u32 }

pub trait Runner { fn run(&self); }

impl Runner for Engine {
    fn run(&self) {}
}
"#,
        );
        assert_eq!(out.imports.len(), 1);
        assert_eq!(out.imports[0].raw_import_path, "crate::util::inner");
        let labels: Vec<NodeLabel> = out.symbols.iter().map(|s| s.label).collect();
        assert!(labels.contains(&NodeLabel::Struct));
        assert!(labels.contains(&NodeLabel::Trait));
        // impl Runner for Engine produced a TraitImpl heritage record.
        assert!(
            out.heritage
                .iter()
                .any(|h| h.kind == HeritageKind::TraitImpl
                    && h.class_name == "Engine"
                    && h.parent_name == "Runner")
        );
    }

    #[test]
    fn test_python_class_heritage() {
        let out = parse_one(
            "models.py",
            "class Base:\n    pass\n\nclass User(Base):\n    pass\n",
        );
        assert!(
            out.heritage
                .iter()
                .any(|h| h.class_name == "User"
                    && h.parent_name == "Base"
                    && h.kind == HeritageKind::Extends)
        );
    }

    #[test]
    fn test_go_struct_and_import() {
        let out = parse_one(
            "main.go",
            "package main\n\nimport \"m.example/x/internal/auth\"\n\ntype Server struct{}\n\nfunc Run() {}\n",
        );
        assert_eq!(out.imports[0].raw_import_path, "m.example/x/internal/auth");
        assert!(out.symbols.iter().any(|s| s.label == NodeLabel::Struct));
        assert!(
            out.symbols
                .iter()
                .find(|s| s.name == "Run")
                .map(|s| s.is_exported)
                .unwrap_or(false)
        );
    }

    #[test]
    fn test_parse_error_drops_whole_file() {
        // Malformed source must contribute nothing — not even the valid
        // subtrees before the syntax error — and must not poison the parser
        // for the next file.
        let mut parser = FileParser::new();
        let mut out = ParseOutput::default();
        parser.parse_into(
            &FileRecord {
                path: "broken.ts".into(),
                content: "export function early() {}\nconst = = = {".into(),
            },
            &mut out,
        );
        assert_eq!(out.file_count, 0);
        assert!(out.nodes.is_empty());
        assert!(out.symbols.is_empty());
        assert!(out.defines_edges.is_empty());

        parser.parse_into(
            &FileRecord {
                path: "good.ts".into(),
                content: "export function ok() {}".into(),
            },
            &mut out,
        );
        assert_eq!(out.file_count, 1);
        assert_eq!(out.symbols.len(), 1);
        assert!(out.symbols.iter().any(|s| s.name == "ok"));
    }
}
