pub mod generic;
pub mod golang;
pub mod heritage;
pub mod java;
pub mod php;
pub mod rust_modules;
pub mod suffix;
pub mod swift;
pub mod typescript;

pub use heritage::resolve_heritage;
pub use suffix::SuffixIndex;

use std::collections::{HashMap, VecDeque};

use crate::graph::edge::{EdgeType, GraphEdge};
use crate::graph::node::{NodeLabel, generate_id};
use crate::language::Language;
use crate::metadata::ProjectMetadata;
use crate::parser::ExtractedImport;

/// Resolve-cache bound. At capacity the oldest 20% of entries are evicted;
/// the cache changes performance, never semantics.
const RESOLVE_CACHE_CAP: usize = 100_000;

/// Progress is reported after every this many files.
const PROGRESS_INTERVAL: usize = 100;

/// Counters collected during import resolution.
#[derive(Debug, Default)]
pub struct ResolveStats {
    /// Imports extracted by the parse phase.
    pub imports_found: usize,
    /// Imports that resolved to at least one repository file.
    pub imports_resolved: usize,
    /// IMPORTS edges emitted (a wildcard import yields several).
    pub edges_emitted: usize,
}

/// The resolver's output: IMPORTS edges, the per-file import map, and stats.
#[derive(Debug, Default)]
pub struct ImportResolution {
    pub edges: Vec<GraphEdge>,
    /// file path -> resolved target paths, in emission order.
    pub import_map: HashMap<String, Vec<String>>,
    pub stats: ResolveStats,
}

/// Converts extracted imports into file targets using language-specific
/// strategies over the suffix index and project metadata.
///
/// Single-threaded by design: the coordinator owns it, so the cache needs no
/// locking.
pub struct ImportResolver<'a> {
    index: &'a SuffixIndex,
    metadata: &'a ProjectMetadata,
    cache: HashMap<(String, String), Vec<String>>,
    cache_order: VecDeque<(String, String)>,
}

impl<'a> ImportResolver<'a> {
    pub fn new(index: &'a SuffixIndex, metadata: &'a ProjectMetadata) -> Self {
        Self {
            index,
            metadata,
            cache: HashMap::new(),
            cache_order: VecDeque::new(),
        }
    }

    /// Resolve one raw import to zero, one, or many repo-relative targets.
    pub fn resolve(&mut self, current_file: &str, language: Language, raw: &str) -> Vec<String> {
        let key = (current_file.to_string(), raw.to_string());
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let targets = self.dispatch(current_file, language, raw);

        if self.cache.len() >= RESOLVE_CACHE_CAP {
            self.evict_oldest();
        }
        self.cache.insert(key.clone(), targets.clone());
        self.cache_order.push_back(key);
        targets
    }

    fn dispatch(&self, current_file: &str, language: Language, raw: &str) -> Vec<String> {
        match language {
            Language::Java => java::resolve(self.index, raw)
                .unwrap_or_else(|| generic::resolve(self.index, current_file, raw)),
            Language::Go => golang::resolve(self.index, self.metadata.go_module.as_deref(), raw),
            Language::Php => php::resolve(self.index, &self.metadata.psr4, current_file, raw),
            Language::Swift => swift::resolve(self.index, &self.metadata.swift_targets, raw),
            Language::JavaScript | Language::TypeScript | Language::TypeScriptTsx => {
                typescript::resolve(
                    self.index,
                    self.metadata.tsconfig.as_ref(),
                    current_file,
                    raw,
                )
            }
            Language::Rust => rust_modules::resolve(self.index, current_file, raw),
            Language::Python | Language::C | Language::Cpp | Language::CSharp => {
                generic::resolve(self.index, current_file, raw)
            }
        }
    }

    fn evict_oldest(&mut self) {
        let evict = RESOLVE_CACHE_CAP / 5;
        for _ in 0..evict {
            if let Some(key) = self.cache_order.pop_front() {
                self.cache.remove(&key);
            }
        }
    }
}

/// Run the resolver over all extracted imports and emit IMPORTS edges.
///
/// `progress` receives the number of files whose imports have been processed,
/// every 100 files — the synchronous stand-in for the source's event-loop
/// yield.
pub fn resolve_imports(
    index: &SuffixIndex,
    metadata: &ProjectMetadata,
    imports: &[ExtractedImport],
    mut progress: impl FnMut(usize),
) -> ImportResolution {
    let mut resolver = ImportResolver::new(index, metadata);
    let mut resolution = ImportResolution::default();
    resolution.stats.imports_found = imports.len();

    let mut current_file: Option<&str> = None;
    let mut files_done = 0usize;

    for import in imports {
        if current_file != Some(import.file_path.as_str()) {
            current_file = Some(import.file_path.as_str());
            files_done += 1;
            if files_done % PROGRESS_INTERVAL == 0 {
                progress(files_done);
            }
        }

        let targets = resolver.resolve(&import.file_path, import.language, &import.raw_import_path);
        if targets.is_empty() {
            continue;
        }
        resolution.stats.imports_resolved += 1;

        let from_id = generate_id(NodeLabel::File.as_str(), &import.file_path);
        for target in targets {
            let to_id = generate_id(NodeLabel::File.as_str(), &target);
            resolution
                .edges
                .push(GraphEdge::new(EdgeType::Imports, &from_id, &to_id));
            resolution
                .import_map
                .entry(import.file_path.clone())
                .or_default()
                .push(target);
            resolution.stats.edges_emitted += 1;
        }
    }

    resolution
}
