//! Call-site extraction support: the built-in deny-list and the
//! enclosing-function ascent.

use std::collections::HashSet;
use std::sync::OnceLock;

use tree_sitter::Node;

use crate::graph::node::{NodeLabel, generate_id};
use crate::parser::exports::node_text;

/// Call identifiers that never become call records. One process-wide set,
/// deliberately shared across languages — the overlap (`print` for Python
/// and Swift, `append` for Go and JS) is intentional. Without this filter,
/// builtin and framework hotspots dominate the graph.
static CALL_DENYLIST: OnceLock<HashSet<&'static str>> = OnceLock::new();

#[rustfmt::skip]
const DENYLIST_NAMES: &[&str] = &[
    // JavaScript / TypeScript builtins and prototypes
    "console", "log", "warn", "error", "info", "debug", "trace", "require",
    "parseInt", "parseFloat", "isNaN", "isFinite", "setTimeout", "setInterval",
    "clearTimeout", "clearInterval", "stringify", "parse", "push", "pop",
    "shift", "unshift", "slice", "splice", "concat", "join", "map", "filter",
    "reduce", "forEach", "find", "findIndex", "some", "every", "includes",
    "indexOf", "lastIndexOf", "keys", "values", "entries", "assign", "freeze",
    "then", "catch", "finally", "resolve", "reject", "all", "race", "toString",
    "valueOf", "hasOwnProperty", "bind", "call", "apply", "fetch",
    "addEventListener", "removeEventListener", "querySelector",
    "querySelectorAll", "getElementById", "createElement", "appendChild",
    "preventDefault", "stopPropagation", "test", "exec", "match", "replace",
    "replaceAll", "split", "trim", "toLowerCase", "toUpperCase", "charAt",
    "charCodeAt", "substring", "substr", "startsWith", "endsWith", "padStart",
    "padEnd", "repeat", "floor", "ceil", "round", "abs", "min", "max",
    "random", "sqrt", "pow", "now", "getTime", "getItem", "setItem",
    "removeItem", "useState", "useEffect", "useMemo", "useCallback", "useRef",
    "useContext", "describe", "it", "expect", "beforeEach", "afterEach",
    "mock", "freeze",
    // Python builtins and common methods
    "print", "len", "range", "str", "int", "float", "list", "dict", "set",
    "tuple", "type", "isinstance", "issubclass", "getattr", "setattr",
    "hasattr", "super", "open", "input", "sorted", "reversed", "enumerate",
    "zip", "sum", "id", "repr", "format", "iter", "next", "vars", "globals",
    "locals", "eval", "extend", "insert", "remove", "get", "items", "update",
    "add", "discard", "strip", "lstrip", "rstrip", "lower", "upper",
    "startswith", "endswith", "encode", "decode", "read", "write", "close",
    // Java
    "println", "printf", "valueOf", "equals", "hashCode", "getClass",
    "getName", "size", "isEmpty", "contains", "iterator", "stream", "collect",
    "of", "asList", "parseLong", "currentTimeMillis", "getLogger",
    "getMessage", "toArray", "charAt", "compareTo",
    // C
    "malloc", "calloc", "realloc", "free", "fprintf", "sprintf", "snprintf",
    "scanf", "sscanf", "memcpy", "memset", "memmove", "memcmp", "strcpy",
    "strncpy", "strcat", "strncat", "strcmp", "strncmp", "strlen", "strchr",
    "strstr", "strtok", "fopen", "fclose", "fread", "fwrite", "fgets",
    "fputs", "fseek", "ftell", "exit", "atoi", "atof", "abort", "assert",
    "qsort", "bsearch", "perror",
    // C++
    "cout", "cin", "endl", "push_back", "emplace_back", "pop_back", "begin",
    "end", "cbegin", "cend", "rbegin", "rend", "at", "front", "back", "data",
    "reserve", "resize", "clear", "erase", "emplace", "swap", "make_shared",
    "make_unique", "move", "forward", "reset", "release", "lock", "unlock",
    "to_string", "stoi", "stod", "c_str", "substr", "find_first_of",
    // C#
    "WriteLine", "ReadLine", "Write", "ToString", "Equals", "GetHashCode",
    "GetType", "Add", "Remove", "Contains", "Count", "Any", "All", "Where",
    "Select", "SelectMany", "First", "FirstOrDefault", "Single",
    "SingleOrDefault", "OrderBy", "OrderByDescending", "GroupBy", "ToList",
    "ToArray", "ToDictionary", "Parse", "TryParse", "IsNullOrEmpty",
    "IsNullOrWhiteSpace", "Format", "Join", "Split", "Substring", "Replace",
    "Trim", "ToLower", "ToUpper", "StartsWith", "EndsWith",
    // Go builtins and stdlib hotspots
    "append", "make", "cap", "new", "copy", "delete", "panic", "recover",
    "Printf", "Println", "Sprintf", "Fprintf", "Errorf", "Error", "Fatal",
    "Fatalf", "Sprint", "String", "Itoa", "Atoi", "Marshal", "Unmarshal",
    "HasPrefix", "HasSuffix", "TrimSpace", "ToLower", "ToUpper", "NewReader",
    "NewWriter", "Fprintln",
    // Rust macros-as-calls and ubiquitous methods
    "eprintln", "eprint", "writeln", "vec", "assert_eq", "assert_ne",
    "unwrap", "unwrap_or", "unwrap_or_else", "unwrap_or_default", "clone",
    "to_owned", "into", "from", "as_ref", "as_mut", "as_str", "iter",
    "iter_mut", "into_iter", "get_mut", "contains_key", "and_then", "or_else",
    "ok_or", "ok", "err", "default", "with_capacity", "push_str",
    // PHP builtins and Laravel hotspots
    "array_map", "array_filter", "array_merge", "array_keys", "array_values",
    "array_push", "array_pop", "array_shift", "array_unshift", "array_slice",
    "array_search", "in_array", "count", "implode", "explode", "str_replace",
    "strpos", "var_dump", "print_r", "json_encode", "json_decode", "isset",
    "unset", "empty", "is_array", "is_string", "is_null", "is_numeric",
    "intval", "floatval", "strval", "preg_match", "preg_replace",
    "preg_split", "htmlspecialchars", "strtolower", "strtoupper", "ucfirst",
    "Route::get", "Route::post", "Route::put", "Route::delete",
    "Route::middleware", "Route::group", "dd", "env", "config", "view",
    "redirect", "response", "request", "auth", "session",
    // Swift and UIKit hotspots
    "DispatchQueue", "removeAll", "flatMap", "compactMap", "first", "last",
    "joined", "hasPrefix", "hasSuffix", "lowercased", "uppercased",
    "viewDidLoad", "viewWillAppear", "viewDidAppear", "viewWillDisappear",
    "viewDidDisappear", "UIViewController", "addSubview",
    "removeFromSuperview", "setNeedsLayout", "layoutIfNeeded",
    "NSLocalizedString", "fatalError", "precondition", "sync", "async",
];

/// True when `name` is on the built-in deny-list.
pub fn is_denied_call(name: &str) -> bool {
    CALL_DENYLIST
        .get_or_init(|| DENYLIST_NAMES.iter().copied().collect())
        .contains(name)
}

/// AST node kinds recognized as function-like for the enclosing-function
/// ascent. Fixed set, shared across languages.
const FUNCTION_LIKE: &[&str] = &[
    "function_declaration",
    "arrow_function",
    "function_expression",
    "method_definition",
    "generator_function_declaration",
    "function_definition",
    "async_function_declaration",
    "async_arrow_function",
    "method_declaration",
    "constructor_declaration",
    "local_function_statement",
    "function_item",
    "impl_item",
    "anonymous_function_creation_expression",
    "init_declaration",
    "deinit_declaration",
];

/// Ascend from a call site to the first enclosing function-like node and
/// return that function's deterministic entity id, or `None` when the call
/// sits at file scope (the caller falls back to the File id).
pub fn enclosing_function_id(call_node: Node, file_path: &str, source: &[u8]) -> Option<String> {
    let mut current = call_node.parent();
    while let Some(node) = current {
        if FUNCTION_LIKE.contains(&node.kind())
            && let Some((label, name)) = function_identity(node, source)
        {
            return Some(generate_id(label.as_str(), &format!("{file_path}:{name}")));
        }
        current = node.parent();
    }
    None
}

/// The label and name of a function-like node, matching what the definition
/// extractor emits so call source ids join against entity nodes.
///
/// Naming: the `name` field when present; the declarator name for anonymous
/// functions assigned to a variable; the `type` field for `impl_item`; the
/// literal `init`/`deinit` for Swift initializers.
fn function_identity<'a>(node: Node<'a>, source: &'a [u8]) -> Option<(NodeLabel, String)> {
    let label = match node.kind() {
        "method_definition" | "method_declaration" => NodeLabel::Method,
        "constructor_declaration" | "init_declaration" | "deinit_declaration" => {
            NodeLabel::Constructor
        }
        "impl_item" => NodeLabel::Impl,
        _ => NodeLabel::Function,
    };

    match node.kind() {
        "init_declaration" => return Some((label, "init".to_string())),
        "deinit_declaration" => return Some((label, "deinit".to_string())),
        "impl_item" => {
            let ty = node.child_by_field_name("type")?;
            return Some((label, node_text(ty, source).to_string()));
        }
        _ => {}
    }

    if let Some(name) = node.child_by_field_name("name") {
        return Some((label, node_text(name, source).to_string()));
    }

    // Anonymous function assigned to a variable: take the declarator's name.
    if let Some(parent) = node.parent()
        && matches!(parent.kind(), "variable_declarator" | "assignment_expression")
        && let Some(name) = parent
            .child_by_field_name("name")
            .or_else(|| parent.child_by_field_name("left"))
    {
        return Some((label, node_text(name, source).to_string()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use tree_sitter::Parser;

    #[test]
    fn test_denylist_membership() {
        assert!(is_denied_call("console"));
        assert!(is_denied_call("log"));
        assert!(is_denied_call("malloc"));
        assert!(is_denied_call("array_map"));
        assert!(is_denied_call("DispatchQueue"));
        assert!(is_denied_call("Route::get"));
        assert!(!is_denied_call("myBusinessFunction"));
    }

    #[test]
    fn test_denylist_shared_across_languages() {
        // `print` serves Python and Swift; `append` serves Go and JS.
        assert!(is_denied_call("print"));
        assert!(is_denied_call("append"));
    }

    #[test]
    fn test_enclosing_function_named() {
        let src = "function outer() { inner(); }";
        let mut parser = Parser::new();
        parser
            .set_language(&Language::JavaScript.grammar())
            .unwrap();
        let tree = parser.parse(src, None).unwrap();

        // Locate the inner call_expression.
        fn find<'a>(n: tree_sitter::Node<'a>, kind: &str) -> Option<tree_sitter::Node<'a>> {
            if n.kind() == kind {
                return Some(n);
            }
            let mut cursor = n.walk();
            for c in n.children(&mut cursor) {
                if let Some(f) = find(c, kind) {
                    return Some(f);
                }
            }
            None
        }
        let call = find(tree.root_node(), "call_expression").unwrap();
        let id = enclosing_function_id(call, "app.js", src.as_bytes()).unwrap();
        assert_eq!(id, "Function:app.js:outer");
    }

    #[test]
    fn test_file_scope_call_has_no_enclosing() {
        let src = "topLevel();";
        let mut parser = Parser::new();
        parser
            .set_language(&Language::JavaScript.grammar())
            .unwrap();
        let tree = parser.parse(src, None).unwrap();
        let call = tree.root_node().child(0).unwrap().child(0).unwrap();
        assert_eq!(call.kind(), "call_expression");
        assert!(enclosing_function_id(call, "app.js", src.as_bytes()).is_none());
    }
}
