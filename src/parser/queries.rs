//! Per-language capture queries.
//!
//! The capture names — not the grammars — are the contract with the rest of
//! the pipeline. Vocabulary:
//!
//! - `definition.<kind>` + `name`: a code entity (see the capture→label table
//!   in `parser::label_for_captures`)
//! - `import` (+ optional `import.source`): an import/include/use site
//! - `call` + `call.name`: a call site
//! - `heritage.class` + one of `heritage.extends` / `heritage.implements` /
//!   `heritage.trait`: an inheritance relation, by name
//!
//! Adding a language means supplying a grammar handle in `language.rs` and a
//! query here that speaks this vocabulary — nothing else changes.

use crate::language::Language;

const QUERY_JAVASCRIPT: &str = r#"
    (function_declaration name: (identifier) @name) @definition.function
    (generator_function_declaration name: (identifier) @name) @definition.function
    (class_declaration name: (identifier) @name) @definition.class
    (method_definition name: (property_identifier) @name) @definition.method

    ; const Foo = () => {} / const Foo = function () {}
    (lexical_declaration
      (variable_declarator
        name: (identifier) @name
        value: (arrow_function))) @definition.function
    (lexical_declaration
      (variable_declarator
        name: (identifier) @name
        value: (function_expression))) @definition.function

    (import_statement source: (string) @import.source) @import
    (call_expression
      function: (identifier) @_req
      arguments: (arguments (string) @import.source)
      (#eq? @_req "require")) @import

    (call_expression function: (identifier) @call.name) @call
    (call_expression
      function: (member_expression property: (property_identifier) @call.name)) @call

    (class_declaration
      name: (identifier) @heritage.class
      (class_heritage (identifier) @heritage.extends))
"#;

const QUERY_TYPESCRIPT: &str = r#"
    (function_declaration name: (identifier) @name) @definition.function
    (generator_function_declaration name: (identifier) @name) @definition.function
    (class_declaration name: (type_identifier) @name) @definition.class
    (abstract_class_declaration name: (type_identifier) @name) @definition.class
    (interface_declaration name: (type_identifier) @name) @definition.interface
    (type_alias_declaration name: (type_identifier) @name) @definition.type
    (enum_declaration name: (identifier) @name) @definition.enum
    (method_definition name: (property_identifier) @name) @definition.method
    (internal_module name: (identifier) @name) @definition.namespace

    (lexical_declaration
      (variable_declarator
        name: (identifier) @name
        value: (arrow_function))) @definition.function
    (lexical_declaration
      (variable_declarator
        name: (identifier) @name
        value: (function_expression))) @definition.function

    (import_statement source: (string) @import.source) @import
    (call_expression
      function: (identifier) @_req
      arguments: (arguments (string) @import.source)
      (#eq? @_req "require")) @import

    (call_expression function: (identifier) @call.name) @call
    (call_expression
      function: (member_expression property: (property_identifier) @call.name)) @call

    (class_declaration
      name: (type_identifier) @heritage.class
      (class_heritage (extends_clause (identifier) @heritage.extends)))
    (class_declaration
      name: (type_identifier) @heritage.class
      (class_heritage (implements_clause (type_identifier) @heritage.implements)))
    (interface_declaration
      name: (type_identifier) @heritage.class
      (extends_type_clause (type_identifier) @heritage.extends))
"#;

const QUERY_PYTHON: &str = r#"
    (function_definition name: (identifier) @name) @definition.function
    (class_definition name: (identifier) @name) @definition.class

    (import_statement name: (dotted_name) @import.source) @import
    (import_statement
      name: (aliased_import name: (dotted_name) @import.source)) @import
    (import_from_statement module_name: (dotted_name) @import.source) @import
    (import_from_statement module_name: (relative_import) @import.source) @import

    (call function: (identifier) @call.name) @call
    (call function: (attribute attribute: (identifier) @call.name)) @call

    (class_definition
      name: (identifier) @heritage.class
      superclasses: (argument_list (identifier) @heritage.extends))
"#;

const QUERY_JAVA: &str = r#"
    (class_declaration name: (identifier) @name) @definition.class
    (interface_declaration name: (identifier) @name) @definition.interface
    (enum_declaration name: (identifier) @name) @definition.enum
    (record_declaration name: (identifier) @name) @definition.record
    (annotation_type_declaration name: (identifier) @name) @definition.annotation
    (method_declaration name: (identifier) @name) @definition.method
    (constructor_declaration name: (identifier) @name) @definition.constructor

    ; the whole declaration is captured so wildcard/static forms survive;
    ; the worker strips the keywords and keeps the dotted path
    (import_declaration) @import @import.source

    (method_invocation name: (identifier) @call.name) @call

    (class_declaration
      name: (identifier) @heritage.class
      (superclass (type_identifier) @heritage.extends))
    (class_declaration
      name: (identifier) @heritage.class
      (super_interfaces (type_list (type_identifier) @heritage.implements)))
    (interface_declaration
      name: (identifier) @heritage.class
      (extends_interfaces (type_list (type_identifier) @heritage.extends)))
"#;

const QUERY_C: &str = r#"
    (function_definition
      declarator: (function_declarator declarator: (identifier) @name)) @definition.function
    (struct_specifier
      name: (type_identifier) @name
      body: (field_declaration_list)) @definition.struct
    (enum_specifier
      name: (type_identifier) @name
      body: (enumerator_list)) @definition.enum
    (union_specifier
      name: (type_identifier) @name
      body: (field_declaration_list)) @definition.union
    (type_definition declarator: (type_identifier) @name) @definition.typedef
    (preproc_def name: (identifier) @name) @definition.macro
    (preproc_function_def name: (identifier) @name) @definition.macro

    (preproc_include path: (string_literal) @import.source) @import
    (preproc_include path: (system_lib_string) @import.source) @import

    (call_expression function: (identifier) @call.name) @call
"#;

const QUERY_CPP: &str = r#"
    (function_definition
      declarator: (function_declarator declarator: (identifier) @name)) @definition.function
    (function_definition
      declarator: (function_declarator declarator: (field_identifier) @name)) @definition.method
    (function_definition
      declarator: (function_declarator
        declarator: (qualified_identifier name: (identifier) @name))) @definition.method
    (class_specifier
      name: (type_identifier) @name
      body: (field_declaration_list)) @definition.class
    (struct_specifier
      name: (type_identifier) @name
      body: (field_declaration_list)) @definition.struct
    (enum_specifier
      name: (type_identifier) @name
      body: (enumerator_list)) @definition.enum
    (union_specifier
      name: (type_identifier) @name
      body: (field_declaration_list)) @definition.union
    (namespace_definition name: (namespace_identifier) @name) @definition.namespace
    (type_definition declarator: (type_identifier) @name) @definition.typedef
    (alias_declaration name: (type_identifier) @name) @definition.type
    (template_declaration
      (class_specifier name: (type_identifier) @name)) @definition.template
    (preproc_def name: (identifier) @name) @definition.macro
    (preproc_function_def name: (identifier) @name) @definition.macro

    (preproc_include path: (string_literal) @import.source) @import
    (preproc_include path: (system_lib_string) @import.source) @import

    (call_expression function: (identifier) @call.name) @call
    (call_expression
      function: (field_expression field: (field_identifier) @call.name)) @call
    (call_expression
      function: (qualified_identifier name: (identifier) @call.name)) @call

    (class_specifier
      name: (type_identifier) @heritage.class
      (base_class_clause (type_identifier) @heritage.extends))
"#;

const QUERY_CSHARP: &str = r#"
    (class_declaration name: (identifier) @name) @definition.class
    (interface_declaration name: (identifier) @name) @definition.interface
    (struct_declaration name: (identifier) @name) @definition.struct
    (enum_declaration name: (identifier) @name) @definition.enum
    (record_declaration name: (identifier) @name) @definition.record
    (delegate_declaration name: (identifier) @name) @definition.delegate
    (method_declaration name: (identifier) @name) @definition.method
    (constructor_declaration name: (identifier) @name) @definition.constructor
    (property_declaration name: (identifier) @name) @definition.property
    (namespace_declaration name: (_) @name) @definition.namespace
    (file_scoped_namespace_declaration name: (_) @name) @definition.namespace
    (local_function_statement name: (identifier) @name) @definition.function

    (using_directive (_) @import.source) @import

    (invocation_expression function: (identifier) @call.name) @call
    (invocation_expression
      function: (member_access_expression name: (identifier) @call.name)) @call

    (class_declaration
      name: (identifier) @heritage.class
      (base_list (identifier) @heritage.extends))
"#;

const QUERY_GO: &str = r#"
    (function_declaration name: (identifier) @name) @definition.function
    (method_declaration name: (field_identifier) @name) @definition.method
    (type_declaration
      (type_spec name: (type_identifier) @name type: (struct_type))) @definition.struct
    (type_declaration
      (type_spec name: (type_identifier) @name type: (interface_type))) @definition.interface
    (type_declaration
      (type_spec name: (type_identifier) @name type: (type_identifier))) @definition.type
    (const_declaration (const_spec name: (identifier) @name)) @definition.const

    (import_spec path: (interpreted_string_literal) @import.source) @import

    (call_expression function: (identifier) @call.name) @call
    (call_expression
      function: (selector_expression field: (field_identifier) @call.name)) @call
"#;

const QUERY_RUST: &str = r#"
    (function_item name: (identifier) @name) @definition.function
    (struct_item name: (type_identifier) @name) @definition.struct
    (enum_item name: (type_identifier) @name) @definition.enum
    (trait_item name: (type_identifier) @name) @definition.trait
    (impl_item type: (type_identifier) @name) @definition.impl
    (mod_item name: (identifier) @name) @definition.module
    (type_item name: (type_identifier) @name) @definition.type
    (const_item name: (identifier) @name) @definition.const
    (static_item name: (identifier) @name) @definition.static
    (union_item name: (type_identifier) @name) @definition.union
    (macro_definition name: (identifier) @name) @definition.macro

    (use_declaration argument: (_) @import.source) @import

    (call_expression function: (identifier) @call.name) @call
    (call_expression
      function: (field_expression field: (field_identifier) @call.name)) @call
    (call_expression
      function: (scoped_identifier name: (identifier) @call.name)) @call

    (impl_item
      trait: (type_identifier) @heritage.trait
      type: (type_identifier) @heritage.class)
"#;

const QUERY_PHP: &str = r#"
    (function_definition name: (name) @name) @definition.function
    (class_declaration name: (name) @name) @definition.class
    (interface_declaration name: (name) @name) @definition.interface
    (trait_declaration name: (name) @name) @definition.trait
    (enum_declaration name: (name) @name) @definition.enum
    (method_declaration name: (name) @name) @definition.method
    (property_declaration
      (property_element (variable_name (name) @name))) @definition.property

    (namespace_use_declaration
      (namespace_use_clause
        [(qualified_name) (name)] @import.source)) @import

    (function_call_expression function: (name) @call.name) @call
    (member_call_expression name: (name) @call.name) @call
    (scoped_call_expression name: (name) @call.name) @call

    (class_declaration
      name: (name) @heritage.class
      (base_clause (name) @heritage.extends))
    (class_declaration
      name: (name) @heritage.class
      (class_interface_clause (name) @heritage.implements))
    (class_declaration
      name: (name) @heritage.class
      body: (declaration_list (use_declaration (name) @heritage.trait)))
"#;

const QUERY_SWIFT: &str = r#"
    (function_declaration name: (simple_identifier) @name) @definition.function
    (class_declaration name: (type_identifier) @name) @definition.class
    (protocol_declaration name: (type_identifier) @name) @definition.interface
    (init_declaration) @definition.constructor
    (deinit_declaration) @definition.constructor

    (import_declaration (identifier) @import.source) @import

    (call_expression (simple_identifier) @call.name) @call
    (call_expression
      (navigation_expression
        (navigation_suffix (simple_identifier) @call.name))) @call

    (class_declaration
      name: (type_identifier) @heritage.class
      (inheritance_specifier (user_type (type_identifier) @heritage.extends)))
"#;

/// The capture-query source for a language.
pub fn query_source(language: Language) -> &'static str {
    match language {
        Language::JavaScript => QUERY_JAVASCRIPT,
        Language::TypeScript | Language::TypeScriptTsx => QUERY_TYPESCRIPT,
        Language::Python => QUERY_PYTHON,
        Language::Java => QUERY_JAVA,
        Language::C => QUERY_C,
        Language::Cpp => QUERY_CPP,
        Language::CSharp => QUERY_CSHARP,
        Language::Go => QUERY_GO,
        Language::Rust => QUERY_RUST,
        Language::Php => QUERY_PHP,
        Language::Swift => QUERY_SWIFT,
    }
}
