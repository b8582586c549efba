//! tree-sitter-typescript grammar node kind constants used by the Symbol
//! Extractor and Reference Walker. Source: the tree-sitter-typescript
//! grammar's `node-types.json`.

pub const PROGRAM: &str = "program";
pub const MODULE: &str = "module";
pub const STATEMENT_BLOCK: &str = "statement_block";

pub const CLASS_DECLARATION: &str = "class_declaration";
pub const INTERFACE_DECLARATION: &str = "interface_declaration";
pub const FUNCTION_DECLARATION: &str = "function_declaration";
pub const METHOD_DEFINITION: &str = "method_definition";
pub const VARIABLE_DECLARATION: &str = "variable_declaration";
pub const LEXICAL_DECLARATION: &str = "lexical_declaration";
pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
pub const ENUM_DECLARATION: &str = "enum_declaration";
pub const ENUM_BODY: &str = "enum_body";
pub const ENUM_ASSIGNMENT: &str = "enum_assignment";
pub const TYPE_ALIAS_DECLARATION: &str = "type_alias_declaration";
pub const AMBIENT_DECLARATION: &str = "ambient_declaration";
pub const MODULE_DECLARATION: &str = "module_declaration";

pub const PUBLIC_FIELD_DEFINITION: &str = "public_field_definition";
pub const PROPERTY_SIGNATURE: &str = "property_signature";
pub const METHOD_SIGNATURE: &str = "method_signature";
pub const CONSTRUCTOR: &str = "constructor";
pub const ABSTRACT_METHOD_SIGNATURE: &str = "abstract_method_signature";
pub const CLASS_BODY: &str = "class_body";
pub const INTERFACE_BODY: &str = "interface_body";
pub const OBJECT_TYPE: &str = "object_type";

pub const ARROW_FUNCTION: &str = "arrow_function";
pub const FUNCTION_EXPRESSION: &str = "function_expression";
pub const GENERATOR_FUNCTION: &str = "generator_function";
pub const GENERATOR_FUNCTION_DECLARATION: &str = "generator_function_declaration";
pub const FUNCTION_SIGNATURE: &str = "function_signature";

pub const FORMAL_PARAMETERS: &str = "formal_parameters";
pub const REQUIRED_PARAMETER: &str = "required_parameter";
pub const OPTIONAL_PARAMETER: &str = "optional_parameter";
pub const REST_PARAMETER: &str = "rest_parameter";

pub const EXPORT_STATEMENT: &str = "export_statement";

pub const TYPE_ANNOTATION: &str = "type_annotation";
pub const TYPE_PARAMETERS: &str = "type_parameters";
pub const PREDEFINED_TYPE: &str = "predefined_type";
pub const TYPE_IDENTIFIER: &str = "type_identifier";
pub const GENERIC_TYPE: &str = "generic_type";
pub const UNION_TYPE: &str = "union_type";
pub const INTERSECTION_TYPE: &str = "intersection_type";

pub const ACCESSIBILITY_MODIFIER: &str = "accessibility_modifier";
pub const READONLY: &str = "readonly";
pub const STATIC: &str = "static";
pub const ASYNC: &str = "async";
pub const ABSTRACT: &str = "abstract";

pub const IDENTIFIER: &str = "identifier";
pub const PROPERTY_IDENTIFIER: &str = "property_identifier";
pub const TYPE_PROPERTY_NAME: &str = "property_identifier";
pub const NESTED_IDENTIFIER: &str = "nested_identifier";
pub const MEMBER_EXPRESSION: &str = "member_expression";

pub const IMPLEMENTS_CLAUSE: &str = "implements_clause";
pub const CLASS_HERITAGE: &str = "class_heritage";
pub const EXTENDS_CLAUSE: &str = "extends_clause";
