//! Descriptor model for code generation
//!
//! The descriptors are a language-agnostic snapshot of a GraphQL schema's
//! type graph and operation set. They are produced once per run by a schema
//! parser and consumed read-only by every stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the scalars every GraphQL schema provides
pub const BUILTIN_SCALARS: &[&str] = &["String", "Int", "Float", "Boolean", "ID"];

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Output object type (also interfaces and unions)
    Object,
    /// Input object type
    Input,
    /// Enum type
    Enum,
}

/// Kind of a root operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// All operation kinds, in generation order
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Query,
        OperationKind::Mutation,
        OperationKind::Subscription,
    ];

    /// GraphQL document keyword (`query`, `mutation`, `subscription`)
    pub fn keyword(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

/// Where a type descriptor came from, when the parser knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeOrigin {
    /// An ordinary declared type
    Declared,
    /// The schema's root type for an operation kind
    Root(OperationKind),
}

/// A field of an object/input type, or an argument of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as written in the schema
    pub name: String,

    /// Compact type reference (`T`, `[T]`, `T!`, `[T!]!`, ...)
    #[serde(rename = "typeRef", alias = "type")]
    pub type_ref: String,

    /// Whether the field is non-null
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    /// Create a field; `required` follows the outermost `!` of the reference
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        let type_ref = type_ref.into();
        let required = type_ref.trim_end().ends_with('!');
        Self {
            name: name.into(),
            type_ref,
            required,
        }
    }
}

/// A declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name (unique within a run)
    pub name: String,

    /// Declared kind
    pub kind: TypeKind,

    /// Fields (object and input types)
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    /// Values (enum types)
    #[serde(default, rename = "enumValues", alias = "values")]
    pub enum_values: Vec<String>,

    /// Explicit origin tag; absent for snapshots that predate it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<TypeOrigin>,
}

impl TypeDescriptor {
    /// Create an object type
    pub fn object(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Object,
            fields,
            enum_values: Vec::new(),
            origin: None,
        }
    }

    /// Create an input type
    pub fn input(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            kind: TypeKind::Input,
            ..Self::object(name, fields)
        }
    }

    /// Create an enum type
    pub fn enumeration(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum,
            fields: Vec::new(),
            enum_values: values.iter().map(|v| v.to_string()).collect(),
            origin: None,
        }
    }

    /// Attach an explicit origin tag
    pub fn with_origin(mut self, origin: TypeOrigin) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// A root operation (a field of the Query/Mutation/Subscription type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Operation (root field) name
    pub name: String,

    /// Operation kind
    #[serde(alias = "type")]
    pub kind: OperationKind,

    /// Compact return type reference
    #[serde(rename = "returnTypeRef", alias = "returnType")]
    pub return_type_ref: String,

    /// Arguments
    #[serde(default)]
    pub arguments: Vec<FieldDescriptor>,
}

impl OperationDescriptor {
    /// Create an operation
    pub fn new(
        name: impl Into<String>,
        kind: OperationKind,
        return_type_ref: impl Into<String>,
        arguments: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            return_type_ref: return_type_ref.into(),
            arguments,
        }
    }
}

/// An explicitly requested fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentDescriptor {
    /// Fragment name
    pub name: String,

    /// Type condition
    #[serde(rename = "onType")]
    pub on_type: String,
}

/// Immutable snapshot of a parsed schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// All declared object, input and enum types, in schema order
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,

    /// Custom scalar names
    #[serde(default)]
    pub scalars: Vec<String>,

    /// Query operations
    #[serde(default)]
    pub queries: Vec<OperationDescriptor>,

    /// Mutation operations
    #[serde(default)]
    pub mutations: Vec<OperationDescriptor>,

    /// Subscription operations
    #[serde(default)]
    pub subscriptions: Vec<OperationDescriptor>,

    /// Explicit fragments
    #[serde(default)]
    pub fragments: Vec<FragmentDescriptor>,
}

impl SchemaSnapshot {
    /// Deserialize a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, crate::GeneratorError> {
        serde_json::from_str(json)
            .map_err(|e| crate::GeneratorError::Schema(format!("invalid snapshot: {e}")))
    }

    /// Operations of one kind
    pub fn operations(&self, kind: OperationKind) -> &[OperationDescriptor] {
        match kind {
            OperationKind::Query => &self.queries,
            OperationKind::Mutation => &self.mutations,
            OperationKind::Subscription => &self.subscriptions,
        }
    }
}

/// Parsed form of a compact type reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A bare type name
    Named(String),
    /// `[T]`
    List(Box<TypeRef>),
    /// `T!`
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Parse a compact type reference. Never fails: text that does not match
    /// the grammar becomes an opaque name with the wrapper characters removed.
    pub fn parse(text: &str) -> TypeRef {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix('!') {
            return TypeRef::NonNull(Box::new(TypeRef::parse(inner)));
        }
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return TypeRef::List(Box::new(TypeRef::parse(inner)));
        }
        TypeRef::Named(
            text.chars()
                .filter(|c| !matches!(c, '[' | ']' | '!'))
                .collect(),
        )
    }

    /// The innermost type name
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }

    /// Whether the outermost non-null wrapper is present
    pub fn is_required(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Whether the reference is a list (ignoring an outer `!`)
    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::Named(_) => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// Strip list and non-null wrappers from a compact type reference
pub fn base_type_name(type_ref: &str) -> String {
    TypeRef::parse(type_ref).base_name().to_string()
}

/// Whether `name` is one of the built-in scalars
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrappers() {
        let parsed = TypeRef::parse("[Post!]!");
        assert_eq!(
            parsed,
            TypeRef::NonNull(Box::new(TypeRef::List(Box::new(TypeRef::NonNull(
                Box::new(TypeRef::Named("Post".to_string()))
            )))))
        );
        assert_eq!(parsed.base_name(), "Post");
        assert!(parsed.is_required());
        assert!(parsed.is_list());
        assert_eq!(parsed.to_string(), "[Post!]!");
    }

    #[test]
    fn test_parse_plain_and_nested() {
        assert_eq!(TypeRef::parse("String"), TypeRef::Named("String".to_string()));
        assert!(!TypeRef::parse("String").is_list());
        assert_eq!(TypeRef::parse("[[Int]]").base_name(), "Int");
        assert!(!TypeRef::parse("[Int]").is_required());
    }

    #[test]
    fn test_parse_malformed_degrades_to_name() {
        assert_eq!(TypeRef::parse("[Foo").base_name(), "Foo");
        assert_eq!(base_type_name(" Bar! "), "Bar");
    }

    #[test]
    fn test_field_required_follows_reference() {
        assert!(FieldDescriptor::new("id", "ID!").required);
        assert!(!FieldDescriptor::new("tags", "[String!]").required);
    }

    #[test]
    fn test_snapshot_from_original_json_shape() {
        let json = r#"{
            "types": [
                {"name": "Status", "kind": "enum", "values": ["ACTIVE"]},
                {"name": "Post", "kind": "object", "fields": [
                    {"name": "id", "type": "ID", "required": true}
                ]}
            ],
            "queries": [
                {"name": "post", "type": "query", "returnType": "Post", "arguments": []}
            ]
        }"#;
        let snapshot = SchemaSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.types[0].kind, TypeKind::Enum);
        assert_eq!(snapshot.types[0].enum_values, ["ACTIVE"]);
        assert_eq!(snapshot.types[1].fields[0].type_ref, "ID");
        assert_eq!(snapshot.operations(OperationKind::Query)[0].return_type_ref, "Post");
        assert!(snapshot.mutations.is_empty());
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        assert!(matches!(
            SchemaSnapshot::from_json("not json"),
            Err(crate::GeneratorError::Schema(_))
        ));
    }
}
