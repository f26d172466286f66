//! Type catalog
//!
//! Indexes the snapshot's type descriptors by name and answers the questions
//! every stage asks about a type reference:
//! - which namespace a declared type belongs to
//! - what the output type expression for a reference is
//! - whether a reference names a custom (non built-in) type
//! - what the canonical (prefixed/suffixed) name of a type is

use crate::ir::{
    is_builtin_scalar, OperationKind, SchemaSnapshot, TypeDescriptor, TypeKind, TypeOrigin,
    TypeRef,
};
use crate::options::NamingOptions;
use std::collections::HashMap;

/// Logical output bucket of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Enums,
    Models,
    Inputs,
    Queries,
    Mutations,
    Subscriptions,
}

impl Namespace {
    /// Namespace holding an operation kind's root type
    pub fn for_operation(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Query => Namespace::Queries,
            OperationKind::Mutation => Namespace::Mutations,
            OperationKind::Subscription => Namespace::Subscriptions,
        }
    }

    /// Lowercase name (`enums`, `models`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Enums => "enums",
            Namespace::Models => "models",
            Namespace::Inputs => "inputs",
            Namespace::Queries => "queries",
            Namespace::Mutations => "mutations",
            Namespace::Subscriptions => "subscriptions",
        }
    }
}

/// Classify a type descriptor into its namespace.
///
/// An explicit origin tag wins; untagged descriptors fall back to name
/// heuristics.
pub fn classify(ty: &TypeDescriptor) -> Namespace {
    match ty.origin {
        Some(TypeOrigin::Root(kind)) => Namespace::for_operation(kind),
        Some(TypeOrigin::Declared) => match ty.kind {
            TypeKind::Enum => Namespace::Enums,
            TypeKind::Input => Namespace::Inputs,
            TypeKind::Object => Namespace::Models,
        },
        None => classify_by_name(&ty.name, ty.kind),
    }
}

/// Name-pattern classification for descriptors without an origin tag
fn classify_by_name(name: &str, kind: TypeKind) -> Namespace {
    if name.ends_with("Input") {
        Namespace::Inputs
    } else if name.ends_with("Enum") || kind == TypeKind::Enum {
        Namespace::Enums
    } else if name.contains("Query") {
        Namespace::Queries
    } else if name.contains("Mutation") {
        Namespace::Mutations
    } else if name.contains("Subscription") {
        Namespace::Subscriptions
    } else {
        Namespace::Models
    }
}

/// Built-in GraphQL scalars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScalar {
    String,
    Int,
    Float,
    Boolean,
    Id,
}

impl BuiltinScalar {
    /// Look up a built-in scalar by its schema name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(BuiltinScalar::String),
            "Int" => Some(BuiltinScalar::Int),
            "Float" => Some(BuiltinScalar::Float),
            "Boolean" => Some(BuiltinScalar::Boolean),
            "ID" => Some(BuiltinScalar::Id),
            _ => None,
        }
    }
}

/// Language-neutral output type expression.
///
/// Optionality is not part of the expression: it belongs to the consuming
/// field or argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTypeExpr {
    /// A built-in scalar
    Scalar(BuiltinScalar),
    /// An enum, model, input, custom scalar or opaque type, by canonical name
    Named(String),
    /// A list of the inner expression
    List(Box<OutputTypeExpr>),
}

/// Types bucketed by namespace, in schema order
#[derive(Debug, Default)]
pub struct Buckets<'a> {
    pub enums: Vec<&'a TypeDescriptor>,
    pub models: Vec<&'a TypeDescriptor>,
    pub inputs: Vec<&'a TypeDescriptor>,
}

/// Name-indexed view over a schema snapshot
pub struct TypeCatalog<'a> {
    snapshot: &'a SchemaSnapshot,
    naming: NamingOptions,
    by_name: HashMap<&'a str, &'a TypeDescriptor>,
    scalar_aliases: bool,
}

impl<'a> TypeCatalog<'a> {
    /// Index a snapshot
    pub fn new(snapshot: &'a SchemaSnapshot, naming: &NamingOptions) -> Self {
        let by_name = snapshot
            .types
            .iter()
            .map(|t| (t.name.as_str(), t))
            .collect();

        Self {
            snapshot,
            naming: naming.clone(),
            by_name,
            scalar_aliases: true,
        }
    }

    /// Whether custom scalars are referenced through aliases declared in the
    /// type index. Without them a custom scalar converts to `String`.
    pub fn with_scalar_aliases(mut self, enabled: bool) -> Self {
        self.scalar_aliases = enabled;
        self
    }

    /// The underlying snapshot
    pub fn snapshot(&self) -> &'a SchemaSnapshot {
        self.snapshot
    }

    /// Find a declared type by name
    pub fn lookup(&self, name: &str) -> Option<&'a TypeDescriptor> {
        self.by_name.get(name).copied()
    }

    /// Declared type whose canonical name is `canonical`
    pub fn lookup_canonical(&self, canonical: &str) -> Option<&'a TypeDescriptor> {
        self.snapshot
            .types
            .iter()
            .find(|t| self.canonical_name(&t.name) == canonical)
    }

    /// Whether `name` is a custom scalar converted to `String` because no
    /// alias declares it
    pub fn inlines_scalar(&self, name: &str) -> bool {
        !self.scalar_aliases && self.snapshot.scalars.iter().any(|s| s == name)
    }

    /// Whether `name` is a declared enum
    pub fn is_enum_type(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|t| t.kind == TypeKind::Enum)
    }

    /// Whether `name` is a declared object type
    pub fn is_object_type(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|t| t.kind == TypeKind::Object)
    }

    /// Whether `name` is a declared object or input type
    pub fn is_composite_type(&self, name: &str) -> bool {
        self.lookup(name)
            .is_some_and(|t| matches!(t.kind, TypeKind::Object | TypeKind::Input))
    }

    /// Canonical output name for a type name (not a type reference).
    ///
    /// Models and inputs take their namespace's affix; enums, custom scalars
    /// and unknown names are returned unchanged.
    pub fn canonical_name(&self, name: &str) -> String {
        if self.is_enum_type(name) {
            return name.to_string();
        }
        match self.lookup(name).map(classify) {
            Some(Namespace::Models) => self.naming.models.apply(name),
            Some(Namespace::Inputs) => self.naming.inputs.apply(name),
            _ => name.to_string(),
        }
    }

    /// Convert a compact type reference to an output type expression
    pub fn convert_type_ref(&self, type_ref: &str) -> OutputTypeExpr {
        self.convert(&TypeRef::parse(type_ref))
    }

    fn convert(&self, type_ref: &TypeRef) -> OutputTypeExpr {
        match type_ref {
            TypeRef::NonNull(inner) => self.convert(inner),
            TypeRef::List(inner) => OutputTypeExpr::List(Box::new(self.convert(inner))),
            TypeRef::Named(name) => match BuiltinScalar::from_name(name) {
                Some(scalar) => OutputTypeExpr::Scalar(scalar),
                None if self.inlines_scalar(name) => OutputTypeExpr::Scalar(BuiltinScalar::String),
                None => OutputTypeExpr::Named(self.canonical_name(name)),
            },
        }
    }

    /// Partition declared types into the enums/models/inputs namespaces.
    /// Root operation types are left out.
    pub fn bucket(&self) -> Buckets<'a> {
        let mut buckets = Buckets::default();
        for ty in &self.snapshot.types {
            match classify(ty) {
                Namespace::Enums => buckets.enums.push(ty),
                Namespace::Models => buckets.models.push(ty),
                Namespace::Inputs => buckets.inputs.push(ty),
                other => {
                    tracing::debug!(name = %ty.name, namespace = other.as_str(), "not a declared type");
                }
            }
        }
        buckets
    }
}

/// Whether a type reference names anything other than a built-in scalar
pub fn is_custom_type(type_ref: &str) -> bool {
    !is_builtin_scalar(TypeRef::parse(type_ref).base_name())
}
