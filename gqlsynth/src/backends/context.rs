//! Template contexts
//!
//! Plain records handed to templates. Stages build them, serialize them to a
//! JSON value and pass that to [`Backend::render`](super::Backend::render);
//! templates deserialize them back. Multi-line text such as GraphQL
//! documents is carried pre-formatted and inserted verbatim.

use serde::{Deserialize, Serialize};

/// `placeholder`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderContext {
    pub message: String,
}

/// One enum declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumContext {
    pub name: String,
    pub values: Vec<String>,
}

/// `enums`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumsContext {
    pub enums: Vec<EnumContext>,
    #[serde(default)]
    pub comments: bool,
}

/// Names imported from one module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportContext {
    /// Module path as returned by the backend
    pub module: String,
    /// Imported names
    pub names: Vec<String>,
}

/// A field of a model or input declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldContext {
    /// Schema field name
    pub name: String,
    /// Rendered type, without optionality
    pub type_expr: String,
    /// Schema type reference, for comments
    pub graphql_type: String,
    pub required: bool,
    /// Non-list reference to an object or input type
    #[serde(default)]
    pub nested: bool,
}

/// A model or input declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeContext {
    /// Canonical (affixed) name
    pub name: String,
    /// Name in the schema
    pub schema_name: String,
    pub fields: Vec<FieldContext>,
}

/// `models` and `inputs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypesContext {
    /// One entry per module imported from
    #[serde(default)]
    pub imports: Vec<ImportContext>,
    pub types: Vec<TypeContext>,
    #[serde(default)]
    pub comments: bool,
}

/// `batch-index` and `module-manifest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesContext {
    pub modules: Vec<String>,
}

/// `reexport`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReexportContext {
    pub module: String,
}

/// `type-index`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeIndexContext {
    /// Modules re-exported wholesale
    pub modules: Vec<String>,
    /// Custom scalars aliased to the string type
    pub scalars: Vec<String>,
}

/// One named fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentContext {
    pub name: String,
    pub on_type: String,
    /// Selection lines, indented for the fragment body
    pub selection: String,
}

/// `fragments`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentsContext {
    pub fragments: Vec<FragmentContext>,
}

/// An operation argument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgContext {
    pub name: String,
    /// Rendered type, without optionality
    pub type_expr: String,
    pub required: bool,
}

/// One operation method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodContext {
    pub name: String,
    pub args: Vec<ArgContext>,
    /// Rendered return type, without optionality
    pub return_type: String,
    /// The return type is nullable
    #[serde(default)]
    pub nullable: bool,
    /// Full GraphQL document, pre-formatted
    pub document: String,
}

/// `operations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationsContext {
    /// Client type name (e.g. `QueryClient`)
    pub client_name: String,
    /// `query`, `mutation` or `subscription`
    pub kind: String,
    /// One entry per module imported from
    #[serde(default)]
    pub imports: Vec<ImportContext>,
    /// Module of the retry/timeout helpers, when generated
    #[serde(default)]
    pub utils_module: Option<String>,
    pub methods: Vec<MethodContext>,
}

/// One operation client held by the aggregating client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMember {
    /// Member name (e.g. `query`, `query2`)
    pub field: String,
    /// Client type name
    pub client: String,
    /// Module the client type comes from
    pub module: String,
}

/// `client`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientContext {
    pub client_name: String,
    pub members: Vec<ClientMember>,
    /// Module of the retry/timeout helpers, when generated
    #[serde(default)]
    pub utils_module: Option<String>,
}
