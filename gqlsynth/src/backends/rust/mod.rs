//! Rust backend
//!
//! Emits one module per artifact plus a `mod.rs` manifest. Declarations are
//! serde types; operation clients run over `reqwest`.

mod templates;

use super::{Backend, TemplateSet};
use crate::catalog::{BuiltinScalar, OutputTypeExpr};
use crate::error::FormatError;
use once_cell::sync::Lazy;

static TEMPLATES: Lazy<TemplateSet> = Lazy::new(templates::template_set);

/// Rust backend
pub struct RustBackend;

impl Backend for RustBackend {
    fn name(&self) -> &str {
        "rust"
    }

    fn file_extension(&self) -> &str {
        "rs"
    }

    fn file_name(&self, artifact: &str) -> String {
        format!("{}.rs", self.module_name(artifact))
    }

    /// `types.enums.1` -> `types_enums_1`
    fn module_name(&self, artifact: &str) -> String {
        artifact.replace(['.', '-'], "_")
    }

    fn module_path(&self, artifact: &str) -> String {
        format!("super::{}", self.module_name(artifact))
    }

    fn render_type(&self, expr: &OutputTypeExpr) -> String {
        match expr {
            OutputTypeExpr::Scalar(scalar) => match scalar {
                BuiltinScalar::String | BuiltinScalar::Id => "String".to_string(),
                BuiltinScalar::Int => "i32".to_string(),
                BuiltinScalar::Float => "f64".to_string(),
                BuiltinScalar::Boolean => "bool".to_string(),
            },
            OutputTypeExpr::Named(name) => name.clone(),
            OutputTypeExpr::List(inner) => format!("Vec<{}>", self.render_type(inner)),
        }
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format(&self, text: &str) -> Result<String, FormatError> {
        let parsed = syn::parse_file(text).map_err(|e| FormatError::Parse(e.to_string()))?;
        Ok(prettyplease::unparse(&parsed))
    }

    fn manifest_name(&self) -> Option<&str> {
        Some("mod")
    }
}
