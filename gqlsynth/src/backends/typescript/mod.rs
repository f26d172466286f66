//! TypeScript backend
//!
//! Emits ES modules: interfaces for models and inputs, string enums, and
//! `graphql-request` based operation clients.

pub(super) mod format;
mod templates;

use super::{Backend, TemplateSet};
use crate::catalog::{BuiltinScalar, OutputTypeExpr};
use crate::error::FormatError;
use once_cell::sync::Lazy;

static TEMPLATES: Lazy<TemplateSet> = Lazy::new(templates::template_set);

/// TypeScript backend
pub struct TypeScriptBackend;

impl Backend for TypeScriptBackend {
    fn name(&self) -> &str {
        "typescript"
    }

    fn file_extension(&self) -> &str {
        "ts"
    }

    fn module_path(&self, artifact: &str) -> String {
        format!("./{artifact}")
    }

    fn render_type(&self, expr: &OutputTypeExpr) -> String {
        match expr {
            OutputTypeExpr::Scalar(scalar) => match scalar {
                BuiltinScalar::String | BuiltinScalar::Id => "string".to_string(),
                BuiltinScalar::Int | BuiltinScalar::Float => "number".to_string(),
                BuiltinScalar::Boolean => "boolean".to_string(),
            },
            OutputTypeExpr::Named(name) => name.clone(),
            OutputTypeExpr::List(inner) => format!("{}[]", self.render_type(inner)),
        }
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format(&self, text: &str) -> Result<String, FormatError> {
        format::format_source(text)
    }
}
