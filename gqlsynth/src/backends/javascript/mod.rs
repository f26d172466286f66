//! JavaScript backend
//!
//! Emits ES modules with JSDoc annotations: `@typedef` blocks for models and
//! inputs, frozen objects for enums, and `graphql-request` based operation
//! clients. Type expressions use the TypeScript syntax JSDoc understands.

mod templates;

use super::typescript::format::format_source;
use super::{Backend, TemplateSet, TypeScriptBackend};
use crate::catalog::OutputTypeExpr;
use crate::error::FormatError;
use once_cell::sync::Lazy;

static TEMPLATES: Lazy<TemplateSet> = Lazy::new(templates::template_set);

/// JavaScript backend
pub struct JavaScriptBackend;

impl Backend for JavaScriptBackend {
    fn name(&self) -> &str {
        "javascript"
    }

    fn file_extension(&self) -> &str {
        "js"
    }

    /// ES module specifiers carry the file extension
    fn module_path(&self, artifact: &str) -> String {
        format!("./{artifact}.js")
    }

    fn render_type(&self, expr: &OutputTypeExpr) -> String {
        TypeScriptBackend.render_type(expr)
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format(&self, text: &str) -> Result<String, FormatError> {
        format_source(text)
    }
}
