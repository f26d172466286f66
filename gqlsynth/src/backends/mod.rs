//! Backend implementations for code generation
//!
//! Each backend renders artifacts for one output language. A backend owns:
//! - a table of named templates, each rendering a serializable context
//! - the mapping from output type expressions to the language's type syntax
//! - artifact file naming and the module paths used in imports
//! - a best-effort formatter

pub mod context;
mod javascript;
mod rust;
mod typescript;

pub use javascript::JavaScriptBackend;
pub use rust::RustBackend;
pub use typescript::TypeScriptBackend;

use crate::catalog::OutputTypeExpr;
use crate::error::{FormatError, GeneratorError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A template: renders a JSON context to text
pub type TemplateFn = fn(&Value) -> Result<String, GeneratorError>;

/// Named templates of one backend
pub struct TemplateSet {
    templates: BTreeMap<&'static str, TemplateFn>,
}

impl TemplateSet {
    pub fn new(entries: &[(&'static str, TemplateFn)]) -> Self {
        Self {
            templates: entries.iter().copied().collect(),
        }
    }

    /// Render template `name` with `context`
    pub fn render(&self, name: &str, context: &Value) -> Result<String, GeneratorError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| GeneratorError::TemplateNotFound(name.to_string()))?;
        template(context)
    }

    /// Whether a template named `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

/// Deserialize a template context, reporting mismatches against `template`
pub(crate) fn context<T: DeserializeOwned>(template: &str, value: &Value) -> Result<T, GeneratorError> {
    T::deserialize(value).map_err(|e| GeneratorError::render(template, e.to_string()))
}

/// Serialize a template context for `template`
pub(crate) fn context_value<T: Serialize>(template: &str, ctx: &T) -> Result<Value, GeneratorError> {
    serde_json::to_value(ctx).map_err(|e| GeneratorError::render(template, e.to_string()))
}

/// A code generation backend
pub trait Backend: Send + Sync {
    /// Backend name (e.g., "typescript", "javascript", "rust")
    fn name(&self) -> &str;

    /// File extension for generated files
    fn file_extension(&self) -> &str;

    /// File name for an artifact base name (e.g. `types.enums`)
    fn file_name(&self, artifact: &str) -> String {
        format!("{artifact}.{}", self.file_extension())
    }

    /// Module name of an artifact, as declared in a module manifest
    fn module_name(&self, artifact: &str) -> String {
        artifact.to_string()
    }

    /// Path other artifacts use to import from `artifact`
    fn module_path(&self, artifact: &str) -> String;

    /// Render an output type expression in this language
    fn render_type(&self, expr: &OutputTypeExpr) -> String;

    /// Templates provided by this backend
    fn templates(&self) -> &TemplateSet;

    /// Render template `name` with `context`
    fn render(&self, template: &str, context: &Value) -> Result<String, GeneratorError> {
        self.templates().render(template, context)
    }

    /// Format generated text
    fn format(&self, text: &str) -> Result<String, FormatError>;

    /// Artifact base name of the module manifest written at the end of a run
    /// (optional)
    fn manifest_name(&self) -> Option<&str> {
        None
    }
}

/// Backend errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("unknown backend: {0}")]
    UnknownBackend(String),
}

/// Get a backend by name
pub fn get_backend(name: &str) -> Result<Box<dyn Backend>, BackendError> {
    match name.to_lowercase().as_str() {
        "typescript" | "ts" => Ok(Box::new(TypeScriptBackend)),
        "javascript" | "js" => Ok(Box::new(JavaScriptBackend)),
        "rust" | "rs" => Ok(Box::new(RustBackend)),
        other => Err(BackendError::UnknownBackend(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuiltinScalar;
    use serde_json::json;

    #[test]
    fn test_get_backend_aliases() {
        assert_eq!(get_backend("TypeScript").unwrap().name(), "typescript");
        assert_eq!(get_backend("ts").unwrap().name(), "typescript");
        assert_eq!(get_backend("rs").unwrap().name(), "rust");
        assert_eq!(get_backend("JS").unwrap().name(), "javascript");
        assert!(matches!(
            get_backend("cobol"),
            Err(BackendError::UnknownBackend(name)) if name == "cobol"
        ));
    }

    #[test]
    fn test_backends_share_template_names() {
        let shared = [
            "placeholder",
            "enums",
            "models",
            "inputs",
            "batch-index",
            "reexport",
            "type-index",
            "fragments",
            "operations",
            "utils",
            "client",
        ];
        for name in ["typescript", "javascript", "rust"] {
            let backend = get_backend(name).unwrap();
            for template in shared {
                assert!(backend.templates().contains(template), "{name}: {template}");
            }
        }
        assert!(get_backend("rust").unwrap().templates().contains("module-manifest"));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let backend = get_backend("typescript").unwrap();
        assert!(matches!(
            backend.render("nope", &json!({})),
            Err(GeneratorError::TemplateNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_mismatched_context_is_a_render_error() {
        let backend = get_backend("rust").unwrap();
        assert!(matches!(
            backend.render("enums", &json!({"enums": 3})),
            Err(GeneratorError::Render { template, .. }) if template == "enums"
        ));
    }

    #[test]
    fn test_render_type_per_language() {
        let expr = OutputTypeExpr::List(Box::new(OutputTypeExpr::Scalar(BuiltinScalar::Int)));
        assert_eq!(get_backend("ts").unwrap().render_type(&expr), "number[]");
        assert_eq!(get_backend("js").unwrap().render_type(&expr), "number[]");
        assert_eq!(get_backend("rs").unwrap().render_type(&expr), "Vec<i32>");

        let named = OutputTypeExpr::Named("Post".to_string());
        assert_eq!(get_backend("ts").unwrap().render_type(&named), "Post");
        assert_eq!(get_backend("rs").unwrap().render_type(&named), "Post");
    }

    #[test]
    fn test_file_names_and_module_paths() {
        let ts = get_backend("ts").unwrap();
        assert_eq!(ts.file_name("types.enums.1"), "types.enums.1.ts");
        assert_eq!(ts.module_path("types.index"), "./types.index");

        let js = get_backend("js").unwrap();
        assert_eq!(js.file_name("types.models.2"), "types.models.2.js");
        assert_eq!(js.module_path("types.index"), "./types.index.js");
        assert_eq!(js.manifest_name(), None);

        let rs = get_backend("rs").unwrap();
        assert_eq!(rs.file_name("types.enums.1"), "types_enums_1.rs");
        assert_eq!(rs.module_path("types.index"), "super::types_index");
        assert_eq!(rs.manifest_name(), Some("mod"));
        assert_eq!(rs.file_name("mod"), "mod.rs");
    }
}
