//! Error types for artifact synthesis
//!
//! This module contains error types used across all stages of a generation run.

use std::path::PathBuf;

/// Error type for a generation run
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The schema snapshot is missing, unreadable or malformed
    #[error("schema error: {0}")]
    Schema(String),

    /// A backend was asked for a template it does not provide
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// A template rejected its context
    #[error("render error in template `{template}`: {message}")]
    Render {
        /// Template name
        template: String,
        /// What went wrong
        message: String,
    },

    /// Writing or clearing the output target failed
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        /// Path being written or cleared
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A stage of the run failed; wraps the root cause
    #[error("stage `{stage}` failed: {source}")]
    Stage {
        /// Stage name (e.g. "enums", "queries")
        stage: &'static str,
        /// Root cause
        #[source]
        source: Box<GeneratorError>,
    },
}

impl GeneratorError {
    /// Wrap this error with the name of the stage that raised it
    pub fn in_stage(self, stage: &'static str) -> Self {
        match self {
            // Already attributed to a stage; keep the innermost attribution
            GeneratorError::Stage { .. } => self,
            other => GeneratorError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Build a render error for `template`
    pub fn render(template: &str, message: impl Into<String>) -> Self {
        GeneratorError::Render {
            template: template.to_string(),
            message: message.into(),
        }
    }
}

/// Error raised by a formatter. Never fatal: callers fall back to the raw text.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The text could not be parsed by the language formatter
    #[error("parse error: {0}")]
    Parse(String),

    /// Opening and closing delimiters do not pair up
    #[error("unbalanced delimiters: {open} opened, {close} closed")]
    Unbalanced {
        /// Number of opening delimiters seen
        open: usize,
        /// Number of closing delimiters seen
        close: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_stage_wraps_once() {
        let err = GeneratorError::TemplateNotFound("enums".to_string())
            .in_stage("enums")
            .in_stage("run");
        match err {
            GeneratorError::Stage { stage, source } => {
                assert_eq!(stage, "enums");
                assert!(matches!(*source, GeneratorError::TemplateNotFound(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_stage_message_names_root_cause() {
        let err = GeneratorError::render("models", "missing field `types`").in_stage("models");
        let message = err.to_string();
        assert!(message.contains("models"));
        assert!(message.contains("missing field `types`"));
    }
}
