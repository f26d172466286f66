//! Artifact stages
//!
//! Each stage is a pure function of the catalog, the options and the backend
//! (plus whatever earlier stages decided, passed in explicitly). Stages
//! return artifacts; only the orchestrator writes them.

pub mod client;
pub mod enums;
pub mod fragments;
pub mod operations;
pub mod type_index;
pub mod types;

use crate::backends::context::{ImportContext, PlaceholderContext};
use crate::backends::{context_value, Backend};
use crate::catalog::{classify, Namespace, TypeCatalog};
use crate::dependency::DependencySet;
use crate::error::GeneratorError;
use crate::ir::OperationKind;
use crate::options::GeneratorOptions;
use std::collections::BTreeMap;

/// Artifact base name of the type index
pub const TYPE_INDEX: &str = "types.index";
/// Artifact base name of the fragments registry
pub const FRAGMENTS: &str = "fragments";
/// Artifact base name of the request helpers
pub const UTILS: &str = "utils";
/// Artifact base name of the aggregating client
pub const CLIENT: &str = "client";

/// One generated artifact, named by its base name (e.g. `types.models.2`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub content: String,
}

impl Artifact {
    pub fn new(name: String, content: String) -> Self {
        Self { name, content }
    }
}

/// Result of a stage
#[derive(Debug)]
pub enum StageOutcome {
    /// Artifacts to write, in order
    Produced(Vec<Artifact>),
    /// Nothing to write; the reason is logged
    Skipped(String),
}

/// A stage of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Enums,
    Models,
    Inputs,
    TypeIndex,
    Fragments,
    Operations(OperationKind),
    Utils,
    Client,
}

impl Stage {
    /// Stages in run order
    pub const ORDER: [Stage; 10] = [
        Stage::Enums,
        Stage::Models,
        Stage::Inputs,
        Stage::TypeIndex,
        Stage::Fragments,
        Stage::Operations(OperationKind::Query),
        Stage::Operations(OperationKind::Mutation),
        Stage::Operations(OperationKind::Subscription),
        Stage::Utils,
        Stage::Client,
    ];

    /// Stage name used in logs and errors
    pub fn name(self) -> &'static str {
        match self {
            Stage::Enums => "enums",
            Stage::Models => "models",
            Stage::Inputs => "inputs",
            Stage::TypeIndex => "type-index",
            Stage::Fragments => "fragments",
            Stage::Operations(kind) => Namespace::for_operation(kind).as_str(),
            Stage::Utils => "utils",
            Stage::Client => "client",
        }
    }

    /// Artifact base name the stage writes
    pub fn artifact_base(self) -> &'static str {
        match self {
            Stage::Enums => namespace_base(Namespace::Enums),
            Stage::Models => namespace_base(Namespace::Models),
            Stage::Inputs => namespace_base(Namespace::Inputs),
            Stage::TypeIndex => TYPE_INDEX,
            Stage::Fragments => FRAGMENTS,
            Stage::Operations(kind) => namespace_base(Namespace::for_operation(kind)),
            Stage::Utils => UTILS,
            Stage::Client => CLIENT,
        }
    }
}

/// Artifact base name of a namespace
pub fn namespace_base(namespace: Namespace) -> &'static str {
    match namespace {
        Namespace::Enums => "types.enums",
        Namespace::Models => "types.models",
        Namespace::Inputs => "types.inputs",
        Namespace::Queries => "queries",
        Namespace::Mutations => "mutations",
        Namespace::Subscriptions => "subscriptions",
    }
}

/// What every stage reads
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub catalog: &'a TypeCatalog<'a>,
    pub options: &'a GeneratorOptions,
    pub backend: &'a dyn Backend,
}

impl<'a> StageContext<'a> {
    /// Render `template` with a serializable context
    pub fn render<T: serde::Serialize>(&self, template: &str, ctx: &T) -> Result<String, GeneratorError> {
        self.backend.render(template, &context_value(template, ctx)?)
    }

    /// Placeholder artifact for an empty namespace
    pub fn placeholder(&self, namespace: Namespace) -> Result<Artifact, GeneratorError> {
        let ctx = PlaceholderContext {
            message: format!("No {} types defined", namespace.as_str()),
        };
        Ok(Artifact::new(
            namespace_base(namespace).to_string(),
            self.render("placeholder", &ctx)?,
        ))
    }

    /// Imports of `deps`, one per source module.
    ///
    /// With the type index enabled every name comes from the index. Without
    /// it each name comes from the declaration artifact of its namespace;
    /// names no artifact declares are left out.
    pub fn imports(&self, deps: DependencySet) -> Vec<ImportContext> {
        if deps.is_empty() {
            return Vec::new();
        }
        if self.options.generate_index_file {
            return vec![ImportContext {
                module: self.backend.module_path(TYPE_INDEX),
                names: deps.into_iter().collect(),
            }];
        }

        let mut by_module: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for name in deps {
            match self.catalog.lookup_canonical(&name).map(classify) {
                Some(namespace @ (Namespace::Enums | Namespace::Models | Namespace::Inputs)) => {
                    by_module.entry(namespace_base(namespace)).or_default().push(name);
                }
                _ => tracing::debug!(%name, "no declaration artifact, not imported"),
            }
        }
        by_module
            .into_iter()
            .map(|(base, names)| ImportContext {
                module: self.backend.module_path(base),
                names,
            })
            .collect()
    }

    /// Rendered type for a compact type reference, without optionality
    pub fn type_expr(&self, type_ref: &str) -> String {
        self.backend.render_type(&self.catalog.convert_type_ref(type_ref))
    }
}
