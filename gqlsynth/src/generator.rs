//! Code generation orchestration
//!
//! This module runs the stages in their fixed order against one schema
//! snapshot, formats what they produce and writes it to the sink. Every
//! stage's writes complete before the next stage starts: the type index
//! checks the sink for the declaration artifacts written before it.

use crate::artifacts::{
    client, enums, fragments, namespace_base, operations, type_index, types, Artifact, Stage,
    StageContext, StageOutcome,
};
use crate::backends::context::ModulesContext;
use crate::backends::{context_value, Backend};
use crate::catalog::{Buckets, Namespace, TypeCatalog};
use crate::error::GeneratorError;
use crate::ir::SchemaSnapshot;
use crate::options::GeneratorOptions;
use crate::output::ArtifactSink;

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Artifact files written, in write order
    pub artifacts: Vec<String>,
    /// Stages that produced nothing
    pub skipped: Vec<String>,
}

/// Runs a full generation against one snapshot
pub struct Generator<'a> {
    catalog: TypeCatalog<'a>,
    options: GeneratorOptions,
    backend: &'a dyn Backend,
    sink: &'a mut dyn ArtifactSink,
}

impl<'a> Generator<'a> {
    pub fn new(
        snapshot: &'a SchemaSnapshot,
        options: GeneratorOptions,
        backend: &'a dyn Backend,
        sink: &'a mut dyn ArtifactSink,
    ) -> Self {
        Self {
            catalog: TypeCatalog::new(snapshot, &options.naming)
                .with_scalar_aliases(options.generate_index_file),
            options,
            backend,
            sink,
        }
    }

    /// Run every stage in order.
    ///
    /// The sink is cleared first. A failing stage aborts the run with a
    /// [`GeneratorError::Stage`] naming it; artifacts already written stay.
    pub fn run(&mut self) -> Result<RunReport, GeneratorError> {
        tracing::info!(backend = self.backend.name(), "starting generation");
        self.sink
            .clear_output_directory()
            .map_err(|e| e.in_stage("clear"))?;

        let ctx = StageContext {
            catalog: &self.catalog,
            options: &self.options,
            backend: self.backend,
        };
        let buckets = self.catalog.bucket();
        let mut report = RunReport::default();
        let mut written = Vec::new();

        for stage in Stage::ORDER {
            let outcome = match stage {
                Stage::Enums => enums::generate(&ctx, &buckets.enums),
                Stage::Models => types::generate(&ctx, Namespace::Models, &buckets.models),
                Stage::Inputs => types::generate(&ctx, Namespace::Inputs, &buckets.inputs),
                Stage::TypeIndex => {
                    let available = available_declarations(&buckets, self.backend, &*self.sink);
                    type_index::generate(&ctx, &available)
                }
                Stage::Fragments => fragments::generate(&ctx),
                Stage::Operations(kind) => operations::generate(&ctx, kind),
                Stage::Utils => client::generate_utils(&ctx),
                Stage::Client => client::generate_client(&ctx),
            }
            .map_err(|e| e.in_stage(stage.name()))?;

            match outcome {
                StageOutcome::Produced(artifacts) => {
                    for artifact in artifacts {
                        let file = emit(self.backend, &mut *self.sink, &artifact)
                            .map_err(|e| e.in_stage(stage.name()))?;
                        report.artifacts.push(file);
                        written.push(artifact.name);
                    }
                }
                StageOutcome::Skipped(reason) => {
                    tracing::info!(stage = stage.name(), artifact = stage.artifact_base(), %reason, "skipping stage");
                    report.skipped.push(stage.name().to_string());
                }
            }
        }

        if let Some(manifest) = self.backend.manifest_name() {
            let modules = ModulesContext {
                modules: written.iter().map(|a| self.backend.module_name(a)).collect(),
            };
            let file = context_value("module-manifest", &modules)
                .and_then(|value| self.backend.render("module-manifest", &value))
                .and_then(|content| {
                    emit(
                        self.backend,
                        &mut *self.sink,
                        &Artifact::new(manifest.to_string(), content),
                    )
                })
                .map_err(|e| e.in_stage("manifest"))?;
            report.artifacts.push(file);
        }

        tracing::info!(
            artifacts = report.artifacts.len(),
            skipped = report.skipped.len(),
            "generation complete"
        );
        Ok(report)
    }
}

/// Declaration artifacts the type index should re-export: those produced
/// from a non-empty namespace that exist on the sink
fn available_declarations(
    buckets: &Buckets<'_>,
    backend: &dyn Backend,
    sink: &dyn ArtifactSink,
) -> Vec<&'static str> {
    [
        (Namespace::Enums, buckets.enums.is_empty()),
        (Namespace::Models, buckets.models.is_empty()),
        (Namespace::Inputs, buckets.inputs.is_empty()),
    ]
    .into_iter()
    .filter(|(_, empty)| !empty)
    .map(|(namespace, _)| namespace_base(namespace))
    .filter(|base| sink.exists(&backend.file_name(base)))
    .collect()
}

/// Format and write one artifact, returning its file name
fn emit(
    backend: &dyn Backend,
    sink: &mut dyn ArtifactSink,
    artifact: &Artifact,
) -> Result<String, GeneratorError> {
    let text = match backend.format(&artifact.content) {
        Ok(formatted) => formatted,
        Err(e) => {
            tracing::warn!(artifact = %artifact.name, error = %e, "formatting failed, writing unformatted output");
            artifact.content.clone()
        }
    };

    let file = backend.file_name(&artifact.name);
    sink.write_artifact(&file, &text)?;
    Ok(file)
}
