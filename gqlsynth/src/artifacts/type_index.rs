//! Type index
//!
//! Re-exports the declaration artifacts so that every other artifact can
//! import any type from one place, and aliases custom scalars.

use super::{Artifact, StageContext, StageOutcome, TYPE_INDEX};
use crate::backends::context::TypeIndexContext;
use crate::error::GeneratorError;

/// Generate the type index.
///
/// `available` lists the declaration artifacts (by base name) that were
/// produced from a non-empty namespace and exist on the output target.
pub fn generate(ctx: &StageContext<'_>, available: &[&str]) -> Result<StageOutcome, GeneratorError> {
    if !ctx.options.generate_index_file {
        return Ok(StageOutcome::Skipped("index file generation disabled".to_string()));
    }

    let context = TypeIndexContext {
        modules: available.iter().map(|a| ctx.backend.module_path(a)).collect(),
        scalars: ctx.catalog.snapshot().scalars.clone(),
    };
    let content = ctx.render("type-index", &context)?;

    tracing::info!(modules = available.len(), "generated type index");
    Ok(StageOutcome::Produced(vec![Artifact::new(
        TYPE_INDEX.to_string(),
        content,
    )]))
}
