//! Fragment registry
//!
//! Holds the explicitly requested fragments plus one automatic fragment for
//! every model wide enough to be worth reusing.

use super::{Artifact, StageContext, StageOutcome, FRAGMENTS};
use crate::backends::context::{FragmentContext, FragmentsContext};
use crate::error::GeneratorError;
use crate::ir::FragmentDescriptor;
use crate::selection::{render_selection, FieldSelectionSynthesizer};

/// Column of depth-zero selection lines inside a fragment body
const FRAGMENT_INDENT: usize = 2;

/// Fragments to generate: explicit ones first, then automatic ones for
/// models with more fields than the configured threshold
pub fn fragment_list(ctx: &StageContext<'_>) -> Vec<FragmentDescriptor> {
    let mut fragments = ctx.catalog.snapshot().fragments.clone();

    for model in ctx.catalog.bucket().models {
        if model.fields.len() <= ctx.options.fragment_field_threshold {
            continue;
        }
        let name = format!("{}Fragment", model.name);
        if fragments.iter().any(|f| f.name == name) {
            continue;
        }
        fragments.push(FragmentDescriptor {
            name,
            on_type: model.name.clone(),
        });
    }

    fragments
}

/// Generate the fragments artifact
pub fn generate(ctx: &StageContext<'_>) -> Result<StageOutcome, GeneratorError> {
    if !ctx.options.fragments_enabled {
        return Ok(StageOutcome::Skipped("fragment generation disabled".to_string()));
    }

    let synthesizer = FieldSelectionSynthesizer::new(ctx.catalog);
    let fragments: Vec<FragmentContext> = fragment_list(ctx)
        .into_iter()
        .map(|f| {
            let items =
                synthesizer.synthesize(&f.on_type, 0, ctx.options.max_field_selection_depth);
            FragmentContext {
                selection: render_selection(&items, FRAGMENT_INDENT),
                name: f.name,
                on_type: f.on_type,
            }
        })
        .collect();

    if fragments.is_empty() {
        tracing::info!("no fragments defined, writing empty registry");
    } else {
        tracing::info!(count = fragments.len(), "generated fragments");
    }

    let content = ctx.render("fragments", &FragmentsContext { fragments })?;
    Ok(StageOutcome::Produced(vec![Artifact::new(
        FRAGMENTS.to_string(),
        content,
    )]))
}
