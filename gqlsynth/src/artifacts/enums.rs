//! Enum declarations

use super::{namespace_base, StageContext, StageOutcome};
use crate::backends::context::{EnumContext, EnumsContext};
use crate::batch::{plan_output_files, split};
use crate::catalog::Namespace;
use crate::error::GeneratorError;
use crate::ir::TypeDescriptor;

/// Generate the enums artifact(s); an empty namespace gets a placeholder
pub fn generate(ctx: &StageContext<'_>, enums: &[&TypeDescriptor]) -> Result<StageOutcome, GeneratorError> {
    if enums.is_empty() {
        tracing::info!("no enum types defined, writing placeholder");
        return Ok(StageOutcome::Produced(vec![ctx.placeholder(Namespace::Enums)?]));
    }

    let contents = split(enums, ctx.options.batch_size())
        .into_iter()
        .map(|batch| {
            let context = EnumsContext {
                enums: batch
                    .iter()
                    .map(|e| EnumContext {
                        name: e.name.clone(),
                        values: e.enum_values.clone(),
                    })
                    .collect(),
                comments: ctx.options.generate_comments,
            };
            ctx.render("enums", &context)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(count = enums.len(), "generated enum types");
    Ok(StageOutcome::Produced(plan_output_files(
        contents,
        namespace_base(Namespace::Enums),
        ctx.backend,
    )?))
}
