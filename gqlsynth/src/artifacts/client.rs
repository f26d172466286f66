//! Request helpers and the aggregating client

use super::operations::client_names;
use super::{namespace_base, Artifact, StageContext, StageOutcome, CLIENT, UTILS};
use crate::backends::context::{ClientContext, ClientMember};
use crate::catalog::Namespace;
use crate::error::GeneratorError;
use crate::ir::OperationKind;
use serde_json::json;

/// Generate the retry/timeout helpers
pub fn generate_utils(ctx: &StageContext<'_>) -> Result<StageOutcome, GeneratorError> {
    if !ctx.options.generate_utils {
        return Ok(StageOutcome::Skipped("utils generation disabled".to_string()));
    }

    let content = ctx.backend.render("utils", &json!({}))?;
    tracing::info!("generated request helpers");
    Ok(StageOutcome::Produced(vec![Artifact::new(
        UTILS.to_string(),
        content,
    )]))
}

/// Members of the aggregating client: one per operation client, for every
/// operation kind that has operations
pub fn client_members(ctx: &StageContext<'_>) -> Vec<ClientMember> {
    let batch_size = ctx.options.batch_size();
    let mut members = Vec::new();

    for kind in OperationKind::ALL {
        let count = ctx.catalog.snapshot().operations(kind).len();
        let module = ctx
            .backend
            .module_path(namespace_base(Namespace::for_operation(kind)));
        for (field, client) in client_names(kind, count.div_ceil(batch_size)) {
            members.push(ClientMember {
                field,
                client,
                module: module.clone(),
            });
        }
    }

    members
}

/// Generate the aggregating client
pub fn generate_client(ctx: &StageContext<'_>) -> Result<StageOutcome, GeneratorError> {
    if !ctx.options.generate_client {
        return Ok(StageOutcome::Skipped("client generation disabled".to_string()));
    }

    let context = ClientContext {
        client_name: ctx.options.client_name.clone(),
        members: client_members(ctx),
        utils_module: ctx
            .options
            .generate_utils
            .then(|| ctx.backend.module_path(UTILS)),
    };
    let content = ctx.render("client", &context)?;

    tracing::info!(client = %context.client_name, members = context.members.len(), "generated client");
    Ok(StageOutcome::Produced(vec![Artifact::new(
        CLIENT.to_string(),
        content,
    )]))
}
