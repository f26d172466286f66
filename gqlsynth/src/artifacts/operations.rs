//! Operation clients
//!
//! One client per batch of operations of a kind, one method per operation.
//! Every method embeds the GraphQL document it sends; the document's field
//! selection comes from the [`FieldSelectionSynthesizer`].

use super::{namespace_base, StageContext, StageOutcome, UTILS};
use crate::backends::context::{ArgContext, MethodContext, OperationsContext};
use crate::batch::{plan_output_files, split};
use crate::catalog::Namespace;
use crate::dependency::DependencyResolver;
use crate::error::GeneratorError;
use crate::ir::{FieldDescriptor, OperationDescriptor, OperationKind, TypeRef};
use crate::selection::{render_selection, FieldSelectionSynthesizer};
use std::collections::HashSet;

/// Column of depth-zero selection lines inside an operation document
const DOCUMENT_INDENT: usize = 4;

/// Base client type name of an operation kind
fn client_base(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Query => "QueryClient",
        OperationKind::Mutation => "MutationClient",
        OperationKind::Subscription => "SubscriptionClient",
    }
}

/// `(member, client type)` names for `batches` clients of `kind`.
///
/// A single batch gets the plain names (`query`, `QueryClient`); several
/// batches are numbered (`query1`, `QueryClient1`, ...).
pub fn client_names(kind: OperationKind, batches: usize) -> Vec<(String, String)> {
    let member = kind.keyword();
    let client = client_base(kind);
    match batches {
        0 => Vec::new(),
        1 => vec![(member.to_string(), client.to_string())],
        n => (1..=n)
            .map(|i| (format!("{member}{i}"), format!("{client}{i}")))
            .collect(),
    }
}

/// Variable type of an argument: its reference, made non-null when the
/// argument is required but the reference does not say so
fn variable_type(arg: &FieldDescriptor) -> String {
    if arg.required && !TypeRef::parse(&arg.type_ref).is_required() {
        format!("{}!", arg.type_ref.trim())
    } else {
        arg.type_ref.trim().to_string()
    }
}

/// Build the GraphQL document of an operation
pub fn build_document(
    ctx: &StageContext<'_>,
    synthesizer: &FieldSelectionSynthesizer<'_>,
    op: &OperationDescriptor,
) -> String {
    let keyword = op.kind.keyword();
    let name = &op.name;

    let (variables, arguments) = if op.arguments.is_empty() {
        (String::new(), String::new())
    } else {
        let variables = op
            .arguments
            .iter()
            .map(|a| format!("${}: {}", a.name, variable_type(a)))
            .collect::<Vec<_>>()
            .join(", ");
        let arguments = op
            .arguments
            .iter()
            .map(|a| format!("{0}: ${0}", a.name))
            .collect::<Vec<_>>()
            .join(", ");
        (format!("({variables})"), format!("({arguments})"))
    };

    let return_base = TypeRef::parse(&op.return_type_ref).base_name().to_string();
    let body = if ctx.catalog.is_object_type(&return_base) {
        let items =
            synthesizer.synthesize(&op.return_type_ref, 0, ctx.options.max_field_selection_depth);
        format!(
            "  {name}{arguments} {{\n{}\n  }}",
            render_selection(&items, DOCUMENT_INDENT)
        )
    } else {
        format!("  {name}{arguments}")
    };

    format!("{keyword} {name}{variables} {{\n{body}\n}}")
}

fn method(
    ctx: &StageContext<'_>,
    synthesizer: &FieldSelectionSynthesizer<'_>,
    op: &OperationDescriptor,
) -> MethodContext {
    MethodContext {
        name: op.name.clone(),
        args: op
            .arguments
            .iter()
            .map(|a| ArgContext {
                name: a.name.clone(),
                type_expr: ctx.type_expr(&a.type_ref),
                required: a.required || TypeRef::parse(&a.type_ref).is_required(),
            })
            .collect(),
        return_type: ctx.type_expr(&op.return_type_ref),
        nullable: !TypeRef::parse(&op.return_type_ref).is_required(),
        document: build_document(ctx, synthesizer, op),
    }
}

/// Generate the client artifact(s) of one operation kind
pub fn generate(ctx: &StageContext<'_>, kind: OperationKind) -> Result<StageOutcome, GeneratorError> {
    let operations = ctx.catalog.snapshot().operations(kind);
    let namespace = Namespace::for_operation(kind);

    if operations.is_empty() {
        return Ok(StageOutcome::Skipped(format!(
            "no {} operations defined",
            kind.keyword()
        )));
    }

    let resolver = DependencyResolver::new(ctx.catalog);
    let synthesizer = FieldSelectionSynthesizer::new(ctx.catalog);
    let batches = split(operations, ctx.options.batch_size());
    let names = client_names(kind, batches.len());
    let utils_module = ctx
        .options
        .generate_utils
        .then(|| ctx.backend.module_path(UTILS));

    let mut contents = Vec::new();
    for (batch, (_, client_name)) in batches.into_iter().zip(names) {
        let context = OperationsContext {
            client_name,
            kind: kind.keyword().to_string(),
            imports: ctx.imports(resolver.collect(batch, &HashSet::new())),
            utils_module: utils_module.clone(),
            methods: batch.iter().map(|op| method(ctx, &synthesizer, op)).collect(),
        };
        contents.push(ctx.render("operations", &context)?);
    }

    tracing::info!(
        kind = kind.keyword(),
        count = operations.len(),
        "generated operations"
    );
    Ok(StageOutcome::Produced(plan_output_files(
        contents,
        namespace_base(namespace),
        ctx.backend,
    )?))
}
