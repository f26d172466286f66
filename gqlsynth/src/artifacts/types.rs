//! Model and input declarations
//!
//! Both namespaces share one generator; the namespace selects the artifact
//! base name and template.

use super::{namespace_base, StageContext, StageOutcome};
use crate::backends::context::{FieldContext, TypeContext, TypesContext};
use crate::batch::{plan_output_files, split};
use crate::catalog::Namespace;
use crate::dependency::{declared_names, DependencyResolver};
use crate::error::GeneratorError;
use crate::ir::{FieldDescriptor, TypeDescriptor, TypeRef};

/// Template rendering a namespace's declarations
fn template(namespace: Namespace) -> &'static str {
    match namespace {
        Namespace::Inputs => "inputs",
        _ => "models",
    }
}

/// Generate the artifact(s) of the models or inputs namespace
pub fn generate(
    ctx: &StageContext<'_>,
    namespace: Namespace,
    types: &[&TypeDescriptor],
) -> Result<StageOutcome, GeneratorError> {
    if types.is_empty() {
        tracing::info!(namespace = namespace.as_str(), "no types defined, writing placeholder");
        return Ok(StageOutcome::Produced(vec![ctx.placeholder(namespace)?]));
    }

    let resolver = DependencyResolver::new(ctx.catalog);
    let template = template(namespace);

    let mut contents = Vec::new();
    for batch in split(types, ctx.options.batch_size()) {
        let own = declared_names(batch, ctx.options.enum_imports);
        let deps = resolver.collect(batch, &own);

        let context = TypesContext {
            imports: ctx.imports(deps),
            types: batch.iter().map(|ty| declaration(ctx, ty)).collect(),
            comments: ctx.options.generate_comments,
        };
        contents.push(ctx.render(template, &context)?);
    }

    tracing::info!(
        namespace = namespace.as_str(),
        count = types.len(),
        "generated declarations"
    );
    Ok(StageOutcome::Produced(plan_output_files(
        contents,
        namespace_base(namespace),
        ctx.backend,
    )?))
}

fn declaration(ctx: &StageContext<'_>, ty: &TypeDescriptor) -> TypeContext {
    TypeContext {
        name: ctx.catalog.canonical_name(&ty.name),
        schema_name: ty.name.clone(),
        fields: ty.fields.iter().map(|f| field(ctx, f)).collect(),
    }
}

fn field(ctx: &StageContext<'_>, field: &FieldDescriptor) -> FieldContext {
    let parsed = TypeRef::parse(&field.type_ref);
    FieldContext {
        name: field.name.clone(),
        type_expr: ctx.type_expr(&field.type_ref),
        graphql_type: field.type_ref.clone(),
        required: field.required || parsed.is_required(),
        nested: !parsed.is_list() && ctx.catalog.is_composite_type(parsed.base_name()),
    }
}
