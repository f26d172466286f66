//! Schema acquisition
//!
//! Reads a schema from disk and turns it into a [`SchemaSnapshot`]. SDL files
//! are parsed with `graphql-parser`; `.json` files already hold a snapshot.

use gqlsynth::ir::{
    FieldDescriptor, OperationDescriptor, OperationKind, TypeDescriptor, TypeOrigin,
};
use gqlsynth::{GeneratorError, SchemaSnapshot};
use graphql_parser::schema::{
    parse_schema, Definition, Field, InputValue, Type, TypeDefinition,
};
use std::path::Path;

/// Load a schema snapshot from `path`, dispatching on its extension
pub fn load_schema(path: &Path) -> Result<SchemaSnapshot, GeneratorError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| GeneratorError::Schema(format!("cannot read {}: {e}", path.display())))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => SchemaSnapshot::from_json(&text),
        _ => parse_sdl(&text),
    }
}

/// Root operation type names, from the schema definition or the
/// conventional names
struct Roots {
    query: String,
    mutation: String,
    subscription: String,
}

impl Roots {
    fn kind_of(&self, name: &str) -> Option<OperationKind> {
        if name == self.query {
            Some(OperationKind::Query)
        } else if name == self.mutation {
            Some(OperationKind::Mutation)
        } else if name == self.subscription {
            Some(OperationKind::Subscription)
        } else {
            None
        }
    }
}

/// Compact type reference (`[Post!]!`) of a parsed type
fn type_ref(ty: &Type<'_, String>) -> String {
    match ty {
        Type::NamedType(name) => name.clone(),
        Type::ListType(inner) => format!("[{}]", type_ref(inner)),
        Type::NonNullType(inner) => format!("{}!", type_ref(inner)),
    }
}

fn field(field: &Field<'_, String>) -> FieldDescriptor {
    FieldDescriptor::new(field.name.clone(), type_ref(&field.field_type))
}

fn input_value(value: &InputValue<'_, String>) -> FieldDescriptor {
    FieldDescriptor::new(value.name.clone(), type_ref(&value.value_type))
}

/// Parse SDL into a snapshot.
///
/// Object, interface, input, enum and scalar definitions are kept in schema
/// order. The fields of the root operation types become operations; the root
/// types themselves are tagged with their origin. Unions become field-less
/// object types.
pub fn parse_sdl(sdl: &str) -> Result<SchemaSnapshot, GeneratorError> {
    let document = parse_schema::<String>(sdl)
        .map_err(|e| GeneratorError::Schema(format!("invalid SDL: {e}")))?;

    let mut roots = Roots {
        query: "Query".to_string(),
        mutation: "Mutation".to_string(),
        subscription: "Subscription".to_string(),
    };
    for definition in &document.definitions {
        if let Definition::SchemaDefinition(schema) = definition {
            if let Some(query) = &schema.query {
                roots.query = query.clone();
            }
            if let Some(mutation) = &schema.mutation {
                roots.mutation = mutation.clone();
            }
            if let Some(subscription) = &schema.subscription {
                roots.subscription = subscription.clone();
            }
        }
    }

    let mut snapshot = SchemaSnapshot::default();
    for definition in &document.definitions {
        let Definition::TypeDefinition(ty) = definition else {
            continue;
        };

        match ty {
            TypeDefinition::Scalar(scalar) => snapshot.scalars.push(scalar.name.clone()),
            TypeDefinition::Enum(en) => {
                let values: Vec<&str> = en.values.iter().map(|v| v.name.as_str()).collect();
                snapshot.types.push(
                    TypeDescriptor::enumeration(en.name.clone(), &values)
                        .with_origin(TypeOrigin::Declared),
                );
            }
            TypeDefinition::InputObject(input) => snapshot.types.push(
                TypeDescriptor::input(input.name.clone(), input.fields.iter().map(input_value).collect())
                    .with_origin(TypeOrigin::Declared),
            ),
            TypeDefinition::Interface(iface) => snapshot.types.push(
                TypeDescriptor::object(iface.name.clone(), iface.fields.iter().map(field).collect())
                    .with_origin(TypeOrigin::Declared),
            ),
            TypeDefinition::Union(union) => snapshot.types.push(
                TypeDescriptor::object(union.name.clone(), Vec::new())
                    .with_origin(TypeOrigin::Declared),
            ),
            TypeDefinition::Object(obj) => match roots.kind_of(&obj.name) {
                Some(kind) => {
                    let operations = obj.fields.iter().map(|f| {
                        OperationDescriptor::new(
                            f.name.clone(),
                            kind,
                            type_ref(&f.field_type),
                            f.arguments.iter().map(input_value).collect(),
                        )
                    });
                    match kind {
                        OperationKind::Query => snapshot.queries.extend(operations),
                        OperationKind::Mutation => snapshot.mutations.extend(operations),
                        OperationKind::Subscription => snapshot.subscriptions.extend(operations),
                    }
                    snapshot.types.push(
                        TypeDescriptor::object(obj.name.clone(), obj.fields.iter().map(field).collect())
                            .with_origin(TypeOrigin::Root(kind)),
                    );
                }
                None => snapshot.types.push(
                    TypeDescriptor::object(obj.name.clone(), obj.fields.iter().map(field).collect())
                        .with_origin(TypeOrigin::Declared),
                ),
            },
        }
    }

    tracing::debug!(
        types = snapshot.types.len(),
        queries = snapshot.queries.len(),
        mutations = snapshot.mutations.len(),
        subscriptions = snapshot.subscriptions.len(),
        "parsed schema"
    );
    Ok(snapshot)
}
