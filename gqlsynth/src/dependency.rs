//! Dependency resolution between artifacts
//!
//! Scans the descriptors that go into one artifact and collects the canonical
//! names the artifact must import from the type index. Built-in scalars and
//! names the artifact declares itself are never imported.

use crate::catalog::{is_custom_type, TypeCatalog};
use crate::ir::{OperationDescriptor, TypeDescriptor, TypeKind, TypeRef};
use crate::options::EnumImportPolicy;
use std::collections::{BTreeSet, HashSet};

/// Canonical type names one artifact imports, sorted
pub type DependencySet = BTreeSet<String>;

/// Anything that references other types
pub trait TypeReferences {
    /// Compact type references made by this descriptor
    fn type_refs(&self) -> Vec<&str>;
}

impl TypeReferences for TypeDescriptor {
    fn type_refs(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.type_ref.as_str()).collect()
    }
}

impl TypeReferences for OperationDescriptor {
    fn type_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = self.arguments.iter().map(|a| a.type_ref.as_str()).collect();
        refs.push(self.return_type_ref.as_str());
        refs
    }
}

impl<T: TypeReferences + ?Sized> TypeReferences for &T {
    fn type_refs(&self) -> Vec<&str> {
        (**self).type_refs()
    }
}

/// Names a batch of type descriptors declares locally
pub fn declared_names<'d>(
    batch: &[&'d TypeDescriptor],
    policy: EnumImportPolicy,
) -> HashSet<&'d str> {
    batch
        .iter()
        .filter(|t| policy == EnumImportPolicy::UnlessBatched || t.kind != TypeKind::Enum)
        .map(|t| t.name.as_str())
        .collect()
}

/// Collects import sets against a catalog
pub struct DependencyResolver<'c> {
    catalog: &'c TypeCatalog<'c>,
}

impl<'c> DependencyResolver<'c> {
    pub fn new(catalog: &'c TypeCatalog<'c>) -> Self {
        Self { catalog }
    }

    /// Collect the imports needed by `descriptors`, excluding `own_names`
    /// (schema names declared by the same artifact).
    pub fn collect<D: TypeReferences>(
        &self,
        descriptors: &[D],
        own_names: &HashSet<&str>,
    ) -> DependencySet {
        let mut deps = DependencySet::new();

        for descriptor in descriptors {
            for type_ref in descriptor.type_refs() {
                let parsed = TypeRef::parse(type_ref);
                let base = parsed.base_name();

                if base.is_empty()
                    || !is_custom_type(type_ref)
                    || own_names.contains(base)
                    || self.catalog.inlines_scalar(base)
                {
                    continue;
                }

                deps.insert(self.catalog.canonical_name(base));
            }
        }

        deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FieldDescriptor, OperationKind, SchemaSnapshot};
    use crate::options::{Affix, NamingOptions};

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot {
            types: vec![
                TypeDescriptor::object("Foo", vec![FieldDescriptor::new("bar", "Bar")]),
                TypeDescriptor::object("Bar", vec![FieldDescriptor::new("name", "String")]),
                TypeDescriptor::enumeration("Status", &["ON", "OFF"]),
                TypeDescriptor::object(
                    "Item",
                    vec![
                        FieldDescriptor::new("status", "Status!"),
                        FieldDescriptor::new("children", "[Item!]"),
                    ],
                ),
                TypeDescriptor::input("ItemInput", vec![FieldDescriptor::new("id", "ID!")]),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_locally_declared_types_are_not_imported() {
        let snap = snapshot();
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let resolver = DependencyResolver::new(&catalog);

        let foo = catalog.lookup("Foo").unwrap();
        let bar = catalog.lookup("Bar").unwrap();

        let both = [foo, bar];
        let deps = resolver.collect(&both, &declared_names(&both, EnumImportPolicy::Always));
        assert!(deps.is_empty());

        let only_foo = [foo];
        let deps = resolver.collect(&only_foo, &declared_names(&only_foo, EnumImportPolicy::Always));
        assert_eq!(deps.into_iter().collect::<Vec<_>>(), ["Bar"]);
    }

    #[test]
    fn test_self_reference_is_not_imported() {
        let snap = snapshot();
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let resolver = DependencyResolver::new(&catalog);

        let item = [catalog.lookup("Item").unwrap()];
        let deps = resolver.collect(&item, &declared_names(&item, EnumImportPolicy::Always));
        assert_eq!(deps.into_iter().collect::<Vec<_>>(), ["Status"]);
    }

    #[test]
    fn test_enum_import_policy_for_shared_batch() {
        let snap = snapshot();
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let resolver = DependencyResolver::new(&catalog);
        let batch = [catalog.lookup("Item").unwrap(), catalog.lookup("Status").unwrap()];

        let always = declared_names(&batch, EnumImportPolicy::Always);
        assert!(!always.contains("Status"));
        assert!(resolver.collect(&batch, &always).contains("Status"));

        let unless = declared_names(&batch, EnumImportPolicy::UnlessBatched);
        let deps = resolver.collect(&batch, &unless);
        assert!(deps.is_empty());
        // never a self-import, whatever the policy
        for own in &unless {
            assert!(!deps.contains(*own));
        }
    }

    #[test]
    fn test_operations_use_canonical_names() {
        let snap = snapshot();
        let naming = NamingOptions {
            models: Affix {
                prefix: String::new(),
                suffix: "Model".to_string(),
            },
            inputs: Affix::default(),
        };
        let catalog = TypeCatalog::new(&snap, &naming);
        let resolver = DependencyResolver::new(&catalog);

        let ops = vec![
            OperationDescriptor::new(
                "saveItem",
                OperationKind::Mutation,
                "Item!",
                vec![FieldDescriptor::new("input", "ItemInput!")],
            ),
            OperationDescriptor::new("ping", OperationKind::Query, "Boolean", vec![]),
            OperationDescriptor::new(
                "byStatus",
                OperationKind::Query,
                "[Item]",
                vec![FieldDescriptor::new("status", "Status")],
            ),
        ];
        let deps = resolver.collect(&ops, &HashSet::new());
        assert_eq!(
            deps.into_iter().collect::<Vec<_>>(),
            ["ItemInput", "ItemModel", "Status"]
        );
    }
}
