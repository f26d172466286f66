//! Field selection synthesis
//!
//! Walks the type graph from a type reference and produces the flat,
//! depth-annotated list of fields an operation or fragment should request.
//! Recursion is bounded two ways:
//! - a field whose type is the type being expanded is not followed
//! - nothing is expanded past the configured maximum depth; a type reached
//!   beyond it selects only `id`

use crate::catalog::TypeCatalog;
use crate::ir::{base_type_name, TypeRef};

/// Field selected when nothing better is known about a type
pub const FALLBACK_FIELD: &str = "id";

/// One line of a field selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Text of the line (`name`, `name {` or `}`)
    pub text: String,
    /// Nesting depth
    pub depth: usize,
    /// Opens a nested selection
    pub is_object_open: bool,
    /// Closes a nested selection
    pub is_object_close: bool,
}

impl SelectionItem {
    fn leaf(name: &str, depth: usize) -> Self {
        Self {
            text: name.to_string(),
            depth,
            is_object_open: false,
            is_object_close: false,
        }
    }

    fn open(name: &str, depth: usize) -> Self {
        Self {
            text: format!("{name} {{"),
            depth,
            is_object_open: true,
            is_object_close: false,
        }
    }

    fn close(depth: usize) -> Self {
        Self {
            text: "}".to_string(),
            depth,
            is_object_open: false,
            is_object_close: true,
        }
    }
}

/// Synthesizes field selections against a catalog
pub struct FieldSelectionSynthesizer<'c> {
    catalog: &'c TypeCatalog<'c>,
}

impl<'c> FieldSelectionSynthesizer<'c> {
    pub fn new(catalog: &'c TypeCatalog<'c>) -> Self {
        Self { catalog }
    }

    /// Synthesize the selection for `type_ref`, starting at `start_depth`.
    ///
    /// Never fails and never returns an empty list: unknown or field-less
    /// types select the fallback field.
    pub fn synthesize(&self, type_ref: &str, start_depth: usize, max_depth: usize) -> Vec<SelectionItem> {
        let mut items = Vec::new();
        let base = TypeRef::parse(type_ref).base_name().to_string();
        self.collect(&base, start_depth, max_depth, &mut items);
        items
    }

    fn collect(&self, base: &str, depth: usize, max_depth: usize, items: &mut Vec<SelectionItem>) {
        let fields = match self.catalog.lookup(base) {
            Some(ty) if !ty.fields.is_empty() && depth <= max_depth => &ty.fields,
            _ => {
                items.push(SelectionItem::leaf(FALLBACK_FIELD, depth));
                return;
            }
        };

        let start = items.len();
        for field in fields {
            let field_base = base_type_name(&field.type_ref);

            if !self.catalog.is_object_type(&field_base) {
                items.push(SelectionItem::leaf(&field.name, depth));
                continue;
            }

            // Direct self-reference: an object field cannot be selected bare
            if field_base == base {
                continue;
            }

            items.push(SelectionItem::open(&field.name, depth));
            self.collect(&field_base, depth + 1, max_depth, items);
            items.push(SelectionItem::close(depth));
        }

        // every field was a self-reference
        if items.len() == start {
            items.push(SelectionItem::leaf(FALLBACK_FIELD, depth));
        }
    }
}

/// Render selection items as indented lines.
///
/// `indent` is the column of depth zero; each level adds two spaces.
pub fn render_selection(items: &[SelectionItem], indent: usize) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", " ".repeat(indent + item.depth * 2), item.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FieldDescriptor, SchemaSnapshot, TypeDescriptor};
    use crate::options::NamingOptions;
    use std::collections::HashMap;

    fn catalog_of(types: Vec<TypeDescriptor>) -> SchemaSnapshot {
        SchemaSnapshot {
            types,
            ..Default::default()
        }
    }

    /// Every open has a later close at the same depth, and vice versa
    fn assert_balanced(items: &[SelectionItem]) {
        let mut stack = Vec::new();
        for item in items {
            if item.is_object_open {
                stack.push(item.depth);
            } else if item.is_object_close {
                assert_eq!(stack.pop(), Some(item.depth), "close without matching open");
            }
        }
        assert!(stack.is_empty(), "unclosed selection");

        let mut opens: HashMap<usize, usize> = HashMap::new();
        let mut closes: HashMap<usize, usize> = HashMap::new();
        for item in items {
            if item.is_object_open {
                *opens.entry(item.depth).or_default() += 1;
            }
            if item.is_object_close {
                *closes.entry(item.depth).or_default() += 1;
            }
        }
        assert_eq!(opens, closes);
    }

    #[test]
    fn test_self_reference_terminates() {
        let snap = catalog_of(vec![TypeDescriptor::object(
            "Node",
            vec![
                FieldDescriptor::new("id", "ID!"),
                FieldDescriptor::new("parent", "Node"),
            ],
        )]);
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let items = FieldSelectionSynthesizer::new(&catalog).synthesize("Node", 0, 3);

        assert_eq!(items, vec![SelectionItem::leaf("id", 0)]);
    }

    #[test]
    fn test_only_self_references_select_fallback() {
        let snap = catalog_of(vec![TypeDescriptor::object(
            "Loop",
            vec![FieldDescriptor::new("next", "Loop!")],
        )]);
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let items = FieldSelectionSynthesizer::new(&catalog).synthesize("Loop", 1, 3);
        assert_eq!(items, vec![SelectionItem::leaf("id", 1)]);
    }

    #[test]
    fn test_indirect_cycle_is_bounded_by_depth() {
        let snap = catalog_of(vec![
            TypeDescriptor::object("A", vec![FieldDescriptor::new("b", "B")]),
            TypeDescriptor::object("B", vec![FieldDescriptor::new("a", "A")]),
        ]);
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let items = FieldSelectionSynthesizer::new(&catalog).synthesize("A", 0, 3);

        assert_balanced(&items);
        assert!(items.iter().filter(|i| i.is_object_open).all(|i| i.depth <= 3));
        assert!(items.iter().all(|i| i.depth <= 4));
        // b { a { b { a { id } } } }
        assert_eq!(items.len(), 9);
        assert_eq!(items[4], SelectionItem::leaf("id", 4));
    }

    #[test]
    fn test_nested_selection_shape() {
        let snap = catalog_of(vec![
            TypeDescriptor::enumeration("Status", &["ACTIVE"]),
            TypeDescriptor::object(
                "Post",
                vec![
                    FieldDescriptor::new("id", "ID!"),
                    FieldDescriptor::new("status", "Status"),
                    FieldDescriptor::new("author", "User!"),
                    FieldDescriptor::new("tags", "[String!]"),
                ],
            ),
            TypeDescriptor::object(
                "User",
                vec![
                    FieldDescriptor::new("id", "ID!"),
                    FieldDescriptor::new("name", "String"),
                ],
            ),
        ]);
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let items = FieldSelectionSynthesizer::new(&catalog).synthesize("[Post!]!", 0, 3);

        assert_balanced(&items);
        let rendered = render_selection(&items, 4);
        assert_eq!(
            rendered,
            "    id\n    status\n    author {\n      id\n      name\n    }\n    tags"
        );
    }

    #[test]
    fn test_unknown_and_scalar_types_fall_back() {
        let snap = catalog_of(vec![TypeDescriptor::enumeration("Status", &["ACTIVE"])]);
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let synth = FieldSelectionSynthesizer::new(&catalog);

        assert_eq!(synth.synthesize("Missing", 2, 3), vec![SelectionItem::leaf("id", 2)]);
        assert_eq!(synth.synthesize("Status", 0, 3), vec![SelectionItem::leaf("id", 0)]);
        assert_eq!(synth.synthesize("String!", 0, 3), vec![SelectionItem::leaf("id", 0)]);
    }

    #[test]
    fn test_start_depth_beyond_ceiling_falls_back() {
        let snap = catalog_of(vec![TypeDescriptor::object(
            "User",
            vec![FieldDescriptor::new("name", "String")],
        )]);
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let items = FieldSelectionSynthesizer::new(&catalog).synthesize("User", 4, 3);
        assert_eq!(items, vec![SelectionItem::leaf("id", 4)]);
    }

    #[test]
    fn test_every_type_in_a_dense_graph_is_balanced() {
        let snap = catalog_of(vec![
            TypeDescriptor::object(
                "A",
                vec![
                    FieldDescriptor::new("b", "B"),
                    FieldDescriptor::new("c", "[C!]!"),
                    FieldDescriptor::new("self", "A"),
                ],
            ),
            TypeDescriptor::object(
                "B",
                vec![FieldDescriptor::new("a", "A"), FieldDescriptor::new("c", "C")],
            ),
            TypeDescriptor::object(
                "C",
                vec![FieldDescriptor::new("x", "Int"), FieldDescriptor::new("a", "A!")],
            ),
        ]);
        let catalog = TypeCatalog::new(&snap, &NamingOptions::default());
        let synth = FieldSelectionSynthesizer::new(&catalog);
        for name in ["A", "B", "C"] {
            for max_depth in 0..4 {
                let items = synth.synthesize(name, 0, max_depth);
                assert!(!items.is_empty());
                assert_balanced(&items);
            }
        }
    }
}
