//! Generator options
//!
//! Everything a run can be configured with. The CLI deserializes these from a
//! TOML file and then applies flag overrides; library callers build them
//! directly.

use serde::{Deserialize, Serialize};

/// Prefix/suffix applied to a declared type name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Affix {
    pub prefix: String,
    pub suffix: String,
}

impl Affix {
    /// Apply the affix to `name`
    pub fn apply(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }
}

/// Naming rules per namespace. Enums and scalars always keep their bare name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingOptions {
    /// Applied to object (model) types
    pub models: Affix,
    /// Applied to input types
    pub inputs: Affix,
}

/// How enum references are treated when the enum's descriptor is part of the
/// batch being scanned for dependencies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumImportPolicy {
    /// Import the enum: only names the artifact declares count as local
    #[default]
    Always,
    /// Treat enums present in the batch as local
    UnlessBatched,
}

/// Options for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorOptions {
    /// Type naming rules
    pub naming: NamingOptions,

    /// Maximum descriptors per artifact before splitting into batches
    pub max_items_per_artifact: usize,

    /// Maximum nesting depth of synthesized field selections
    pub max_field_selection_depth: usize,

    /// Generate the fragments artifact
    pub fragments_enabled: bool,

    /// Model types with more fields than this get an automatic fragment
    pub fragment_field_threshold: usize,

    /// Generate the retry/timeout helpers
    pub generate_utils: bool,

    /// Generate the aggregating client
    pub generate_client: bool,

    /// Generate the type index
    pub generate_index_file: bool,

    /// Emit doc comments in generated declarations
    pub generate_comments: bool,

    /// Enum handling during dependency resolution
    pub enum_imports: EnumImportPolicy,

    /// Name of the aggregating client type
    pub client_name: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            naming: NamingOptions::default(),
            max_items_per_artifact: 20,
            max_field_selection_depth: 3,
            fragments_enabled: true,
            fragment_field_threshold: 50,
            generate_utils: true,
            generate_client: true,
            generate_index_file: true,
            generate_comments: true,
            enum_imports: EnumImportPolicy::default(),
            client_name: "GraphQLApiClient".to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Batch size with the lower bound of one item applied
    pub fn batch_size(&self) -> usize {
        self.max_items_per_artifact.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = GeneratorOptions::default();
        assert_eq!(opts.max_items_per_artifact, 20);
        assert_eq!(opts.max_field_selection_depth, 3);
        assert!(opts.fragments_enabled);
        assert!(opts.generate_utils && opts.generate_client && opts.generate_index_file);
        assert_eq!(opts.enum_imports, EnumImportPolicy::Always);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let opts: GeneratorOptions = serde_json::from_str(
            r#"{"max-items-per-artifact": 5, "naming": {"models": {"suffix": "Model"}},
                "enum-imports": "unless-batched"}"#,
        )
        .unwrap();
        assert_eq!(opts.max_items_per_artifact, 5);
        assert_eq!(opts.naming.models.apply("Post"), "PostModel");
        assert_eq!(opts.naming.inputs.apply("PostInput"), "PostInput");
        assert_eq!(opts.enum_imports, EnumImportPolicy::UnlessBatched);
        assert_eq!(opts.max_field_selection_depth, 3);
    }

    #[test]
    fn test_batch_size_lower_bound() {
        let opts = GeneratorOptions {
            max_items_per_artifact: 0,
            ..Default::default()
        };
        assert_eq!(opts.batch_size(), 1);
    }
}
