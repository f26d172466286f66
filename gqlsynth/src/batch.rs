//! Batch planning
//!
//! Large namespaces are split into bounded, order-preserving batches. When a
//! namespace needs more than one batch, its artifacts are numbered and an
//! index artifact re-exports them, so consumers can always import the base
//! name:
//! - one batch: `base`
//! - several: `base.1` .. `base.N`, `base.index` re-exporting each, and
//!   `base` re-exporting `base.index`

use crate::artifacts::Artifact;
use crate::backends::context::{ModulesContext, ReexportContext};
use crate::backends::{context_value, Backend};
use crate::error::GeneratorError;

/// Split `items` into contiguous batches of at most `batch_size` items.
///
/// A batch size of zero is treated as one. An empty input yields no batches.
pub fn split<T>(items: &[T], batch_size: usize) -> Vec<&[T]> {
    items.chunks(batch_size.max(1)).collect()
}

/// Artifact names for `count` batches of `base`
pub fn batch_names(base: &str, count: usize) -> Vec<String> {
    match count {
        0 => Vec::new(),
        1 => vec![base.to_string()],
        n => (1..=n).map(|i| format!("{base}.{i}")).collect(),
    }
}

/// Name of the index artifact of a split namespace
pub fn index_name(base: &str) -> String {
    format!("{base}.index")
}

/// Lay out rendered batch contents as artifacts.
///
/// `contents` holds one rendered artifact per batch, in batch order.
pub fn plan_output_files(
    contents: Vec<String>,
    base: &str,
    backend: &dyn Backend,
) -> Result<Vec<Artifact>, GeneratorError> {
    let names = batch_names(base, contents.len());
    let mut artifacts: Vec<Artifact> = names
        .iter()
        .zip(contents)
        .map(|(name, content)| Artifact::new(name.clone(), content))
        .collect();

    if artifacts.len() > 1 {
        let index = index_name(base);
        let modules = ModulesContext {
            modules: names.iter().map(|n| backend.module_path(n)).collect(),
        };
        let index_content = backend.render("batch-index", &context_value("batch-index", &modules)?)?;

        let reexport = ReexportContext {
            module: backend.module_path(&index),
        };
        let base_content = backend.render("reexport", &context_value("reexport", &reexport)?)?;

        tracing::debug!(base, batches = artifacts.len(), "split into batches");
        artifacts.push(Artifact::new(index, index_content));
        artifacts.push(Artifact::new(base.to_string(), base_content));
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::get_backend;

    #[test]
    fn test_split_round_trip() {
        for len in 0..12 {
            let items: Vec<usize> = (0..len).collect();
            for n in 1..=13 {
                let batches = split(&items, n);
                assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= n));
                assert_eq!(batches.concat(), items, "len {len}, n {n}");
            }
        }
    }

    #[test]
    fn test_split_zero_batch_size() {
        assert_eq!(split(&[1, 2, 3], 0).len(), 3);
    }

    #[test]
    fn test_batch_names() {
        assert!(batch_names("queries", 0).is_empty());
        assert_eq!(batch_names("queries", 1), ["queries"]);
        assert_eq!(batch_names("queries", 3), ["queries.1", "queries.2", "queries.3"]);
    }

    #[test]
    fn test_single_batch_keeps_base_name() {
        let backend = get_backend("typescript").unwrap();
        let artifacts = plan_output_files(vec!["a".to_string()], "types.models", backend.as_ref()).unwrap();
        assert_eq!(artifacts, vec![Artifact::new("types.models".to_string(), "a".to_string())]);
    }

    #[test]
    fn test_multiple_batches_get_index() {
        let backend = get_backend("typescript").unwrap();
        let contents = vec!["a".to_string(), "b".to_string()];
        let artifacts = plan_output_files(contents, "queries", backend.as_ref()).unwrap();

        let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["queries.1", "queries.2", "queries.index", "queries"]);

        let index = &artifacts[2].content;
        let first = index.find("export * from './queries.1';").unwrap();
        let second = index.find("export * from './queries.2';").unwrap();
        assert!(first < second);
        assert!(artifacts[3].content.contains("export * from './queries.index';"));
    }

    #[test]
    fn test_multiple_batches_rust_paths() {
        let backend = get_backend("rust").unwrap();
        let contents = vec!["a".to_string(), "b".to_string()];
        let artifacts = plan_output_files(contents, "types.models", backend.as_ref()).unwrap();
        let index = backend.format(&artifacts[2].content).unwrap();
        assert!(index.contains("pub use super::types_models_1::*;"));
        assert!(index.contains("pub use super::types_models_2::*;"));
        let base = backend.format(&artifacts[3].content).unwrap();
        assert!(base.contains("pub use super::types_models_index::*;"));
    }
}
