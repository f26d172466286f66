//! gqlsynth
//!
//! Synthesizes typed GraphQL client artifacts from a schema snapshot:
//! - enum, model and input declarations, batched into several artifacts when large
//! - a type index re-exporting every declaration artifact
//! - reusable fragments and per-kind operation clients with embedded documents
//! - request helpers (retry, timeout) and one aggregating client
//!
//! Usage:
//!   let snapshot = SchemaSnapshot::from_json(&json)?;
//!   let backend = get_backend("typescript")?;
//!   let mut sink = FsSink::new("./generated");
//!   Generator::new(&snapshot, GeneratorOptions::default(), backend.as_ref(), &mut sink).run()?;

pub mod artifacts;
pub mod backends;
pub mod batch;
pub mod catalog;
pub mod dependency;
pub mod error;
pub mod generator;
pub mod ir;
pub mod options;
pub mod output;
pub mod selection;

pub use backends::{get_backend, Backend, BackendError};
pub use error::{FormatError, GeneratorError};
pub use generator::{Generator, RunReport};
pub use ir::SchemaSnapshot;
pub use options::GeneratorOptions;
pub use output::{ArtifactSink, FsSink, MemorySink};
