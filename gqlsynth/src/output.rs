//! Artifact sinks
//!
//! Where generated artifacts are written. The orchestrator is the only
//! writer; a sink is cleared once at the start of a run.

use crate::error::GeneratorError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for generated artifacts
pub trait ArtifactSink {
    /// Remove everything a previous run wrote
    fn clear_output_directory(&mut self) -> Result<(), GeneratorError>;

    /// Write (or overwrite) the artifact file `name`
    fn write_artifact(&mut self, name: &str, text: &str) -> Result<(), GeneratorError>;

    /// Whether the artifact file `name` exists
    fn exists(&self, name: &str) -> bool;
}

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct FsSink {
    dir: PathBuf,
}

impl FsSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn io_error(path: &Path, source: std::io::Error) -> GeneratorError {
        GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ArtifactSink for FsSink {
    /// Removes the regular files at the top level of the directory (nested
    /// directories are left alone) and creates the directory if needed.
    fn clear_output_directory(&mut self) -> Result<(), GeneratorError> {
        if self.dir.is_dir() {
            let entries = fs::read_dir(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| Self::io_error(&self.dir, e))?;
                let path = entry.path();
                if path.is_file() {
                    fs::remove_file(&path).map_err(|e| Self::io_error(&path, e))?;
                }
            }
        }
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
        tracing::debug!(dir = %self.dir.display(), "cleared output directory");
        Ok(())
    }

    fn write_artifact(&mut self, name: &str, text: &str) -> Result<(), GeneratorError> {
        let path = self.dir.join(name);
        fs::write(&path, text).map_err(|e| Self::io_error(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "wrote artifact");
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.dir.join(name).is_file()
    }
}

/// Keeps artifacts in memory, ordered by name
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of artifact file `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// All artifact files
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }
}

impl ArtifactSink for MemorySink {
    fn clear_output_directory(&mut self) -> Result<(), GeneratorError> {
        self.files.clear();
        Ok(())
    }

    fn write_artifact(&mut self, name: &str, text: &str) -> Result<(), GeneratorError> {
        self.files.insert(name.to_string(), text.to_string());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }
}
