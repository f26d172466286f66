//! Configuration loading
//!
//! Generator options come from an optional TOML file; command-line flags are
//! applied on top.

use gqlsynth::GeneratorOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Flag values that override the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub max_depth: Option<usize>,
    pub batch_size: Option<usize>,
    pub no_fragments: bool,
    pub no_utils: bool,
    pub no_client: bool,
}

/// Parse options from TOML text
pub fn parse_options(text: &str, path: &Path) -> Result<GeneratorOptions, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load options from `path`, or the defaults when no file is given
pub fn load_options(path: Option<&Path>) -> Result<GeneratorOptions, ConfigError> {
    let Some(path) = path else {
        return Ok(GeneratorOptions::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let options = parse_options(&text, path)?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(options)
}

/// Apply flag overrides to loaded options
pub fn apply_overrides(mut options: GeneratorOptions, overrides: &Overrides) -> GeneratorOptions {
    if let Some(depth) = overrides.max_depth {
        options.max_field_selection_depth = depth;
    }
    if let Some(size) = overrides.batch_size {
        options.max_items_per_artifact = size;
    }
    if overrides.no_fragments {
        options.fragments_enabled = false;
    }
    if overrides.no_utils {
        options.generate_utils = false;
    }
    if overrides.no_client {
        options.generate_client = false;
    }
    options
}
