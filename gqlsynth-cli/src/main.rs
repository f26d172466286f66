//! gqlsynth: generate a typed GraphQL client from a schema
//!
//! Usage:
//!   gqlsynth schema.graphql --out ./src/generated
//!   gqlsynth schema.json --out ./src/api --language rust --config gqlsynth.toml

use clap::Parser;
use gqlsynth::{get_backend, FsSink, Generator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod parser;

#[derive(Parser, Debug)]
#[command(name = "gqlsynth")]
#[command(about = "Generate a typed GraphQL client from a schema")]
struct Args {
    /// Schema file (SDL, or a JSON snapshot with a .json extension)
    schema: PathBuf,

    /// Output directory (cleared before generation)
    #[arg(short, long)]
    out: PathBuf,

    /// Output language (typescript, javascript or rust)
    #[arg(short, long, default_value = "typescript")]
    language: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum nesting depth of field selections
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum types or operations per artifact
    #[arg(long)]
    batch_size: Option<usize>,

    /// Skip the fragments artifact
    #[arg(long)]
    no_fragments: bool,

    /// Skip the retry/timeout helpers
    #[arg(long)]
    no_utils: bool,

    /// Skip the aggregating client
    #[arg(long)]
    no_client: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            max_depth: self.max_depth,
            batch_size: self.batch_size,
            no_fragments: self.no_fragments,
            no_utils: self.no_utils,
            no_client: self.no_client,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let directive = if args.verbose {
        "gqlsynth=debug"
    } else {
        "gqlsynth=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let options = config::apply_overrides(
        config::load_options(args.config.as_deref())?,
        &args.overrides(),
    );
    let backend = get_backend(&args.language)?;

    // Schema problems abort before the output directory is touched
    let snapshot = parser::load_schema(&args.schema)?;

    let mut sink = FsSink::new(&args.out);
    let report = Generator::new(&snapshot, options, backend.as_ref(), &mut sink).run()?;

    tracing::info!(
        out = %args.out.display(),
        artifacts = report.artifacts.len(),
        "wrote client"
    );
    for artifact in &report.artifacts {
        tracing::debug!(%artifact, "artifact");
    }

    Ok(())
}
