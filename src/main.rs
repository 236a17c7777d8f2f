//! Command-line entry point.
//!
//! Thin glue only: argument parsing, configuration merging, logging setup,
//! and summary rendering. All pipeline behaviour lives in
//! `wallshard-library`.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wallshard_config::{Config, Overrides};
use wallshard_extract::{ExtractorHandle, RePkg};
use wallshard_library::{Pipeline, RetentionPolicy};

#[derive(Parser)]
#[command(name = "wallshard", version, about = "Normalize, filter, and shard wallpaper asset folders")]
struct Args {
    /// Root directory containing one subdirectory per wallpaper item
    source: Option<PathBuf>,
    /// Output root that will receive the numbered shard directories
    output: Option<PathBuf>,
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Explicit path to the RePKG binary (default: discover on $PATH)
    #[arg(long)]
    extractor: Option<PathBuf>,
    /// Classified folders per shard directory
    #[arg(long)]
    capacity: Option<u64>,
    /// Materialize/filter worker count (0 = one per CPU)
    #[arg(long)]
    workers: Option<usize>,
    /// Media retention policy
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Simple,
    Strict,
}

impl From<PolicyArg> for RetentionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Simple => Self::Simple,
            PolicyArg::Strict => Self::Strict,
        }
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let overrides = Overrides {
        source: args.source,
        output: args.output,
        extractor: args.extractor,
        shard_capacity: args.capacity,
        workers: args.workers,
        policy: args.policy.map(RetentionPolicy::from),
    };
    let config = Config::load(args.config.as_deref(), overrides).map_err(|e| miette::miette!("{e:?}"))?;

    let extractor: ExtractorHandle = match &config.extractor {
        Some(path) => Arc::new(RePkg::new(path)),
        None => match RePkg::locate() {
            Ok(repkg) => Arc::new(repkg),
            Err(e) => {
                // Items without archives don't need the binary at all, so
                // degrade to a spawn-time failure instead of refusing to run.
                tracing::warn!(error = ?e, "RePKG not found; archive-backed items will be skipped");
                Arc::new(RePkg::new("RePKG"))
            },
        },
    };

    let pipeline = Pipeline::new(extractor, config.policy, config.shard_capacity, config.workers);
    let summary = pipeline
        .run(&config.source, &config.output)
        .await
        .map_err(|e| miette::miette!("{e:?}"))?;

    println!(
        "{} items: {} retained ({} video, {} selected, {} group), {} skipped",
        summary.items, summary.survived, summary.video, summary.selected, summary.group, summary.skipped
    );
    Ok(())
}
