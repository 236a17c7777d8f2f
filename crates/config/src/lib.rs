//! Layered configuration for the wallshard pipeline.
//!
//! Sources are merged lowest-to-highest priority: built-in defaults, an
//! optional TOML file (explicit path or the platform config directory),
//! `WALLSHARD_*` environment variables, then command-line [`Overrides`].

pub mod error;

use crate::error::{ErrorKind, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wallshard_library::RetentionPolicy;

/// Environment variable prefix, e.g. `WALLSHARD_SHARD_CAPACITY=50`.
const ENV_PREFIX: &str = "WALLSHARD_";
/// File name looked up in the platform config directory when no explicit
/// config path is given.
const CONFIG_FILE: &str = "config.toml";

/// Fully-resolved run configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Root directory containing one subdirectory per source item.
    pub source: PathBuf,
    /// Root directory receiving shard directories.
    pub output: PathBuf,
    /// Explicit extractor binary path; `None` means discover on `$PATH`.
    pub extractor: Option<PathBuf>,
    /// Classified folders per shard directory.
    pub shard_capacity: u64,
    /// Materialize/filter worker count; zero means one per available CPU.
    pub workers: usize,
    /// Media retention policy.
    pub policy: RetentionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("Source"),
            output: PathBuf::from("output"),
            extractor: None,
            shard_capacity: 100,
            workers: 0,
            policy: RetentionPolicy::default(),
        }
    }
}

/// Command-line values layered over every other source. `None` fields are
/// skipped during serialization so they never mask lower layers.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractor: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_capacity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<RetentionPolicy>,
}

impl Config {
    /// Merge all configuration sources and validate the result.
    ///
    /// # Errors
    /// Returns [`Read`](ErrorKind::Read) when the merged sources fail to
    /// deserialize, or [`Invalid`](ErrorKind::Invalid) when a value is out
    /// of range.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match file {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                if let Some(path) = platform_config_file() {
                    tracing::debug!(path = %path.display(), "using platform configuration file");
                    figment = figment.merge(Toml::file(path));
                }
            },
        }
        let figment = figment.merge(Env::prefixed(ENV_PREFIX)).merge(Serialized::defaults(overrides));
        let config: Config = figment.extract().map_err(|e| ErrorKind::Read(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.shard_capacity == 0 {
            exn::bail!(ErrorKind::Invalid { field: "shard_capacity", reason: "must be at least 1" });
        }
        Ok(())
    }
}

fn platform_config_file() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "wallshard")?;
    let path = dirs.config_dir().join(CONFIG_FILE);
    path.exists().then_some(path)
}
