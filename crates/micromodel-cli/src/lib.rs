//! Micromodel generator front end.
//!
//! Reads a JSON [`SynthesisConfig`], applies environment overrides, runs
//! synthesis and encodes the result as [`NetworkArrays`] JSON.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use micromodel_lattice::NetworkArrays;
use micromodel_synthesis::{GeneratedNetwork, SynthesisConfig, SynthesisError};
use thiserror::Error;

/// Environment variable that overrides the configured seed.
pub const SEED_ENV: &str = "MICROMODEL_SEED";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "micromodel=info";

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("MICROMODEL_SEED must be an unsigned integer, got {0:?}")]
    InvalidSeed(String),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("failed to encode network: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

/// Positional arguments: `[CONFIG.json] [OUTPUT.json]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Invocation {
    /// Parse arguments after the program name. `None` asks for usage.
    pub fn parse(args: &[String]) -> Option<Self> {
        if args.len() > 2 || wants_help(args) {
            return None;
        }
        Some(Self {
            config: args.first().map(PathBuf::from),
            output: args.get(1).map(PathBuf::from),
        })
    }
}

/// Whether usage was asked for explicitly.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "-h" || a == "--help")
}

/// Read a configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SynthesisConfig> {
    let Some(path) = path else {
        return Ok(SynthesisConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the seed with `value` when the override is set.
pub fn apply_seed_override(mut config: SynthesisConfig, value: Option<&str>) -> Result<SynthesisConfig> {
    if let Some(raw) = value {
        config.seed = raw
            .trim()
            .parse()
            .map_err(|_| CliError::InvalidSeed(raw.to_string()))?;
    }
    Ok(config)
}

pub fn encode(arrays: &NetworkArrays) -> Result<String> {
    Ok(serde_json::to_string_pretty(arrays)?)
}

/// Human-readable run summary.
pub fn summary(generated: &GeneratedNetwork) -> String {
    let report = generated.report();
    let stats = &report.stats;
    let mut out = String::new();

    let _ = writeln!(out, "Pores:              {}", stats.pores);
    let _ = writeln!(out, "Throats:            {}", stats.throats);
    let _ = writeln!(out, "Mean coordination:  {:.3}", stats.mean_coordination);
    if stats.pores_trimmed > 0 {
        let _ = writeln!(out, "Trimmed pores:      {}", stats.pores_trimmed);
    }
    if stats.throats_reduced > 0 {
        let _ = writeln!(out, "Reduced throats:    {}", stats.throats_reduced);
    }
    if generated.channel().is_some() {
        let _ = writeln!(out, "Channel length:     {}", stats.channel_length);
    }
    let _ = writeln!(out, "Warnings:           {}", report.warnings.len());
    out
}
