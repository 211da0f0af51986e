use std::path::PathBuf;

use frametree_core::TreeError;
use thiserror::Error;

/// Failures surfaced by the `frametree` binary.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("unsupported snapshot format for {} (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("no snapshot given; pass --snapshot or set default_snapshot in the config")]
    NoSnapshot,

    #[error(transparent)]
    Tree(#[from] TreeError),
}
