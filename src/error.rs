use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating a `GameConfig`.
///
/// The simulation itself has no error path: out-of-bounds reads are walls,
/// unknown enemy kinds fall back, and generation degrades instead of failing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
