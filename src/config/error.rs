//! Configuration error types.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Configuration loading error.
///
/// A missing `.env` file is never reported here; it only means the defaults
/// and the environment are used on their own.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: invalid syntax at position {position} in {content:?}", .path.display())]
    Parse {
        path: PathBuf,
        content: String,
        position: usize,
    },
    #[error("invalid value for {key}: {value:?} is not a valid {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}
