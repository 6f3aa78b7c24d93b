use std::path::PathBuf;

use atx_classfile::FormatError;
use atx_rules::RuleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Rule remapping failed: {0}")]
    Rule(#[from] RuleError),

    #[error("Malformed class entry {entry}: {source}")]
    Format {
        entry: String,
        #[source]
        source: FormatError,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Failed to start rewrite workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
