use std::path::Path;

use atx_rules::ConflictPolicy;
use serde::Deserialize;

use crate::error::{Result, TransformError};

/// Settings for one access transform run.
///
/// ```yaml
/// conflict-policy: most-permissive   # or last-wins, reject
/// threads: 4                         # omit to use the global rayon pool
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TransformConfig {
    /// How rules that collide on one target after remapping are reconciled.
    pub conflict_policy: ConflictPolicy,
    /// Worker count for the rewrite pass.
    pub threads: Option<usize>,
}

impl TransformConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TransformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}
