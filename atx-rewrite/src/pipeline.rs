use atx_rules::{AccessRuleStore, NameMapping, RemapReport, RuleRemapper};

use crate::archive::{ArchiveEntry, ArchiveTransformDriver};
use crate::config::TransformConfig;
use crate::error::Result;

/// Output of [`apply_access_transforms`].
#[derive(Debug)]
pub struct TransformOutput {
    pub entries: Vec<ArchiveEntry>,
    /// Rule targets the mapping did not cover.
    pub report: RemapReport,
}

/// Remap `rules` into the namespace of `entries` through `mapping`, then
/// rewrite every class entry.
///
/// The remapped store is complete before any entry is touched, and it is
/// dropped when the pass ends.
pub fn apply_access_transforms(
    rules: &AccessRuleStore,
    mapping: &NameMapping,
    entries: Vec<ArchiveEntry>,
    config: &TransformConfig,
) -> Result<TransformOutput> {
    let remapped = RuleRemapper::new(mapping)
        .with_policy(config.conflict_policy)
        .remap(rules)?;

    let entries = ArchiveTransformDriver::new(&remapped.store)
        .threads(config.threads)
        .run(entries)?;

    Ok(TransformOutput {
        entries,
        report: remapped.report,
    })
}
