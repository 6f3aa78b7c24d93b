use serde::Deserialize;

use crate::error::{Result, RuleError, RuleTarget};
use crate::transform::AccessTransform;

/// How two different rules landing on the same target are reconciled.
///
/// Collisions happen when a rule source repeats a target, and after
/// remapping when two source names translate to the same target name.
/// Identical rules never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Keep the most visible access and the most permissive finality of both.
    #[default]
    MostPermissive,
    /// The rule registered last replaces the earlier one.
    LastWins,
    /// Fail with [`RuleError::Conflict`].
    Reject,
}

impl ConflictPolicy {
    pub fn resolve(
        self,
        target: impl FnOnce() -> RuleTarget,
        existing: AccessTransform,
        incoming: AccessTransform,
    ) -> Result<AccessTransform> {
        if existing == incoming {
            return Ok(existing);
        }
        match self {
            ConflictPolicy::MostPermissive => Ok(existing.most_permissive(incoming)),
            ConflictPolicy::LastWins => Ok(incoming),
            ConflictPolicy::Reject => Err(RuleError::Conflict {
                target: target(),
                existing,
                incoming,
            }),
        }
    }
}
