use thiserror::Error;

use crate::name::{ClassName, MethodKey};
use crate::transform::AccessTransform;

/// The slot a rule occupies in an [`AccessRuleStore`](crate::AccessRuleStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    Class(ClassName),
    AllFields(ClassName),
    AllMethods(ClassName),
    Field(ClassName, String),
    Method(ClassName, MethodKey),
}

impl std::fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleTarget::Class(class) => write!(f, "{class}"),
            RuleTarget::AllFields(class) => write!(f, "{class} *"),
            RuleTarget::AllMethods(class) => write!(f, "{class} *()"),
            RuleTarget::Field(class, field) => write!(f, "{class} {field}"),
            RuleTarget::Method(class, method) => write!(f, "{class} {method}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Conflicting rules for {target}: {existing} vs {incoming}")]
    Conflict {
        target: RuleTarget,
        existing: AccessTransform,
        incoming: AccessTransform,
    },

    #[error("Malformed descriptor {descriptor:?} at index {index}")]
    MalformedDescriptor { descriptor: String, index: usize },
}

pub type Result<T> = std::result::Result<T, RuleError>;
