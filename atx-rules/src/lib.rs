//! Access transform rules: the data model, the flag computation, and the
//! translation of a rule set from one naming scheme into another.
//!
//! Rules are authored against source names. After the classes themselves
//! have been renamed, [`RuleRemapper`] re-keys the rules through a
//! [`NameMapping`] so they can be matched against the renamed binaries.

pub mod compute;
pub mod descriptor;
pub mod error;
pub mod mapping;
pub mod name;
pub mod policy;
pub mod remap;
pub mod store;
pub mod transform;

pub use compute::compute;
pub use error::{RuleError, RuleTarget};
pub use mapping::{NameMapping, NameMappingBuilder};
pub use name::{ClassName, MethodKey};
pub use policy::ConflictPolicy;
pub use remap::{RemapReport, Remapped, RuleRemapper, UnresolvedName, remap};
pub use store::{AccessRuleStore, AccessRuleStoreBuilder, ClassRuleSet};
pub use transform::{AccessChange, AccessTransform, FinalChange};
