//! Translation of a rule store from the source namespace into the target one.

use std::fmt;

use crate::error::{Result, RuleTarget};
use crate::mapping::NameMapping;
use crate::name::{ClassName, MethodKey};
use crate::policy::ConflictPolicy;
use crate::store::{AccessRuleStore, AccessRuleStoreBuilder};

/// A rule target the mapping did not cover. The rule is kept under its
/// source name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedName {
    Class(ClassName),
    Field { owner: ClassName, name: String },
    Method { owner: ClassName, method: MethodKey },
}

impl fmt::Display for UnresolvedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedName::Class(class) => write!(f, "class {class}"),
            UnresolvedName::Field { owner, name } => write!(f, "field {owner}.{name}"),
            UnresolvedName::Method { owner, method } => write!(f, "method {owner}.{method}"),
        }
    }
}

/// Non-fatal findings of a remap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    unresolved: Vec<UnresolvedName>,
    conflicts: Vec<RuleTarget>,
}

impl RemapReport {
    pub fn unresolved(&self) -> &[UnresolvedName] {
        &self.unresolved
    }

    pub fn unresolved_classes(&self) -> usize {
        self.unresolved
            .iter()
            .filter(|u| matches!(u, UnresolvedName::Class(_)))
            .count()
    }

    pub fn unresolved_members(&self) -> usize {
        self.unresolved.len() - self.unresolved_classes()
    }

    /// Target names on which differing rules collided and were merged by
    /// the conflict policy.
    pub fn conflicts(&self) -> &[RuleTarget] {
        &self.conflicts
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.conflicts.is_empty()
    }
}

/// Result of a successful remap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapped {
    pub store: AccessRuleStore,
    pub report: RemapReport,
}

/// Re-keys every rule of a store through a [`NameMapping`].
///
/// Names the mapping does not cover pass through unchanged and are reported.
/// Method descriptors are always translated, so a rule on an unmapped method
/// still matches once its parameter types are renamed.
#[derive(Debug, Clone, Copy)]
pub struct RuleRemapper<'m> {
    mapping: &'m NameMapping,
    policy: ConflictPolicy,
}

impl<'m> RuleRemapper<'m> {
    pub fn new(mapping: &'m NameMapping) -> Self {
        Self {
            mapping,
            policy: ConflictPolicy::default(),
        }
    }

    /// Policy for rules that collide on a target name after remapping.
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn remap(&self, store: &AccessRuleStore) -> Result<Remapped> {
        let mut out = AccessRuleStoreBuilder::with_policy(self.policy);
        let mut report = RemapReport::default();

        for (class, rules) in store.iter() {
            let covered = self.mapping.covers(class.as_str());
            let target = self
                .mapping
                .map_class(class.as_str())
                .unwrap_or_else(|| class.clone());
            if !covered {
                log::warn!("No mapping for class {class}; keeping its access transforms as-is");
                report.unresolved.push(UnresolvedName::Class(class.clone()));
            }

            if let Some(t) = rules.class_transform() {
                out.class(target.clone(), *t)?;
            }
            if let Some(t) = rules.all_fields() {
                out.all_fields(target.clone(), *t)?;
            }
            if let Some(t) = rules.all_methods() {
                out.all_methods(target.clone(), *t)?;
            }

            for (name, t) in rules.fields() {
                let mapped = match self.mapping.map_field(class.as_str(), name) {
                    Some(mapped) => mapped,
                    None => {
                        if covered {
                            log::debug!("No mapping for field {class}.{name}");
                            report.unresolved.push(UnresolvedName::Field {
                                owner: class.clone(),
                                name: name.to_owned(),
                            });
                        }
                        name
                    }
                };
                out.field(target.clone(), mapped, *t)?;
            }

            for (method, t) in rules.methods() {
                let mapped = match self.mapping.map_method(class.as_str(), method)? {
                    Some(mapped) => mapped,
                    None => {
                        if covered {
                            log::debug!("No mapping for method {class}.{method}");
                            report.unresolved.push(UnresolvedName::Method {
                                owner: class.clone(),
                                method: method.clone(),
                            });
                        }
                        let descriptor = self.mapping.map_descriptor(&method.descriptor)?;
                        MethodKey::new(method.name.clone(), descriptor)
                    }
                };
                out.method(target.clone(), mapped, *t)?;
            }
        }

        report.conflicts = out.conflicts().to_vec();
        let store = out.build();
        if !report.unresolved.is_empty() {
            log::warn!(
                "{} classes and {} members were not covered by the mapping and kept their names",
                report.unresolved_classes(),
                report.unresolved_members()
            );
        }
        if !report.conflicts.is_empty() {
            log::warn!(
                "{} rule targets collided after remapping and were merged ({:?} policy)",
                report.conflicts.len(),
                self.policy
            );
        }
        log::debug!("Remapped access transforms for {} classes", store.len());

        Ok(Remapped { store, report })
    }
}

/// Remap `store` through `mapping` with the default conflict policy.
pub fn remap(store: &AccessRuleStore, mapping: &NameMapping) -> Result<Remapped> {
    RuleRemapper::new(mapping).remap(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RuleError, RuleTarget};
    use crate::transform::{AccessChange, AccessTransform, FinalChange};

    const PUBLIC: AccessTransform = AccessTransform::access(AccessChange::Public);
    const PROTECTED: AccessTransform = AccessTransform::access(AccessChange::Protected);

    #[test]
    fn test_field_rename() {
        let mut rules = AccessRuleStore::builder();
        rules.field("a", "b", PUBLIC).unwrap();
        let mut mapping = NameMapping::builder();
        mapping.class("a", "World").field("a", "b", "height");

        let remapped = remap(&rules.build(), &mapping.build()).unwrap();
        assert!(remapped.report.is_clean());
        let world = remapped.store.get("World").unwrap();
        assert_eq!(world.field("height"), Some(PUBLIC));
        assert_eq!(world.field("b"), None);
        assert!(remapped.store.get("a").is_none());
    }

    #[test]
    fn test_unmapped_member_of_covered_class() {
        let mut rules = AccessRuleStore::builder();
        rules
            .field("a", "zz", PUBLIC)
            .unwrap()
            .method("a", MethodKey::new("<init>", "(La;)V"), PUBLIC)
            .unwrap();
        let mut mapping = NameMapping::builder();
        mapping.class("a", "World");

        let remapped = remap(&rules.build(), &mapping.build()).unwrap();
        let world = remapped.store.get("World").unwrap();
        assert_eq!(world.field("zz"), Some(PUBLIC));
        // The name is kept but the descriptor still follows the class rename.
        assert_eq!(
            world.method(&MethodKey::new("<init>", "(LWorld;)V")),
            Some(PUBLIC)
        );
        assert_eq!(remapped.report.unresolved_members(), 2);
        assert_eq!(remapped.report.unresolved_classes(), 0);
    }

    #[test]
    fn test_collision_uses_policy() {
        let mut rules = AccessRuleStore::builder();
        rules.class("a", PUBLIC).unwrap().class("b", PROTECTED).unwrap();
        let mut mapping = NameMapping::builder();
        mapping.class("a", "Same").class("b", "Same");
        let rules = rules.build();
        let mapping = mapping.build();

        let merged = remap(&rules, &mapping).unwrap();
        assert_eq!(merged.store.class_transform("Same"), Some(&PUBLIC));

        let err = RuleRemapper::new(&mapping)
            .with_policy(ConflictPolicy::Reject)
            .remap(&rules)
            .unwrap_err();
        assert!(matches!(
            err,
            RuleError::Conflict {
                target: RuleTarget::Class(ref c),
                ..
            } if c.as_str() == "Same"
        ));
    }

    #[test]
    fn test_wildcards_carry_over() {
        let mut rules = AccessRuleStore::builder();
        let definal = AccessTransform::finality(FinalChange::Remove);
        rules
            .all_fields("a", definal)
            .unwrap()
            .all_methods("a", PUBLIC)
            .unwrap();
        let mut mapping = NameMapping::builder();
        mapping.class("a", "World");

        let remapped = remap(&rules.build(), &mapping.build()).unwrap();
        let world = remapped.store.get("World").unwrap();
        assert_eq!(world.all_fields(), Some(&definal));
        assert_eq!(world.all_methods(), Some(&PUBLIC));
    }

    #[test]
    fn test_malformed_descriptor_is_fatal() {
        let mut rules = AccessRuleStore::builder();
        rules
            .method("a", MethodKey::new("m", "(La"), PUBLIC)
            .unwrap();
        let mut mapping = NameMapping::builder();
        mapping.class("a", "World");
        assert!(matches!(
            remap(&rules.build(), &mapping.build()),
            Err(RuleError::MalformedDescriptor { .. })
        ));
    }

    #[test]
    fn test_unresolved_display() {
        let u = UnresolvedName::Method {
            owner: "a/Foo".into(),
            method: MethodKey::new("bar", "(I)V"),
        };
        assert_eq!(u.to_string(), "method a/Foo.bar(I)V");
    }
}
