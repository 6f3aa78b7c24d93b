use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::{Result, RuleTarget};
use crate::name::{ClassName, MethodKey};
use crate::policy::ConflictPolicy;
use crate::transform::AccessTransform;

/// All rules attached to one class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRuleSet {
    class: Option<AccessTransform>,
    all_fields: Option<AccessTransform>,
    all_methods: Option<AccessTransform>,
    fields: BTreeMap<String, AccessTransform>,
    methods: BTreeMap<MethodKey, AccessTransform>,
}

impl ClassRuleSet {
    /// The class-level transform, applied to the class's own flags and to
    /// every inner class entry that references it.
    pub fn class_transform(&self) -> Option<&AccessTransform> {
        self.class.as_ref()
    }

    /// Wildcard transform for every field of the class.
    pub fn all_fields(&self) -> Option<&AccessTransform> {
        self.all_fields.as_ref()
    }

    /// Wildcard transform for every method of the class.
    pub fn all_methods(&self) -> Option<&AccessTransform> {
        self.all_methods.as_ref()
    }

    /// Effective transform for a field: the explicit rule merged with the
    /// all-fields wildcard.
    pub fn field(&self, name: &str) -> Option<AccessTransform> {
        with_wildcard(self.fields.get(name), self.all_fields.as_ref())
    }

    /// Effective transform for a method: the explicit rule merged with the
    /// all-methods wildcard.
    pub fn method(&self, key: &MethodKey) -> Option<AccessTransform> {
        with_wildcard(self.methods.get(key), self.all_methods.as_ref())
    }

    /// Explicit field rules, without the wildcard.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &AccessTransform)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Explicit method rules, without the wildcard.
    pub fn methods(&self) -> impl Iterator<Item = (&MethodKey, &AccessTransform)> + '_ {
        self.methods.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.class.is_none()
            && self.all_fields.is_none()
            && self.all_methods.is_none()
            && self.fields.is_empty()
            && self.methods.is_empty()
    }
}

fn with_wildcard(
    explicit: Option<&AccessTransform>,
    wildcard: Option<&AccessTransform>,
) -> Option<AccessTransform> {
    match (explicit, wildcard) {
        (Some(e), Some(w)) => Some(w.most_permissive(*e)),
        (e, w) => e.or(w).copied(),
    }
}

/// Immutable mapping from class name to its rules. A class without an
/// entry is left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRuleStore {
    classes: BTreeMap<ClassName, ClassRuleSet>,
}

impl AccessRuleStore {
    pub fn builder() -> AccessRuleStoreBuilder {
        AccessRuleStoreBuilder::new()
    }

    /// Rules for a class, by internal name.
    pub fn get(&self, class: &str) -> Option<&ClassRuleSet> {
        self.classes.get(class)
    }

    /// Shorthand for the class-level transform of `class`.
    pub fn class_transform(&self, class: &str) -> Option<&AccessTransform> {
        self.get(class).and_then(ClassRuleSet::class_transform)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassName, &ClassRuleSet)> + '_ {
        self.classes.iter()
    }

    /// Number of classes with at least one rule.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Accumulates rules from an external source and freezes them into an
/// [`AccessRuleStore`]. Repeated targets go through the [`ConflictPolicy`];
/// every collision it resolves is logged and kept in [`conflicts`](Self::conflicts).
#[derive(Debug, Default)]
pub struct AccessRuleStoreBuilder {
    policy: ConflictPolicy,
    classes: BTreeMap<ClassName, ClassRuleSet>,
    conflicts: Vec<RuleTarget>,
}

impl AccessRuleStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ConflictPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Targets on which two different rules met and the policy picked a result.
    pub fn conflicts(&self) -> &[RuleTarget] {
        &self.conflicts
    }

    fn set(&mut self, class: ClassName) -> &mut ClassRuleSet {
        self.classes.entry(class).or_default()
    }

    fn record(&mut self, conflict: Option<RuleTarget>) {
        self.conflicts.extend(conflict);
    }

    pub fn class(
        &mut self,
        class: impl Into<ClassName>,
        transform: AccessTransform,
    ) -> Result<&mut Self> {
        let class = class.into();
        let policy = self.policy;
        let target = || RuleTarget::Class(class.clone());
        let conflict = put(policy, &mut self.set(class.clone()).class, transform, target)?;
        self.record(conflict);
        Ok(self)
    }

    pub fn all_fields(
        &mut self,
        class: impl Into<ClassName>,
        transform: AccessTransform,
    ) -> Result<&mut Self> {
        let class = class.into();
        let policy = self.policy;
        let target = || RuleTarget::AllFields(class.clone());
        let conflict = put(policy, &mut self.set(class.clone()).all_fields, transform, target)?;
        self.record(conflict);
        Ok(self)
    }

    pub fn all_methods(
        &mut self,
        class: impl Into<ClassName>,
        transform: AccessTransform,
    ) -> Result<&mut Self> {
        let class = class.into();
        let policy = self.policy;
        let target = || RuleTarget::AllMethods(class.clone());
        let conflict = put(policy, &mut self.set(class.clone()).all_methods, transform, target)?;
        self.record(conflict);
        Ok(self)
    }

    pub fn field(
        &mut self,
        class: impl Into<ClassName>,
        name: impl Into<String>,
        transform: AccessTransform,
    ) -> Result<&mut Self> {
        let class = class.into();
        let policy = self.policy;
        let fields = &mut self.set(class.clone()).fields;
        let conflict = put_keyed(policy, fields, name.into(), transform, |field| {
            RuleTarget::Field(class.clone(), field.clone())
        })?;
        self.record(conflict);
        Ok(self)
    }

    pub fn method(
        &mut self,
        class: impl Into<ClassName>,
        key: MethodKey,
        transform: AccessTransform,
    ) -> Result<&mut Self> {
        let class = class.into();
        let policy = self.policy;
        let methods = &mut self.set(class.clone()).methods;
        let conflict = put_keyed(policy, methods, key, transform, |key| {
            RuleTarget::Method(class.clone(), key.clone())
        })?;
        self.record(conflict);
        Ok(self)
    }

    /// Fold a whole rule set into `class`, resolving every overlapping slot.
    pub fn merge_class(
        &mut self,
        class: impl Into<ClassName>,
        rules: ClassRuleSet,
    ) -> Result<&mut Self> {
        let class = class.into();
        if let Some(t) = rules.class {
            self.class(class.clone(), t)?;
        }
        if let Some(t) = rules.all_fields {
            self.all_fields(class.clone(), t)?;
        }
        if let Some(t) = rules.all_methods {
            self.all_methods(class.clone(), t)?;
        }
        for (name, t) in rules.fields {
            self.field(class.clone(), name, t)?;
        }
        for (key, t) in rules.methods {
            self.method(class.clone(), key, t)?;
        }
        Ok(self)
    }

    pub fn build(mut self) -> AccessRuleStore {
        self.classes.retain(|_, rules| !rules.is_empty());
        AccessRuleStore {
            classes: self.classes,
        }
    }
}

/// Resolve `incoming` against the current rule in a slot. Returns the target
/// when two different rules collided.
fn resolve_into(
    policy: ConflictPolicy,
    existing: AccessTransform,
    incoming: AccessTransform,
    target: impl FnOnce() -> RuleTarget,
) -> Result<(AccessTransform, Option<RuleTarget>)> {
    if existing == incoming {
        return Ok((existing, None));
    }
    let target = target();
    let resolved = policy.resolve(|| target.clone(), existing, incoming)?;
    log::warn!("Conflicting rules for {target}: {existing} vs {incoming}, using {resolved}");
    Ok((resolved, Some(target)))
}

fn put(
    policy: ConflictPolicy,
    slot: &mut Option<AccessTransform>,
    incoming: AccessTransform,
    target: impl FnOnce() -> RuleTarget,
) -> Result<Option<RuleTarget>> {
    let (resolved, conflict) = match *slot {
        Some(existing) => resolve_into(policy, existing, incoming, target)?,
        None => (incoming, None),
    };
    *slot = Some(resolved);
    Ok(conflict)
}

fn put_keyed<K: Ord>(
    policy: ConflictPolicy,
    map: &mut BTreeMap<K, AccessTransform>,
    key: K,
    incoming: AccessTransform,
    target: impl FnOnce(&K) -> RuleTarget,
) -> Result<Option<RuleTarget>> {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(incoming);
            Ok(None)
        }
        Entry::Occupied(mut slot) => {
            let (resolved, conflict) =
                resolve_into(policy, *slot.get(), incoming, || target(slot.key()))?;
            slot.insert(resolved);
            Ok(conflict)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::transform::{AccessChange, FinalChange};

    const PUBLIC: AccessTransform = AccessTransform::access(AccessChange::Public);
    const PROTECTED: AccessTransform = AccessTransform::access(AccessChange::Protected);
    const DEFINALIZE: AccessTransform = AccessTransform::finality(FinalChange::Remove);

    #[test]
    fn test_lookup() {
        let mut b = AccessRuleStore::builder();
        b.class("a.Foo", PUBLIC)
            .unwrap()
            .field("a/Foo", "count", DEFINALIZE)
            .unwrap()
            .method("a/Foo", MethodKey::new("bar", "(I)V"), PROTECTED)
            .unwrap();
        let store = b.build();

        assert_eq!(store.len(), 1);
        let foo = store.get("a/Foo").unwrap();
        assert_eq!(foo.class_transform(), Some(&PUBLIC));
        assert_eq!(foo.field("count"), Some(DEFINALIZE));
        assert_eq!(foo.field("other"), None);
        assert_eq!(foo.method(&MethodKey::new("bar", "(I)V")), Some(PROTECTED));
        // Overloads are distinct.
        assert_eq!(foo.method(&MethodKey::new("bar", "(J)V")), None);
        assert!(store.get("a/Bar").is_none());
        assert_eq!(store.class_transform("a/Foo"), Some(&PUBLIC));
    }

    #[test]
    fn test_wildcards_merge_with_explicit_rules() {
        let mut b = AccessRuleStore::builder();
        b.all_fields("a/Foo", PROTECTED)
            .unwrap()
            .field("a/Foo", "x", DEFINALIZE)
            .unwrap()
            .all_methods("a/Foo", PUBLIC)
            .unwrap();
        let store = b.build();
        let foo = store.get("a/Foo").unwrap();

        assert_eq!(foo.field("anything"), Some(PROTECTED));
        assert_eq!(
            foo.field("x"),
            Some(AccessTransform::new(
                AccessChange::Protected,
                FinalChange::Remove
            ))
        );
        assert_eq!(foo.method(&MethodKey::new("m", "()V")), Some(PUBLIC));
        assert_eq!(foo.fields().count(), 1);
    }

    #[test]
    fn test_duplicate_target_policy() {
        let mut b = AccessRuleStoreBuilder::with_policy(ConflictPolicy::Reject);
        b.field("a/Foo", "x", PUBLIC).unwrap();
        b.field("a/Foo", "x", PUBLIC).unwrap();
        let err = b.field("a/Foo", "x", DEFINALIZE).unwrap_err();
        assert!(matches!(
            err,
            RuleError::Conflict {
                target: RuleTarget::Field(_, ref f),
                ..
            } if f == "x"
        ));

        let mut b = AccessRuleStoreBuilder::with_policy(ConflictPolicy::LastWins);
        b.class("a/Foo", PUBLIC).unwrap();
        b.class("a/Foo", PUBLIC).unwrap();
        assert!(b.conflicts().is_empty());
        b.class("a/Foo", PROTECTED).unwrap();
        assert_eq!(b.conflicts(), &[RuleTarget::Class("a/Foo".into())]);
        assert_eq!(b.build().class_transform("a/Foo"), Some(&PROTECTED));
    }

    #[test]
    fn test_empty_sets_are_dropped() {
        let mut b = AccessRuleStore::builder();
        b.merge_class("a/Empty", ClassRuleSet::default()).unwrap();
        assert!(b.build().is_empty());
    }
}
