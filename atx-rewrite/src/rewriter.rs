use atx_classfile::{AccessFlags, ClassSkeleton, FlagSite};
use atx_rules::{AccessRuleStore, MethodKey, compute};

use crate::error::{Result, TransformError};

/// Applies an [`AccessRuleStore`] (already in the binaries' namespace) to
/// class files.
///
/// Rules are looked up under the class name decoded from each binary. Inner
/// class entries take the class-level rule of the class they reference,
/// whichever file hosts them, so every duplicated copy of a class's flags
/// ends up matching the class itself.
#[derive(Debug, Clone, Copy)]
pub struct BytecodeRewriter<'s> {
    store: &'s AccessRuleStore,
}

impl<'s> BytecodeRewriter<'s> {
    pub fn new(store: &'s AccessRuleStore) -> Self {
        Self { store }
    }

    /// Compute the new flags for every site whose value changes.
    pub fn plan(&self, class: &ClassSkeleton) -> Vec<(FlagSite, AccessFlags)> {
        let rules = self.store.get(&class.name);
        let mut edits = Vec::new();
        let mut push = |site: &FlagSite, flags: AccessFlags| {
            if flags != site.flags {
                edits.push((*site, flags));
            }
        };

        push(
            &class.access,
            compute(class.access.flags, rules.and_then(|r| r.class_transform())),
        );

        if let Some(rules) = rules {
            for field in &class.fields {
                let rule = rules.field(&field.name);
                push(&field.access, compute(field.access.flags, rule.as_ref()));
            }
            for method in &class.methods {
                let key = MethodKey::new(method.name.as_str(), method.descriptor.as_str());
                let rule = rules.method(&key);
                push(&method.access, compute(method.access.flags, rule.as_ref()));
            }
        }

        for entry in &class.inner_classes {
            let rule = self.store.class_transform(&entry.inner_class);
            push(&entry.access, compute(entry.access.flags, rule));
        }

        edits
    }

    /// Rewrite one class file. `entry` names the input for error messages.
    ///
    /// The output is a copy of `data` with only changed flag words replaced.
    pub fn rewrite(&self, entry: &str, data: &[u8]) -> Result<Vec<u8>> {
        let class = ClassSkeleton::parse(data).map_err(|source| TransformError::Format {
            entry: entry.to_owned(),
            source,
        })?;

        let edits = self.plan(&class);
        let mut out = data.to_vec();
        for (site, flags) in &edits {
            log::trace!(
                "{}: flags at {:#x} {:#06x} -> {:#06x}",
                class.name,
                site.offset,
                site.flags.bits(),
                flags.bits()
            );
            site.write(&mut out, *flags);
        }
        if !edits.is_empty() {
            log::debug!("Rewrote {} access flag sites in {}", edits.len(), class.name);
        }
        Ok(out)
    }
}

/// Rewrite a single class file against `store`.
pub fn rewrite(entry: &str, data: &[u8], store: &AccessRuleStore) -> Result<Vec<u8>> {
    BytecodeRewriter::new(store).rewrite(entry, data)
}
