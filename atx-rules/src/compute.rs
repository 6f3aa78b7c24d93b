use atx_classfile::AccessFlags;

use crate::transform::{AccessTransform, FinalChange};

/// Apply an access transform to a flag word.
///
/// Visibility is replaced only when the rule requests a change; `final` is
/// then added or cleared independently. Every other bit passes through.
/// Used alike for class, field, method and inner class reference flags.
pub fn compute(current: AccessFlags, rule: Option<&AccessTransform>) -> AccessFlags {
    let Some(rule) = rule else {
        return current;
    };

    let mut value = current;
    if let Some(visibility) = rule.access_change().flags() {
        value.remove(AccessFlags::VISIBILITY);
        value.insert(visibility);
    }
    match rule.final_change() {
        FinalChange::Add => value.insert(AccessFlags::FINAL),
        FinalChange::Remove => value.remove(AccessFlags::FINAL),
        FinalChange::None => {}
    }
    value
}
