#![allow(dead_code)]

use atx_classfile::{AccessFlags, ClassSkeleton};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Byte offsets at which `a` and `b` differ. Panics on length mismatch.
pub fn diff_offsets(a: &[u8], b: &[u8]) -> Vec<usize> {
    assert_eq!(a.len(), b.len(), "rewrite changed the length");
    (0..a.len()).filter(|&i| a[i] != b[i]).collect()
}

/// Offsets of the two bytes of every flag word that differs between
/// `before` and `after`.
pub fn changed_flag_bytes(before: &ClassSkeleton, after: &ClassSkeleton) -> Vec<usize> {
    before
        .flag_sites()
        .zip(after.flag_sites())
        .filter(|(b, a)| b.flags != a.flags)
        .flat_map(|(b, _)| [b.offset, b.offset + 1])
        .collect()
}

pub fn method_flags(class: &ClassSkeleton, name: &str, descriptor: &str) -> AccessFlags {
    class
        .methods
        .iter()
        .find(|m| m.name == name && m.descriptor == descriptor)
        .unwrap_or_else(|| panic!("no method {name}{descriptor}"))
        .access
        .flags
}

pub fn inner_class_flags(class: &ClassSkeleton, inner: &str) -> AccessFlags {
    class
        .inner_classes
        .iter()
        .find(|ic| ic.inner_class == inner)
        .unwrap_or_else(|| panic!("no inner class entry for {inner}"))
        .access
        .flags
}
