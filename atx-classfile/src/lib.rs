//! JVM class file skeleton decoder for in-place access flag rewriting.
//!
//! Only the structure needed to locate access flags is decoded: the constant
//! pool (lazily), the class header, fields, methods and the `InnerClasses`
//! attribute. Everything else is skipped by length, so a rewrite that touches
//! only [`FlagSite`]s leaves every other byte of the input intact.

pub mod access;
pub mod builder;
pub mod class;
pub mod constant_pool;
pub mod error;
pub mod mutf8;
pub mod reader;

pub use access::AccessFlags;
pub use builder::{ClassFileBuilder, FieldConstant};
pub use class::{ClassSkeleton, ClassVersion, FlagSite, InnerClassEntry, MemberSkeleton};
pub use error::FormatError;
