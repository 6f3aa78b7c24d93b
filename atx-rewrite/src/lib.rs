//! Applies access transforms to class file archives.
//!
//! The rule set is first remapped into the archive's namespace, then every
//! class entry is rewritten in place: only access flag words change, every
//! other byte is copied through.

pub mod archive;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod rewriter;

pub use archive::{ArchiveEntry, ArchiveTransformDriver};
pub use config::TransformConfig;
pub use error::TransformError;
pub use pipeline::{TransformOutput, apply_access_transforms};
pub use rewriter::{BytecodeRewriter, rewrite};
