//! Access flag bits from the JVM class file format (JVMS §4.1, §4.5, §4.6, §4.7.6).

use bitflags::bitflags;

bitflags! {
    /// A u16 access flag word as stored in a class file.
    ///
    /// Several bits are shared between contexts; the aliases on the impl
    /// block name the method/field meanings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct AccessFlags: u16 {
        /// Public: class, field, method, inner class.
        const PUBLIC = 0x0001;
        /// Private: field, method, inner class.
        const PRIVATE = 0x0002;
        /// Protected: field, method, inner class.
        const PROTECTED = 0x0004;
        /// Static: field, method, inner class.
        const STATIC = 0x0008;
        /// Final: class, field, method, inner class.
        const FINAL = 0x0010;
        /// Super: class (same bit as SYNCHRONIZED).
        const SUPER = 0x0020;
        /// Volatile field (same bit as BRIDGE).
        const VOLATILE = 0x0040;
        /// Transient field (same bit as VARARGS).
        const TRANSIENT = 0x0080;
        /// Native method.
        const NATIVE = 0x0100;
        /// Interface: class, inner class.
        const INTERFACE = 0x0200;
        /// Abstract: class, method, inner class.
        const ABSTRACT = 0x0400;
        /// Strict floating-point: method.
        const STRICT = 0x0800;
        /// Synthetic: class, field, method, inner class.
        const SYNTHETIC = 0x1000;
        /// Annotation type: class, inner class.
        const ANNOTATION = 0x2000;
        /// Enum: class, field, inner class.
        const ENUM = 0x4000;
        /// Module: `module-info` class.
        const MODULE = 0x8000;
    }
}

impl AccessFlags {
    /// Synchronized method (same bit as SUPER).
    pub const SYNCHRONIZED: Self = Self::SUPER;
    /// Bridge method (same bit as VOLATILE).
    pub const BRIDGE: Self = Self::VOLATILE;
    /// Varargs method (same bit as TRANSIENT).
    pub const VARARGS: Self = Self::TRANSIENT;

    /// The three mutually exclusive visibility bits.
    pub const VISIBILITY: Self = Self::PUBLIC.union(Self::PRIVATE).union(Self::PROTECTED);

    /// Only the visibility portion of these flags.
    pub fn visibility(self) -> Self {
        self.intersection(Self::VISIBILITY)
    }
}
