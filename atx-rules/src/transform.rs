use std::fmt;

use atx_classfile::AccessFlags;

/// Requested visibility for a class or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessChange {
    /// Leave visibility untouched.
    #[default]
    None,
    Public,
    Protected,
    /// No visibility bit ("default" access).
    PackagePrivate,
    Private,
}

impl AccessChange {
    /// Visibility bits this change sets after clearing the visibility mask.
    /// `None` for [`AccessChange::None`], which does not touch the mask.
    pub fn flags(self) -> Option<AccessFlags> {
        match self {
            AccessChange::None => None,
            AccessChange::Public => Some(AccessFlags::PUBLIC),
            AccessChange::Protected => Some(AccessFlags::PROTECTED),
            AccessChange::PackagePrivate => Some(AccessFlags::empty()),
            AccessChange::Private => Some(AccessFlags::PRIVATE),
        }
    }

    /// Openness rank; higher is more visible. `None` ranks lowest.
    fn rank(self) -> u8 {
        match self {
            AccessChange::None => 0,
            AccessChange::Private => 1,
            AccessChange::PackagePrivate => 2,
            AccessChange::Protected => 3,
            AccessChange::Public => 4,
        }
    }

    /// The more visible of two changes; `None` yields to the other side.
    pub fn most_permissive(self, other: Self) -> Self {
        if other.rank() > self.rank() { other } else { self }
    }
}

impl fmt::Display for AccessChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessChange::None => "",
            AccessChange::Public => "public",
            AccessChange::Protected => "protected",
            AccessChange::PackagePrivate => "default",
            AccessChange::Private => "private",
        })
    }
}

/// Requested change to the `final` modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FinalChange {
    #[default]
    None,
    Add,
    Remove,
}

impl FinalChange {
    /// Removing `final` opens more than adding it; `None` yields to the other side.
    pub fn most_permissive(self, other: Self) -> Self {
        match (self, other) {
            (FinalChange::Remove, _) | (_, FinalChange::Remove) => FinalChange::Remove,
            (FinalChange::Add, _) | (_, FinalChange::Add) => FinalChange::Add,
            _ => FinalChange::None,
        }
    }
}

impl fmt::Display for FinalChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FinalChange::None => "",
            FinalChange::Add => "+f",
            FinalChange::Remove => "-f",
        })
    }
}

/// A declarative visibility and finality override for one class or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessTransform {
    access: AccessChange,
    finality: FinalChange,
}

impl AccessTransform {
    pub const IDENTITY: Self = Self::new(AccessChange::None, FinalChange::None);

    pub const fn new(access: AccessChange, finality: FinalChange) -> Self {
        Self { access, finality }
    }

    pub const fn access(access: AccessChange) -> Self {
        Self::new(access, FinalChange::None)
    }

    pub const fn finality(finality: FinalChange) -> Self {
        Self::new(AccessChange::None, finality)
    }

    pub fn access_change(&self) -> AccessChange {
        self.access
    }

    pub fn final_change(&self) -> FinalChange {
        self.finality
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Combine two transforms, keeping the most visible access and the most
    /// permissive finality of either.
    pub fn most_permissive(self, other: Self) -> Self {
        Self {
            access: self.access.most_permissive(other.access),
            finality: self.finality.most_permissive(other.finality),
        }
    }
}

impl fmt::Display for AccessTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("<none>");
        }
        write!(f, "{}{}", self.access, self.finality)
    }
}
