use std::borrow::Borrow;
use std::fmt;

/// A class identifier in internal (slash-separated) form.
///
/// Dotted names such as `com.example.Foo` are normalized on construction,
/// so `com.example.Foo` and `com/example/Foo` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassName(String);

impl ClassName {
    pub fn new(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if name.contains('.') {
            name = name.replace('.', "/");
        }
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a nested class name at its last `$`, e.g. `a/Outer$Inner` ->
    /// (`a/Outer`, `Inner`). Returns `None` for top-level classes.
    pub fn split_nested(&self) -> Option<(ClassName, &str)> {
        let simple_start = self.0.rfind('/').map_or(0, |i| i + 1);
        let dollar = self.0.rfind('$')?;
        if dollar <= simple_start || dollar + 1 == self.0.len() {
            return None;
        }
        Some((ClassName(self.0[..dollar].to_owned()), &self.0[dollar + 1..]))
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ClassName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A method identity within a class: overloads share a name, so the
/// descriptor is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodKey {
    pub name: String,
    pub descriptor: String,
}

impl MethodKey {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_names_normalize() {
        assert_eq!(ClassName::new("com.example.Foo"), ClassName::new("com/example/Foo"));
        assert_eq!(ClassName::from("a.b.C$D").as_str(), "a/b/C$D");
    }

    #[test]
    fn test_case_matters() {
        assert_ne!(ClassName::new("a/Foo"), ClassName::new("a/foo"));
    }

    #[test]
    fn test_split_nested() {
        let name = ClassName::new("a/b/Outer$Mid$Inner");
        let (outer, inner) = name.split_nested().unwrap();
        assert_eq!(outer.as_str(), "a/b/Outer$Mid");
        assert_eq!(inner, "Inner");

        assert!(ClassName::new("a/b/Outer").split_nested().is_none());
        assert!(ClassName::new("a/$Proxy").split_nested().is_none());
        assert!(ClassName::new("a/Trailing$").split_nested().is_none());
        assert!(ClassName::new("we$ird/Name").split_nested().is_none());
    }

    #[test]
    fn test_method_key_display() {
        assert_eq!(MethodKey::new("bar", "(I)V").to_string(), "bar(I)V");
    }
}
