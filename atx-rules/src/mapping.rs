//! Name translation table between two namespaces.

use std::collections::HashMap;

use crate::descriptor::remap_descriptor;
use crate::error::Result;
use crate::name::{ClassName, MethodKey};

/// Renames scoped to one source class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ClassMapping {
    /// `None` when only members are mapped; the class name is then derived
    /// from its outer class, or kept.
    target: Option<ClassName>,
    fields: HashMap<String, String>,
    /// Source (name, descriptor) -> target name. The target descriptor is
    /// derived by translating the source descriptor.
    methods: HashMap<MethodKey, String>,
}

/// Immutable class, field and method renames, keyed by source names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    classes: HashMap<ClassName, ClassMapping>,
}

impl NameMapping {
    pub fn builder() -> NameMappingBuilder {
        NameMappingBuilder::default()
    }

    /// Number of source classes with any mapping entry.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// True when the mapping has any entry for `class`, directly or through
    /// its outer class.
    pub fn covers(&self, class: &str) -> bool {
        self.classes.contains_key(class) || self.map_class(class).is_some()
    }

    /// Target name of a class, or `None` when the mapping does not rename it.
    ///
    /// A nested class without its own entry takes its name from the mapped
    /// outer class: with `a -> World`, `a$b` becomes `World$b`.
    pub fn map_class(&self, name: &str) -> Option<ClassName> {
        if let Some(target) = self.classes.get(name).and_then(|c| c.target.as_ref()) {
            return Some(target.clone());
        }
        if !name.contains('$') {
            return None;
        }
        let name = ClassName::new(name);
        let (outer, inner) = name.split_nested()?;
        let outer = self.map_class(outer.as_str())?;
        Some(ClassName::new(format!("{outer}${inner}")))
    }

    /// Target name of a field of `owner`.
    pub fn map_field(&self, owner: &str, field: &str) -> Option<&str> {
        self.classes
            .get(owner)?
            .fields
            .get(field)
            .map(String::as_str)
    }

    /// Target name of a method of `owner`.
    pub fn map_method_name(&self, owner: &str, method: &MethodKey) -> Option<&str> {
        self.classes
            .get(owner)?
            .methods
            .get(method)
            .map(String::as_str)
    }

    /// Translate the class references of a descriptor.
    pub fn map_descriptor(&self, descriptor: &str) -> Result<String> {
        remap_descriptor(descriptor, |name| self.map_class(name))
    }

    /// Full target key of a method, or `None` when its name is unmapped.
    pub fn map_method(&self, owner: &str, method: &MethodKey) -> Result<Option<MethodKey>> {
        let Some(name) = self.map_method_name(owner, method) else {
            return Ok(None);
        };
        let descriptor = self.map_descriptor(&method.descriptor)?;
        Ok(Some(MethodKey::new(name, descriptor)))
    }
}

/// Collects renames from an external mapping parser.
///
/// A repeated entry replaces the earlier one.
#[derive(Debug, Default)]
pub struct NameMappingBuilder {
    classes: HashMap<ClassName, ClassMapping>,
}

impl NameMappingBuilder {
    fn entry(&mut self, owner: impl Into<ClassName>) -> &mut ClassMapping {
        self.classes.entry(owner.into()).or_default()
    }

    pub fn class(&mut self, from: impl Into<ClassName>, to: impl Into<ClassName>) -> &mut Self {
        self.entry(from).target = Some(to.into());
        self
    }

    pub fn field(
        &mut self,
        owner: impl Into<ClassName>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> &mut Self {
        self.entry(owner).fields.insert(from.into(), to.into());
        self
    }

    /// Map method `from` (source name and source descriptor) of `owner` to `to_name`.
    pub fn method(
        &mut self,
        owner: impl Into<ClassName>,
        from: MethodKey,
        to_name: impl Into<String>,
    ) -> &mut Self {
        self.entry(owner).methods.insert(from, to_name.into());
        self
    }

    pub fn build(self) -> NameMapping {
        NameMapping {
            classes: self.classes,
        }
    }
}
