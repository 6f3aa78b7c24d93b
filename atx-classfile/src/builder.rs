//! Class file builder (writer).
//!
//! Produces small but valid class files: a constant pool, fields (optionally
//! with a `ConstantValue`), methods with a `Code` body, and the `InnerClasses`
//! and `SourceFile` attributes. It is mostly used to generate fixtures.

use std::collections::HashMap;

use crate::access::AccessFlags;
use crate::class::{ClassVersion, MAGIC};
use crate::constant_pool::{CONSTANT_CLASS, CONSTANT_INTEGER, CONSTANT_LONG, CONSTANT_UTF8};
use crate::mutf8::encode_mutf8;

/// A constant value attached to a field through `ConstantValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldConstant {
    Int(i32),
    Long(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PoolEntry {
    Utf8(String),
    Class(u16),
    Integer(i32),
    Long(i64),
}

/// Interning constant pool writer.
#[derive(Debug, Default)]
struct PoolWriter {
    entries: Vec<PoolEntry>,
    index: HashMap<PoolEntry, u16>,
    next: u16,
}

impl PoolWriter {
    fn new() -> Self {
        Self {
            next: 1,
            ..Default::default()
        }
    }

    fn intern(&mut self, entry: PoolEntry) -> u16 {
        if let Some(&idx) = self.index.get(&entry) {
            return idx;
        }
        let idx = self.next;
        self.next += if matches!(entry, PoolEntry::Long(_)) { 2 } else { 1 };
        self.index.insert(entry.clone(), idx);
        self.entries.push(entry);
        idx
    }

    fn utf8(&mut self, s: &str) -> u16 {
        self.intern(PoolEntry::Utf8(s.to_owned()))
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.intern(PoolEntry::Class(name_index))
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.next.to_be_bytes());
        for entry in &self.entries {
            match entry {
                PoolEntry::Utf8(s) => {
                    let bytes = encode_mutf8(s);
                    out.push(CONSTANT_UTF8);
                    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
                    out.extend_from_slice(&bytes);
                }
                PoolEntry::Class(name_index) => {
                    out.push(CONSTANT_CLASS);
                    out.extend_from_slice(&name_index.to_be_bytes());
                }
                PoolEntry::Integer(v) => {
                    out.push(CONSTANT_INTEGER);
                    out.extend_from_slice(&v.to_be_bytes());
                }
                PoolEntry::Long(v) => {
                    out.push(CONSTANT_LONG);
                    out.extend_from_slice(&v.to_be_bytes());
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct MemberDef {
    access: AccessFlags,
    name: String,
    descriptor: String,
    constant: Option<FieldConstant>,
    code: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
struct InnerClassDef {
    inner_class: String,
    outer_class: Option<String>,
    inner_name: Option<String>,
    access: AccessFlags,
}

/// Builder for a single class file.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    version: ClassVersion,
    access: AccessFlags,
    name: String,
    super_name: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<MemberDef>,
    methods: Vec<MemberDef>,
    inner_classes: Vec<InnerClassDef>,
    source_file: Option<String>,
}

impl ClassFileBuilder {
    /// Start a class with the given internal name, extending `java/lang/Object`,
    /// targeting Java 8 (52.0).
    pub fn new(name: &str, access: AccessFlags) -> Self {
        Self {
            version: ClassVersion::new(52, 0),
            access,
            name: name.to_owned(),
            super_name: Some("java/lang/Object".to_owned()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
            source_file: None,
        }
    }

    pub fn version(mut self, major: u16, minor: u16) -> Self {
        self.version = ClassVersion::new(major, minor);
        self
    }

    /// Set the super class; `None` is only valid for `java/lang/Object` and `module-info`.
    pub fn super_class(mut self, name: Option<&str>) -> Self {
        self.super_name = name.map(str::to_owned);
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_owned());
        self
    }

    pub fn field(mut self, access: AccessFlags, name: &str, descriptor: &str) -> Self {
        self.fields.push(MemberDef {
            access,
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            constant: None,
            code: None,
        });
        self
    }

    /// Add a field carrying a `ConstantValue` attribute.
    pub fn constant_field(
        mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        value: FieldConstant,
    ) -> Self {
        self.fields.push(MemberDef {
            access,
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            constant: Some(value),
            code: None,
        });
        self
    }

    /// Add a method. `code` becomes the body of a `Code` attribute; pass
    /// `None` for abstract and native methods.
    pub fn method(
        mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        code: Option<&[u8]>,
    ) -> Self {
        self.methods.push(MemberDef {
            access,
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            constant: None,
            code: code.map(<[u8]>::to_vec),
        });
        self
    }

    pub fn inner_class(
        mut self,
        inner_class: &str,
        outer_class: Option<&str>,
        inner_name: Option<&str>,
        access: AccessFlags,
    ) -> Self {
        self.inner_classes.push(InnerClassDef {
            inner_class: inner_class.to_owned(),
            outer_class: outer_class.map(str::to_owned),
            inner_name: inner_name.map(str::to_owned),
            access,
        });
        self
    }

    pub fn source_file(mut self, name: &str) -> Self {
        self.source_file = Some(name.to_owned());
        self
    }

    /// Serialize the class file.
    pub fn build(self) -> Vec<u8> {
        let mut pool = PoolWriter::new();
        let mut body = Vec::new();

        // Everything after the constant pool is written first so that the
        // pool is complete when it is serialized.
        body.extend_from_slice(&self.access.bits().to_be_bytes());
        body.extend_from_slice(&pool.class(&self.name).to_be_bytes());
        let super_index = self.super_name.as_deref().map_or(0, |s| pool.class(s));
        body.extend_from_slice(&super_index.to_be_bytes());

        body.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for iface in &self.interfaces {
            body.extend_from_slice(&pool.class(iface).to_be_bytes());
        }

        for members in [&self.fields, &self.methods] {
            body.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for m in members {
                write_member(&mut body, &mut pool, m);
            }
        }

        let mut attributes: Vec<(u16, Vec<u8>)> = Vec::new();
        if let Some(source) = &self.source_file {
            let name = pool.utf8("SourceFile");
            attributes.push((name, pool.utf8(source).to_be_bytes().to_vec()));
        }
        if !self.inner_classes.is_empty() {
            let name = pool.utf8("InnerClasses");
            let mut info = (self.inner_classes.len() as u16).to_be_bytes().to_vec();
            for ic in &self.inner_classes {
                let inner = pool.class(&ic.inner_class);
                let outer = ic.outer_class.as_deref().map_or(0, |s| pool.class(s));
                let simple = ic.inner_name.as_deref().map_or(0, |s| pool.utf8(s));
                info.extend_from_slice(&inner.to_be_bytes());
                info.extend_from_slice(&outer.to_be_bytes());
                info.extend_from_slice(&simple.to_be_bytes());
                info.extend_from_slice(&ic.access.bits().to_be_bytes());
            }
            attributes.push((name, info));
        }
        write_attributes(&mut body, &attributes);

        let mut out = Vec::with_capacity(body.len() + 64);
        out.extend_from_slice(&MAGIC.to_be_bytes());
        out.extend_from_slice(&self.version.minor.to_be_bytes());
        out.extend_from_slice(&self.version.major.to_be_bytes());
        pool.write(&mut out);
        out.extend_from_slice(&body);
        out
    }
}

fn write_member(out: &mut Vec<u8>, pool: &mut PoolWriter, m: &MemberDef) {
    out.extend_from_slice(&m.access.bits().to_be_bytes());
    out.extend_from_slice(&pool.utf8(&m.name).to_be_bytes());
    out.extend_from_slice(&pool.utf8(&m.descriptor).to_be_bytes());

    let mut attributes = Vec::new();
    if let Some(constant) = m.constant {
        let name = pool.utf8("ConstantValue");
        let index = match constant {
            FieldConstant::Int(v) => pool.intern(PoolEntry::Integer(v)),
            FieldConstant::Long(v) => pool.intern(PoolEntry::Long(v)),
        };
        attributes.push((name, index.to_be_bytes().to_vec()));
    }
    if let Some(code) = &m.code {
        let name = pool.utf8("Code");
        let mut info = Vec::with_capacity(code.len() + 12);
        info.extend_from_slice(&4u16.to_be_bytes()); // max_stack
        info.extend_from_slice(&4u16.to_be_bytes()); // max_locals
        info.extend_from_slice(&(code.len() as u32).to_be_bytes());
        info.extend_from_slice(code);
        info.extend_from_slice(&0u16.to_be_bytes()); // exception_table_length
        info.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
        attributes.push((name, info));
    }
    write_attributes(out, &attributes);
}

fn write_attributes(out: &mut Vec<u8>, attributes: &[(u16, Vec<u8>)]) {
    out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for (name, info) in attributes {
        out.extend_from_slice(&name.to_be_bytes());
        out.extend_from_slice(&(info.len() as u32).to_be_bytes());
        out.extend_from_slice(info);
    }
}
