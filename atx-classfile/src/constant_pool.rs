use crate::error::{FormatError, Result};
use crate::mutf8::decode_mutf8;
use crate::reader::Reader;

// Constant pool tags (JVMS §4.4)
pub const CONSTANT_UTF8: u8 = 1;
pub const CONSTANT_INTEGER: u8 = 3;
pub const CONSTANT_FLOAT: u8 = 4;
pub const CONSTANT_LONG: u8 = 5;
pub const CONSTANT_DOUBLE: u8 = 6;
pub const CONSTANT_CLASS: u8 = 7;
pub const CONSTANT_STRING: u8 = 8;
pub const CONSTANT_FIELDREF: u8 = 9;
pub const CONSTANT_METHODREF: u8 = 10;
pub const CONSTANT_INTERFACE_METHODREF: u8 = 11;
pub const CONSTANT_NAME_AND_TYPE: u8 = 12;
pub const CONSTANT_METHOD_HANDLE: u8 = 15;
pub const CONSTANT_METHOD_TYPE: u8 = 16;
pub const CONSTANT_DYNAMIC: u8 = 17;
pub const CONSTANT_INVOKE_DYNAMIC: u8 = 18;
pub const CONSTANT_MODULE: u8 = 19;
pub const CONSTANT_PACKAGE: u8 = 20;

/// The subset of a constant pool entry needed to resolve names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// Index 0 and the upper slot of a long/double.
    Unusable,
    /// Modified UTF-8 payload, kept as a byte range and decoded on demand.
    Utf8 { start: usize, len: usize },
    Class { name_index: u16 },
    Other,
}

/// A walked constant pool. Entries are indexed from 1 as in the class file.
#[derive(Debug, Clone)]
pub struct ConstantPool<'a> {
    data: &'a [u8],
    entries: Vec<Entry>,
}

impl<'a> ConstantPool<'a> {
    /// Walk the constant pool starting at the reader's position (the
    /// `constant_pool_count` field) and leave the reader just past it.
    pub fn parse(data: &'a [u8], reader: &mut Reader<'a>) -> Result<Self> {
        let count = reader.u16()? as usize;
        let mut entries = Vec::with_capacity(count.max(1));
        entries.push(Entry::Unusable);

        while entries.len() < count {
            let tag_off = reader.pos();
            let tag = reader.u8()?;
            match tag {
                CONSTANT_UTF8 => {
                    let len = reader.u16()? as usize;
                    let start = reader.pos();
                    reader.skip(len)?;
                    entries.push(Entry::Utf8 { start, len });
                }
                CONSTANT_CLASS => {
                    let name_index = reader.u16()?;
                    entries.push(Entry::Class { name_index });
                }
                CONSTANT_LONG | CONSTANT_DOUBLE => {
                    reader.skip(8)?;
                    entries.push(Entry::Other);
                    entries.push(Entry::Unusable);
                }
                CONSTANT_INTEGER
                | CONSTANT_FLOAT
                | CONSTANT_FIELDREF
                | CONSTANT_METHODREF
                | CONSTANT_INTERFACE_METHODREF
                | CONSTANT_NAME_AND_TYPE
                | CONSTANT_DYNAMIC
                | CONSTANT_INVOKE_DYNAMIC => {
                    reader.skip(4)?;
                    entries.push(Entry::Other);
                }
                CONSTANT_METHOD_HANDLE => {
                    reader.skip(3)?;
                    entries.push(Entry::Other);
                }
                CONSTANT_STRING | CONSTANT_METHOD_TYPE | CONSTANT_MODULE | CONSTANT_PACKAGE => {
                    reader.skip(2)?;
                    entries.push(Entry::Other);
                }
                _ => return Err(FormatError::InvalidConstantTag(tag, tag_off)),
            }
        }

        // A trailing long/double may push one slot past `count`.
        if entries.len() > count {
            return Err(FormatError::MalformedAttribute {
                name: "constant_pool",
                offset: reader.pos(),
            });
        }

        Ok(Self { data, entries })
    }

    /// Number of slots, including the unusable slot 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    fn entry(&self, index: u16) -> Option<Entry> {
        self.entries.get(index as usize).copied()
    }

    /// Resolve a `CONSTANT_Utf8` entry.
    pub fn utf8(&self, index: u16) -> Result<String> {
        match self.entry(index) {
            Some(Entry::Utf8 { start, len }) => decode_mutf8(&self.data[start..start + len], start),
            _ => Err(FormatError::InvalidConstantIndex {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Resolve a `CONSTANT_Class` entry to its internal name.
    pub fn class_name(&self, index: u16) -> Result<String> {
        match self.entry(index) {
            Some(Entry::Class { name_index }) => self.utf8(name_index),
            _ => Err(FormatError::InvalidConstantIndex {
                index,
                expected: "Class",
            }),
        }
    }

    /// Resolve an optional `CONSTANT_Class` index, where 0 means absent.
    pub fn optional_class_name(&self, index: u16) -> Result<Option<String>> {
        if index == 0 {
            Ok(None)
        } else {
            self.class_name(index).map(Some)
        }
    }

    /// Resolve an optional `CONSTANT_Utf8` index, where 0 means absent.
    pub fn optional_utf8(&self, index: u16) -> Result<Option<String>> {
        if index == 0 {
            Ok(None)
        } else {
            self.utf8(index).map(Some)
        }
    }
}
