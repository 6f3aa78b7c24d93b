use crate::access::AccessFlags;
use crate::constant_pool::ConstantPool;
use crate::error::{FormatError, Result};
use crate::reader::Reader;

pub const MAGIC: u32 = 0xCAFE_BABE;

/// Oldest supported major version (JDK 1.0.2).
pub const MIN_MAJOR_VERSION: u16 = 45;
/// Newest supported major version (Java 25).
pub const MAX_MAJOR_VERSION: u16 = 69;

const INNER_CLASSES: &str = "InnerClasses";

/// Class file format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassVersion {
    pub major: u16,
    pub minor: u16,
}

impl ClassVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn is_supported(&self) -> bool {
        (MIN_MAJOR_VERSION..=MAX_MAJOR_VERSION).contains(&self.major)
    }
}

impl std::fmt::Display for ClassVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Location and value of one u16 access flag field inside a class file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSite {
    /// Byte offset of the big-endian u16 flag word.
    pub offset: usize,
    pub flags: AccessFlags,
}

impl FlagSite {
    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        let offset = reader.pos();
        let flags = AccessFlags::from_bits_retain(reader.u16()?);
        Ok(Self { offset, flags })
    }

    /// Overwrite the flag word in `data`, which must be the buffer this
    /// site was decoded from (or a copy of it).
    pub fn write(&self, data: &mut [u8], flags: AccessFlags) {
        data[self.offset..self.offset + 2].copy_from_slice(&flags.bits().to_be_bytes());
    }
}

/// A field or method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSkeleton {
    pub name: String,
    pub descriptor: String,
    pub access: FlagSite,
}

/// One entry of the `InnerClasses` attribute.
///
/// The flags here duplicate the referenced class's own access flags (with
/// source-level visibility), so they must be kept in step with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassEntry {
    pub inner_class: String,
    pub outer_class: Option<String>,
    pub inner_name: Option<String>,
    pub access: FlagSite,
}

/// The structural skeleton of a class file: every access flag site plus the
/// names needed to look up rules for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSkeleton {
    pub version: ClassVersion,
    /// Internal name of this class, e.g. `com/example/Outer$Inner`.
    pub name: String,
    pub super_name: Option<String>,
    pub access: FlagSite,
    pub fields: Vec<MemberSkeleton>,
    pub methods: Vec<MemberSkeleton>,
    pub inner_classes: Vec<InnerClassEntry>,
}

impl ClassSkeleton {
    /// Decode the skeleton of a complete class file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 10 {
            return Err(FormatError::FileTooSmall(data.len()));
        }

        let mut r = Reader::new(data);
        let magic = r.u32()?;
        if magic != MAGIC {
            return Err(FormatError::InvalidMagic(magic));
        }
        let minor = r.u16()?;
        let major = r.u16()?;
        let version = ClassVersion::new(major, minor);
        if !version.is_supported() {
            return Err(FormatError::UnsupportedVersion { major, minor });
        }

        let pool = ConstantPool::parse(data, &mut r)?;

        let access = FlagSite::read(&mut r)?;
        let name = pool.class_name(r.u16()?)?;
        let super_name = pool.optional_class_name(r.u16()?)?;

        let interfaces_count = r.u16()? as usize;
        r.skip(interfaces_count * 2)?;

        let fields = parse_members(&mut r, &pool)?;
        let methods = parse_members(&mut r, &pool)?;

        let mut inner_classes = Vec::new();
        let attributes_count = r.u16()?;
        for _ in 0..attributes_count {
            let attr_off = r.pos();
            let attr_name = pool.utf8(r.u16()?)?;
            let len = r.u32()? as usize;
            if attr_name == INNER_CLASSES {
                let body = r.bytes(len)?;
                parse_inner_classes(body, attr_off + 6, &pool, &mut inner_classes)?;
            } else {
                r.skip(len)?;
            }
        }

        if !r.is_empty() {
            return Err(FormatError::TrailingData(r.pos()));
        }

        log::trace!(
            "decoded {name} ({version}): {} fields, {} methods, {} inner class entries",
            fields.len(),
            methods.len(),
            inner_classes.len()
        );

        Ok(Self {
            version,
            name,
            super_name,
            access,
            fields,
            methods,
            inner_classes,
        })
    }

    /// Every flag site in file order of kind: class, fields, methods, inner classes.
    pub fn flag_sites(&self) -> impl Iterator<Item = &FlagSite> + '_ {
        std::iter::once(&self.access)
            .chain(self.fields.iter().map(|f| &f.access))
            .chain(self.methods.iter().map(|m| &m.access))
            .chain(self.inner_classes.iter().map(|ic| &ic.access))
    }
}

fn parse_members(r: &mut Reader<'_>, pool: &ConstantPool<'_>) -> Result<Vec<MemberSkeleton>> {
    let count = r.u16()? as usize;
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        let access = FlagSite::read(r)?;
        let name = pool.utf8(r.u16()?)?;
        let descriptor = pool.utf8(r.u16()?)?;
        let attributes_count = r.u16()?;
        for _ in 0..attributes_count {
            r.skip(2)?; // attribute_name_index
            let len = r.u32()? as usize;
            r.skip(len)?;
        }
        members.push(MemberSkeleton {
            name,
            descriptor,
            access,
        });
    }
    Ok(members)
}

/// Decode an `InnerClasses` body. `base` is the file offset of `body[0]`.
fn parse_inner_classes(
    body: &[u8],
    base: usize,
    pool: &ConstantPool<'_>,
    out: &mut Vec<InnerClassEntry>,
) -> Result<()> {
    let malformed = FormatError::MalformedAttribute {
        name: INNER_CLASSES,
        offset: base,
    };
    let mut r = Reader::new(body);
    let count = r.u16().map_err(|_| malformed.clone())? as usize;
    if body.len() != 2 + count * 8 {
        return Err(malformed);
    }

    for _ in 0..count {
        let inner_class = pool.class_name(r.u16()?)?;
        let outer_class = pool.optional_class_name(r.u16()?)?;
        let inner_name = pool.optional_utf8(r.u16()?)?;
        let mut access = FlagSite::read(&mut r)?;
        access.offset += base;
        out.push(InnerClassEntry {
            inner_class,
            outer_class,
            inner_name,
            access,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_bounds() {
        assert!(ClassVersion::new(45, 3).is_supported());
        assert!(ClassVersion::new(52, 0).is_supported());
        assert!(ClassVersion::new(69, 0).is_supported());
        assert!(!ClassVersion::new(44, 0).is_supported());
        assert!(!ClassVersion::new(70, 0).is_supported());
        assert_eq!(ClassVersion::new(61, 0).to_string(), "61.0");
    }

    #[test]
    fn test_flag_site_write() {
        let mut data = vec![0xaa, 0x00, 0x02, 0xbb];
        let site = FlagSite {
            offset: 1,
            flags: AccessFlags::PRIVATE,
        };
        site.write(&mut data, AccessFlags::PUBLIC | AccessFlags::FINAL);
        assert_eq!(data, vec![0xaa, 0x00, 0x11, 0xbb]);
    }

    #[test]
    fn test_bad_magic() {
        let data = [0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 52, 0, 1];
        assert_eq!(
            ClassSkeleton::parse(&data).unwrap_err(),
            FormatError::InvalidMagic(0xdead_beef)
        );
    }

    #[test]
    fn test_unsupported_version() {
        let data = [0xca, 0xfe, 0xba, 0xbe, 0, 0, 0, 99, 0, 1];
        assert_eq!(
            ClassSkeleton::parse(&data).unwrap_err(),
            FormatError::UnsupportedVersion { major: 99, minor: 0 }
        );
    }
}
