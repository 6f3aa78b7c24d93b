use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("File too small: {0} bytes")]
    FileTooSmall(usize),

    #[error("Invalid magic: expected 0xCAFEBABE, found {0:#010x}")]
    InvalidMagic(u32),

    #[error("Unsupported class file version: {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("Unexpected end of data at offset {0:#x} (file size: {1:#x})")]
    UnexpectedEof(usize, usize),

    #[error("Invalid constant pool tag {0} at offset {1:#x}")]
    InvalidConstantTag(u8, usize),

    #[error("Constant pool index {index} is not a {expected} entry")]
    InvalidConstantIndex { index: u16, expected: &'static str },

    #[error("Invalid MUTF-8 encoding at offset {0:#x}")]
    InvalidMutf8(usize),

    #[error("Malformed {name} attribute at offset {offset:#x}")]
    MalformedAttribute { name: &'static str, offset: usize },

    #[error("Trailing data after class structure at offset {0:#x}")]
    TrailingData(usize),
}

pub type Result<T> = std::result::Result<T, FormatError>;
