use crate::error::FormatError;

/// Decode a Modified UTF-8 (MUTF-8) byte sequence into a Rust String.
///
/// `base` is the file offset of `bytes[0]`, used only for error reporting.
///
/// MUTF-8 differences from standard UTF-8:
/// - Null character (U+0000) is encoded as 0xC0 0x80 (a raw 0x00 byte is invalid)
/// - Supplementary characters (U+10000+) use surrogate pairs encoded as two 3-byte sequences
pub fn decode_mutf8(bytes: &[u8], base: usize) -> Result<String, FormatError> {
    // Fast path: the vast majority of class file names are plain ASCII.
    if bytes.iter().all(|&b| b != 0 && b < 0x80) {
        return Ok(bytes.iter().map(|&b| b as char).collect());
    }

    let mut result = String::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        if b == 0 {
            return Err(FormatError::InvalidMutf8(base + pos));
        }

        if b & 0x80 == 0 {
            // Single byte: 0xxxxxxx
            result.push(b as char);
            pos += 1;
        } else if b & 0xe0 == 0xc0 {
            // Two bytes: 110xxxxx 10xxxxxx
            if pos + 1 >= bytes.len() {
                return Err(FormatError::InvalidMutf8(base + pos));
            }
            let b2 = bytes[pos + 1];
            if b2 & 0xc0 != 0x80 {
                return Err(FormatError::InvalidMutf8(base + pos));
            }
            let cp = ((b as u32 & 0x1f) << 6) | (b2 as u32 & 0x3f);
            if let Some(c) = char::from_u32(cp) {
                result.push(c);
            }
            pos += 2;
        } else if b & 0xf0 == 0xe0 {
            // Three bytes: 1110xxxx 10xxxxxx 10xxxxxx
            if pos + 2 >= bytes.len() {
                return Err(FormatError::InvalidMutf8(base + pos));
            }
            let b2 = bytes[pos + 1];
            let b3 = bytes[pos + 2];
            if (b2 & 0xc0 != 0x80) || (b3 & 0xc0 != 0x80) {
                return Err(FormatError::InvalidMutf8(base + pos));
            }
            let cp = ((b as u32 & 0x0f) << 12) | ((b2 as u32 & 0x3f) << 6) | (b3 as u32 & 0x3f);

            if (0xD800..=0xDBFF).contains(&cp) {
                // High surrogate: must be followed by a well-formed low surrogate.
                if pos + 5 >= bytes.len() {
                    return Err(FormatError::InvalidMutf8(base + pos));
                }
                let b4 = bytes[pos + 3];
                let b5 = bytes[pos + 4];
                let b6 = bytes[pos + 5];
                if b4 & 0xf0 != 0xe0 || b5 & 0xc0 != 0x80 || b6 & 0xc0 != 0x80 {
                    return Err(FormatError::InvalidMutf8(base + pos + 3));
                }
                let cp2 = ((b4 as u32 & 0x0f) << 12) | ((b5 as u32 & 0x3f) << 6) | (b6 as u32 & 0x3f);
                if !(0xDC00..=0xDFFF).contains(&cp2) {
                    return Err(FormatError::InvalidMutf8(base + pos + 3));
                }
                let supplementary = 0x10000 + ((cp - 0xD800) << 10) + (cp2 - 0xDC00);
                let c = char::from_u32(supplementary)
                    .ok_or(FormatError::InvalidMutf8(base + pos))?;
                result.push(c);
                pos += 6;
                continue;
            }
            // Lone low surrogates have no scalar value and are rejected here.
            let c = char::from_u32(cp).ok_or(FormatError::InvalidMutf8(base + pos))?;
            result.push(c);
            pos += 3;
        } else {
            return Err(FormatError::InvalidMutf8(base + pos));
        }
    }

    Ok(result)
}

/// Encode a string as Modified UTF-8.
pub fn encode_mutf8(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007f => out.push(unit as u8),
            0x0000 | 0x0080..=0x07ff => {
                out.push(0xc0 | ((unit >> 6) & 0x1f) as u8);
                out.push(0x80 | (unit & 0x3f) as u8);
            }
            _ => {
                out.push(0xe0 | ((unit >> 12) & 0x0f) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3f) as u8);
                out.push(0x80 | (unit & 0x3f) as u8);
            }
        }
    }
    out
}
