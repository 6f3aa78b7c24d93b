use crate::error::{Result, RuleError};
use crate::name::ClassName;

/// Rewrite every class reference (`Lname;`) inside a field or method
/// descriptor. Names for which `map_class` returns `None` are kept.
///
/// Primitive types, array dimensions and parentheses are copied as-is.
pub fn remap_descriptor<F>(descriptor: &str, map_class: F) -> Result<String>
where
    F: Fn(&str) -> Option<ClassName>,
{
    let malformed = |index| RuleError::MalformedDescriptor {
        descriptor: descriptor.to_owned(),
        index,
    };

    let mut out = String::with_capacity(descriptor.len());
    let mut rest = descriptor;
    while let Some(c) = rest.chars().next() {
        let index = descriptor.len() - rest.len();
        match c {
            'L' => {
                let end = rest.find(';').ok_or_else(|| malformed(index))?;
                let name = &rest[1..end];
                if name.is_empty() {
                    return Err(malformed(index));
                }
                out.push('L');
                match map_class(name) {
                    Some(mapped) => out.push_str(mapped.as_str()),
                    None => out.push_str(name),
                }
                out.push(';');
                rest = &rest[end + 1..];
            }
            'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' | 'V' | '[' | '(' | ')' => {
                out.push(c);
                rest = &rest[1..];
            }
            _ => return Err(malformed(index)),
        }
    }
    Ok(out)
}
