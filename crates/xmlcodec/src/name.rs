//! Conversion between snake_case keys and hyphen-case element names

/// Convert a key into the element name used on the wire
pub fn to_element_name(key: &str) -> String {
    key.replace('_', "-")
}

/// Convert an element name back into a key
pub fn to_key(element_name: &str) -> String {
    element_name.replace('-', "_")
}

/// Whether `key` converts to a well-formed element name that converts back to `key`
///
/// Accepted keys start with an ASCII letter and continue with ASCII letters,
/// digits or underscores.
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
