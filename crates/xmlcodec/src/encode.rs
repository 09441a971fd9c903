//! Value tree to XML text
//!
//! Mappings become nested elements, scalars become element text and a
//! sequence under key `k` becomes repeated `<k>` siblings. No attributes are
//! written, so integers and booleans decode back as strings and sequences
//! do not decode back as sequences unless the receiving side adds
//! `type="array"` wrappers.

use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::name::{is_valid_key, to_element_name};
use crate::value::{Object, Value};

/// Declaration line every encoded document starts with
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>"#;

/// Encode a tree as an XML document
///
/// The single top-level key names the root element. An empty tree encodes
/// to the declaration line alone.
///
/// # Errors
///
/// Returns an [`ErrorKind::InvalidName`] error for a key that is not a valid
/// element name, and [`ErrorKind::MultipleRoots`] when the tree would produce
/// more than one root element.
#[instrument(level = "debug", skip_all, fields(entries = root.len()))]
pub fn encode(root: &Object) -> Result<String> {
    let count: usize = root.values().map(element_count).sum();
    if count > 1 {
        return Err(Error::unpositioned(ErrorKind::MultipleRoots { count }));
    }

    let body = serialize_object(root)?;
    let xml = if body.is_empty() {
        XML_DECLARATION.to_string()
    } else {
        format!("{XML_DECLARATION}\n{body}")
    };

    debug!(bytes = xml.len(), "encoded document");
    Ok(xml)
}

/// Escape the five XML special characters
///
/// `&` goes first so the ampersands introduced by later replacements stay
/// intact. Input that already contains entities is escaped again.
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn element_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.iter().map(element_count).sum(),
        _ => 1,
    }
}

fn serialize_object(obj: &Object) -> Result<String> {
    let mut parts = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        let part = serialize_entry(key, value)?;
        if !part.is_empty() {
            parts.push(part);
        }
    }
    Ok(parts.join("\n"))
}

fn serialize_entry(key: &str, value: &Value) -> Result<String> {
    if !is_valid_key(key) {
        return Err(Error::unpositioned(ErrorKind::InvalidName {
            key: key.to_string(),
        }));
    }
    let name = to_element_name(key);

    match value {
        Value::Object(obj) => {
            let children = serialize_object(obj)?;
            Ok(format!("<{name}>\n{children}\n</{name}>"))
        }
        Value::Array(items) => {
            let mut siblings = Vec::with_capacity(items.len());
            for item in items {
                let sibling = serialize_entry(key, item)?;
                if !sibling.is_empty() {
                    siblings.push(sibling);
                }
            }
            Ok(siblings.join("\n"))
        }
        scalar => {
            let text = scalar.scalar_text().unwrap_or_default();
            Ok(format!("<{name}>{}</{name}>", escape(&text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(entries: Vec<(&str, Value)>) -> Object {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_escape_order() {
        assert_eq!(escape("5 & 6"), "5 &amp; 6");
        assert_eq!(escape("&amp;"), "&amp;amp;");
        assert_eq!(
            escape(r#"<a href="x">'y'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&apos;y&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_empty_tree_is_declaration_only() -> Result<()> {
        assert_eq!(encode(&Object::new())?, XML_DECLARATION);
        Ok(())
    }

    #[test]
    fn test_scalar_root() -> Result<()> {
        let tree = object(vec![("amount", Value::from("10.00"))]);
        assert_eq!(
            encode(&tree)?,
            format!("{XML_DECLARATION}\n<amount>10.00</amount>")
        );
        Ok(())
    }

    #[test]
    fn test_nested_mapping_layout() -> Result<()> {
        let card = object(vec![
            ("number", Value::from("4111")),
            ("expiration_date", Value::from("05/2030")),
        ]);
        let tree = object(vec![(
            "transaction",
            Value::Object(object(vec![
                ("amount", Value::from("1.00")),
                ("credit_card", Value::Object(card)),
            ])),
        )]);

        let expected = [
            XML_DECLARATION,
            "<transaction>",
            "<amount>1.00</amount>",
            "<credit-card>",
            "<number>4111</number>",
            "<expiration-date>05/2030</expiration-date>",
            "</credit-card>",
            "</transaction>",
        ]
        .join("\n");
        assert_eq!(encode(&tree)?, expected);
        Ok(())
    }

    #[test]
    fn test_sequence_becomes_repeated_siblings() -> Result<()> {
        let tree = object(vec![(
            "search",
            Value::Object(object(vec![(
                "ids",
                Value::from(vec![Value::from("a"), Value::from("b")]),
            )])),
        )]);

        let expected = [
            XML_DECLARATION,
            "<search>",
            "<ids>a</ids>",
            "<ids>b</ids>",
            "</search>",
        ]
        .join("\n");
        assert_eq!(encode(&tree)?, expected);
        Ok(())
    }

    #[test]
    fn test_non_string_scalars() -> Result<()> {
        let tree = object(vec![(
            "r",
            Value::Object(object(vec![
                ("count", Value::Integer(-4)),
                ("flag", Value::Bool(false)),
                ("gone", Value::Null),
            ])),
        )]);
        let xml = encode(&tree)?;
        assert!(xml.contains("<count>-4</count>"));
        assert!(xml.contains("<flag>false</flag>"));
        assert!(xml.contains("<gone></gone>"));
        assert!(!xml.contains("type="));
        Ok(())
    }

    #[test]
    fn test_invalid_key_rejected() {
        let tree = object(vec![(
            "root",
            Value::Object(object(vec![("bad key", Value::from("x"))])),
        )]);
        let err = encode(&tree).err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::InvalidName { key }) if key == "bad key"
        ));
    }

    #[test]
    fn test_multiple_roots_rejected() {
        let tree = object(vec![("a", Value::from("1")), ("b", Value::from("2"))]);
        let err = encode(&tree).err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::MultipleRoots { count: 2 })
        );

        let listed = object(vec![(
            "a",
            Value::from(vec![Value::from("1"), Value::from("2")]),
        )]);
        assert!(encode(&listed).is_err());
    }
}
