//! XML text to value tree
//!
//! Decoding parses the text into an element tree and reduces each element
//! to a [`Value`]. The `type` and `nil` attributes steer the reduction; every
//! other attribute is ignored.

use std::num::IntErrorKind;

use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::name::to_key;
use crate::value::{Array, Object, Value};
use crate::xml::{Config, Document, Element, Parser};

const TYPE_ATTRIBUTE: &str = "type";
const NIL_ATTRIBUTE: &str = "nil";

/// Coercion requested by an element's `type` attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypeHint {
    Integer,
    Array,
    Boolean,
}

impl TypeHint {
    fn of(element: &Element) -> Option<Self> {
        match element.attribute(TYPE_ATTRIBUTE)? {
            "integer" => Some(Self::Integer),
            "array" => Some(Self::Array),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// Decode an XML document into a tree using the default parser limits
///
/// Empty input decodes to an empty tree without being parsed.
///
/// # Errors
///
/// Returns a parse error for malformed XML and an
/// [`ErrorKind::InvalidInteger`] error for a `type="integer"` element whose
/// text is not a base-10 integer, or [`ErrorKind::IntegerOutOfRange`] when it
/// does not fit in an `i64`.
pub fn decode(xml: &str) -> Result<Object> {
    decode_with_config(xml, Config::default())
}

/// Decode an XML document with explicit parser limits
///
/// # Errors
///
/// Same as [`decode`], plus limit errors when `config` is exceeded.
#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn decode_with_config(xml: &str, config: Config) -> Result<Object> {
    if xml.is_empty() {
        debug!("empty input, nothing to decode");
        return Ok(Object::new());
    }

    let document = Parser::with_config(xml.as_bytes(), config).parse()?;
    let tree = decode_document(&document)?;
    debug!(root = %document.root.name, "decoded document");
    Ok(tree)
}

/// Reduce an already parsed document into a single-entry tree keyed by the root name
///
/// # Errors
///
/// Returns an [`ErrorKind::InvalidInteger`] or [`ErrorKind::IntegerOutOfRange`]
/// error on a failed integer coercion.
pub fn decode_document(document: &Document) -> Result<Object> {
    let mut tree = Object::with_capacity(1);
    tree.insert(to_key(&document.root.name), reduce(&document.root)?);
    Ok(tree)
}

fn reduce(element: &Element) -> Result<Value> {
    match (TypeHint::of(element), element.sole_text()) {
        (Some(TypeHint::Integer), Some(text)) => return parse_integer(element, text),
        (Some(TypeHint::Array), _) => return reduce_array(element),
        // Boolean text is compared verbatim, unlike integer text which is trimmed
        (Some(TypeHint::Boolean), Some(text)) => return Ok(Value::Bool(text == "true")),
        _ => {}
    }

    if element.children.is_empty() && element.has_attribute(NIL_ATTRIBUTE, "true") {
        return Ok(Value::Null);
    }

    // Covers a single text child, no children at all, and text split by comments
    if element.is_text_only() {
        return Ok(Value::String(element.text()));
    }

    reduce_children(element)
}

fn parse_integer(element: &Element, text: &str) -> Result<Value> {
    text.trim().parse::<i64>().map(Value::Integer).map_err(|e| {
        let element = element.name.clone();
        let text = text.to_string();
        let kind = match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                ErrorKind::IntegerOutOfRange { element, text }
            }
            _ => ErrorKind::InvalidInteger { element, text },
        };
        Error::unpositioned(kind)
    })
}

/// Child tag names are discarded; only the reduced values are kept
fn reduce_array(element: &Element) -> Result<Value> {
    let mut items = Array::new();
    for child in element.child_elements() {
        let value = reduce(child)?;
        if !value.is_null() {
            items.push(value);
        }
    }
    Ok(Value::Array(items))
}

fn reduce_children(element: &Element) -> Result<Value> {
    let mut obj = Object::new();
    for child in element.child_elements() {
        let value = reduce(child)?;
        if value.is_null() {
            trace!(element = %child.name, "dropping nil element");
            continue;
        }
        let key = to_key(&child.name);
        if obj.insert(key, value).is_some() {
            warn!(
                parent = %element.name,
                element = %child.name,
                "repeated sibling without type=\"array\"; keeping the last one"
            );
        }
    }
    Ok(Value::Object(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Category;

    fn decoded(xml: &str) -> Result<Value> {
        decode(xml).map(Value::Object)
    }

    fn tree(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_empty_input() -> Result<()> {
        assert!(decode("")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_integer_coercion() -> Result<()> {
        let value = decoded("<a><b type='integer'>1</b><c>2</c></a>")?;
        let expected = tree(vec![(
            "a",
            tree(vec![("b", Value::Integer(1)), ("c", Value::from("2"))]),
        )]);
        assert_eq!(value, expected);
        Ok(())
    }

    #[test]
    fn test_negative_and_padded_integers() -> Result<()> {
        assert_eq!(
            decoded("<n type=\"integer\">-42</n>")?,
            tree(vec![("n", Value::Integer(-42))])
        );
        assert_eq!(
            decoded("<n type=\"integer\"> 7 </n>")?,
            tree(vec![("n", Value::Integer(7))])
        );
        assert_eq!(
            decoded("<n type=\"integer\">+5</n>")?,
            tree(vec![("n", Value::Integer(5))])
        );
        Ok(())
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = decode("<a type=\"integer\">12345678901234567890</a>").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::IntegerOutOfRange { element, text })
                if element == "a" && text == "12345678901234567890"
        ));
        assert_eq!(err.as_ref().map(Error::category), Some(Category::Coercion));
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("integer out of range in <a>: \"12345678901234567890\"".to_string())
        );
    }

    #[test]
    fn test_integer_coercion_error() {
        let err = decode("<a><b type='integer'>ten</b></a>").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::InvalidInteger { element, text }) if element == "b" && text == "ten"
        ));
    }

    #[test]
    fn test_array_discards_child_tags() -> Result<()> {
        let value = decoded("<a type='array'><x>1</x><y>2</y></a>")?;
        assert_eq!(
            value,
            tree(vec![("a", Value::from(vec![Value::from("1"), Value::from("2")]))])
        );
        Ok(())
    }

    #[test]
    fn test_array_of_mappings_and_nils() -> Result<()> {
        let xml = "<ids type=\"array\">\
                   <item><id type=\"integer\">1</id></item>\
                   <item nil=\"true\"/>\
                   <item><id type=\"integer\">2</id></item>\
                   </ids>";
        let value = decoded(xml)?;
        let expected = tree(vec![(
            "ids",
            Value::from(vec![
                tree(vec![("id", Value::Integer(1))]),
                tree(vec![("id", Value::Integer(2))]),
            ]),
        )]);
        assert_eq!(value, expected);
        Ok(())
    }

    #[test]
    fn test_empty_array() -> Result<()> {
        assert_eq!(
            decoded("<list type=\"array\"/>")?,
            tree(vec![("list", Value::Array(Array::new()))])
        );
        Ok(())
    }

    #[test]
    fn test_boolean_coercion() -> Result<()> {
        let cases = [
            ("true", true),
            ("false", false),
            ("nope", false),
            ("TRUE", false),
            (" true ", false),
        ];
        for (text, expected) in cases {
            let xml = format!("<a type='boolean'>{text}</a>");
            assert_eq!(decoded(&xml)?, tree(vec![("a", Value::Bool(expected))]));
        }
        Ok(())
    }

    #[test]
    fn test_nil_dropped_from_parent() -> Result<()> {
        let value = decoded("<p><a nil='true'></a><b>x</b></p>")?;
        assert_eq!(value, tree(vec![("p", tree(vec![("b", Value::from("x"))]))]));
        Ok(())
    }

    #[test]
    fn test_nil_root_kept() -> Result<()> {
        assert_eq!(decoded("<p nil=\"true\"/>")?, tree(vec![("p", Value::Null)]));
        Ok(())
    }

    #[test]
    fn test_nil_with_type_attribute() -> Result<()> {
        let value = decoded("<p><n type=\"integer\" nil=\"true\"/></p>")?;
        assert_eq!(value, tree(vec![("p", tree(Vec::new()))]));
        Ok(())
    }

    #[test]
    fn test_empty_element_is_empty_string() -> Result<()> {
        assert_eq!(decoded("<a></a>")?, tree(vec![("a", Value::from(""))]));
        assert_eq!(
            decoded("<a type=\"integer\"/>")?,
            tree(vec![("a", Value::from(""))])
        );
        Ok(())
    }

    #[test]
    fn test_unknown_attributes_ignored() -> Result<()> {
        let value = decoded("<a type=\"datetime\" nil=\"false\">2024-01-01</a>")?;
        assert_eq!(value, tree(vec![("a", Value::from("2024-01-01"))]));
        Ok(())
    }

    #[test]
    fn test_text_fragments_concatenated() -> Result<()> {
        let value = decoded("<a>foo<!-- split -->bar</a>")?;
        assert_eq!(value, tree(vec![("a", Value::from("foobar"))]));
        Ok(())
    }

    #[test]
    fn test_names_converted_to_keys() -> Result<()> {
        let value = decoded("<credit-card><expiration-month>05</expiration-month></credit-card>")?;
        assert_eq!(
            value,
            tree(vec![(
                "credit_card",
                tree(vec![("expiration_month", Value::from("05"))])
            )])
        );
        Ok(())
    }

    #[test]
    fn test_repeated_siblings_keep_last() -> Result<()> {
        let value = decoded("<r><id>a</id><id>b</id></r>")?;
        assert_eq!(value, tree(vec![("r", tree(vec![("id", Value::from("b"))]))]));
        Ok(())
    }

    #[test]
    fn test_mixed_content_keeps_elements() -> Result<()> {
        let value = decoded("<r>stray<a>1</a></r>")?;
        assert_eq!(value, tree(vec![("r", tree(vec![("a", Value::from("1"))]))]));
        Ok(())
    }

    #[test]
    fn test_unlimited_depth_stops_at_ceiling() {
        let xml = "<a>".repeat(200_000) + &"</a>".repeat(200_000);
        let err = decode_with_config(&xml, Config::unlimited()).err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::MaxDepthExceeded {
                max: crate::xml::MAX_DEPTH_CEILING
            })
        );
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(decode("<a><b></a>").is_err());
        assert!(decode("   ").is_err());
    }
}
