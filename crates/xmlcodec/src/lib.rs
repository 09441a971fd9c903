//! xmlcodec - codec between nested key-value trees and type-annotated XML
//!
//! Keys are snake_case on the Rust side and hyphen-case on the wire.
//! Decoding understands `type="integer"`, `type="boolean"`, `type="array"`
//! and `nil="true"`; encoding writes plain elements only.
//!
//! # Quick Start
//!
//! ```
//! use xmlcodec::{decode, encode, Value};
//! # fn main() -> Result<(), xmlcodec::Error> {
//! let tree = decode(
//!     "<customer><first-name>Ada</first-name><age type=\"integer\">36</age></customer>",
//! )?;
//! let customer = tree.get("customer").and_then(Value::as_object);
//! assert_eq!(
//!     customer.and_then(|c| c.get("age")).and_then(Value::as_integer),
//!     Some(36)
//! );
//!
//! let xml = encode(&tree)?;
//! assert!(xml.contains("<first-name>Ada</first-name>"));
//! # Ok(())
//! # }
//! ```
//!
//! Sequences are not symmetric: encoding writes repeated sibling elements,
//! while decoding only builds a sequence from a `type="array"` wrapper.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Category, Error, ErrorKind, Pos, Result, Span};

pub mod lexer;

pub mod name;
pub use name::{is_valid_key, to_element_name, to_key};

pub mod value;
pub use value::{Array, Object, Value};

pub mod xml;
pub use xml::{
    Config, Content as XmlContent, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser, MAX_DEPTH_CEILING,
};

pub mod decode;
pub use decode::{decode, decode_document, decode_with_config};

pub mod encode;
pub use encode::{encode, escape, XML_DECLARATION};

/// Parse XML text into an element tree without reducing it
pub fn parse_document(xml: &str) -> Result<XmlDocument> {
    XmlParser::new(xml.as_bytes()).parse()
}
