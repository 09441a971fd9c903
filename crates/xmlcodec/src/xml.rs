//! XML element tree and the parser that produces it

pub mod model;
pub mod parser;

pub use model::{Content, Document, Element};
pub use parser::{Config, Parser, MAX_DEPTH_CEILING};
