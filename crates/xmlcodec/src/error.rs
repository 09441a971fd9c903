//! Error types for xmlcodec

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.start.line == 0 && self.end.line == 0
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    UnexpectedEof,
    MismatchedTag { expected: String, found: String },
    DuplicateAttribute { name: String },
    InvalidEntity { entity: String },
    InvalidUtf8,
    TrailingContent,
    InvalidInteger { element: String, text: String },
    IntegerOutOfRange { element: String, text: String },
    InvalidName { key: String },
    MultipleRoots { count: usize },
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

/// Broad failure class an [`ErrorKind`] belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Malformed XML handed to decode
    Parse,
    /// A `type` attribute whose text cannot be coerced
    Coercion,
    /// A tree that cannot be written as a single XML document
    Encoding,
    /// A configured decode limit was hit
    Limit,
}

impl ErrorKind {
    pub const fn category(&self) -> Category {
        match self {
            Self::InvalidToken
            | Self::UnexpectedEof
            | Self::MismatchedTag { .. }
            | Self::DuplicateAttribute { .. }
            | Self::InvalidEntity { .. }
            | Self::InvalidUtf8
            | Self::TrailingContent => Category::Parse,
            Self::InvalidInteger { .. } | Self::IntegerOutOfRange { .. } => Category::Coercion,
            Self::InvalidName { .. } | Self::MultipleRoots { .. } => Category::Encoding,
            Self::MaxDepthExceeded { .. } | Self::MaxSizeExceeded { .. } => Category::Limit,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidEntity { entity } => write!(f, "invalid xml entity: &{entity};"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::TrailingContent => write!(f, "content after root element"),
            Self::InvalidInteger { element, text } => {
                write!(f, "invalid integer in <{element}>: {text:?}")
            }
            Self::IntegerOutOfRange { element, text } => {
                write!(f, "integer out of range in <{element}>: {text:?}")
            }
            Self::InvalidName { key } => write!(f, "key cannot be an element name: {key:?}"),
            Self::MultipleRoots { count } => {
                write!(f, "document would have {count} root elements")
            }
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Main error type for xmlcodec
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    /// Error with no source position, used for coercion and encoding failures
    pub fn unpositioned(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::new(pos, pos))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

/// Result type alias for xmlcodec
pub type Result<T> = std::result::Result<T, Error>;
