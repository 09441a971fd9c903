//! Low-level input navigation shared by the parser

pub mod cursor;

pub use cursor::Cursor;
