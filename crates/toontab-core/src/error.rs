//! Error types for TOON encoding and decoding operations.

use thiserror::Error;

/// Errors raised by the encoder's input validation.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The top-level value was not a JSON array.
    #[error("expected a JSON array of objects, found {found}")]
    NotAnArray { found: &'static str },

    /// An array element was null, an array, or a scalar instead of an object.
    #[error("array element at index {index} is not an object (found {found})")]
    ElementNotObject { index: usize, found: &'static str },
}

/// Errors raised by the decoder. Only the document structure and the header
/// line can fail; row-level anomalies degrade to documented fallback values
/// or the count advisory instead.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The document has no room for a header plus at least one data line.
    #[error("document has {lines} line(s); a header line and at least one data line are required")]
    TooFewLines { lines: usize },

    /// The first line does not match the header grammar.
    #[error("malformed header {line:?}: expected `name[count]{{field1,field2,...}}:`")]
    MalformedHeader { line: String },
}
