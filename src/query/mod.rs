//! Gallery configuration from URL-style query strings.
//!
//! Parses strings like `?direction=column&columns=3&margin=4` into
//! [`GalleryOptions`]. Parsing never fails: bad values and unknown keys are
//! reported as [`ParseWarning`]s and the affected setting keeps its default.
//!
//! # Example
//!
//! ```
//! use photolayout::{Direction, query};
//!
//! let result = query::parse("direction=column&cols=3&margin=4");
//! assert!(result.warnings.is_empty());
//! assert_eq!(result.options.direction, Direction::Column);
//! assert_eq!(result.options.margin, 4.0);
//! ```

mod parse;

use alloc::string::String;
use alloc::vec::Vec;

use crate::gallery::GalleryOptions;

/// Result of parsing a gallery query string.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed options, defaults where nothing valid was given.
    pub options: GalleryOptions,
    /// Non-fatal parse warnings.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal warning from query string parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A key appeared more than once (last value wins).
    DuplicateKey { key: String, value: String },
    /// A key was not recognized.
    KeyNotRecognized { key: String, value: String },
    /// A key was recognized but its value could not be parsed.
    ValueInvalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Parse a gallery query string (with or without leading `?`).
pub fn parse(query: &str) -> ParseResult {
    let (options, warnings) = parse::parse_query(query);
    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "gallery query produced warnings");
    }
    ParseResult { options, warnings }
}
