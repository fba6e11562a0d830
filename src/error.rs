use thiserror::Error;

use crate::constants::MAX_DEPTH;

/// Failure reported by the parser or the serializer.
///
/// Parse failures abort at the first lexical or grammatical error; there is
/// no recovery and no partial tree. The byte offset always refers to the
/// start of the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The grammar required a specific construct and found something else.
    #[error("expected {expected} at index {offset} but found {found}")]
    Expected {
        expected: &'static str,
        found: &'static str,
        offset: usize,
    },

    /// A token that cannot start a value, including invalid tokens escalated
    /// from the lexer.
    #[error("unexpected {found} at index {offset}")]
    Unexpected { found: &'static str, offset: usize },

    /// Input or value tree nested deeper than [`MAX_DEPTH`].
    #[error("nesting exceeds the maximum depth of {}", MAX_DEPTH)]
    DepthLimit,

    /// A string value holds bytes that are not valid UTF-8, so the tree
    /// cannot render to a `String`. Byte-oriented output still works.
    #[error("string bytes are not valid UTF-8")]
    InvalidUtf8,
}

impl Error {
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Expected { offset, .. } | Error::Unexpected { offset, .. } => Some(*offset),
            Error::DepthLimit | Error::InvalidUtf8 => None,
        }
    }
}
