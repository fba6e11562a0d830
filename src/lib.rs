//! Arena-backed JSON parsing, construction and serialization.
//!
//! Every value built through an [`Arena`] lives in arena-owned storage and
//! is torn down in one operation when the arena is dropped. Parsing builds
//! the final value tree directly, and serialization renders it back through
//! a scratch arena, so neither path does per-node heap management.
//!
//! ```
//! use arena_json::{parse, to_string, Arena, Value};
//!
//! let mut arena = Arena::new();
//! let value = parse(&mut arena, br#"{"greeting": "hello"}"#)?;
//! assert!(value.is_object());
//! let text = to_string(&arena, value)?;
//! # Ok::<(), arena_json::Error>(())
//! ```

pub mod arena;
pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod types;

pub use crate::arena::{Arena, ArrayRef, ObjectIter, ObjectRef, StrRef};
pub use crate::error::Error;
pub use crate::types::Value;

pub type Result<T> = std::result::Result<T, Error>;

/// Parse one JSON value from `input` into `arena`.
pub fn parse(arena: &mut Arena, input: &[u8]) -> Result<Value> {
    decode::parse(arena, input)
}

/// String-slice variant of [`parse`].
pub fn parse_str(arena: &mut Arena, input: &str) -> Result<Value> {
    decode::parse(arena, input.as_bytes())
}

/// Serialize `value` to an owned JSON string.
pub fn to_string(arena: &Arena, value: Value) -> Result<String> {
    encode::to_string(arena, value)
}

/// Serialize `value` to an owned JSON byte buffer.
pub fn to_vec(arena: &Arena, value: Value) -> Result<Vec<u8>> {
    encode::to_vec(arena, value)
}
