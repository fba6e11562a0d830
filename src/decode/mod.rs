mod lexer;
mod parser;

use crate::arena::Arena;
use crate::types::Value;
use crate::Result;
use parser::Parser;

/// Parse exactly one JSON value starting at offset 0 of `input`, building
/// it in `arena`. Trailing bytes after a complete value are never read.
///
/// The first lexical or grammatical error aborts the parse; whatever was
/// built so far stays in the arena but is not exposed.
pub fn parse(arena: &mut Arena, input: &[u8]) -> Result<Value> {
    Parser::new(arena, input).parse_value(0)
}
