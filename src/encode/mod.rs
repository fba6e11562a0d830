mod writer;

use crate::arena::Arena;
use crate::error::Error;
use crate::types::Value;
use crate::Result;
use writer::Writer;

/// Serialize `value` to JSON text.
///
/// The output buffer is owned by the caller and independent of the arena's
/// lifetime. Objects render in bucket iteration order.
///
/// String values store raw bytes; when any of them are not valid UTF-8 this
/// returns [`Error::InvalidUtf8`]. Use [`to_vec`] to render such trees.
pub fn to_string(arena: &Arena, value: Value) -> Result<String> {
    let bytes = to_vec(arena, value)?;
    String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
}

/// Byte-buffer variant of [`to_string`].
pub fn to_vec(arena: &Arena, value: Value) -> Result<Vec<u8>> {
    let mut writer = Writer::new();
    writer.write_value(arena, value, 0)?;
    Ok(writer.finish())
}
