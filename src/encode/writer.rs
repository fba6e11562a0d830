use crate::arena::heap::ByteHeap;
use crate::arena::Arena;
use crate::constants::MAX_DEPTH;
use crate::error::Error;
use crate::types::Value;
use crate::Result;

/// Recursive serializer writing fragments into a scratch heap.
///
/// The scratch heap is separate from the value tree's arena and is dropped
/// after [`Writer::finish`] unifies the fragments, so output length never
/// needs to be computed up front.
pub(crate) struct Writer {
    scratch: ByteHeap,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            scratch: ByteHeap::new(),
        }
    }

    pub fn write_value(&mut self, arena: &Arena, value: Value, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimit);
        }

        match value {
            Value::Null => self.write_bytes(b"null"),
            Value::Bool(true) => self.write_bytes(b"true"),
            Value::Bool(false) => self.write_bytes(b"false"),
            Value::Int(n) => {
                let mut buffer = itoa::Buffer::new();
                self.write_bytes(buffer.format(n).as_bytes());
            }
            Value::Float(f) => self.write_float(f),
            Value::String(s) => self.write_escaped(arena.str_bytes(s)),
            Value::Array(_) => {
                self.write_bytes(b"[");
                for (i, element) in arena.array_slice(value).iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b",");
                    }
                    self.write_value(arena, *element, depth + 1)?;
                }
                self.write_bytes(b"]");
            }
            Value::Object(_) => {
                self.write_bytes(b"{");
                let mut first = true;
                for (key, entry) in arena.object_iter(value) {
                    if !first {
                        self.write_bytes(b",");
                    }
                    first = false;
                    // Keys keep their source spelling; see the parser.
                    self.write_bytes(b"\"");
                    self.write_bytes(arena.str_bytes(key));
                    self.write_bytes(b"\":");
                    self.write_value(arena, entry, depth + 1)?;
                }
                self.write_bytes(b"}");
            }
        }

        Ok(())
    }

    /// Unify the scratch fragments into one contiguous buffer owned by the
    /// caller; the scratch heap is dropped here.
    pub fn finish(self) -> Vec<u8> {
        self.scratch.unify()
    }

    fn write_float(&mut self, f: f64) {
        // Non-finite floats have no JSON spelling.
        if f.is_finite() {
            let mut buffer = ryu::Buffer::new();
            self.write_bytes(buffer.format_finite(f).as_bytes());
        } else {
            self.write_bytes(b"null");
        }
    }

    /// Quote and re-encode with the same eight escapes the decoder accepts.
    fn write_escaped(&mut self, s: &[u8]) {
        self.write_bytes(b"\"");

        let mut start = 0;
        for (i, &byte) in s.iter().enumerate() {
            let escape: &[u8] = match byte {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                b'/' => b"\\/",
                0x08 => b"\\b",
                0x0c => b"\\f",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                _ => continue,
            };
            self.write_bytes(&s[start..i]);
            self.write_bytes(escape);
            start = i + 1;
        }
        self.write_bytes(&s[start..]);

        self.write_bytes(b"\"");
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.scratch.append(bytes);
    }
}
