pub mod array;
pub mod heap;
pub mod object;

pub use array::ArrayRef;
pub use heap::ByteRef;
pub use object::{ObjectIter, ObjectRef};

use crate::types::Value;
use array::ArrayHeader;
use heap::ByteHeap;
use object::{Entry, ObjectHeader};

/// Handle to an immutable string stored in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrRef(pub(crate) ByteRef);

impl StrRef {
    pub(crate) const EMPTY: StrRef = StrRef(ByteRef::EMPTY);

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Owns all memory for one parse/build session.
///
/// Every string, array and object constructed through an arena lives in its
/// chunked byte heap or in its typed pools, never in an individually-freed
/// allocation. Dropping the arena destroys the whole value tree in one
/// operation; there is no per-value teardown and no reference counting.
/// Container growth abandons the old storage run inside the arena rather
/// than reclaiming it.
#[derive(Debug)]
pub struct Arena {
    pub(crate) heap: ByteHeap,
    pub(crate) slots: Vec<Value>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) arrays: Vec<ArrayHeader>,
    pub(crate) objects: Vec<ObjectHeader>,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            heap: ByteHeap::new(),
            slots: Vec::new(),
            entries: Vec::new(),
            arrays: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Copy `s` into the arena and return a string value.
    pub fn new_string(&mut self, s: &str) -> Value {
        Value::String(self.alloc_str(s.as_bytes()))
    }

    /// Byte-slice variant of [`Arena::new_string`].
    pub fn new_string_bytes(&mut self, bytes: &[u8]) -> Value {
        Value::String(self.alloc_str(bytes))
    }

    /// Copy `raw` into the arena while decoding the eight standard backslash
    /// escapes (`\" \\ \/ \b \f \n \r \t`).
    ///
    /// An escape that is not recognized, including `\u`, truncates the copy
    /// at that point rather than erroring.
    pub fn new_string_escaped(&mut self, raw: &[u8]) -> Value {
        let r = self.heap.alloc(raw.len(), 1);
        let out = self.heap.bytes_mut(r);

        let mut src = 0;
        let mut dest = 0;
        while src < raw.len() {
            if raw[src] == b'\\' {
                src += 1;
                if src >= raw.len() {
                    break;
                }
                match unescape(raw[src]) {
                    Some(byte) => {
                        out[dest] = byte;
                        dest += 1;
                        src += 1;
                    }
                    None => break,
                }
            } else {
                out[dest] = raw[src];
                dest += 1;
                src += 1;
            }
        }

        Value::String(StrRef(r.truncated(dest)))
    }

    pub(crate) fn alloc_str(&mut self, bytes: &[u8]) -> StrRef {
        let r = self.heap.alloc(bytes.len(), 1);
        self.heap.bytes_mut(r).copy_from_slice(bytes);
        StrRef(r)
    }

    /// The stored bytes behind a string handle.
    pub fn str_bytes(&self, r: StrRef) -> &[u8] {
        self.heap.bytes(r.0)
    }

    /// The stored string, or `None` when the bytes are not valid UTF-8.
    pub fn get_str(&self, r: StrRef) -> Option<&str> {
        std::str::from_utf8(self.str_bytes(r)).ok()
    }

    /// Structural equality across arenas: scalar payloads, string bytes,
    /// array elements in order, and objects as a set of key/value pairs
    /// regardless of bucket layout. Duplicate keys compare by their first
    /// (probe-reachable) entry.
    ///
    /// The walk keeps its pending pairs on an explicit stack, so trees
    /// deeper than [`MAX_DEPTH`](crate::constants::MAX_DEPTH) compare fine
    /// even though they cannot be parsed or serialized.
    pub fn deep_eq(&self, a: Value, other: &Arena, b: Value) -> bool {
        let mut pending = vec![(a, b)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Value::Null, Value::Null) => {}
                (Value::Bool(x), Value::Bool(y)) if x == y => {}
                (Value::Int(x), Value::Int(y)) if x == y => {}
                (Value::Float(x), Value::Float(y)) if x == y => {}
                (Value::String(x), Value::String(y))
                    if self.str_bytes(x) == other.str_bytes(y) => {}
                (Value::Array(_), Value::Array(_)) => {
                    let xs = self.array_slice(a);
                    let ys = other.array_slice(b);
                    if xs.len() != ys.len() {
                        return false;
                    }
                    pending.extend(xs.iter().copied().zip(ys.iter().copied()));
                }
                (Value::Object(_), Value::Object(_)) => {
                    if self.object_len(a) != other.object_len(b) {
                        return false;
                    }
                    for (key, value) in self.object_iter(a) {
                        match other.object_get_bytes(b, self.str_bytes(key)) {
                            Some(found) => pending.push((value, found)),
                            None => return false,
                        }
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena::new()
    }
}

fn unescape(byte: u8) -> Option<u8> {
    match byte {
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        b'/' => Some(b'/'),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_strings() {
        let mut arena = Arena::new();

        let a = arena.new_string("Hello World");
        assert!(a.is_string());

        let b = arena.new_string_bytes(&b"Hello World"[..5]);
        let c = arena.new_string_escaped(b"Hello\\nWorld");

        let Value::String(a) = a else { unreachable!() };
        let Value::String(b) = b else { unreachable!() };
        let Value::String(c) = c else { unreachable!() };
        assert_eq!(arena.get_str(a), Some("Hello World"));
        assert_eq!(arena.get_str(b), Some("Hello"));
        assert_eq!(arena.get_str(c), Some("Hello\nWorld"));
    }

    #[rstest::rstest]
    #[case(br#"\""#, "\"")]
    #[case(br"\\", "\\")]
    #[case(br"\/", "/")]
    #[case(br"\b", "\u{8}")]
    #[case(br"\f", "\u{c}")]
    #[case(br"\n", "\n")]
    #[case(br"\r", "\r")]
    #[case(br"\t", "\t")]
    fn test_escape_decoding(#[case] raw: &[u8], #[case] expected: &str) {
        let mut arena = Arena::new();
        let Value::String(s) = arena.new_string_escaped(raw) else {
            unreachable!()
        };
        assert_eq!(arena.get_str(s), Some(expected));
    }

    #[rstest::rstest]
    fn test_unknown_escape_truncates() {
        let mut arena = Arena::new();

        let Value::String(s) = arena.new_string_escaped(b"abc\\unicode") else {
            unreachable!()
        };
        assert_eq!(arena.get_str(s), Some("abc"));

        let Value::String(s) = arena.new_string_escaped(b"tail\\") else {
            unreachable!()
        };
        assert_eq!(arena.get_str(s), Some("tail"));
    }

    #[rstest::rstest]
    fn test_deep_eq_across_arenas() {
        let mut left = Arena::new();
        let mut right = Arena::new();

        let object_left = left.new_object();
        let name = left.new_string("Ada");
        left.object_insert(object_left, "name", name);
        let mut items = Value::new_array();
        left.array_push(&mut items, Value::Int(1));
        left.array_push(&mut items, Value::Float(2.5));
        left.object_insert(object_left, "items", items);

        let object_right = right.new_object();
        let mut items = Value::new_array();
        right.array_push(&mut items, Value::Int(1));
        right.array_push(&mut items, Value::Float(2.5));
        right.object_insert(object_right, "items", items);
        let name = right.new_string("Ada");
        right.object_insert(object_right, "name", name);

        assert!(left.deep_eq(object_left, &right, object_right));

        right.object_insert(object_right, "extra", Value::Null);
        assert!(!left.deep_eq(object_left, &right, object_right));
    }

    #[rstest::rstest]
    fn test_deep_eq_handles_very_deep_trees() {
        // Far past what a recursive walk's call stack would survive.
        fn nested(arena: &mut Arena, depth: usize, bottom: Value) -> Value {
            let mut value = bottom;
            for _ in 0..depth {
                let mut outer = Value::new_array();
                arena.array_push(&mut outer, value);
                value = outer;
            }
            value
        }

        let mut left = Arena::new();
        let a = nested(&mut left, 100_000, Value::Null);
        let mut right = Arena::new();
        let b = nested(&mut right, 100_000, Value::Null);
        assert!(left.deep_eq(a, &right, b));

        let mut differs = Arena::new();
        let c = nested(&mut differs, 100_000, Value::Bool(true));
        assert!(!left.deep_eq(a, &differs, c));
    }
}
