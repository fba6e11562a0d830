/// Size in bytes of a regular heap chunk.
pub const CHUNK_SIZE: usize = 4096;

/// Requests at or above this size bypass the chunk chain and get their own
/// individually-tracked block.
pub const OVERSIZED_MIN: usize = 2046;

/// Capacity of an array's first element run.
pub const DEFAULT_ARRAY_CAPACITY: usize = 8;

/// Bucket count of a freshly created object table.
pub const DEFAULT_OBJECT_CAPACITY: usize = 16;

/// Objects grow when count/capacity reaches 7/8.
pub const LOAD_FACTOR_NUM: u32 = 7;
pub const LOAD_FACTOR_DEN: u32 = 8;

/// Maximum nesting depth accepted by the parser and the serializer.
pub const MAX_DEPTH: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{parse, to_string, Arena, Error, Value};

    #[rstest::rstest]
    fn test_max_depth_boundary() {
        let mut input = String::new();
        for _ in 0..MAX_DEPTH {
            input.push('[');
        }
        input.push_str("null");
        for _ in 0..MAX_DEPTH {
            input.push(']');
        }

        let mut arena = Arena::new();
        assert!(parse(&mut arena, input.as_bytes()).is_ok());

        let too_deep = format!("[{input}]");
        let mut arena = Arena::new();
        assert_eq!(
            parse(&mut arena, too_deep.as_bytes()),
            Err(Error::DepthLimit)
        );
    }

    #[rstest::rstest]
    fn test_max_depth_boundary_encode() {
        let mut arena = Arena::new();
        let mut value = Value::Null;
        for _ in 0..=MAX_DEPTH {
            let mut outer = Value::new_array();
            arena.array_push(&mut outer, value);
            value = outer;
        }

        assert_eq!(to_string(&arena, value), Err(Error::DepthLimit));
    }
}
