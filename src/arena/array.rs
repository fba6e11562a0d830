use crate::arena::Arena;
use crate::constants::DEFAULT_ARRAY_CAPACITY;
use crate::types::Value;

/// Handle to an array's header inside its arena.
///
/// [`ArrayRef::EMPTY`] is the canonical empty array: it has no backing
/// allocation until the first push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRef(pub(crate) u32);

impl ArrayRef {
    pub(crate) const EMPTY: ArrayRef = ArrayRef(u32::MAX);
}

/// Array header: element run `start..start + len` in the arena's slot pool.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArrayHeader {
    pub start: u32,
    pub len: u32,
    pub capacity: u32,
}

impl Arena {
    /// Append `value` to `array`.
    ///
    /// The first push on the empty sentinel allocates a run of
    /// [`DEFAULT_ARRAY_CAPACITY`] slots and rebinds the handle. A push at
    /// capacity allocates a doubled run, copies the elements across, and
    /// abandons the old run inside the arena.
    ///
    /// # Panics
    ///
    /// Panics when `array` is not an array value.
    pub fn array_push(&mut self, array: &mut Value, value: Value) {
        let Value::Array(aref) = array else {
            panic!("array_push on a non-array value");
        };

        if *aref == ArrayRef::EMPTY {
            let start = self.slots.len() as u32;
            self.slots
                .extend(std::iter::repeat_n(Value::Null, DEFAULT_ARRAY_CAPACITY));
            self.slots[start as usize] = value;
            self.arrays.push(ArrayHeader {
                start,
                len: 1,
                capacity: DEFAULT_ARRAY_CAPACITY as u32,
            });
            *aref = ArrayRef((self.arrays.len() - 1) as u32);
            return;
        }

        let header = self.arrays[aref.0 as usize];
        if header.len < header.capacity {
            self.slots[(header.start + header.len) as usize] = value;
            self.arrays[aref.0 as usize].len += 1;
            return;
        }

        let new_capacity = header.capacity * 2;
        let new_start = self.slots.len() as u32;
        let start = header.start as usize;
        let len = header.len as usize;
        self.slots.extend_from_within(start..start + len);
        self.slots.push(value);
        self.slots
            .extend(std::iter::repeat_n(Value::Null, new_capacity as usize - len - 1));
        self.arrays[aref.0 as usize] = ArrayHeader {
            start: new_start,
            len: header.len + 1,
            capacity: new_capacity,
        };
    }

    /// Number of elements; 0 for the empty sentinel and for non-arrays.
    pub fn array_len(&self, array: Value) -> usize {
        match array {
            Value::Array(aref) if aref != ArrayRef::EMPTY => {
                self.arrays[aref.0 as usize].len as usize
            }
            _ => 0,
        }
    }

    /// Element at `index`, or `None` when out of range.
    pub fn array_get(&self, array: Value, index: usize) -> Option<Value> {
        self.array_slice(array).get(index).copied()
    }

    /// The live element run. Empty for the sentinel and for non-arrays.
    pub fn array_slice(&self, array: Value) -> &[Value] {
        match array {
            Value::Array(aref) if aref != ArrayRef::EMPTY => {
                let header = &self.arrays[aref.0 as usize];
                let start = header.start as usize;
                &self.slots[start..start + header.len as usize]
            }
            _ => &[],
        }
    }
}
