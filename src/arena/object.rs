use crate::arena::{Arena, StrRef};
use crate::constants::{DEFAULT_OBJECT_CAPACITY, LOAD_FACTOR_DEN, LOAD_FACTOR_NUM};
use crate::types::Value;

/// Handle to an object's header inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef(pub(crate) u32);

/// Object header: bucket run `start..start + capacity` in the arena's entry
/// pool. `count` is the number of occupied buckets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ObjectHeader {
    pub start: u32,
    pub capacity: u32,
    pub count: u32,
}

/// One bucket of the open-addressing table. A hash of zero marks an empty
/// bucket, so a key that hashes to exactly zero would be mistaken for one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub hash: u64,
    pub key: StrRef,
    pub value: Value,
}

impl Entry {
    const EMPTY: Entry = Entry {
        hash: 0,
        key: StrRef::EMPTY,
        value: Value::Null,
    };
}

/// FNV-1a over the key bytes, 64-bit.
pub(crate) fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl Arena {
    /// Allocate an object with [`DEFAULT_OBJECT_CAPACITY`] empty buckets.
    pub fn new_object(&mut self) -> Value {
        let start = self.entries.len() as u32;
        self.entries
            .extend(std::iter::repeat_n(Entry::EMPTY, DEFAULT_OBJECT_CAPACITY));
        self.objects.push(ObjectHeader {
            start,
            capacity: DEFAULT_OBJECT_CAPACITY as u32,
            count: 0,
        });
        Value::Object(ObjectRef((self.objects.len() - 1) as u32))
    }

    /// Insert `key -> value`, copying the key into the arena.
    ///
    /// Keys are not deduplicated: inserting an existing key creates a shadow
    /// entry reachable only via iteration, while [`Arena::object_get`] keeps
    /// returning the first probe match.
    ///
    /// # Panics
    ///
    /// Panics when `object` is not an object value.
    pub fn object_insert(&mut self, object: Value, key: &str, value: Value) {
        let Value::Object(obj) = object else {
            panic!("object_insert on a non-object value");
        };
        let key = self.alloc_str(key.as_bytes());
        self.object_insert_ref(obj, key, value);
    }

    pub(crate) fn object_insert_ref(&mut self, obj: ObjectRef, key: StrRef, value: Value) {
        let header = self.objects[obj.0 as usize];
        let count = header.count + 1;
        self.objects[obj.0 as usize].count = count;

        if count * LOAD_FACTOR_DEN >= header.capacity * LOAD_FACTOR_NUM {
            self.object_grow(obj);
        }

        let hash = fnv1a(self.heap.bytes(key.0));
        self.object_place(obj, hash, key, value);
    }

    /// Probe linearly from the hashed bucket to the first empty one.
    fn object_place(&mut self, obj: ObjectRef, hash: u64, key: StrRef, value: Value) {
        let header = self.objects[obj.0 as usize];
        let start = header.start as usize;
        let capacity = header.capacity as usize;

        let mut bucket = (hash % capacity as u64) as usize;
        while self.entries[start + bucket].hash != 0 {
            bucket += 1;
            if bucket == capacity {
                bucket = 0;
            }
        }
        self.entries[start + bucket] = Entry { hash, key, value };
    }

    /// Allocate a doubled bucket run and reinsert every live entry by its
    /// stored hash. The old run is abandoned inside the arena.
    fn object_grow(&mut self, obj: ObjectRef) {
        let old = self.objects[obj.0 as usize];
        let new_capacity = old.capacity * 2;
        let new_start = self.entries.len() as u32;
        self.entries
            .extend(std::iter::repeat_n(Entry::EMPTY, new_capacity as usize));
        self.objects[obj.0 as usize] = ObjectHeader {
            start: new_start,
            capacity: new_capacity,
            count: old.count,
        };

        for i in 0..old.capacity as usize {
            let entry = self.entries[old.start as usize + i];
            if entry.hash == 0 {
                continue;
            }
            self.object_place(obj, entry.hash, entry.key, entry.value);
        }
    }

    /// Look up `key`; first probe match wins. Returns `None` on reaching an
    /// empty bucket, which is sound because entries are never deleted and
    /// rehashing leaves no tombstones.
    pub fn object_get(&self, object: Value, key: &str) -> Option<Value> {
        self.object_get_bytes(object, key.as_bytes())
    }

    pub(crate) fn object_get_bytes(&self, object: Value, key: &[u8]) -> Option<Value> {
        let Value::Object(obj) = object else {
            return None;
        };
        let header = &self.objects[obj.0 as usize];
        let start = header.start as usize;
        let capacity = header.capacity as usize;
        let hash = fnv1a(key);

        let mut bucket = (hash % capacity as u64) as usize;
        loop {
            let entry = &self.entries[start + bucket];
            if entry.hash == hash && self.heap.bytes(entry.key.0) == key {
                return Some(entry.value);
            }
            if entry.hash == 0 {
                return None;
            }
            bucket += 1;
            if bucket == capacity {
                bucket = 0;
            }
        }
    }

    /// Number of entries, shadowed duplicates included. 0 for non-objects.
    pub fn object_len(&self, object: Value) -> usize {
        match object {
            Value::Object(obj) => self.objects[obj.0 as usize].count as usize,
            _ => 0,
        }
    }

    /// Lazy, single-pass iteration over occupied buckets in bucket-index
    /// order (not key-insertion order). Empty for non-objects.
    pub fn object_iter(&self, object: Value) -> ObjectIter<'_> {
        let (start, capacity) = match object {
            Value::Object(obj) => {
                let header = &self.objects[obj.0 as usize];
                (header.start as usize, header.capacity as usize)
            }
            _ => (0, 0),
        };
        ObjectIter {
            arena: self,
            start,
            capacity,
            bucket: 0,
        }
    }
}

/// Iterator over an object's `(key, value)` entries in bucket order.
#[derive(Debug)]
pub struct ObjectIter<'a> {
    arena: &'a Arena,
    start: usize,
    capacity: usize,
    bucket: usize,
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = (StrRef, Value);

    fn next(&mut self) -> Option<Self::Item> {
        while self.bucket < self.capacity {
            let entry = &self.arena.entries[self.start + self.bucket];
            self.bucket += 1;
            if entry.hash != 0 {
                return Some((entry.key, entry.value));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_fnv1a_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_ne!(fnv1a(b"name"), 0);
    }

    #[rstest::rstest]
    fn test_insert_and_get() {
        let mut arena = Arena::new();
        let object = arena.new_object();

        arena.object_insert(object, "name", Value::Int(1));
        arena.object_insert(object, "age", Value::Int(2));

        assert_eq!(arena.object_len(object), 2);
        assert_eq!(arena.object_get(object, "name"), Some(Value::Int(1)));
        assert_eq!(arena.object_get(object, "age"), Some(Value::Int(2)));
        assert_eq!(arena.object_get(object, "absent"), None);
    }

    #[rstest::rstest]
    fn test_growth_preserves_entries() {
        let mut arena = Arena::new();
        let object = arena.new_object();

        // Enough keys to cross the load-factor threshold several times.
        for i in 0..200 {
            let key = format!("key{i}");
            arena.object_insert(object, &key, Value::Int(i));
        }

        assert_eq!(arena.object_len(object), 200);
        for i in 0..200 {
            let key = format!("key{i}");
            assert_eq!(arena.object_get(object, &key), Some(Value::Int(i)));
        }
        assert_eq!(arena.object_get(object, "key200"), None);
    }

    #[rstest::rstest]
    fn test_duplicate_keys_shadow() {
        let mut arena = Arena::new();
        let object = arena.new_object();

        arena.object_insert(object, "k", Value::Int(1));
        arena.object_insert(object, "k", Value::Int(2));

        // Lookup sees the first probe match; iteration sees both entries.
        assert_eq!(arena.object_get(object, "k"), Some(Value::Int(1)));
        assert_eq!(arena.object_len(object), 2);
        assert_eq!(arena.object_iter(object).count(), 2);
    }

    #[rstest::rstest]
    fn test_iteration_covers_all_entries() {
        let mut arena = Arena::new();
        let object = arena.new_object();

        for i in 0..50 {
            let key = format!("k{i}");
            arena.object_insert(object, &key, Value::Int(i));
        }

        let mut seen: Vec<i64> = arena
            .object_iter(object)
            .map(|(_, value)| value.as_int().unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[rstest::rstest]
    fn test_iter_on_non_object_is_empty() {
        let arena = Arena::new();
        assert_eq!(arena.object_iter(Value::Null).count(), 0);
        assert_eq!(arena.object_len(Value::Null), 0);
    }
}
