use crate::constants::{CHUNK_SIZE, OVERSIZED_MIN};

/// Where a byte run lives: a chunk in the chain or an oversized block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Chunk(u32),
    Oversized(u32),
}

/// Index-based handle to a byte run owned by a [`ByteHeap`].
///
/// Handles stay valid for the lifetime of the heap: chunks and oversized
/// blocks are boxed, so growing the chunk table never moves their storage,
/// and nothing is ever freed before the heap itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRef {
    region: Region,
    offset: u32,
    len: u32,
}

impl ByteRef {
    pub(crate) const EMPTY: ByteRef = ByteRef {
        region: Region::Chunk(0),
        offset: 0,
        len: 0,
    };

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Same run, shorter length. Used when escape decoding shrinks a copy.
    pub(crate) fn truncated(self, len: usize) -> ByteRef {
        debug_assert!(len <= self.len as usize);
        ByteRef {
            len: len as u32,
            ..self
        }
    }
}

#[derive(Debug)]
struct Chunk {
    data: Box<[u8]>,
    cursor: usize,
}

impl Chunk {
    fn new(capacity: usize) -> Self {
        Chunk {
            data: vec![0u8; capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }
}

/// Chunked bump allocator backing one arena.
///
/// Storage is an ordered chain of fixed-size chunks, the last of which is
/// the tail receiving allocations, plus a side list of oversized blocks.
/// Nothing is released individually; dropping the heap frees every chunk
/// and every oversized block at once.
#[derive(Debug)]
pub(crate) struct ByteHeap {
    chunks: Vec<Chunk>,
    oversized: Vec<Box<[u8]>>,
}

impl ByteHeap {
    pub fn new() -> Self {
        ByteHeap {
            chunks: vec![Chunk::new(CHUNK_SIZE)],
            oversized: Vec::new(),
        }
    }

    /// Reserve `len` zeroed bytes aligned to `align` (a power of two).
    ///
    /// Requests at or above [`OVERSIZED_MIN`] bypass the chain entirely and
    /// are satisfied by a one-off block on the oversized list. Otherwise the
    /// tail cursor is aligned up and, if the tail cannot fit the request, a
    /// fresh chunk is appended and the allocation lands at its start.
    pub fn alloc(&mut self, len: usize, align: usize) -> ByteRef {
        debug_assert!(align.is_power_of_two());

        if len >= OVERSIZED_MIN {
            self.oversized.push(vec![0u8; len].into_boxed_slice());
            return ByteRef {
                region: Region::Oversized((self.oversized.len() - 1) as u32),
                offset: 0,
                len: len as u32,
            };
        }

        let mut tail = self.chunks.len() - 1;
        let mut cursor = align_up(self.chunks[tail].cursor, align);
        if cursor + len > self.chunks[tail].data.len() {
            self.chunks.push(Chunk::new(CHUNK_SIZE));
            tail += 1;
            cursor = 0;
        }
        self.chunks[tail].cursor = cursor + len;

        ByteRef {
            region: Region::Chunk(tail as u32),
            offset: cursor as u32,
            len: len as u32,
        }
    }

    /// Append `bytes` at the tail cursor, starting a fresh chunk sized to at
    /// least the data when the tail cannot hold it. Appends always stay in
    /// the chunk chain so [`ByteHeap::unify`] sees them in write order.
    pub fn append(&mut self, bytes: &[u8]) -> ByteRef {
        if bytes.len() > self.chunks[self.chunks.len() - 1].remaining() {
            self.chunks.push(Chunk::new(CHUNK_SIZE.max(bytes.len())));
        }

        let tail = self.chunks.len() - 1;
        let chunk = &mut self.chunks[tail];
        let offset = chunk.cursor;
        chunk.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        chunk.cursor += bytes.len();

        ByteRef {
            region: Region::Chunk(tail as u32),
            offset: offset as u32,
            len: bytes.len() as u32,
        }
    }

    pub fn bytes(&self, r: ByteRef) -> &[u8] {
        let start = r.offset as usize;
        let end = start + r.len as usize;
        match r.region {
            Region::Chunk(i) => &self.chunks[i as usize].data[start..end],
            Region::Oversized(i) => &self.oversized[i as usize][start..end],
        }
    }

    pub fn bytes_mut(&mut self, r: ByteRef) -> &mut [u8] {
        let start = r.offset as usize;
        let end = start + r.len as usize;
        match r.region {
            Region::Chunk(i) => &mut self.chunks[i as usize].data[start..end],
            Region::Oversized(i) => &mut self.oversized[i as usize][start..end],
        }
    }

    /// Flatten every chunk's live bytes, in chain order, into one contiguous
    /// buffer. Oversized blocks are not part of the chain and are skipped.
    pub fn unify(&self) -> Vec<u8> {
        let total: usize = self.chunks.iter().map(|chunk| chunk.cursor).sum();
        let mut out = Vec::with_capacity(total);
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.data[..chunk.cursor]);
        }
        out
    }

    #[cfg(test)]
    fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[cfg(test)]
    fn oversized_count(&self) -> usize {
        self.oversized.len()
    }
}

fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}
