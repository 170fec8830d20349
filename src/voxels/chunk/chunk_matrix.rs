//! # Chunk Matrix Module
//!
//! Sparse 2D map from chunk coordinates `(chunk_x, chunk_z)` to [`Chunk`]s.
//!
//! Chunks live in an arena (`Vec<Chunk>`) and are addressed through a hash map of their
//! coordinates. Arena indices are stable because slots are never freed, which lets the world
//! cache "last used chunk" lookups by index instead of by reference.

use std::collections::HashMap;

use cgmath::Point2;

use super::Chunk;

#[derive(Debug, Default)]
pub struct ChunkMatrix {
    chunks: Vec<Chunk>,
    index: HashMap<Point2<i32>, usize>,
    min_x: i32,
    max_x: i32,
    min_z: i32,
    max_z: i32,
}

impl ChunkMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena index of the chunk at `pos`, if it exists.
    #[inline]
    pub fn index_of(&self, pos: Point2<i32>) -> Option<usize> {
        self.index.get(&pos).copied()
    }

    /// Chunk at arena index `index`.
    ///
    /// # Panics
    /// Panics if `index` was not returned by this matrix.
    #[inline]
    pub fn chunk(&self, index: usize) -> &Chunk {
        &self.chunks[index]
    }

    /// Mutable chunk at arena index `index`.
    ///
    /// # Panics
    /// Panics if `index` was not returned by this matrix.
    #[inline]
    pub fn chunk_mut(&mut self, index: usize) -> &mut Chunk {
        &mut self.chunks[index]
    }

    pub fn get(&self, x: i32, z: i32) -> Option<&Chunk> {
        self.index_of(Point2::new(x, z)).map(|index| &self.chunks[index])
    }

    /// Arena index of the chunk at `pos`, creating an empty chunk if needed.
    pub fn get_or_insert(&mut self, pos: Point2<i32>) -> usize {
        if let Some(index) = self.index_of(pos) {
            return index;
        }
        let index = self.chunks.len();
        self.chunks.push(Chunk::new());
        self.index.insert(pos, index);
        if self.chunks.len() == 1 {
            self.min_x = pos.x;
            self.max_x = pos.x + 1;
            self.min_z = pos.y;
            self.max_z = pos.y + 1;
        } else {
            self.min_x = self.min_x.min(pos.x);
            self.max_x = self.max_x.max(pos.x + 1);
            self.min_z = self.min_z.min(pos.y);
            self.max_z = self.max_z.max(pos.y + 1);
        }
        index
    }

    /// Lowest chunk X (inclusive).
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Highest chunk X (exclusive).
    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Lowest chunk Z (inclusive).
    pub fn min_z(&self) -> i32 {
        self.min_z
    }

    /// Highest chunk Z (exclusive).
    pub fn max_z(&self) -> i32 {
        self.max_z
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterates `(chunk position, chunk)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Point2<i32>, &Chunk)> {
        self.index
            .iter()
            .map(move |(pos, index)| (*pos, &self.chunks[*index]))
    }
}
