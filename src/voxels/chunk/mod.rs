//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a vertical column of cells covering a
//! 16x16 horizontal tile of the world.
//!
//! ## Memory Optimization
//!
//! A chunk is stored as a stack of horizontal [`ChunkLayer`]s, one per Y level, and a layer is
//! only allocated the first time a cell at that height is written. Terrain is mostly air above
//! a thin surface, so most columns allocate only a handful of layers.
//!
//! - **Lookup**: O(1), a vector index plus an array index
//! - **Write**: O(1) amortized, may allocate one layer
//! - **Memory Usage**: 256 bytes per populated layer plus one pointer per Y level up to the
//!   highest written level, at most [`CHUNK_DY`] pointers
//!
//! Layers are never freed individually; they live as long as their chunk.

use super::block::{CellId, NO_CELL};

pub mod chunk_matrix;

/// Horizontal size of a chunk as a power of two.
pub const CHUNK_DX_SHIFT: i32 = 4;
/// Width and depth of a chunk in cells.
pub const CHUNK_DX: i32 = 1 << CHUNK_DX_SHIFT;
/// Mask extracting the chunk-local part of a world coordinate.
pub const CHUNK_DX_MASK: i32 = CHUNK_DX - 1;
/// Height of a chunk as a power of two.
pub const CHUNK_DY_SHIFT: i32 = 8;
/// Number of layers in a chunk. World Y runs from `0` to `CHUNK_DY - 1`.
pub const CHUNK_DY: i32 = 1 << CHUNK_DY_SHIFT;
/// Number of cells in one layer.
pub const CHUNK_LAYER_SIZE: usize = (CHUNK_DX * CHUNK_DX) as usize;

/// Chunk coordinate containing world coordinate `v`. Rounds toward negative infinity.
#[inline]
pub fn chunk_coord(v: i32) -> i32 {
    v >> CHUNK_DX_SHIFT
}

/// Chunk-local part of world coordinate `v`, always in `0..CHUNK_DX`.
#[inline]
pub fn local_coord(v: i32) -> usize {
    (v & CHUNK_DX_MASK) as usize
}

/// One horizontal slice of a chunk, stored row-major by Z then X.
#[derive(Clone, Debug)]
pub struct ChunkLayer {
    cells: [CellId; CHUNK_LAYER_SIZE],
}

impl Default for ChunkLayer {
    fn default() -> Self {
        ChunkLayer {
            cells: [NO_CELL; CHUNK_LAYER_SIZE],
        }
    }
}

impl ChunkLayer {
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> CellId {
        self.cells[(z << CHUNK_DX_SHIFT) + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, cell: CellId) {
        self.cells[(z << CHUNK_DX_SHIFT) + x] = cell;
    }

    /// The `CHUNK_DX` cells of row `z`, ordered by X.
    #[inline]
    pub fn row(&self, z: usize) -> &[CellId] {
        let start = z << CHUNK_DX_SHIFT;
        &self.cells[start..start + CHUNK_DX as usize]
    }

    /// All cells of the layer, rows of `CHUNK_DX` cells ordered by Z.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }
}

/// A vertical column of lazily allocated layers.
///
/// Coordinates passed to `get`/`set` are chunk-local in X and Z (`0..CHUNK_DX`) and absolute
/// in Y (`0..CHUNK_DY`).
#[derive(Clone, Debug, Default)]
pub struct Chunk {
    layers: Vec<Option<Box<ChunkLayer>>>,
    /// Lowest and highest Y with an allocated layer.
    populated: Option<(usize, usize)>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns [`NO_CELL`] when the layer at `y` was never written.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> CellId {
        match self.layers.get(y) {
            Some(Some(layer)) => layer.get(x, z),
            _ => NO_CELL,
        }
    }

    /// Writes a cell, allocating its layer on first use.
    ///
    /// Returns false and leaves the chunk untouched when `y` is outside `0..CHUNK_DY`.
    pub fn set(&mut self, x: usize, y: usize, z: usize, cell: CellId) -> bool {
        if y >= CHUNK_DY as usize {
            return false;
        }
        if y >= self.layers.len() {
            self.layers.resize_with(y + 1, || None);
        }
        let layer = self.layers[y].get_or_insert_with(Box::default);
        layer.set(x, z, cell);
        self.populated = Some(match self.populated {
            Some((min, max)) => (min.min(y), max.max(y)),
            None => (y, y),
        });
        true
    }

    /// The layer at `y`, if allocated.
    #[inline]
    pub fn layer(&self, y: usize) -> Option<&ChunkLayer> {
        self.layers.get(y).and_then(|layer| layer.as_deref())
    }

    /// Lowest populated Y, if any.
    pub fn min_layer(&self) -> Option<usize> {
        self.populated.map(|(min, _)| min)
    }

    /// Highest populated Y, if any.
    pub fn max_layer(&self) -> Option<usize> {
        self.populated.map(|(_, max)| max)
    }

    pub fn is_empty(&self) -> bool {
        self.populated.is_none()
    }
}
