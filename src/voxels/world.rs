//! # World Module
//!
//! This module provides the `World` struct, the entry point of the voxel core. It owns the
//! chunk storage, the viewer position and the snapshot used for visibility queries.
//!
//! ## Architecture
//!
//! - Cells are stored sparsely in a [`ChunkMatrix`]; chunks and layers appear on first write
//! - Reads go through a small LRU cache of recently used chunks before hitting the hash map
//! - Visibility queries run on a [`VolumeData`] snapshot that is rebuilt whenever the viewer
//!   moves or the world changes, then swept by [`VisibilityTraversal`]
//!
//! Chunks are never unloaded.
//!
//! ## Borrowing
//!
//! Visitors receive `&World` while a traversal runs, so the snapshot and traversal buffers sit
//! behind a `RefCell`. Starting a second traversal from inside a visitor returns
//! [`WorldError::TraversalInProgress`].

use std::{cell::RefCell, num::NonZeroUsize, rc::Rc};

use cgmath::{Point2, Point3};
use log::{info, warn};
use lru::LruCache;
use web_time::Instant;

use super::block::{block_registry::BlockRegistry, CellId, BOUND_BOTTOM, NO_CELL};
use super::chunk::{chunk_coord, chunk_matrix::ChunkMatrix, local_coord, CHUNK_DY};
use super::config::WorldConfig;
use super::direction::Position;
use super::error::WorldError;
use super::terrain::HeightMap;
use super::visibility::{CellVisitor, TraversalStats, VisibilityTraversal};
use super::volume::VolumeData;

/// Snapshot plus the traversal that sweeps it.
struct ViewState {
    volume: VolumeData,
    traversal: VisibilityTraversal,
    /// World revision the snapshot was built from.
    revision: u64,
}

/// A sparse voxel world.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use voxel_sight::{BlockRegistry, World, WorldConfig};
///
/// let registry = Rc::new(BlockRegistry::with_default_blocks());
/// let mut world = World::new(WorldConfig::default(), registry).unwrap();
///
/// world.set_cell(1, 2, 3, 5);
/// assert_eq!(world.get_cell(1, 2, 3), 5);
/// assert_eq!(world.get_cell(1, 3, 3), 0);
/// ```
pub struct World {
    config: WorldConfig,
    registry: Rc<BlockRegistry>,
    chunks: ChunkMatrix,
    chunk_cache: RefCell<LruCache<Point2<i32>, usize>>,
    cam_position: Position,
    revision: u64,
    view: RefCell<ViewState>,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Errors
    ///
    /// - [`WorldError::RegistryNotFinalized`] if `registry` still accepts registrations
    /// - any error of [`WorldConfig::validate`]
    pub fn new(config: WorldConfig, registry: Rc<BlockRegistry>) -> Result<Self, WorldError> {
        config.validate()?;
        if !registry.is_finalized() {
            return Err(WorldError::RegistryNotFinalized);
        }

        let dist_bits = config.snapshot_dist_bits();
        let cache_capacity =
            NonZeroUsize::new(config.chunk_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        info!(
            "Creating world: view distance {}, snapshot side {}, {} bytes",
            config.max_view_distance,
            2 << dist_bits,
            config.snapshot_bytes()
        );

        let view = ViewState {
            volume: VolumeData::new(dist_bits),
            traversal: VisibilityTraversal::new(&config),
            revision: 0,
        };

        Ok(World {
            config,
            registry,
            chunks: ChunkMatrix::new(),
            chunk_cache: RefCell::new(LruCache::new(cache_capacity)),
            cam_position: Position::default(),
            revision: 0,
            view: RefCell::new(view),
        })
    }

    /// The validated configuration the world was created with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The finalized block registry shared with the caller.
    pub fn registry(&self) -> &Rc<BlockRegistry> {
        &self.registry
    }

    /// Raw chunk storage, for building snapshots outside the world.
    pub fn chunks(&self) -> &ChunkMatrix {
        &self.chunks
    }

    /// Incremented on every cell write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Reads a cell.
    ///
    /// Cells below `y = 0` read as [`BOUND_BOTTOM`]; cells that were never written, including
    /// everything at or above [`CHUNK_DY`], read as [`NO_CELL`].
    pub fn get_cell(&self, x: i32, y: i32, z: i32) -> CellId {
        if y < 0 {
            return BOUND_BOTTOM;
        }
        match self.chunk_index(Point2::new(chunk_coord(x), chunk_coord(z))) {
            Some(index) => self
                .chunks
                .chunk(index)
                .get(local_coord(x), y as usize, local_coord(z)),
            None => NO_CELL,
        }
    }

    /// Writes a cell, creating its chunk and layer on first use.
    ///
    /// # Arguments
    ///
    /// * `x`, `y`, `z` - World coordinates of the cell
    /// * `cell` - Block id to store; [`NO_CELL`] clears the cell
    ///
    /// Writes below `y = 0` or at `y >= CHUNK_DY` are ignored with a warning.
    pub fn set_cell(&mut self, x: i32, y: i32, z: i32, cell: CellId) {
        if y < 0 {
            warn!("Ignoring write of {} below the world floor at ({}, {}, {})", cell, x, y, z);
            return;
        }
        if y >= CHUNK_DY {
            warn!("Ignoring write of {} above the world top at ({}, {}, {})", cell, x, y, z);
            return;
        }
        let pos = Point2::new(chunk_coord(x), chunk_coord(z));
        let index = self.chunks.get_or_insert(pos);
        self.chunk_cache.get_mut().put(pos, index);
        self.chunks
            .chunk_mut(index)
            .set(local_coord(x), y as usize, local_coord(z), cell);
        self.revision += 1;
    }

    /// Whether the cell at `pos` blocks sight.
    pub fn is_opaque(&self, pos: Point3<i32>) -> bool {
        self.registry.is_opaque(self.get_cell(pos.x, pos.y, pos.z))
    }

    fn chunk_index(&self, pos: Point2<i32>) -> Option<usize> {
        let mut cache = self.chunk_cache.borrow_mut();
        if let Some(&index) = cache.get(&pos) {
            return Some(index);
        }
        let index = self.chunks.index_of(pos)?;
        cache.put(pos, index);
        Some(index)
    }

    /// Viewer position used by [`visit_from_camera`](Self::visit_from_camera).
    pub fn cam_position(&self) -> &Position {
        &self.cam_position
    }

    pub fn set_cam_position(&mut self, position: Position) {
        self.cam_position = position;
    }

    /// Rebuilds the snapshot around `pos`.
    ///
    /// [`visit_visible_cells`](Self::visit_visible_cells) does this on its own when needed.
    pub fn rebuild_volume(&self, pos: Point3<i32>) -> Result<(), WorldError> {
        let mut view = self
            .view
            .try_borrow_mut()
            .map_err(|_| WorldError::TraversalInProgress)?;
        view.volume.rebuild(&self.chunks, pos);
        view.revision = self.revision;
        Ok(())
    }

    /// Runs `f` on the current snapshot.
    pub fn with_volume<R>(&self, f: impl FnOnce(&VolumeData) -> R) -> Result<R, WorldError> {
        let view = self
            .view
            .try_borrow()
            .map_err(|_| WorldError::TraversalInProgress)?;
        Ok(f(&view.volume))
    }

    /// Reports every visible cell around `position` to `visitor`.
    ///
    /// The snapshot is rebuilt first if the viewer moved or a cell changed since the last
    /// build.
    ///
    /// # Errors
    ///
    /// [`WorldError::TraversalInProgress`] when called from inside a visitor.
    pub fn visit_visible_cells<V: CellVisitor + ?Sized>(
        &self,
        position: &Position,
        visitor: &mut V,
    ) -> Result<TraversalStats, WorldError> {
        let mut view = self
            .view
            .try_borrow_mut()
            .map_err(|_| WorldError::TraversalInProgress)?;
        let ViewState {
            volume,
            traversal,
            revision,
        } = &mut *view;

        if volume.center() != Some(position.pos) || *revision != self.revision {
            volume.rebuild(&self.chunks, position.pos);
            *revision = self.revision;
        }
        traversal.run(volume, &self.registry, position, visitor, self)
    }

    /// [`visit_visible_cells`](Self::visit_visible_cells) from the camera position.
    pub fn visit_from_camera<V: CellVisitor + ?Sized>(
        &self,
        visitor: &mut V,
    ) -> Result<TraversalStats, WorldError> {
        let position = self.cam_position;
        self.visit_visible_cells(&position, visitor)
    }

    /// Fills terrain columns from a height map.
    ///
    /// Column `(x, z)` of the map lands at world `(origin.x + x, origin.y + z)` and is filled
    /// with `block` from `y = 0` up to `base_y + height` inclusive.
    pub fn apply_heightmap(
        &mut self,
        map: &HeightMap,
        origin: Point2<i32>,
        base_y: i32,
        block: CellId,
    ) {
        let start = Instant::now();
        let size = map.size();
        let mut cells = 0usize;
        for z in 0..size {
            for x in 0..size {
                let top = base_y + map.height(x, z);
                for y in 0..=top {
                    self.set_cell(origin.x + x as i32, y, origin.y + z as i32, block);
                    cells += 1;
                }
            }
        }
        info!(
            "Applied {}x{} height map at {:?}: {} cells in {:?}",
            size,
            size,
            origin,
            cells,
            start.elapsed()
        );
    }
}
