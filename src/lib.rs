#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sight
//!
//! Sparse voxel storage with fast discovery of the cells a viewer can see.
//!
//! ## Key Modules
//!
//! * `voxels` - Cell storage in chunks, the block registry, viewer directions, the snapshot
//!   and the visibility traversal
//! * `meshing` - A visitor that turns reported faces into quads
//!
//! ## Architecture
//!
//! ```text
//! ChunkMatrix --rebuild--> VolumeData --sweep--> VisibilityTraversal --reports--> CellVisitor
//!                                                        |
//!                                                  BlockRegistry
//! ```
//!
//! The world keeps cells in sparse 16x16 chunk columns. Before a query it copies the cube
//! around the viewer into a dense snapshot, then sweeps that snapshot outward through empty
//! space. Only cells reachable from the viewer are touched, so the cost follows the visible
//! surface rather than the view volume.
//!
//! ## Usage
//!
//! ```rust
//! use std::rc::Rc;
//! use voxel_sight::{BlockRegistry, Dir, Position, VisitRecorder, World, WorldConfig};
//! use cgmath::Point3;
//!
//! let registry = Rc::new(BlockRegistry::with_default_blocks());
//! let mut world = World::new(WorldConfig::default(), registry).unwrap();
//! world.set_cell(0, 0, -4, 1);
//!
//! let mut recorder = VisitRecorder::new();
//! let position = Position::new(Point3::new(0, 0, 0), Dir::North);
//! let stats = world.visit_visible_cells(&position, &mut recorder).unwrap();
//! assert_eq!(stats.cells_reported, 1);
//! ```

use log::info;

pub mod meshing;
pub mod voxels;

pub use meshing::{Face, FaceBuilder, PackedFace};
pub use voxels::{
    block::{
        block_registry::BlockRegistry, block_side::FaceMask, BlockDef, BlockKind, BlockVisibility,
        CellId,
    },
    config::{ViewCone, WorldConfig},
    direction::{Dir, DirEx, Direction, Position},
    error::WorldError,
    terrain::HeightMap,
    visibility::{CellVisitor, TraversalStats, VisibilityTraversal, VisitRecorder},
    volume::VolumeData,
    world::World,
};

/// Initializes `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Calling it again after a logger is installed has no effect.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    if log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init()
        .is_ok()
    {
        info!("Logger initialized");
    }
}
