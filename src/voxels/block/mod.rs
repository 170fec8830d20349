//! # Block Module
//!
//! This module provides the block-related vocabulary of the voxel core: the compact cell id
//! stored in chunks, the reserved sentinel ids, and the data-driven block definitions that
//! the registry classifies.
//!
//! Block behavior is described by data rather than by a type hierarchy. A [`BlockDef`] carries a
//! [`BlockVisibility`] class, which drives traversal and face culling, and a [`BlockKind`],
//! which the face emitter dispatches on.

pub mod block_registry;
pub mod block_side;

/// The underlying integer type used to represent a cell in memory.
pub type CellId = u8;

/// Empty space. Never rendered, always passable.
pub const NO_CELL: CellId = 0;

/// Fills the snapshot above the highest populated layer. Passable, never rendered.
pub const BOUND_SKY: CellId = 252;

/// Value read for any cell below `y = 0`, and the snapshot fill below the world floor.
/// Fully opaque and impassable, never rendered.
pub const BOUND_BOTTOM: CellId = 253;

/// Reserved for traversal bookkeeping.
pub const VISITED_OCCUPIED: CellId = 254;

/// Reserved for traversal bookkeeping.
pub const VISITED_CELL: CellId = 255;

/// First id that cannot be assigned to a user block.
pub const FIRST_RESERVED_ID: CellId = BOUND_SKY;

/// Returns true for ids owned by the engine rather than by block content.
#[inline]
pub fn is_reserved_id(id: CellId) -> bool {
    id >= FIRST_RESERVED_ID
}

/// How a block interacts with sight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockVisibility {
    /// Not rendered, light passes through.
    Invisible,
    /// Completely opaque; cells covered by this block are invisible.
    Opaque,
    /// Opaque, with a separate texture per face.
    OpaqueSeparateTx,
    /// Partially opaque; cells behind it can be visible. Rendered as a normal block.
    HalfOpaque,
    /// Partially opaque, with a separate texture per face.
    HalfOpaqueSeparateTx,
    /// Semi transparent; should be rendered last.
    HalfTransparent,
    /// World boundary: not rendered, blocks both sight and traversal.
    Boundary,
}

impl BlockVisibility {
    /// Blocks behind this block can be visible.
    pub fn can_pass(self) -> bool {
        matches!(
            self,
            BlockVisibility::Invisible
                | BlockVisibility::HalfOpaque
                | BlockVisibility::HalfOpaqueSeparateTx
                | BlockVisibility::HalfTransparent
        )
    }

    /// Block is fully opaque (all blocks behind are invisible).
    pub fn is_opaque(self) -> bool {
        matches!(
            self,
            BlockVisibility::Opaque | BlockVisibility::OpaqueSeparateTx | BlockVisibility::Boundary
        )
    }

    /// Block produces geometry when reached by the traversal.
    pub fn is_visible(self) -> bool {
        !matches!(self, BlockVisibility::Invisible | BlockVisibility::Boundary)
    }
}

/// Selects the face emission strategy for a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// Plain unit cube.
    #[default]
    Standard,
    /// Terrain block whose top face is smoothed against neighboring heights.
    TerrainSmoothing,
}

/// Definition of a single block type.
///
/// Definitions are registered once at startup in a
/// [`BlockRegistry`](block_registry::BlockRegistry) and are read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockDef {
    /// The cell id this definition describes.
    pub id: CellId,
    /// Human readable name.
    pub name: String,
    /// Visibility class.
    pub visibility: BlockVisibility,
    /// Face emission strategy.
    pub kind: BlockKind,
    /// Index of the block sprite in the texture atlas.
    pub tx_index: u32,
}

impl BlockDef {
    /// Creates a standard block definition.
    pub fn new(
        id: CellId,
        name: impl Into<String>,
        visibility: BlockVisibility,
        tx_index: u32,
    ) -> Self {
        BlockDef {
            id,
            name: name.into(),
            visibility,
            kind: BlockKind::Standard,
            tx_index,
        }
    }

    /// Creates a terrain block definition with a smoothed top face.
    pub fn terrain(
        id: CellId,
        name: impl Into<String>,
        visibility: BlockVisibility,
        tx_index: u32,
    ) -> Self {
        BlockDef {
            kind: BlockKind::TerrainSmoothing,
            ..BlockDef::new(id, name, visibility, tx_index)
        }
    }

    /// Placeholder used to fill ids nobody registered.
    pub fn undefined(id: CellId) -> Self {
        BlockDef::new(id, "undefined", BlockVisibility::Invisible, 0)
    }

    pub fn can_pass(&self) -> bool {
        self.visibility.can_pass()
    }

    pub fn is_opaque(&self) -> bool {
        self.visibility.is_opaque()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn terrain_smoothing(&self) -> bool {
        self.kind == BlockKind::TerrainSmoothing
    }
}
