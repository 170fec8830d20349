//! # Block Registry Module
//!
//! Table of block definitions indexed by [`CellId`], with derived boolean tables used on the
//! traversal hot path.
//!
//! ## Lifecycle
//!
//! 1. Create with [`BlockRegistry::new`] (reserved ids are pre-registered)
//! 2. [`register`](BlockRegistry::register) every block type
//! 3. [`finalize`](BlockRegistry::finalize) once; every id now resolves to a definition
//! 4. Share the registry (usually as `Rc<BlockRegistry>`) with the world; it is read-only from
//!    here on
//!
//! The derived tables (`can_pass`, `is_opaque`, `is_visible`, `terrain_smoothing`) are 256-bit
//! arrays refreshed on every registration, so a lookup is a single bit test.

use bitvec::prelude::*;
use log::{debug, trace};

use super::{is_reserved_id, BlockDef, BlockVisibility, CellId, BOUND_BOTTOM, BOUND_SKY, NO_CELL};
use crate::voxels::error::WorldError;

/// Number of distinct cell ids.
pub const BLOCK_ID_COUNT: usize = 256;

type BlockTable = BitArr!(for BLOCK_ID_COUNT, in u64, Lsb0);

/// Registry of block definitions.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    defs: Vec<Option<BlockDef>>,
    can_pass: BlockTable,
    opaque: BlockTable,
    visible: BlockTable,
    terrain_smoothing: BlockTable,
    finalized: bool,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Creates a registry holding only the engine-owned ids (empty, sky, bottom).
    pub fn new() -> Self {
        let mut registry = BlockRegistry {
            defs: vec![None; BLOCK_ID_COUNT],
            can_pass: bitarr![u64, Lsb0; 0; BLOCK_ID_COUNT],
            opaque: bitarr![u64, Lsb0; 0; BLOCK_ID_COUNT],
            visible: bitarr![u64, Lsb0; 0; BLOCK_ID_COUNT],
            terrain_smoothing: bitarr![u64, Lsb0; 0; BLOCK_ID_COUNT],
            finalized: false,
        };
        registry.insert(BlockDef::new(NO_CELL, "empty", BlockVisibility::Invisible, 0));
        registry.insert(BlockDef::new(BOUND_SKY, "sky", BlockVisibility::Invisible, 0));
        registry.insert(BlockDef::new(BOUND_BOTTOM, "bottom", BlockVisibility::Boundary, 0));
        registry
    }

    /// Creates and finalizes a registry with the built-in block set.
    pub fn with_default_blocks() -> Self {
        let mut registry = Self::new();
        let defs = [
            BlockDef::new(1, "gray_brick", BlockVisibility::Opaque, 0),
            BlockDef::new(2, "brick", BlockVisibility::Opaque, 1),
            BlockDef::new(3, "bedrock", BlockVisibility::Opaque, 2),
            BlockDef::new(4, "clay", BlockVisibility::Opaque, 3),
            BlockDef::new(5, "cobblestone", BlockVisibility::Opaque, 4),
            BlockDef::new(6, "gravel", BlockVisibility::Opaque, 5),
            BlockDef::new(7, "red_sand", BlockVisibility::Opaque, 6),
            BlockDef::new(8, "sand", BlockVisibility::Opaque, 7),
            BlockDef::terrain(9, "grass", BlockVisibility::Opaque, 8),
            BlockDef::new(10, "glass", BlockVisibility::HalfTransparent, 9),
        ];
        for def in defs {
            // built-in ids are below the reserved range and the registry is not finalized yet
            registry.insert(def);
        }
        registry.finalize();
        registry
    }

    /// Inserts or overwrites the definition at `def.id` and refreshes the derived tables.
    ///
    /// Re-registering an identical definition is a no-op.
    ///
    /// # Errors
    /// - [`WorldError::ReservedBlockId`] if `def.id` is one of the engine-owned ids
    /// - [`WorldError::RegistryFinalized`] if [`finalize`](Self::finalize) already ran
    pub fn register(&mut self, def: BlockDef) -> Result<(), WorldError> {
        if self.finalized {
            return Err(WorldError::RegistryFinalized);
        }
        if is_reserved_id(def.id) {
            return Err(WorldError::ReservedBlockId(def.id));
        }
        if self.defs[def.id as usize].as_ref() == Some(&def) {
            trace!("Block {} ({}) already registered", def.id, def.name);
            return Ok(());
        }
        self.insert(def);
        Ok(())
    }

    fn insert(&mut self, def: BlockDef) {
        let id = def.id as usize;
        self.can_pass.set(id, def.can_pass());
        self.opaque.set(id, def.is_opaque());
        self.visible.set(id, def.is_visible());
        self.terrain_smoothing.set(id, def.terrain_smoothing());
        debug!("Registered block {} ({:?}, {:?})", def.name, def.visibility, def.kind);
        self.defs[id] = Some(def);
    }

    /// Fills every unregistered id with an invisible placeholder, making lookups total.
    ///
    /// Calling it more than once has no further effect.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        let mut filled = 0;
        for id in 0..BLOCK_ID_COUNT {
            if self.defs[id].is_none() {
                self.insert(BlockDef::undefined(id as CellId));
                filled += 1;
            }
        }
        self.finalized = true;
        debug!("Block registry finalized, {} placeholder ids", filled);
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Definition for `id`. Always `Some` once the registry is finalized.
    #[inline]
    pub fn get(&self, id: CellId) -> Option<&BlockDef> {
        self.defs[id as usize].as_ref()
    }

    /// Finds the id of the first block registered under `name`.
    pub fn id_by_name(&self, name: &str) -> Option<CellId> {
        self.defs
            .iter()
            .flatten()
            .find(|def| def.name == name)
            .map(|def| def.id)
    }

    /// Light and traversal can propagate through `id`.
    #[inline]
    pub fn can_pass(&self, id: CellId) -> bool {
        self.can_pass[id as usize]
    }

    /// `id` fully blocks sight.
    #[inline]
    pub fn is_opaque(&self, id: CellId) -> bool {
        self.opaque[id as usize]
    }

    /// `id` produces geometry.
    #[inline]
    pub fn is_visible(&self, id: CellId) -> bool {
        self.visible[id as usize]
    }

    #[inline]
    pub fn terrain_smoothing(&self, id: CellId) -> bool {
        self.terrain_smoothing[id as usize]
    }
}
