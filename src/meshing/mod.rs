//! # Meshing Module
//!
//! Turns traversal reports into quads. [`FaceBuilder`] is a [`CellVisitor`] that emits one
//! [`Face`] per exposed face bit; how a face is built depends on the block kind.

use cgmath::Point3;
use log::debug;

use crate::voxels::{
    block::{block_side::FaceMask, BlockDef, BlockKind, CellId},
    direction::{Dir, Position},
    visibility::CellVisitor,
    world::World,
};

pub mod face;

pub use face::{Face, PackedFace};

/// Builds the face of `def` on `side` of the cell at `pos`.
pub fn emit_face(def: &BlockDef, pos: Point3<i32>, side: Dir) -> Face {
    let mut face = Face::new(pos, def.id, def.tx_index, side);
    match def.kind {
        BlockKind::Standard => {}
        BlockKind::TerrainSmoothing => face.smooth = side == Dir::Up,
    }
    face
}

/// Collects the faces reported by a traversal.
#[derive(Debug, Default)]
pub struct FaceBuilder {
    pub faces: Vec<Face>,
    cells: usize,
}

impl FaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells that contributed faces.
    pub fn cells(&self) -> usize {
        self.cells
    }

    pub fn clear(&mut self) {
        self.faces.clear();
        self.cells = 0;
    }

    pub fn packed(&self) -> Vec<PackedFace> {
        self.faces.iter().map(PackedFace::from).collect()
    }
}

impl CellVisitor for FaceBuilder {
    fn new_direction(&mut self, position: &Position) {
        debug!("Building faces from {:?}", position.pos);
        self.clear();
    }

    fn visit(
        &mut self,
        _world: &World,
        _position: &Position,
        _pos: Point3<i32>,
        _cell: CellId,
        _faces: FaceMask,
    ) {
        self.cells += 1;
    }

    fn visit_face(
        &mut self,
        world: &World,
        _position: &Position,
        pos: Point3<i32>,
        cell: CellId,
        face: Dir,
    ) {
        if let Some(def) = world.registry().get(cell) {
            self.faces.push(emit_face(def, pos, face));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockVisibility;

    #[test]
    fn only_terrain_tops_are_smoothed() {
        let grass = BlockDef::terrain(9, "grass", BlockVisibility::Opaque, 8);
        let stone = BlockDef::new(1, "stone", BlockVisibility::Opaque, 0);
        let pos = Point3::new(0, 0, 0);

        assert!(emit_face(&grass, pos, Dir::Up).smooth);
        assert!(!emit_face(&grass, pos, Dir::North).smooth);
        assert!(!emit_face(&stone, pos, Dir::Up).smooth);
        assert_eq!(emit_face(&grass, pos, Dir::Up).tx_index, 8);
    }
}
