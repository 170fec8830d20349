//! # Visibility Module
//!
//! Discovery of visible cells around a viewer.
//!
//! [`VisibilityTraversal`] sweeps outward from the viewer through passable space and hands
//! every visible cell it reaches to a [`CellVisitor`], together with the mask of faces that
//! are exposed toward the viewer. Consumers (mesh builders, statistics, tests) only implement
//! the visitor.

use cgmath::Point3;

use super::block::{block_side::FaceMask, CellId};
use super::direction::{Dir, Position};
use super::world::World;

pub mod traversal;

pub use traversal::{CellMarks, TraversalStats, VisibilityTraversal};

/// Receives the cells discovered by a traversal.
///
/// `visit` is called at most once per cell and traversal. `visit_face` follows it once for
/// each bit of the face mask, in [`Dir`] order.
pub trait CellVisitor {
    /// Called once before the first cell of a traversal.
    ///
    /// # Arguments
    ///
    /// * `position` - Viewer position and facing of the traversal about to start
    fn new_direction(&mut self, _position: &Position) {}

    /// Called once for every visible cell with at least one exposed face.
    ///
    /// # Arguments
    ///
    /// * `world` - The world being traversed; reads are allowed, traversals are not
    /// * `position` - Viewer position and facing
    /// * `pos` - World position of the cell
    /// * `cell` - Block id stored at `pos`
    /// * `faces` - Faces of the cell that are exposed toward the viewer
    fn visit(
        &mut self,
        world: &World,
        position: &Position,
        pos: Point3<i32>,
        cell: CellId,
        faces: FaceMask,
    );

    /// Called after [`visit`](Self::visit) for each side in `faces`.
    fn visit_face(
        &mut self,
        _world: &World,
        _position: &Position,
        _pos: Point3<i32>,
        _cell: CellId,
        _face: Dir,
    ) {
    }
}

/// A single reported cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisitRecord {
    pub pos: Point3<i32>,
    pub cell: CellId,
    pub faces: FaceMask,
}

/// Visitor that stores every report.
#[derive(Debug, Default)]
pub struct VisitRecorder {
    /// Reported cells in report order.
    pub visits: Vec<VisitRecord>,
    /// Number of `visit_face` calls since the last [`clear`](Self::clear).
    pub faces: usize,
    /// Number of traversals started with this recorder. Not reset by `clear`.
    pub traversals: usize,
}

impl VisitRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets recorded cells and faces, keeping the allocation.
    pub fn clear(&mut self) {
        self.visits.clear();
        self.faces = 0;
    }

    /// Looks up the record for a world position.
    ///
    /// # Arguments
    ///
    /// * `pos` - World position to search for
    ///
    /// # Returns
    ///
    /// The record if `pos` was reported, `None` otherwise. Linear in the number of visits.
    pub fn find(&self, pos: Point3<i32>) -> Option<&VisitRecord> {
        self.visits.iter().find(|visit| visit.pos == pos)
    }
}

impl CellVisitor for VisitRecorder {
    fn new_direction(&mut self, _position: &Position) {
        self.traversals += 1;
    }

    fn visit(
        &mut self,
        _world: &World,
        _position: &Position,
        pos: Point3<i32>,
        cell: CellId,
        faces: FaceMask,
    ) {
        self.visits.push(VisitRecord { pos, cell, faces });
    }

    fn visit_face(
        &mut self,
        _world: &World,
        _position: &Position,
        _pos: Point3<i32>,
        _cell: CellId,
        _face: Dir,
    ) {
        self.faces += 1;
    }
}
