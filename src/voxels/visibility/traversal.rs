//! # Plane Sweep Traversal
//!
//! Finds every visible cell reachable from the viewer through passable space, within the
//! configured view distance, without scanning the whole snapshot.
//!
//! ## Algorithm
//!
//! Each of the six axis directions owns a *wave*: the passable cells of the plane at
//! distance `d` on that side of the viewer. All waves start as the viewer cell. One step
//! `d -> d + 1` of a wave does three things:
//!
//! 1. **Forward step**: every wave cell moves one cell along the wave direction. The reached
//!    cell is classified; passable cells join the next wave.
//! 2. **Lateral spread**: from cells that advanced, spread one cell sideways inside the new
//!    plane, to the four axis neighbors and the four diagonals. A diagonal is only reachable if
//!    at least one of its two axis-adjacent cells in the plane is passable, so the sweep does
//!    not squeeze through the gap between two diagonally touching solid blocks.
//! 3. **Cross registration**: a newly admitted cell that also lies on another face of the
//!    distance shell joins that face's next wave, so the sweep grows around corners.
//!
//! After the first ring the wave opposite the viewer's facing is dropped when pruning is on.
//!
//! ## Bookkeeping
//!
//! The snapshot itself is never written. A parallel marks buffer holds, per cell, which waves
//! already passed it and whether it was classified (and as passable or occupied), so every cell
//! is reported at most once however many waves reach it.

use bitflags::bitflags;
use cgmath::{Vector3, Zero};
use log::{debug, trace};
use web_time::Instant;

use super::CellVisitor;
use crate::voxels::block::{block_registry::BlockRegistry, block_side::FaceMask, CellId, BOUND_SKY};
use crate::voxels::config::{ViewCone, WorldConfig};
use crate::voxels::direction::{chebyshev, dot, Dir, DirEx, Position};
use crate::voxels::error::WorldError;
use crate::voxels::volume::{VolumeData, DIAGONAL_PAIRS};
use crate::voxels::world::World;

bitflags! {
    /// Per-cell traversal state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellMarks: u8 {
        const NORTH = 1 << Dir::North as u8;
        const SOUTH = 1 << Dir::South as u8;
        const WEST = 1 << Dir::West as u8;
        const EAST = 1 << Dir::East as u8;
        const UP = 1 << Dir::Up as u8;
        const DOWN = 1 << Dir::Down as u8;
        /// The cell was classified.
        const VISITED = 1 << 6;
        /// The cell was classified as not passable.
        const OCCUPIED = 1 << 7;

        const WAVES = Self::NORTH.bits()
            | Self::SOUTH.bits()
            | Self::WEST.bits()
            | Self::EAST.bits()
            | Self::UP.bits()
            | Self::DOWN.bits();
    }
}

impl CellMarks {
    /// The wave bit of direction `dir`.
    #[inline]
    pub fn wave(dir: Dir) -> Self {
        CellMarks::from_bits_truncate(1 << dir as u8)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Cells classified, including the viewer cell.
    pub cells_visited: usize,
    /// Cells passed to `CellVisitor::visit`.
    pub cells_reported: usize,
    /// Face bits passed to `CellVisitor::visit_face`.
    pub faces_reported: usize,
    /// Distance of the last plane the sweep stepped to.
    pub max_distance_reached: u32,
}

/// Reusable state of the plane sweep. Buffers are kept between runs.
pub struct VisibilityTraversal {
    marks: Vec<CellMarks>,
    current: [Vec<usize>; 6],
    next: [Vec<usize>; 6],
    advanced: Vec<usize>,
    max_distance: u32,
    cull_back_faces: bool,
    prune_behind: bool,
    view_cone: ViewCone,
}

impl VisibilityTraversal {
    pub fn new(config: &WorldConfig) -> Self {
        VisibilityTraversal {
            marks: Vec::new(),
            current: Default::default(),
            next: Default::default(),
            advanced: Vec::new(),
            max_distance: config.max_view_distance,
            cull_back_faces: config.cull_back_faces,
            prune_behind: config.prune_behind,
            view_cone: config.view_cone,
        }
    }

    /// Marks of the last run, indexed like the snapshot.
    pub fn marks(&self) -> &[CellMarks] {
        &self.marks
    }

    /// Sweeps `volume` from `position` and reports visible cells to `visitor`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SnapshotStale`] if `volume` was not built around `position.pos`.
    pub fn run<V: CellVisitor + ?Sized>(
        &mut self,
        volume: &VolumeData,
        registry: &BlockRegistry,
        position: &Position,
        visitor: &mut V,
        world: &World,
    ) -> Result<TraversalStats, WorldError> {
        if volume.center() != Some(position.pos) {
            return Err(WorldError::SnapshotStale {
                expected: position.pos,
                built_for: volume.center(),
            });
        }
        let start = Instant::now();

        self.marks.clear();
        self.marks.resize(volume.data_size(), CellMarks::empty());
        for list in self.current.iter_mut().chain(self.next.iter_mut()) {
            list.clear();
        }

        let origin = volume.get_index(Vector3::zero());
        self.marks[origin] = CellMarks::VISITED | CellMarks::WAVES;
        for wave in &mut self.current {
            wave.push(origin);
        }

        visitor.new_direction(position);

        let mut sweep = Sweep {
            volume,
            registry,
            position,
            world,
            visitor,
            marks: &mut self.marks,
            cull_back_faces: self.cull_back_faces,
            view_cone: self.view_cone,
            stats: TraversalStats {
                cells_visited: 1,
                ..TraversalStats::default()
            },
        };

        let behind = self
            .prune_behind
            .then(|| position.direction.dir().opposite());

        for distance in 0..self.max_distance {
            let pruned = if distance > 0 { behind } else { None };
            let plane = distance as i32 + 1;

            for dir in Dir::all() {
                if Some(dir) == pruned {
                    continue;
                }
                let wave = &self.current[dir.index()];
                if wave.is_empty() {
                    continue;
                }
                sweep.step(dir, plane, pruned, wave, &mut self.next, &mut self.advanced);
            }
            sweep.stats.max_distance_reached = distance + 1;

            let mut remaining = 0;
            for dir in Dir::all() {
                let i = dir.index();
                std::mem::swap(&mut self.current[i], &mut self.next[i]);
                self.next[i].clear();
                if Some(dir) == behind {
                    self.current[i].clear();
                }
                remaining += self.current[i].len();
            }
            trace!("Sweep distance {}: {} cells in waves", plane, remaining);
            if remaining == 0 {
                break;
            }
        }

        let stats = sweep.stats;
        debug!(
            "Traversal from {:?} facing {:?}: {:?} in {:?}",
            position.pos,
            position.direction.dir(),
            stats,
            start.elapsed()
        );
        Ok(stats)
    }
}

/// Borrowed context of one run.
struct Sweep<'a, V: CellVisitor + ?Sized> {
    volume: &'a VolumeData,
    registry: &'a BlockRegistry,
    position: &'a Position,
    world: &'a World,
    visitor: &'a mut V,
    marks: &'a mut [CellMarks],
    cull_back_faces: bool,
    view_cone: ViewCone,
    stats: TraversalStats,
}

impl<V: CellVisitor + ?Sized> Sweep<'_, V> {
    /// Moves the wave of `dir` from its current plane to `plane`.
    fn step(
        &mut self,
        dir: Dir,
        plane: i32,
        pruned: Option<Dir>,
        wave: &[usize],
        next: &mut [Vec<usize>; 6],
        advanced: &mut Vec<usize>,
    ) {
        let deltas = *self.volume.plane(dir);
        advanced.clear();

        for &index in wave {
            let target = index.wrapping_add_signed(deltas.forward);
            if self.admit(target, dir, plane, pruned, next) {
                advanced.push(target);
            }
        }

        for &index in advanced.iter() {
            for delta in deltas.axes {
                self.admit(index.wrapping_add_signed(delta), dir, plane, pruned, next);
            }
            for (k, &(a, b)) in DIAGONAL_PAIRS.iter().enumerate() {
                let side_a = self.volume.get(index.wrapping_add_signed(deltas.axes[a]));
                let side_b = self.volume.get(index.wrapping_add_signed(deltas.axes[b]));
                if !self.registry.can_pass(side_a) && !self.registry.can_pass(side_b) {
                    continue;
                }
                let diagonal = index.wrapping_add_signed(deltas.diagonals[k]);
                self.admit(diagonal, dir, plane, pruned, next);
            }
        }
    }

    /// Classifies `target` for the wave of `dir` and queues it when passable.
    /// Returns false when the wave already holds the cell or cannot pass it.
    fn admit(
        &mut self,
        target: usize,
        dir: Dir,
        plane: i32,
        pruned: Option<Dir>,
        next: &mut [Vec<usize>; 6],
    ) -> bool {
        let bit = CellMarks::wave(dir);
        if self.marks[target].contains(bit) {
            return false;
        }
        self.marks[target] |= bit;
        if !self.visit_cell(target, dir) {
            return false;
        }
        next[dir.index()].push(target);
        self.cross_register(target, dir, plane, pruned, next);
        true
    }

    fn cross_register(
        &mut self,
        target: usize,
        dir: Dir,
        plane: i32,
        pruned: Option<Dir>,
        next: &mut [Vec<usize>; 6],
    ) {
        let offset = self.volume.index_to_point(target);
        let sky = self.volume.get(target) == BOUND_SKY;
        for other in Dir::all() {
            if other == dir || Some(other) == pruned || (sky && other == Dir::Up) {
                continue;
            }
            if dot(offset, other.vector()) != plane {
                continue;
            }
            let bit = CellMarks::wave(other);
            if self.marks[target].contains(bit) {
                continue;
            }
            self.marks[target] |= bit;
            next[other.index()].push(target);
        }
    }

    /// Classifies a cell the first time any wave reaches it and reports it if visible.
    /// Returns whether the wave of `dir` may pass through the cell.
    fn visit_cell(&mut self, target: usize, dir: Dir) -> bool {
        let cell = self.volume.get(target);
        if cell == BOUND_SKY && dir == Dir::Up {
            // nothing lies above the sky line
            return false;
        }

        let marks = self.marks[target];
        if marks.contains(CellMarks::VISITED) {
            return !marks.contains(CellMarks::OCCUPIED);
        }
        self.stats.cells_visited += 1;

        if cell == BOUND_SKY {
            self.marks[target] |= CellMarks::VISITED;
            return true;
        }

        let passable = self.registry.can_pass(cell);
        self.marks[target] |= if passable {
            CellMarks::VISITED
        } else {
            CellMarks::VISITED | CellMarks::OCCUPIED
        };

        if self.registry.is_visible(cell) {
            self.report(target, cell);
        }
        passable
    }

    fn report(&mut self, target: usize, cell: CellId) {
        let offset = self.volume.index_to_point(target);
        let forward = dot(offset, self.position.direction.forward());
        if !self.view_cone.contains(chebyshev(offset), forward) {
            return;
        }

        let candidates = if self.cull_back_faces {
            FaceMask::facing(offset)
        } else {
            FaceMask::all()
        };
        let mut faces = FaceMask::empty();
        for side in candidates.sides() {
            let neighbor = self.volume.move_index(target, DirEx::from(side));
            if !self.registry.is_opaque(self.volume.get(neighbor)) {
                faces |= FaceMask::from_dir(side);
            }
        }
        if faces.is_empty() {
            return;
        }

        let pos = self.position.pos + offset;
        self.visitor.visit(self.world, self.position, pos, cell, faces);
        for side in faces.sides() {
            self.visitor
                .visit_face(self.world, self.position, pos, cell, side);
        }
        self.stats.cells_reported += 1;
        self.stats.faces_reported += faces.bits().count_ones() as usize;
    }
}
