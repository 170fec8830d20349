//! # Volume Module
//!
//! `VolumeData` is a dense cubic copy of the world around one center point. The visibility
//! traversal runs entirely on this copy, so every neighbor access is a fixed integer addition
//! instead of a chunk lookup.
//!
//! ## Layout
//!
//! The cube has side `2R` with `R = 1 << dist_bits`. An offset `(x, y, z)` relative to the
//! center (each component in `-R..R`) is stored at
//!
//! ```text
//! ((y + R) << 2b) | ((z + R) << b) | (x + R)      with b = dist_bits + 1
//! ```
//!
//! Moving by a fixed vector is therefore a fixed signed delta, precomputed for all 26
//! neighbors and for the in-plane steps of each sweep direction.
//!
//! ## Rebuild
//!
//! The snapshot is not incremental. [`VolumeData::rebuild`] clears it, copies every populated
//! chunk layer that overlaps the cube one row at a time, then marks levels with no data:
//! world `y < 0` becomes [`BOUND_BOTTOM`] and everything above the highest populated level
//! becomes [`BOUND_SKY`].

use cgmath::{Point3, Vector3};
use log::debug;
use web_time::Instant;

use super::block::{CellId, BOUND_BOTTOM, BOUND_SKY, NO_CELL};
use super::chunk::{chunk_coord, chunk_matrix::ChunkMatrix, CHUNK_DX, CHUNK_DX_SHIFT};
use super::direction::{Dir, DirEx};

/// Component pairs of the in-plane lateral table forming each diagonal.
pub const DIAGONAL_PAIRS: [(usize, usize); 4] = [(0, 1), (1, 2), (2, 3), (3, 0)];

/// Precomputed deltas for sweeping along one main direction.
#[derive(Copy, Clone, Debug, Default)]
pub struct PlaneDeltas {
    /// One step along the sweep direction.
    pub forward: isize,
    /// In-plane axis steps, ordered `[u+, v+, u-, v-]`.
    pub axes: [isize; 4],
    /// In-plane diagonal steps, `axes[a] + axes[b]` for each of [`DIAGONAL_PAIRS`].
    pub diagonals: [isize; 4],
}

pub struct VolumeData {
    dist_bits: u32,
    row_bits: u32,
    radius: i32,
    data: Vec<CellId>,
    deltas: [isize; DirEx::COUNT],
    planes: [PlaneDeltas; 6],
    center: Option<Point3<i32>>,
}

impl VolumeData {
    /// Allocates an empty snapshot of side `2 << dist_bits`.
    pub fn new(dist_bits: u32) -> Self {
        let row_bits = dist_bits + 1;
        let radius = 1i32 << dist_bits;
        let data_size = 1usize << (row_bits * 3);

        let delta_of = |v: Vector3<i32>| -> isize {
            ((v.y as isize) << (row_bits * 2)) + ((v.z as isize) << row_bits) + v.x as isize
        };

        let mut deltas = [0isize; DirEx::COUNT];
        for dir in DirEx::all() {
            deltas[dir as usize] = delta_of(dir.vector());
        }

        let mut planes = [PlaneDeltas::default(); 6];
        for dir in Dir::all() {
            let (u, v) = dir.plane_axes();
            let axes = [
                delta_of(u.vector()),
                delta_of(v.vector()),
                delta_of(u.opposite().vector()),
                delta_of(v.opposite().vector()),
            ];
            planes[dir.index()] = PlaneDeltas {
                forward: delta_of(dir.vector()),
                axes,
                diagonals: DIAGONAL_PAIRS.map(|(a, b)| axes[a] + axes[b]),
            };
        }

        VolumeData {
            dist_bits,
            row_bits,
            radius,
            data: vec![NO_CELL; data_size],
            deltas,
            planes,
            center: None,
        }
    }

    pub fn dist_bits(&self) -> u32 {
        self.dist_bits
    }

    /// Half the side length, `R`.
    pub fn size(&self) -> i32 {
        self.radius
    }

    /// Side length, `2R`.
    pub fn row_size(&self) -> usize {
        1 << self.row_bits
    }

    /// Number of cells in the cube.
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    /// The world position the snapshot was last built around.
    pub fn center(&self) -> Option<Point3<i32>> {
        self.center
    }

    /// Resets every cell to [`NO_CELL`] and forgets the center.
    pub fn clear(&mut self) {
        self.data.fill(NO_CELL);
        self.center = None;
    }

    /// Whether `offset` (relative to the center) lies inside the cube.
    pub fn contains(&self, offset: Vector3<i32>) -> bool {
        let r = self.radius;
        (-r..r).contains(&offset.x) && (-r..r).contains(&offset.y) && (-r..r).contains(&offset.z)
    }

    /// Index of a center-relative offset. The offset must lie inside the cube.
    #[inline]
    pub fn get_index(&self, offset: Vector3<i32>) -> usize {
        let r = self.radius;
        let b = self.row_bits;
        (((offset.y + r) as usize) << (b * 2))
            | (((offset.z + r) as usize) << b)
            | (offset.x + r) as usize
    }

    /// Center-relative offset of an index.
    pub fn index_to_point(&self, index: usize) -> Vector3<i32> {
        let b = self.row_bits;
        let mask = (1usize << b) - 1;
        let r = self.radius;
        Vector3::new(
            (index & mask) as i32 - r,
            (index >> (b * 2)) as i32 - r,
            ((index >> b) & mask) as i32 - r,
        )
    }

    /// Index of the neighbor of `index` in direction `dir`.
    #[inline]
    pub fn move_index(&self, index: usize, dir: DirEx) -> usize {
        index.wrapping_add_signed(self.deltas[dir as usize])
    }

    /// Signed index delta of a neighbor direction.
    #[inline]
    pub fn delta(&self, dir: DirEx) -> isize {
        self.deltas[dir as usize]
    }

    /// Sweep deltas for main direction `dir`.
    #[inline]
    pub fn plane(&self, dir: Dir) -> &PlaneDeltas {
        &self.planes[dir.index()]
    }

    #[inline]
    pub fn get(&self, index: usize) -> CellId {
        self.data[index]
    }

    #[inline]
    pub fn put(&mut self, index: usize, cell: CellId) {
        self.data[index] = cell;
    }

    pub fn get_at(&self, offset: Vector3<i32>) -> CellId {
        self.data[self.get_index(offset)]
    }

    pub fn put_at(&mut self, offset: Vector3<i32>, cell: CellId) {
        let index = self.get_index(offset);
        self.data[index] = cell;
    }

    /// Copies `dz` rows of `dx` cells from `src` into the cube, starting at offset `dst`.
    ///
    /// Row `r` of the source starts at `src[r * stride]` and lands at `dst + (0, 0, r)`.
    /// The whole destination rectangle must lie inside the cube.
    pub fn put_layer(
        &mut self,
        dst: Vector3<i32>,
        src: &[CellId],
        dx: usize,
        dz: usize,
        stride: usize,
    ) {
        let mut dst_start = self.get_index(dst);
        let row_size = self.row_size();
        for row in src.chunks(stride).take(dz) {
            self.data[dst_start..dst_start + dx].copy_from_slice(&row[..dx]);
            dst_start += row_size;
        }
    }

    /// Fills the whole horizontal plane at center-relative height `y`.
    pub fn fill_layer(&mut self, y: i32, cell: CellId) {
        let plane = 1usize << (self.row_bits * 2);
        let start = ((y + self.radius) as usize) << (self.row_bits * 2);
        self.data[start..start + plane].fill(cell);
    }

    /// Refills the snapshot from `chunks` around world position `center`.
    pub fn rebuild(&mut self, chunks: &ChunkMatrix, center: Point3<i32>) {
        let start = Instant::now();
        self.clear();

        let r = self.radius;
        let min = center.map(|v| v - r);
        let max = center.map(|v| v + r - 1);

        let mut max_y: i32 = -1;
        let mut layers_copied = 0usize;
        for cz in chunk_coord(min.z)..=chunk_coord(max.z) {
            for cx in chunk_coord(min.x)..=chunk_coord(max.x) {
                let Some(chunk) = chunks.get(cx, cz) else {
                    continue;
                };
                let Some(top) = chunk.max_layer() else {
                    continue;
                };
                let top = top as i32;
                max_y = max_y.max(top);

                let origin_x = cx << CHUNK_DX_SHIFT;
                let origin_z = cz << CHUNK_DX_SHIFT;
                let x0 = min.x.max(origin_x);
                let x1 = max.x.min(origin_x + CHUNK_DX - 1);
                let z0 = min.z.max(origin_z);
                let z1 = max.z.min(origin_z + CHUNK_DX - 1);
                let dx = (x1 - x0 + 1) as usize;
                let dz = (z1 - z0 + 1) as usize;
                let src_start = (((z0 - origin_z) << CHUNK_DX_SHIFT) + (x0 - origin_x)) as usize;

                for y in min.y.max(0)..=max.y.min(top) {
                    let Some(layer) = chunk.layer(y as usize) else {
                        continue;
                    };
                    let dst = Vector3::new(x0 - center.x, y - center.y, z0 - center.z);
                    self.put_layer(dst, &layer.cells()[src_start..], dx, dz, CHUNK_DX as usize);
                    layers_copied += 1;
                }
            }
        }

        for y in -r..r {
            let world_y = center.y + y;
            if world_y < 0 {
                self.fill_layer(y, BOUND_BOTTOM);
            } else if world_y > max_y {
                self.fill_layer(y, BOUND_SKY);
            }
        }

        self.center = Some(center);
        debug!(
            "Rebuilt volume around {:?}: {} layers copied in {:?}",
            center,
            layers_copied,
            start.elapsed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    #[test]
    fn index_round_trips_offsets() {
        let volume = VolumeData::new(3);
        assert_eq!(volume.size(), 8);
        assert_eq!(volume.row_size(), 16);
        assert_eq!(volume.data_size(), 16 * 16 * 16);
        for offset in [
            Vector3::new(0, 0, 0),
            Vector3::new(-8, -8, -8),
            Vector3::new(7, 7, 7),
            Vector3::new(-3, 5, 1),
        ] {
            assert_eq!(volume.index_to_point(volume.get_index(offset)), offset);
        }
    }

    #[test]
    fn deltas_match_neighbor_offsets() {
        let volume = VolumeData::new(3);
        let base = Vector3::new(1, -2, 3);
        let index = volume.get_index(base);
        for dir in DirEx::all() {
            let moved = volume.move_index(index, dir);
            assert_eq!(volume.index_to_point(moved), base + dir.vector());
        }
        for dir in Dir::all() {
            let plane = volume.plane(dir);
            let (u, v) = dir.plane_axes();
            let moved = index.wrapping_add_signed(plane.diagonals[0]);
            assert_eq!(volume.index_to_point(moved), base + u.vector() + v.vector());
            let moved = index.wrapping_add_signed(plane.forward);
            assert_eq!(volume.index_to_point(moved), base + dir.vector());
        }
    }

    #[test]
    fn rebuild_copies_rows_and_fills_bounds() {
        let mut chunks = ChunkMatrix::new();
        let index = chunks.get_or_insert(Point2::new(-1, 0));
        // world (-2, 3, 5)
        chunks.chunk_mut(index).set(14, 3, 5, 7);
        // world (-16, 1, 15)
        chunks.chunk_mut(index).set(0, 1, 15, 2);

        let mut volume = VolumeData::new(3);
        let center = Point3::new(-4, 2, 4);
        volume.rebuild(&chunks, center);

        assert_eq!(volume.center(), Some(center));
        assert_eq!(volume.get_at(Vector3::new(2, 1, 1)), 7);
        // outside the cube in x
        assert_eq!(volume.get_at(Vector3::new(0, -1, 0)), NO_CELL);
        // world y < 0
        assert_eq!(volume.get_at(Vector3::new(0, -3, 0)), BOUND_BOTTOM);
        // above the highest populated layer
        assert_eq!(volume.get_at(Vector3::new(0, 2, 0)), BOUND_SKY);
        assert_eq!(volume.get_at(Vector3::new(0, 1, 0)), NO_CELL);
    }

    #[test]
    fn rebuild_at_the_top_layer() {
        use crate::voxels::chunk::CHUNK_DY;

        let mut chunks = ChunkMatrix::new();
        let index = chunks.get_or_insert(Point2::new(0, 0));
        chunks.chunk_mut(index).set(0, CHUNK_DY as usize - 1, 0, 6);

        let mut volume = VolumeData::new(3);
        volume.rebuild(&chunks, Point3::new(0, CHUNK_DY - 2, 0));
        assert_eq!(volume.get_at(Vector3::new(0, 1, 0)), 6);
        assert_eq!(volume.get_at(Vector3::new(0, 0, 0)), NO_CELL);
        assert_eq!(volume.get_at(Vector3::new(0, 2, 0)), BOUND_SKY);

        // far above every layer
        volume.rebuild(&chunks, Point3::new(0, 1_000_000, 0));
        assert_eq!(volume.get_at(Vector3::new(0, -8, 0)), BOUND_SKY);
    }

    #[test]
    fn empty_world_is_sky_above_ground() {
        let chunks = ChunkMatrix::new();
        let mut volume = VolumeData::new(2);
        volume.rebuild(&chunks, Point3::new(0, 1, 0));
        assert_eq!(volume.get_at(Vector3::new(0, -1, 0)), BOUND_SKY);
        assert_eq!(volume.get_at(Vector3::new(0, -2, 0)), BOUND_BOTTOM);
    }
}
