use cgmath::{Point3, Vector3};

use crate::voxels::{block::CellId, direction::Dir};

/// A single quad on the surface of a cell.
///
/// Corners are in world coordinates and wind counter-clockwise seen from outside the cell,
/// so `(lr - ll) x (ul - ll)` points along the face normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Lower-left corner
    pub ll: Point3<i32>,
    /// Lower-right corner
    pub lr: Point3<i32>,
    /// Upper-right corner
    pub ur: Point3<i32>,
    /// Upper-left corner
    pub ul: Point3<i32>,
    pub cell: CellId,
    /// Index of the block texture
    pub tx_index: u32,
    /// Which side of the cell this face covers
    pub side: Dir,
    /// Top face of a terrain block; corners may be blended with neighbor heights
    pub smooth: bool,
}

impl Face {
    /// Creates the face on `side` of the cell whose minimum corner is `pos`.
    pub fn new(pos: Point3<i32>, cell: CellId, tx_index: u32, side: Dir) -> Self {
        let (x, y, z) = (pos.x, pos.y, pos.z);
        let [ll, lr, ur, ul] = match side {
            Dir::Up => [
                Point3::new(x, y + 1, z + 1),
                Point3::new(x + 1, y + 1, z + 1),
                Point3::new(x + 1, y + 1, z),
                Point3::new(x, y + 1, z),
            ],
            Dir::Down => [
                Point3::new(x, y, z),
                Point3::new(x + 1, y, z),
                Point3::new(x + 1, y, z + 1),
                Point3::new(x, y, z + 1),
            ],
            Dir::North => [
                Point3::new(x + 1, y, z),
                Point3::new(x, y, z),
                Point3::new(x, y + 1, z),
                Point3::new(x + 1, y + 1, z),
            ],
            Dir::South => [
                Point3::new(x, y, z + 1),
                Point3::new(x + 1, y, z + 1),
                Point3::new(x + 1, y + 1, z + 1),
                Point3::new(x, y + 1, z + 1),
            ],
            Dir::West => [
                Point3::new(x, y, z),
                Point3::new(x, y, z + 1),
                Point3::new(x, y + 1, z + 1),
                Point3::new(x, y + 1, z),
            ],
            Dir::East => [
                Point3::new(x + 1, y, z + 1),
                Point3::new(x + 1, y, z),
                Point3::new(x + 1, y + 1, z),
                Point3::new(x + 1, y + 1, z + 1),
            ],
        };
        Face {
            ll,
            lr,
            ur,
            ul,
            cell,
            tx_index,
            side,
            smooth: false,
        }
    }

    pub fn normal(&self) -> Vector3<i32> {
        self.side.vector()
    }

    /// Minimum corner of the cell this face belongs to.
    pub fn cell_origin(&self) -> Point3<i32> {
        let corners = [self.ll, self.lr, self.ur, self.ul];
        let min = corners.iter().fold(self.ll, |acc, p| {
            Point3::new(acc.x.min(p.x), acc.y.min(p.y), acc.z.min(p.z))
        });
        // faces on the positive side sit one cell past the origin
        match self.side {
            Dir::Up => min - Vector3::new(0, 1, 0),
            Dir::South => min - Vector3::new(0, 0, 1),
            Dir::East => min - Vector3::new(1, 0, 0),
            _ => min,
        }
    }
}

/// GPU-ready form of a [`Face`]: the cell origin plus side, texture and flags.
///
/// # Memory Layout
/// - Origin: 3x i32 (12 bytes)
/// - Side: u32 (4 bytes)
/// - Texture Index: u32 (4 bytes)
/// - Flags: u32 (4 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedFace {
    pub origin: [i32; 3],
    pub side: u32,
    pub tx_index: u32,
    pub flags: u32,
}

impl PackedFace {
    /// Set when the face should be smoothed against its neighbors.
    pub const FLAG_SMOOTH: u32 = 1;
}

impl From<&Face> for PackedFace {
    fn from(face: &Face) -> Self {
        let origin = face.cell_origin();
        PackedFace {
            origin: [origin.x, origin.y, origin.z],
            side: face.side.index() as u32,
            tx_index: face.tx_index,
            flags: if face.smooth { Self::FLAG_SMOOTH } else { 0 },
        }
    }
}
