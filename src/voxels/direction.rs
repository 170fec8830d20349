//! # Direction Module
//!
//! Axis-aligned directions, their 26-neighbor extension, and the viewer [`Position`].
//!
//! The coordinate convention is:
//! - X: east (positive) / west (negative)
//! - Y: up (positive) / down (negative)
//! - Z: south (positive) / north (negative)

use cgmath::{Point3, Vector3};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Dot product for integer vectors. `cgmath::InnerSpace` is only implemented for floats.
#[inline]
pub fn dot(a: Vector3<i32>, b: Vector3<i32>) -> i32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Chebyshev (chessboard) length of a vector.
#[inline]
pub fn chebyshev(v: Vector3<i32>) -> i32 {
    v.x.abs().max(v.y.abs()).max(v.z.abs())
}

/// One of the six axis-aligned directions.
///
/// Opposite directions differ only in the lowest bit, see [`Dir::opposite`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Dir {
    North = 0,
    South,
    West,
    East,
    Up,
    Down,
}

impl Dir {
    /// All six directions in discriminant order.
    pub fn all() -> [Dir; 6] {
        [Dir::North, Dir::South, Dir::West, Dir::East, Dir::Up, Dir::Down]
    }

    /// Converts a discriminant back to a direction.
    pub fn from_index(index: usize) -> Option<Dir> {
        Dir::from_usize(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the opposite direction.
    #[inline]
    pub fn opposite(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
            Dir::East => Dir::West,
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
        }
    }

    /// Unit vector of this direction.
    pub fn vector(self) -> Vector3<i32> {
        match self {
            Dir::North => Vector3::new(0, 0, -1),
            Dir::South => Vector3::new(0, 0, 1),
            Dir::West => Vector3::new(-1, 0, 0),
            Dir::East => Vector3::new(1, 0, 0),
            Dir::Up => Vector3::new(0, 1, 0),
            Dir::Down => Vector3::new(0, -1, 0),
        }
    }

    /// Picks the direction of the dominant axis of `v`. Ties prefer Y, then Z.
    /// A zero vector maps to [`Dir::North`].
    pub fn from_vector(v: Vector3<i32>) -> Dir {
        let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
        if ay >= ax && ay >= az && ay > 0 {
            if v.y > 0 {
                Dir::Up
            } else {
                Dir::Down
            }
        } else if az >= ax && az > 0 {
            if v.z > 0 {
                Dir::South
            } else {
                Dir::North
            }
        } else if ax > 0 {
            if v.x > 0 {
                Dir::East
            } else {
                Dir::West
            }
        } else {
            Dir::North
        }
    }

    /// The two axes spanning the plane orthogonal to this direction, as positive directions.
    pub fn plane_axes(self) -> (Dir, Dir) {
        match self {
            Dir::North | Dir::South => (Dir::East, Dir::Up),
            Dir::West | Dir::East => (Dir::South, Dir::Up),
            Dir::Up | Dir::Down => (Dir::East, Dir::South),
        }
    }
}

/// Extended direction: the 26 neighbors of a cell (3*3*3-1).
///
/// The first six variants match [`Dir`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum DirEx {
    North = 0,
    South,
    West,
    East,
    Up,
    Down,
    WestUp,
    EastUp,
    WestDown,
    EastDown,
    NorthWest,
    NorthEast,
    NorthUp,
    NorthDown,
    NorthWestUp,
    NorthEastUp,
    NorthWestDown,
    NorthEastDown,
    SouthWest,
    SouthEast,
    SouthUp,
    SouthDown,
    SouthWestUp,
    SouthEastUp,
    SouthWestDown,
    SouthEastDown,
}

impl DirEx {
    /// Number of extended directions.
    pub const COUNT: usize = 26;

    /// Iterates all 26 extended directions in discriminant order.
    pub fn all() -> impl Iterator<Item = DirEx> {
        (0..Self::COUNT).filter_map(DirEx::from_usize)
    }

    /// Composes the neighbor offset from its simple components.
    pub fn vector(self) -> Vector3<i32> {
        use Dir::*;
        let parts: &[Dir] = match self {
            DirEx::North => &[North],
            DirEx::South => &[South],
            DirEx::West => &[West],
            DirEx::East => &[East],
            DirEx::Up => &[Up],
            DirEx::Down => &[Down],
            DirEx::WestUp => &[West, Up],
            DirEx::EastUp => &[East, Up],
            DirEx::WestDown => &[West, Down],
            DirEx::EastDown => &[East, Down],
            DirEx::NorthWest => &[North, West],
            DirEx::NorthEast => &[North, East],
            DirEx::NorthUp => &[North, Up],
            DirEx::NorthDown => &[North, Down],
            DirEx::NorthWestUp => &[North, West, Up],
            DirEx::NorthEastUp => &[North, East, Up],
            DirEx::NorthWestDown => &[North, West, Down],
            DirEx::NorthEastDown => &[North, East, Down],
            DirEx::SouthWest => &[South, West],
            DirEx::SouthEast => &[South, East],
            DirEx::SouthUp => &[South, Up],
            DirEx::SouthDown => &[South, Down],
            DirEx::SouthWestUp => &[South, West, Up],
            DirEx::SouthEastUp => &[South, East, Up],
            DirEx::SouthWestDown => &[South, West, Down],
            DirEx::SouthEastDown => &[South, East, Down],
        };
        parts
            .iter()
            .fold(Vector3::new(0, 0, 0), |acc, dir| acc + dir.vector())
    }
}

impl From<Dir> for DirEx {
    fn from(dir: Dir) -> Self {
        // the first six discriminants are shared
        match dir {
            Dir::North => DirEx::North,
            Dir::South => DirEx::South,
            Dir::West => DirEx::West,
            Dir::East => DirEx::East,
            Dir::Up => DirEx::Up,
            Dir::Down => DirEx::Down,
        }
    }
}

/// A facing plus every vector derived from it.
///
/// Derived vectors are only ever computed from `dir` and the last horizontal facing; there are
/// no setters for them. Looking straight up or down keeps the horizontal facing it started
/// from, so `turn_up` followed by `turn_down` returns to that facing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Direction {
    dir: Dir,
    /// Last horizontal facing, equal to `dir` unless looking straight up or down.
    level: Dir,
    forward: Vector3<i32>,
    up: Vector3<i32>,
    right: Vector3<i32>,
    left: Vector3<i32>,
    down: Vector3<i32>,
    forward_up: Vector3<i32>,
    forward_down: Vector3<i32>,
    forward_left: Vector3<i32>,
    forward_left_up: Vector3<i32>,
    forward_left_down: Vector3<i32>,
    forward_right: Vector3<i32>,
    forward_right_up: Vector3<i32>,
    forward_right_down: Vector3<i32>,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::new(Dir::North)
    }
}

impl From<Dir> for Direction {
    fn from(dir: Dir) -> Self {
        Direction::new(dir)
    }
}

impl Direction {
    /// Creates a direction facing `dir`. Vertical facings start from a north-facing viewer.
    pub fn new(dir: Dir) -> Self {
        Direction::oriented(dir, Dir::North)
    }

    fn oriented(dir: Dir, level: Dir) -> Self {
        let level = if is_horizontal(dir) { dir } else { level };
        let forward = dir.vector();
        let up = match dir {
            // the top of the view points back over the viewer
            Dir::Up => level.opposite().vector(),
            Dir::Down => level.vector(),
            _ => Dir::Up.vector(),
        };
        let right = forward.cross(up);
        let left = -right;
        let down = -up;
        Direction {
            dir,
            level,
            forward,
            up,
            right,
            left,
            down,
            forward_up: forward + up,
            forward_down: forward + down,
            forward_left: forward + left,
            forward_left_up: forward + left + up,
            forward_left_down: forward + left + down,
            forward_right: forward + right,
            forward_right_up: forward + right + up,
            forward_right_down: forward + right + down,
        }
    }

    /// Facing of the dominant axis of `v`.
    pub fn from_vector(v: Vector3<i32>) -> Self {
        Direction::new(Dir::from_vector(v))
    }

    /// Changes the facing and recomputes all derived vectors.
    pub fn set(&mut self, dir: Dir) {
        *self = Direction::oriented(dir, self.level);
    }

    /// The facing.
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// Unit vector along the facing.
    pub fn forward(&self) -> Vector3<i32> {
        self.forward
    }

    /// Unit vector toward the top of the view.
    pub fn up(&self) -> Vector3<i32> {
        self.up
    }

    /// Unit vector toward the right of the view, `forward × up`.
    pub fn right(&self) -> Vector3<i32> {
        self.right
    }

    pub fn left(&self) -> Vector3<i32> {
        self.left
    }

    pub fn down(&self) -> Vector3<i32> {
        self.down
    }

    /// Forward plus up; the `forward_*` vectors below are the diagonal neighbors ahead.
    pub fn forward_up(&self) -> Vector3<i32> {
        self.forward_up
    }

    pub fn forward_down(&self) -> Vector3<i32> {
        self.forward_down
    }

    pub fn forward_left(&self) -> Vector3<i32> {
        self.forward_left
    }

    pub fn forward_left_up(&self) -> Vector3<i32> {
        self.forward_left_up
    }

    pub fn forward_left_down(&self) -> Vector3<i32> {
        self.forward_left_down
    }

    pub fn forward_right(&self) -> Vector3<i32> {
        self.forward_right
    }

    pub fn forward_right_up(&self) -> Vector3<i32> {
        self.forward_right_up
    }

    pub fn forward_right_down(&self) -> Vector3<i32> {
        self.forward_right_down
    }

    /// Turns a quarter left around the up vector.
    pub fn turn_left(&mut self) {
        self.set(Dir::from_vector(self.left));
    }

    /// Turns a quarter right around the up vector.
    pub fn turn_right(&mut self) {
        self.set(Dir::from_vector(self.right));
    }

    /// Pitches a quarter up. Facing straight up this turns over to the back.
    pub fn turn_up(&mut self) {
        self.set(Dir::from_vector(self.up));
    }

    /// Pitches a quarter down.
    pub fn turn_down(&mut self) {
        self.set(Dir::from_vector(self.down));
    }
}

#[inline]
fn is_horizontal(dir: Dir) -> bool {
    !matches!(dir, Dir::Up | Dir::Down)
}

/// Viewer location and facing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub pos: Point3<i32>,
    pub direction: Direction,
}

impl Default for Position {
    fn default() -> Self {
        Position::new(Point3::new(0, 0, 0), Dir::North)
    }
}

impl Position {
    /// Creates a viewer at `pos` facing `dir`.
    pub fn new(pos: Point3<i32>, dir: Dir) -> Self {
        Position {
            pos,
            direction: Direction::new(dir),
        }
    }

    pub fn turn_left(&mut self) {
        self.direction.turn_left();
    }

    pub fn turn_right(&mut self) {
        self.direction.turn_right();
    }

    pub fn turn_up(&mut self) {
        self.direction.turn_up();
    }

    pub fn turn_down(&mut self) {
        self.direction.turn_down();
    }

    /// Moves `step` cells along the facing.
    pub fn forward(&mut self, step: i32) {
        self.pos += self.direction.forward() * step;
    }

    /// Moves `step` cells against the facing.
    pub fn backward(&mut self, step: i32) {
        self.pos -= self.direction.forward() * step;
    }
}
