//! # Block Side Module
//!
//! This module defines the 6-bit face mask reported for every visible cell, and the
//! near-side selection used to skip faces that point away from the viewer.

use bitflags::bitflags;
use cgmath::Vector3;

use crate::voxels::direction::Dir;

bitflags! {
    /// One bit per cube face. Bit positions follow [`Dir`] discriminants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FaceMask: u8 {
        /// Face pointing to negative Z.
        const NORTH = 1 << Dir::North as u8;
        /// Face pointing to positive Z.
        const SOUTH = 1 << Dir::South as u8;
        /// Face pointing to negative X.
        const WEST = 1 << Dir::West as u8;
        /// Face pointing to positive X.
        const EAST = 1 << Dir::East as u8;
        /// Face pointing to positive Y.
        const UP = 1 << Dir::Up as u8;
        /// Face pointing to negative Y.
        const DOWN = 1 << Dir::Down as u8;
    }
}

impl FaceMask {
    /// Mask with the single face `dir`.
    #[inline]
    pub fn from_dir(dir: Dir) -> Self {
        FaceMask::from_bits_truncate(1 << dir as u8)
    }

    #[inline]
    pub fn has(self, dir: Dir) -> bool {
        self.contains(FaceMask::from_dir(dir))
    }

    /// Iterates the faces present in the mask in [`Dir`] order.
    pub fn sides(self) -> impl Iterator<Item = Dir> {
        Dir::all().into_iter().filter(move |dir| self.has(*dir))
    }

    /// Determines which faces of a cell can face the viewer.
    ///
    /// `offset` is the cell position relative to the viewer. A face is kept when the viewer
    /// lies in front of its plane or on it, i.e. `offset · normal <= 0`. Faces seen exactly
    /// edge-on are kept so that a viewer moving inside its own cell does not lose geometry.
    pub fn facing(offset: Vector3<i32>) -> Self {
        let mut mask = FaceMask::empty();
        if offset.x <= 0 {
            mask |= FaceMask::EAST;
        }
        if offset.x >= 0 {
            mask |= FaceMask::WEST;
        }
        if offset.y <= 0 {
            mask |= FaceMask::UP;
        }
        if offset.y >= 0 {
            mask |= FaceMask::DOWN;
        }
        if offset.z <= 0 {
            mask |= FaceMask::SOUTH;
        }
        if offset.z >= 0 {
            mask |= FaceMask::NORTH;
        }
        mask
    }
}
