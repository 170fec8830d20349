//! # Configuration Module
//!
//! World configuration, loadable from JSON. Every field has a default so a partial file (or
//! `{}`) is valid.
//!
//! ```json
//! {
//!     "max_view_distance": 64,
//!     "view_cone": { "near_distance": 4, "slope_divisor": 3 }
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::error::WorldError;

/// Largest supported snapshot radius, as a power of two.
pub const MAX_SNAPSHOT_DIST_BITS: u32 = 10;

/// Pruning of cells far from the facing axis.
///
/// A cell at chessboard distance `d` from the viewer is only reported when
/// `d <= near_distance` or `offset · forward * slope_divisor >= d`. The cell still takes part in
/// the sweep either way; only the report is skipped. A `slope_divisor` of zero disables the cone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewCone {
    pub near_distance: i32,
    pub slope_divisor: i32,
}

impl Default for ViewCone {
    fn default() -> Self {
        ViewCone {
            near_distance: 4,
            slope_divisor: 3,
        }
    }
}

impl ViewCone {
    /// A cone that never prunes.
    pub const DISABLED: ViewCone = ViewCone {
        near_distance: 0,
        slope_divisor: 0,
    };

    /// Checks a cell at chessboard `distance` whose offset projects to `forward_dot` on the facing.
    #[inline]
    pub fn contains(&self, distance: i32, forward_dot: i32) -> bool {
        self.slope_divisor == 0
            || distance <= self.near_distance
            || i64::from(forward_dot) * i64::from(self.slope_divisor) >= i64::from(distance)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of sweep steps; cells further than this (chessboard metric) are never reached.
    pub max_view_distance: u32,
    /// Upper bound for the snapshot plus its marks buffer, in bytes.
    pub max_snapshot_bytes: usize,
    /// Number of recently used chunks kept in the lookup cache.
    pub chunk_cache_capacity: usize,
    /// Skip faces pointing away from the viewer.
    pub cull_back_faces: bool,
    /// After the first ring, do not sweep in the direction opposite the facing.
    pub prune_behind: bool,
    pub view_cone: ViewCone,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            max_view_distance: 32,
            max_snapshot_bytes: 256 * 1024 * 1024,
            chunk_cache_capacity: 1,
            cull_back_faces: true,
            prune_behind: true,
            view_cone: ViewCone::default(),
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Snapshot radius bits: the smallest power of two covering the view distance plus the
    /// one-cell neighbor margin used for face checks and lateral spread.
    pub fn snapshot_dist_bits(&self) -> u32 {
        let needed = self.max_view_distance.saturating_add(2);
        needed
            .checked_next_power_of_two()
            .map_or(u32::BITS, u32::trailing_zeros)
    }

    /// Bytes allocated for the snapshot and its marks buffer.
    pub fn snapshot_bytes(&self) -> usize {
        let row = 1usize
            .checked_shl(self.snapshot_dist_bits() + 1)
            .unwrap_or(usize::MAX);
        row.saturating_mul(row).saturating_mul(row).saturating_mul(2)
    }

    /// Rejects distances the snapshot cannot address, snapshots over the memory limit and view
    /// cones with negative parameters.
    pub fn validate(&self) -> Result<(), WorldError> {
        let cone = self.view_cone;
        if cone.near_distance < 0 || cone.slope_divisor < 0 {
            return Err(WorldError::InvalidViewCone {
                near_distance: cone.near_distance,
                slope_divisor: cone.slope_divisor,
            });
        }
        if self.max_view_distance == 0 || self.snapshot_dist_bits() > MAX_SNAPSHOT_DIST_BITS {
            return Err(WorldError::InvalidViewDistance {
                distance: self.max_view_distance,
            });
        }
        let required = self.snapshot_bytes();
        if required > self.max_snapshot_bytes {
            return Err(WorldError::SnapshotTooLarge {
                required,
                limit: self.max_snapshot_bytes,
            });
        }
        Ok(())
    }
}
