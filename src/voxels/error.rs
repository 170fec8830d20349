//! # Error Module
//!
//! The voxel core works on dense arrays with sentinel values, so almost nothing can fail at
//! runtime. The errors below cover configuration, registry setup, and misuse of the
//! snapshot/traversal pair.

use std::{fmt, io};

use cgmath::Point3;

use super::block::CellId;

#[derive(Debug)]
pub enum WorldError {
    /// The configured view distance is zero or does not fit the snapshot addressing.
    InvalidViewDistance { distance: u32 },
    /// The view cone has a negative distance or slope.
    InvalidViewCone { near_distance: i32, slope_divisor: i32 },
    /// The snapshot needed for the view distance exceeds the configured memory limit.
    SnapshotTooLarge { required: usize, limit: usize },
    /// A world was created from a registry that was never finalized.
    RegistryNotFinalized,
    /// A block was registered after the registry was finalized.
    RegistryFinalized,
    /// A block tried to claim an engine-owned id.
    ReservedBlockId(CellId),
    /// The snapshot was built for another center (or never built).
    SnapshotStale {
        expected: Point3<i32>,
        built_for: Option<Point3<i32>>,
    },
    /// A visitor tried to start a traversal from inside a traversal.
    TraversalInProgress,
    /// The configuration file could not be parsed.
    Config(serde_json::Error),
    /// The configuration file could not be read.
    Io(io::Error),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewDistance { distance } => {
                write!(f, "invalid view distance {distance}")
            }
            Self::InvalidViewCone {
                near_distance,
                slope_divisor,
            } => write!(
                f,
                "invalid view cone: near distance {near_distance}, slope divisor {slope_divisor}"
            ),
            Self::SnapshotTooLarge { required, limit } => write!(
                f,
                "snapshot needs {required} bytes, limit is {limit} bytes"
            ),
            Self::RegistryNotFinalized => write!(f, "block registry was not finalized"),
            Self::RegistryFinalized => {
                write!(f, "block registry is finalized and can no longer change")
            }
            Self::ReservedBlockId(id) => write!(f, "block id {id} is reserved"),
            Self::SnapshotStale {
                expected,
                built_for: Some(built_for),
            } => write!(
                f,
                "snapshot was built for {built_for:?}, traversal requested at {expected:?}"
            ),
            Self::SnapshotStale {
                expected,
                built_for: None,
            } => write!(
                f,
                "snapshot was never built, traversal requested at {expected:?}"
            ),
            Self::TraversalInProgress => write!(f, "a traversal is already running"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Io(err) => write!(f, "cannot read configuration: {err}"),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WorldError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}

impl From<io::Error> for WorldError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
