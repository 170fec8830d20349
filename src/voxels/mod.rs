//! Voxel storage, snapshots and visibility.

pub mod block;
pub mod chunk;
pub mod config;
pub mod direction;
pub mod error;
pub mod terrain;
pub mod visibility;
pub mod volume;
pub mod world;
