//! # Voxel Sight Demo
//!
//! Builds a diamond-square terrain, runs one visibility traversal from above it and logs what
//! was found.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::{process::ExitCode, rc::Rc};

use cgmath::{Point2, Point3};
use log::{error, info};
use voxel_sight::{
    BlockRegistry, Dir, FaceBuilder, HeightMap, Position, World, WorldConfig, WorldError,
};

const TERRAIN_BITS: u32 = 6;
const TERRAIN_SEED: u64 = 0x5eed;

fn run() -> Result<(), WorldError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            WorldConfig::from_json_file(path)?
        }
        None => WorldConfig::default(),
    };

    let registry = Rc::new(BlockRegistry::with_default_blocks());
    let grass = registry.id_by_name("grass").unwrap_or(1);
    let mut world = World::new(config, registry)?;

    let map = HeightMap::diamond_square(TERRAIN_BITS, 0.55, TERRAIN_SEED);
    let half = (map.size() / 2) as i32;
    world.apply_heightmap(&map, Point2::new(-half, -half), 2, grass);

    let eye_y = 2 + map.height(map.size() / 2, map.size() / 2) + 3;
    let mut position = Position::new(Point3::new(0, eye_y, 0), Dir::North);
    world.set_cam_position(position);

    let mut builder = FaceBuilder::new();
    for _ in 0..4 {
        let stats = world.visit_from_camera(&mut builder)?;
        let smooth = builder.faces.iter().filter(|face| face.smooth).count();
        info!(
            "Facing {:?}: {} cells visited, {} reported, {} faces ({} smoothed), distance {}",
            position.direction.dir(),
            stats.cells_visited,
            stats.cells_reported,
            stats.faces_reported,
            smooth,
            stats.max_distance_reached
        );
        position.turn_right();
        world.set_cam_position(position);
    }

    let bytes = bytemuck::cast_slice::<_, u8>(builder.packed().as_slice()).len();
    info!("Last face buffer: {} faces, {} bytes", builder.faces.len(), bytes);
    Ok(())
}

fn main() -> ExitCode {
    voxel_sight::init_logger();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
