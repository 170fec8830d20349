use std::{collections::HashMap, rc::Rc};

use cgmath::{Point3, Vector3};
use voxel_sight::voxels::block::{BOUND_BOTTOM, BOUND_SKY, NO_CELL, VISITED_CELL};
use voxel_sight::voxels::chunk::CHUNK_DY;
use voxel_sight::{BlockDef, BlockRegistry, BlockVisibility, World, WorldConfig, WorldError};

fn world(max_view_distance: u32) -> World {
    let config = WorldConfig {
        max_view_distance,
        ..WorldConfig::default()
    };
    World::new(config, Rc::new(BlockRegistry::with_default_blocks())).unwrap()
}

#[test]
fn writes_read_back_everywhere() {
    let mut world = world(8);
    let mut rng = fastrand::Rng::with_seed(11);
    let mut written = HashMap::new();
    for _ in 0..500 {
        let (x, y, z) = (rng.i32(-200..200), rng.i32(0..CHUNK_DY), rng.i32(-200..200));
        let cell = rng.u8(1..11);
        world.set_cell(x, y, z, cell);
        written.insert((x, y, z), cell);
    }
    for ((x, y, z), cell) in written {
        assert_eq!(world.get_cell(x, y, z), cell, "({x}, {y}, {z})");
    }

    world.set_cell(-7, 12, 40, 3);
    assert_eq!(world.get_cell(-7, 12, 40), 3);
    world.set_cell(-7, 12, 40, 5);
    assert_eq!(world.get_cell(-7, 12, 40), 5);
}

#[test]
fn unwritten_cells_are_empty() {
    let mut world = world(8);
    assert_eq!(world.get_cell(0, 0, 0), NO_CELL);
    assert_eq!(world.get_cell(i32::MAX, 1000, i32::MIN), NO_CELL);
    assert_eq!(world.get_cell(3, -1, 3), BOUND_BOTTOM);

    world.set_cell(0, 10, 0, 4);
    // same chunk, other layer and column
    assert_eq!(world.get_cell(0, 9, 0), NO_CELL);
    assert_eq!(world.get_cell(15, 10, 15), NO_CELL);
}

#[test]
fn chunk_cache_does_not_leak_between_chunks() {
    let config = WorldConfig {
        max_view_distance: 8,
        chunk_cache_capacity: 4,
        ..WorldConfig::default()
    };
    let mut world = World::new(config, Rc::new(BlockRegistry::with_default_blocks())).unwrap();
    for i in 0..10 {
        world.set_cell(i * 16, 0, 0, (i + 1) as u8);
    }
    for round in 0..3 {
        for i in (0..10).rev() {
            assert_eq!(world.get_cell(i * 16, 0, 0), (i + 1) as u8, "round {round}");
            assert_eq!(world.get_cell(i * 16 + 1, 0, 0), NO_CELL);
        }
    }
}

#[test]
fn registry_is_total_after_finalize() {
    let mut registry = BlockRegistry::new();
    registry
        .register(BlockDef::new(1, "stone", BlockVisibility::Opaque, 0))
        .unwrap();
    registry
        .register(BlockDef::new(2, "leaves", BlockVisibility::HalfOpaque, 1))
        .unwrap();
    assert!(registry.get(3).is_none());
    registry.finalize();

    for id in 0..=255u8 {
        let def = registry.get(id).unwrap();
        assert_eq!(def.id, id);
        assert_eq!(registry.can_pass(id), def.can_pass());
        assert_eq!(registry.is_opaque(id), def.is_opaque());
        assert_eq!(registry.is_visible(id), def.is_visible());
    }
    assert!(registry.can_pass(2) && registry.is_visible(2) && !registry.is_opaque(2));
    assert!(!registry.can_pass(BOUND_BOTTOM) && registry.is_opaque(BOUND_BOTTOM));
    assert!(registry.can_pass(BOUND_SKY) && !registry.is_visible(BOUND_SKY));
    assert_eq!(registry.get(200).map(|def| def.name.as_str()), Some("undefined"));

    assert!(matches!(
        registry.register(BlockDef::new(4, "late", BlockVisibility::Opaque, 0)),
        Err(WorldError::RegistryFinalized)
    ));
}

#[test]
fn reserved_ids_cannot_be_registered() {
    let mut registry = BlockRegistry::new();
    assert!(matches!(
        registry.register(BlockDef::new(VISITED_CELL, "visited", BlockVisibility::Opaque, 0)),
        Err(WorldError::ReservedBlockId(VISITED_CELL))
    ));
    assert!(matches!(
        registry.register(BlockDef::new(BOUND_SKY, "sky", BlockVisibility::Opaque, 0)),
        Err(WorldError::ReservedBlockId(BOUND_SKY))
    ));
}

#[test]
fn snapshot_matches_world() {
    let mut world = world(6);
    let mut rng = fastrand::Rng::with_seed(3);
    let mut max_y = -1;
    for _ in 0..400 {
        let y = rng.i32(0..10);
        world.set_cell(rng.i32(-12..12), y, rng.i32(-12..12), rng.u8(1..11));
        max_y = max_y.max(y);
    }
    let center = Point3::new(2, 4, -3);
    world.rebuild_volume(center).unwrap();

    world
        .with_volume(|volume| {
            assert_eq!(volume.center(), Some(center));
            let r = volume.size();
            for y in -r..r {
                for z in -r..r {
                    for x in -r..r {
                        let offset = Vector3::new(x, y, z);
                        let pos = center + offset;
                        let expected = if pos.y < 0 {
                            BOUND_BOTTOM
                        } else if pos.y > max_y {
                            BOUND_SKY
                        } else {
                            world.get_cell(pos.x, pos.y, pos.z)
                        };
                        assert_eq!(volume.get_at(offset), expected, "{pos:?}");
                    }
                }
            }
        })
        .unwrap();
}

#[test]
fn high_writes_do_not_grow_rebuilds() {
    let mut world = world(8);
    world.set_cell(0, i32::MAX, 0, 1);
    world.set_cell(0, 50_000_000, 0, 1);
    world.set_cell(1, CHUNK_DY, 1, 1);
    world.set_cell(2, 1, 2, 4);
    world.set_cell(3, CHUNK_DY - 1, 3, 5);
    assert_eq!(world.revision(), 2);
    assert_eq!(world.get_cell(0, 50_000_000, 0), NO_CELL);

    let center = Point3::new(0, 2, 0);
    world.rebuild_volume(center).unwrap();
    world
        .with_volume(|volume| {
            assert_eq!(volume.get_at(Vector3::new(2, -1, 2)), 4);
            assert_eq!(volume.get_at(Vector3::new(0, 0, 0)), NO_CELL);
            assert_eq!(volume.get_at(Vector3::new(0, -3, 0)), BOUND_BOTTOM);
        })
        .unwrap();

    let top = Point3::new(3, CHUNK_DY - 3, 3);
    world.rebuild_volume(top).unwrap();
    world
        .with_volume(|volume| {
            assert_eq!(volume.get_at(Vector3::new(0, 2, 0)), 5);
            assert_eq!(volume.get_at(Vector3::new(0, 3, 0)), BOUND_SKY);
        })
        .unwrap();
}

#[test]
fn config_file_is_loaded_and_validated() {
    let dir = std::env::temp_dir().join(format!("voxel-sight-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("world.json");
    std::fs::write(&path, r#"{ "max_view_distance": 12, "prune_behind": false }"#).unwrap();

    let config = WorldConfig::from_json_file(&path).unwrap();
    assert_eq!(config.max_view_distance, 12);
    assert!(!config.prune_behind);
    assert!(config.validate().is_ok());

    assert!(matches!(
        WorldConfig::from_json_file(dir.join("missing.json")),
        Err(WorldError::Io(_))
    ));
    std::fs::remove_dir_all(&dir).unwrap();

    let oversize = WorldConfig {
        max_view_distance: 500,
        max_snapshot_bytes: 16 * 1024 * 1024,
        ..WorldConfig::default()
    };
    assert!(matches!(
        World::new(oversize, Rc::new(BlockRegistry::with_default_blocks())),
        Err(WorldError::SnapshotTooLarge { .. })
    ));
}
