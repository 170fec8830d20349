use std::{collections::HashSet, rc::Rc};

use cgmath::{Point2, Point3};
use voxel_sight::{
    BlockRegistry, CellId, CellVisitor, Dir, FaceBuilder, FaceMask, HeightMap, Position,
    TraversalStats, ViewCone, VisibilityTraversal, VisitRecorder, VolumeData, World, WorldConfig,
    WorldError,
};

const STONE: CellId = 1;
const BRICK: CellId = 2;
const BEDROCK: CellId = 3;
const GRASS: CellId = 9;
const GLASS: CellId = 10;

fn world_with(config: WorldConfig) -> World {
    World::new(config, Rc::new(BlockRegistry::with_default_blocks())).unwrap()
}

fn world(max_view_distance: u32) -> World {
    world_with(WorldConfig {
        max_view_distance,
        ..WorldConfig::default()
    })
}

fn visit(world: &World, pos: Point3<i32>, dir: Dir) -> (VisitRecorder, TraversalStats) {
    let mut recorder = VisitRecorder::new();
    let stats = world
        .visit_visible_cells(&Position::new(pos, dir), &mut recorder)
        .unwrap();
    (recorder, stats)
}

#[test]
fn isolated_cube_reports_near_faces_once() {
    let mut world = world(8);
    world.set_cell(2, 7, -4, STONE);

    let (recorder, stats) = visit(&world, Point3::new(0, 5, 0), Dir::North);
    assert_eq!(recorder.visits.len(), 1);
    let visit = recorder.visits[0];
    assert_eq!(visit.pos, Point3::new(2, 7, -4));
    assert_eq!(visit.cell, STONE);
    assert_eq!(visit.faces, FaceMask::WEST | FaceMask::DOWN | FaceMask::SOUTH);
    assert_eq!(recorder.faces, 3);
    assert_eq!(stats.cells_reported, 1);
    assert_eq!(stats.faces_reported, 3);
    assert_eq!(recorder.traversals, 1);
}

#[test]
fn back_faces_are_kept_without_culling() {
    let mut world = world_with(WorldConfig {
        max_view_distance: 8,
        cull_back_faces: false,
        ..WorldConfig::default()
    });
    world.set_cell(2, 7, -4, STONE);

    let (recorder, _) = visit(&world, Point3::new(0, 5, 0), Dir::North);
    assert_eq!(recorder.visits.len(), 1);
    assert_eq!(recorder.visits[0].faces, FaceMask::all());
}

#[test]
fn touching_cubes_hide_shared_faces() {
    let mut world = world(8);
    world.set_cell(-1, 5, -3, STONE);
    world.set_cell(0, 5, -3, BRICK);

    let (recorder, _) = visit(&world, Point3::new(0, 5, 0), Dir::North);
    let left = recorder.find(Point3::new(-1, 5, -3)).unwrap();
    let right = recorder.find(Point3::new(0, 5, -3)).unwrap();
    assert_eq!(left.faces, FaceMask::UP | FaceMask::DOWN | FaceMask::SOUTH);
    assert_eq!(
        right.faces,
        FaceMask::EAST | FaceMask::UP | FaceMask::DOWN | FaceMask::SOUTH
    );
    assert!(!left.faces.has(Dir::East));
    assert!(!right.faces.has(Dir::West));
}

#[test]
fn cells_are_reported_at_most_once() {
    let mut world = world(24);
    let map = HeightMap::diamond_square(5, 0.6, 99);
    world.apply_heightmap(&map, Point2::new(-16, -16), 1, GRASS);
    for x in -3..=3 {
        world.set_cell(x, 30, -6, GLASS);
    }
    let eye = Point3::new(0, 2 + map.max_height() + 2, 0);

    for dir in Dir::all() {
        let (recorder, stats) = visit(&world, eye, dir);
        let unique: HashSet<_> = recorder.visits.iter().map(|visit| visit.pos).collect();
        assert_eq!(unique.len(), recorder.visits.len(), "{dir:?}");
        assert_eq!(stats.cells_reported, recorder.visits.len());
        if dir != Dir::Up {
            assert!(stats.cells_reported > 0, "{dir:?}");
        }
        for visit in &recorder.visits {
            assert!(!visit.faces.is_empty());
            assert_eq!(visit.cell, world.get_cell(visit.pos.x, visit.pos.y, visit.pos.z));
        }
    }
}

fn corner_world(close_gap: bool) -> World {
    let mut world = world(4);
    for (x, y, z) in [(1, 0, -1), (1, 0, 0), (0, 1, 0)] {
        world.set_cell(x, y, z, STONE);
    }
    if close_gap {
        world.set_cell(0, 1, -1, STONE);
    }
    // marker in the diagonal gap
    world.set_cell(1, 1, -1, BRICK);
    world
}

#[test]
fn sweep_does_not_squeeze_through_closed_diagonal() {
    let world = corner_world(true);
    let (recorder, _) = visit(&world, Point3::new(0, 0, 0), Dir::North);
    assert!(recorder.find(Point3::new(1, 1, -1)).is_none());
    assert!(recorder.find(Point3::new(1, 0, -1)).is_some());
}

#[test]
fn open_diagonal_is_reachable() {
    let world = corner_world(false);
    let (recorder, _) = visit(&world, Point3::new(0, 0, 0), Dir::North);
    let marker = recorder.find(Point3::new(1, 1, -1)).unwrap();
    assert_eq!(marker.cell, BRICK);
    assert!(marker.faces.has(Dir::West));
    assert!(marker.faces.has(Dir::South));
    assert!(!marker.faces.has(Dir::Down));
}

#[test]
fn floor_seen_from_above() {
    let mut world = world(8);
    for z in -10..=10 {
        for x in -10..=10 {
            world.set_cell(x, 0, z, BEDROCK);
        }
    }

    let (recorder, stats) = visit(&world, Point3::new(0, 3, 0), Dir::North);
    for pos in [Point3::new(0, 0, 0), Point3::new(0, 0, -5), Point3::new(3, 0, -6)] {
        let visit = recorder.find(pos).unwrap_or_else(|| panic!("{pos:?} not reported"));
        assert_eq!(visit.faces, FaceMask::UP, "{pos:?}");
    }
    assert!(recorder.find(Point3::new(0, 0, 7)).is_none());
    for visit in &recorder.visits {
        assert_eq!(visit.pos.y, 0);
        assert_eq!(visit.cell, BEDROCK);
        assert!(!visit.faces.has(Dir::Down));
    }
    let unique: HashSet<_> = recorder.visits.iter().map(|visit| visit.pos).collect();
    assert_eq!(unique.len(), recorder.visits.len());
    assert!(stats.max_distance_reached <= 8);
}

#[test]
fn view_cone_limits_sideways_reports() {
    let floor = |cone: ViewCone| {
        let mut world = world_with(WorldConfig {
            max_view_distance: 8,
            view_cone: cone,
            ..WorldConfig::default()
        });
        for z in -10..=10 {
            for x in -10..=10 {
                world.set_cell(x, 0, z, BEDROCK);
            }
        }
        visit(&world, Point3::new(0, 3, 0), Dir::North).0
    };

    let narrow = floor(ViewCone::default());
    let open = floor(ViewCone::DISABLED);
    assert!(open.visits.len() > narrow.visits.len());
    // far to the side of the facing axis
    assert!(narrow.find(Point3::new(-7, 0, -1)).is_none());
    assert!(open.find(Point3::new(-7, 0, -1)).is_some());
}

#[test]
fn glass_is_reported_and_seen_through() {
    let mut world = world(8);
    world.set_cell(0, 2, -2, GLASS);
    world.set_cell(0, 2, -4, STONE);

    let (recorder, _) = visit(&world, Point3::new(0, 2, 0), Dir::North);
    let glass = recorder.find(Point3::new(0, 2, -2)).unwrap();
    assert!(glass.faces.has(Dir::South));
    assert!(recorder.find(Point3::new(0, 2, -4)).is_some());
}

#[test]
fn edits_and_moves_refresh_the_snapshot() {
    let mut world = world(8);
    world.set_cell(0, 1, -3, STONE);
    let (recorder, _) = visit(&world, Point3::new(0, 1, 0), Dir::North);
    assert_eq!(recorder.visits.len(), 1);

    world.set_cell(2, 1, -3, BRICK);
    let (recorder, _) = visit(&world, Point3::new(0, 1, 0), Dir::North);
    assert_eq!(recorder.visits.len(), 2);

    let (recorder, _) = visit(&world, Point3::new(0, 1, 1), Dir::North);
    assert!(recorder.find(Point3::new(2, 1, -3)).is_some());
    world
        .with_volume(|volume| assert_eq!(volume.center(), Some(Point3::new(0, 1, 1))))
        .unwrap();
}

#[test]
fn traversal_rejects_stale_snapshot() {
    let mut world = world(8);
    world.set_cell(0, 0, -2, STONE);

    let mut volume = VolumeData::new(world.config().snapshot_dist_bits());
    let mut traversal = VisibilityTraversal::new(world.config());
    let mut recorder = VisitRecorder::new();
    let position = Position::new(Point3::new(0, 0, 0), Dir::North);

    let result = traversal.run(&volume, world.registry(), &position, &mut recorder, &world);
    assert!(matches!(
        result,
        Err(WorldError::SnapshotStale { built_for: None, .. })
    ));

    volume.rebuild(world.chunks(), Point3::new(5, 0, 5));
    let result = traversal.run(&volume, world.registry(), &position, &mut recorder, &world);
    assert!(matches!(
        result,
        Err(WorldError::SnapshotStale {
            built_for: Some(built_for),
            ..
        }) if built_for == Point3::new(5, 0, 5)
    ));

    volume.rebuild(world.chunks(), position.pos);
    let stats = traversal
        .run(&volume, world.registry(), &position, &mut recorder, &world)
        .unwrap();
    assert_eq!(stats.cells_reported, 1);
    assert_eq!(recorder.visits[0].pos, Point3::new(0, 0, -2));
}

struct Reentrant {
    result: Option<Result<TraversalStats, WorldError>>,
}

impl CellVisitor for Reentrant {
    fn visit(
        &mut self,
        world: &World,
        position: &Position,
        _pos: Point3<i32>,
        _cell: CellId,
        _faces: FaceMask,
    ) {
        if self.result.is_none() {
            let mut inner = VisitRecorder::new();
            self.result = Some(world.visit_visible_cells(position, &mut inner));
        }
    }
}

#[test]
fn nested_traversal_is_an_error() {
    let mut world = world(8);
    world.set_cell(0, 0, -2, STONE);
    let mut visitor = Reentrant { result: None };
    world
        .visit_visible_cells(&Position::new(Point3::new(0, 0, 0), Dir::North), &mut visitor)
        .unwrap();
    assert!(matches!(
        visitor.result,
        Some(Err(WorldError::TraversalInProgress))
    ));
}

#[test]
fn face_builder_emits_one_face_per_bit() {
    let mut world = world(8);
    world.set_cell(2, 7, -4, GRASS);
    world.set_cam_position(Position::new(Point3::new(0, 5, 0), Dir::North));

    let mut builder = FaceBuilder::new();
    let stats = world.visit_from_camera(&mut builder).unwrap();
    assert_eq!(builder.faces.len(), stats.faces_reported);
    assert_eq!(builder.cells(), 1);
    // top face is hidden from below, so nothing is smoothed
    assert!(builder.faces.iter().all(|face| !face.smooth));

    world.set_cam_position(Position::new(Point3::new(0, 9, 0), Dir::North));
    world.visit_from_camera(&mut builder).unwrap();
    let top = builder
        .faces
        .iter()
        .find(|face| face.side == Dir::Up)
        .unwrap();
    assert!(top.smooth);
    assert_eq!(builder.packed().len(), builder.faces.len());
}

#[test]
fn steep_view_cone_is_accepted_and_swept() {
    let config = WorldConfig {
        max_view_distance: 8,
        view_cone: ViewCone {
            near_distance: 0,
            slope_divisor: i32::MAX,
        },
        ..WorldConfig::default()
    };
    assert!(config.validate().is_ok());
    let mut world = world_with(config);
    for z in -10..=10 {
        for x in -10..=10 {
            world.set_cell(x, 0, z, BEDROCK);
        }
    }

    let (recorder, _) = visit(&world, Point3::new(0, 3, 0), Dir::North);
    assert!(recorder.find(Point3::new(0, 0, -5)).is_some());
    // level with the viewer along the facing axis
    assert!(recorder.find(Point3::new(-3, 0, 0)).is_none());
}

#[test]
fn pruning_skips_cells_behind_the_viewer() {
    let behind = |prune_behind: bool| {
        let mut world = world_with(WorldConfig {
            max_view_distance: 8,
            prune_behind,
            view_cone: ViewCone::DISABLED,
            ..WorldConfig::default()
        });
        world.set_cell(0, 0, 6, STONE);
        let (recorder, stats) = visit(&world, Point3::new(0, 0, 0), Dir::North);
        (recorder.find(Point3::new(0, 0, 6)).is_some(), stats.cells_visited)
    };

    let (pruned_seen, pruned_visited) = behind(true);
    let (full_seen, full_visited) = behind(false);
    assert!(!pruned_seen);
    assert!(full_seen);
    assert!(pruned_visited < full_visited);
}
