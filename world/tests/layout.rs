use tunnelman_core::{CellCoord, EntityKind, Level, EXIT_CELL};
use tunnelman_system_spawning::LevelLayout;
use tunnelman_world::{self as world, query, Config, Route, World};

fn hand_made_layout() -> LevelLayout {
    LevelLayout {
        boulders: vec![CellCoord::new(10, 40)],
        gold: vec![CellCoord::new(45, 20)],
        barrels: vec![CellCoord::new(5, 10), CellCoord::new(50, 30)],
    }
}

#[test]
fn layout_objects_start_buried_except_boulders() {
    let world = World::from_layout(Config::new(Level::new(1), 3), &hand_made_layout());
    let view = query::entity_view(&world);

    assert_eq!(view.len(), 5);
    assert_eq!(view.count(EntityKind::Player), 1);
    assert_eq!(view.count(EntityKind::Boulder), 1);
    assert_eq!(view.count(EntityKind::Barrel), 2);
    assert!(view
        .iter()
        .filter(|snapshot| matches!(snapshot.kind, EntityKind::Gold | EntityKind::Barrel))
        .all(|snapshot| !snapshot.visible));
    assert_eq!(query::barrels_left(&world), 2);
}

#[test]
fn boulder_footprint_is_cleared_and_blocks() {
    let world = World::from_layout(Config::new(Level::new(1), 3), &hand_made_layout());

    assert!(query::is_boulder_at(&world, CellCoord::new(10, 40)));
    assert!(!query::is_boulder_at(&world, CellCoord::new(11, 41)));
    for cell in CellCoord::new(10, 40).footprint() {
        assert!(!query::has_material(&world, cell));
        assert!(query::is_blocked(&world, cell));
    }
    assert!(query::is_boulder_within(&world, CellCoord::new(13, 40), 3.0));
    assert!(!query::is_boulder_within(&world, CellCoord::new(14, 40), 3.0));
}

#[test]
fn out_of_range_cells_never_hold_material() {
    let mut world = World::from_layout(Config::new(Level::new(1), 3), &LevelLayout::default());

    let outside = [
        CellCoord::new(-1, 5),
        CellCoord::new(64, 5),
        CellCoord::new(5, 60),
    ];
    for cell in outside {
        assert!(!query::has_material(&world, cell));
        assert!(!world::remove_material(&mut world, cell));
    }
}

#[test]
fn removing_material_twice_reports_false_the_second_time() {
    let mut world = World::from_layout(Config::new(Level::new(1), 3), &LevelLayout::default());
    let cell = CellCoord::new(2, 2);
    let before = query::remaining_material(&world);

    assert!(world::remove_material(&mut world, cell));
    assert!(!world::remove_material(&mut world, cell));
    assert_eq!(query::remaining_material(&world), before - 1);
}

#[test]
fn exit_route_from_the_exit_is_immediate() {
    let world = World::from_layout(Config::new(Level::new(1), 3), &LevelLayout::default());

    assert_eq!(query::route_to_exit(&world, EXIT_CELL), Route::Arrived);
    assert_eq!(
        query::route_to_exit(&world, CellCoord::new(30, 60)),
        Route::Step(tunnelman_core::Direction::Right)
    );
    assert_eq!(
        query::route_to_exit(&world, CellCoord::new(5, 5)),
        Route::Unreachable
    );
}
