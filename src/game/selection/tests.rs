//! Tests for unit selection

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::game::network::{DespawnBus, GameOver, GameOverBus, OwnedUnits, UnitDespawned};
    use crate::game::selection::{
        GestureState, PickCandidate, SelectionMarker, SelectionRect, SpatialQuery, UnitSelection,
    };
    use crate::game::selection::spatial::{intersect_ground, pick_along_ray, rect_contains};
    use crate::game::unit::layers;

    /// Projects world (x, y) straight onto the screen and answers hit tests
    /// from a fixed table of screen points.
    #[derive(Default)]
    struct FakeSpatial {
        hits: Vec<(Vec2, Entity)>,
    }

    impl SpatialQuery for FakeSpatial {
        fn hit_test(&self, screen_point: Vec2) -> Option<Entity> {
            self.hits
                .iter()
                .find(|(point, _)| *point == screen_point)
                .map(|(_, entity)| *entity)
        }

        fn world_to_screen(&self, world_point: Vec3) -> Option<Vec2> {
            Some(world_point.truncate())
        }
    }

    #[derive(Default)]
    struct RecordingMarker {
        log: Vec<(Entity, bool)>,
    }

    impl SelectionMarker for RecordingMarker {
        fn select(&mut self, unit: Entity) {
            self.log.push((unit, true));
        }

        fn deselect(&mut self, unit: Entity) {
            self.log.push((unit, false));
        }
    }

    impl RecordingMarker {
        fn is_marked(&self, unit: Entity) -> bool {
            self.log
                .iter()
                .rev()
                .find(|(e, _)| *e == unit)
                .is_some_and(|(_, selected)| *selected)
        }
    }

    fn spawn_units(count: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..count).map(|_| world.spawn_empty().id()).collect()
    }

    fn drag_select(
        selection: &mut UnitSelection,
        from: Vec2,
        to: Vec2,
        additive: bool,
        spatial: &FakeSpatial,
        owned: &OwnedUnits,
        marker: &mut RecordingMarker,
    ) {
        selection.press(from, additive, marker);
        selection.drag(to);
        selection.release(to, spatial, owned, marker);
    }

    fn click(
        selection: &mut UnitSelection,
        at: Vec2,
        additive: bool,
        spatial: &FakeSpatial,
        owned: &OwnedUnits,
        marker: &mut RecordingMarker,
    ) {
        selection.press(at, additive, marker);
        selection.release(at, spatial, owned, marker);
    }

    #[test]
    fn test_drag_selects_only_units_inside_box() {
        let units = spawn_units(2);
        let (a, b) = (units[0], units[1]);
        let owned = OwnedUnits::new([(a, Vec3::new(50.0, 50.0, 0.0)), (b, Vec3::new(300.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::new(10.0, 10.0), Vec2::new(200.0, 200.0), false, &spatial, &owned, &mut marker);

        assert_eq!(selection.selected().as_slice(), &[a]);
        assert!(marker.is_marked(a));
        assert!(!marker.is_marked(b));
        assert_eq!(selection.gesture().state(), GestureState::Idle);
        assert!(!selection.gesture().is_rect_visible());
    }

    #[test]
    fn test_drag_excludes_units_on_the_edge() {
        let units = spawn_units(3);
        let owned = OwnedUnits::new([
            (units[0], Vec3::new(10.0, 50.0, 0.0)),   // left edge
            (units[1], Vec3::new(100.0, 200.0, 0.0)), // bottom edge
            (units[2], Vec3::new(10.5, 10.5, 0.0)),   // just inside
        ]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::new(10.0, 10.0), Vec2::new(200.0, 200.0), false, &spatial, &owned, &mut marker);

        assert_eq!(selection.selected().as_slice(), &[units[2]]);
    }

    #[test]
    fn test_drag_works_in_any_direction() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::new(200.0, 200.0), Vec2::new(10.0, 10.0), false, &spatial, &owned, &mut marker);

        assert!(selection.selected().contains(units[0]));
    }

    #[test]
    fn test_drag_trusts_my_units_only() {
        let units = spawn_units(2);
        let (mine, enemy) = (units[0], units[1]);
        // The enemy sits inside the box but is not in the owned collection
        let owned = OwnedUnits::new([(mine, Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);

        assert!(selection.selected().contains(mine));
        assert!(!selection.selected().contains(enemy));
    }

    #[test]
    fn test_offscreen_box_selects_nothing() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::new(-500.0, -500.0), Vec2::new(-300.0, -300.0), false, &spatial, &owned, &mut marker);

        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_click_selects_owned_unit() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::ZERO)]);
        let spatial = FakeSpatial { hits: vec![(Vec2::new(40.0, 40.0), units[0])] };
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        click(&mut selection, Vec2::new(40.0, 40.0), false, &spatial, &owned, &mut marker);

        assert_eq!(selection.selected().as_slice(), &[units[0]]);
        assert!(marker.is_marked(units[0]));
    }

    #[test]
    fn test_click_on_unit_without_authority_never_selects() {
        let units = spawn_units(2);
        let (mine, enemy) = (units[0], units[1]);
        let owned = OwnedUnits::new([(mine, Vec3::ZERO)]);
        let spatial = FakeSpatial { hits: vec![(Vec2::new(5.0, 5.0), enemy)] };

        for additive in [false, true] {
            let mut marker = RecordingMarker::default();
            let mut selection = UnitSelection::new();
            click(&mut selection, Vec2::new(5.0, 5.0), additive, &spatial, &owned, &mut marker);
            assert!(!selection.selected().contains(enemy), "additive = {}", additive);
            assert!(!marker.is_marked(enemy));
        }
    }

    #[test]
    fn test_click_on_empty_space_clears_selection_at_press() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);
        assert_eq!(selection.selected().len(), 1);

        // Press alone already deselects
        selection.press(Vec2::new(500.0, 500.0), false, &mut marker);
        assert!(selection.selected().is_empty());
        assert!(!marker.is_marked(units[0]));

        selection.release(Vec2::new(500.0, 500.0), &spatial, &owned, &mut marker);
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_additive_press_keeps_selection() {
        let units = spawn_units(2);
        let (a, b) = (units[0], units[1]);
        let owned = OwnedUnits::new([(a, Vec3::new(50.0, 50.0, 0.0)), (b, Vec3::new(300.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);
        drag_select(&mut selection, Vec2::new(250.0, 0.0), Vec2::new(350.0, 100.0), true, &spatial, &owned, &mut marker);

        assert_eq!(selection.selected().as_slice(), &[a, b]);

        // Non-additive drag over b alone drops a
        drag_select(&mut selection, Vec2::new(250.0, 0.0), Vec2::new(350.0, 100.0), false, &spatial, &owned, &mut marker);
        assert_eq!(selection.selected().as_slice(), &[b]);
        assert!(!marker.is_marked(a));
    }

    #[test]
    fn test_additive_click_remarks_every_member() {
        let units = spawn_units(3);
        let owned = OwnedUnits::new(units.iter().map(|&e| (e, Vec3::new(50.0, 50.0, 0.0))));
        let spatial = FakeSpatial { hits: vec![(Vec2::new(1.0, 1.0), units[2])] };
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        // Box around the first two positions would catch all three, so select by click
        let first_two = OwnedUnits::new(units[..2].iter().map(|&e| (e, Vec3::new(50.0, 50.0, 0.0))));
        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &first_two, &mut marker);
        marker.log.clear();

        click(&mut selection, Vec2::new(1.0, 1.0), true, &spatial, &owned, &mut marker);

        assert_eq!(selection.selected().as_slice(), &[units[0], units[1], units[2]]);
        assert_eq!(
            marker.log,
            vec![(units[0], true), (units[1], true), (units[2], true)],
            "click should re-mark all members in order"
        );
    }

    #[test]
    fn test_clicking_a_member_does_not_duplicate_it() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::ZERO)]);
        let spatial = FakeSpatial { hits: vec![(Vec2::new(3.0, 3.0), units[0])] };
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        click(&mut selection, Vec2::new(3.0, 3.0), true, &spatial, &owned, &mut marker);
        click(&mut selection, Vec2::new(3.0, 3.0), true, &spatial, &owned, &mut marker);

        assert_eq!(selection.selected().len(), 1);
    }

    #[test]
    fn test_drag_then_back_to_anchor_is_a_click() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial { hits: vec![(Vec2::new(10.0, 10.0), units[0])] };
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        selection.press(Vec2::new(10.0, 10.0), false, &mut marker);
        selection.drag(Vec2::new(80.0, 80.0));
        selection.drag(Vec2::new(10.0, 10.0));
        selection.release(Vec2::new(10.0, 10.0), &spatial, &owned, &mut marker);

        assert_eq!(selection.selected().as_slice(), &[units[0]]);
    }

    #[test]
    fn test_reentrant_press_is_ignored() {
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        selection.press(Vec2::new(10.0, 10.0), false, &mut marker);
        selection.press(Vec2::new(90.0, 90.0), false, &mut marker);

        assert_eq!(selection.gesture().state(), GestureState::Dragging);
        assert_eq!(selection.gesture().anchor(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_building_placement_gate_makes_gestures_inert() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);
        selection.begin_building_placement();
        assert!(selection.is_placing_building());

        selection.press(Vec2::new(500.0, 500.0), false, &mut marker);
        assert_eq!(selection.gesture().state(), GestureState::Idle);
        assert_eq!(selection.selected().len(), 1, "press while placing must not clear");

        selection.end_building_placement();
        selection.press(Vec2::new(500.0, 500.0), false, &mut marker);
        assert_eq!(selection.gesture().state(), GestureState::Dragging);
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_despawn_removes_member_and_is_idempotent() {
        let units = spawn_units(2);
        let owned = OwnedUnits::new([(units[0], Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);

        assert!(!selection.unit_despawned(units[1]), "non-member is a no-op");
        assert!(selection.unit_despawned(units[0]));
        assert!(!selection.unit_despawned(units[0]));
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_release_outside_window_resolves_at_last_pointer() {
        let units = spawn_units(2);
        let (inside, outside) = (units[0], units[1]);
        let owned = OwnedUnits::new([(inside, Vec3::new(50.0, 50.0, 0.0)), (outside, Vec3::new(300.0, 300.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        selection.press(Vec2::new(10.0, 10.0), false, &mut marker);
        selection.drag(Vec2::new(80.0, 80.0));
        selection.release_at_last_pointer(&spatial, &owned, &mut marker);

        assert_eq!(selection.selected().as_slice(), &[inside]);
        assert_eq!(selection.gesture().state(), GestureState::Idle);
        assert!(!selection.gesture().is_rect_visible());

        // The next plain press is a fresh gesture and clears the selection
        selection.press(Vec2::new(400.0, 400.0), false, &mut marker);
        assert!(selection.selected().is_empty());
        assert_eq!(selection.gesture().anchor(), Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_cancel_gesture_keeps_selection() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();
        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);

        selection.press(Vec2::new(5.0, 5.0), true, &mut marker);
        selection.drag(Vec2::new(60.0, 60.0));
        selection.cancel_gesture();

        assert_eq!(selection.gesture().state(), GestureState::Idle);
        assert!(!selection.gesture().is_rect_visible());
        assert_eq!(selection.selected().as_slice(), &[units[0]]);
    }

    #[test]
    fn test_authority_loss_evicts_and_deselects() {
        let units = spawn_units(2);
        let (a, b) = (units[0], units[1]);
        let owned = OwnedUnits::new([(a, Vec3::new(20.0, 20.0, 0.0)), (b, Vec3::new(40.0, 40.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();
        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);

        assert!(selection.authority_lost(a, &mut marker));
        assert_eq!(selection.selected().as_slice(), &[b]);
        assert!(!marker.is_marked(a));
        assert!(marker.is_marked(b));

        assert!(!selection.authority_lost(a, &mut marker));
    }

    #[test]
    fn test_game_over_mid_drag_blocks_release() {
        let units = spawn_units(1);
        let owned = OwnedUnits::new([(units[0], Vec3::new(50.0, 50.0, 0.0))]);
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::new();

        selection.press(Vec2::ZERO, false, &mut marker);
        selection.drag(Vec2::new(100.0, 100.0));
        selection.game_over("red");
        selection.release(Vec2::new(100.0, 100.0), &spatial, &owned, &mut marker);

        assert!(selection.is_disabled());
        assert!(selection.selected().is_empty());
        assert!(marker.log.is_empty());

        // Still inert afterwards, and a second game over is harmless
        selection.game_over("blue");
        selection.end_building_placement();
        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_notifications_from_buses() {
        let despawn_bus = DespawnBus::default();
        let game_over_bus = GameOverBus::default();
        let units = spawn_units(2);
        let owned = OwnedUnits::new(units.iter().map(|&e| (e, Vec3::new(50.0, 50.0, 0.0))));
        let spatial = FakeSpatial::default();
        let mut marker = RecordingMarker::default();
        let mut selection = UnitSelection::subscribed(&despawn_bus, &game_over_bus);

        drag_select(&mut selection, Vec2::ZERO, Vec2::new(100.0, 100.0), false, &spatial, &owned, &mut marker);
        assert_eq!(selection.selected().len(), 2);

        despawn_bus.publish(UnitDespawned(units[0]));
        despawn_bus.publish(UnitDespawned(units[0]));
        game_over_bus.publish(GameOver { winner: "red".to_string() });
        selection.process_notifications();

        assert_eq!(selection.selected().as_slice(), &[units[1]]);
        assert!(selection.is_disabled());

        assert_eq!(despawn_bus.subscriber_count(), 1);
        drop(selection);
        assert_eq!(despawn_bus.subscriber_count(), 0);
        assert_eq!(game_over_bus.subscriber_count(), 0);
    }

    #[test]
    fn test_random_boxes_select_exactly_contained_units() {
        let mut rng = fastrand::Rng::with_seed(7);
        let units = spawn_units(40);

        for _ in 0..50 {
            let owned = OwnedUnits::new(
                units.iter().map(|&e| (e, Vec3::new(rng.f32() * 400.0, rng.f32() * 400.0, 0.0))),
            );
            let from = Vec2::new(rng.f32() * 400.0, rng.f32() * 400.0);
            let to = Vec2::new(rng.f32() * 400.0, rng.f32() * 400.0);
            let spatial = FakeSpatial::default();
            let mut marker = RecordingMarker::default();
            let mut selection = UnitSelection::new();

            drag_select(&mut selection, from, to, false, &spatial, &owned, &mut marker);

            let rect = SelectionRect::from_corners(from, to);
            for (entity, position) in units.iter().zip(owned_positions(&owned)) {
                assert_eq!(
                    selection.selected().contains(*entity),
                    rect.contains(position.truncate()),
                    "unit at {:?}, box {:?}..{:?}",
                    position,
                    rect.min(),
                    rect.max()
                );
            }
        }
    }

    fn owned_positions(owned: &OwnedUnits) -> Vec<Vec3> {
        use crate::game::network::UnitOwnership;
        owned.my_units().iter().map(|u| u.position).collect()
    }

    #[test]
    fn test_rect_is_centered_with_non_negative_size() {
        let rect = SelectionRect::from_corners(Vec2::new(200.0, 50.0), Vec2::new(100.0, 150.0));
        assert_eq!(rect.size, Vec2::new(100.0, 100.0));
        assert_eq!(rect.center, Vec2::new(150.0, 100.0));
        assert_eq!(rect.min(), Vec2::new(100.0, 50.0));
        assert_eq!(rect.max(), Vec2::new(200.0, 150.0));

        assert!(SelectionRect::from_corners(Vec2::ONE, Vec2::ONE).is_degenerate(0.0));
        // A line has zero area but is still a drag
        assert!(!SelectionRect::from_corners(Vec2::ZERO, Vec2::new(10.0, 0.0)).is_degenerate(0.0));
        assert!(SelectionRect::from_corners(Vec2::ZERO, Vec2::new(3.0, 4.0)).is_degenerate(5.0));
    }

    #[test]
    fn test_rect_contains_is_strict() {
        let min = Vec2::ZERO;
        let max = Vec2::new(10.0, 10.0);
        assert!(rect_contains(min, max, Vec2::new(5.0, 5.0)));
        assert!(!rect_contains(min, max, Vec2::new(0.0, 5.0)));
        assert!(!rect_contains(min, max, Vec2::new(5.0, 10.0)));
        assert!(!rect_contains(min, max, Vec2::new(11.0, 5.0)));
    }

    #[test]
    fn test_pick_returns_nearest_unit_on_selectable_layer() {
        let units = spawn_units(3);
        let candidates = [
            PickCandidate { entity: units[0], position: Vec3::new(0.0, 0.0, -10.0), radius: 0.5, layer: layers::UNIT },
            PickCandidate { entity: units[1], position: Vec3::new(0.0, 0.0, -5.0), radius: 0.5, layer: layers::UNIT },
            PickCandidate { entity: units[2], position: Vec3::new(0.0, 0.0, -2.0), radius: 0.5, layer: layers::BUILDING },
        ];

        let hit = pick_along_ray(Vec3::ZERO, Vec3::NEG_Z, &candidates, layers::UNIT, f32::MAX);
        assert_eq!(hit, Some(units[1]));

        let hit = pick_along_ray(Vec3::ZERO, Vec3::NEG_Z, &candidates, layers::ALL, f32::MAX);
        assert_eq!(hit, Some(units[2]));

        let hit = pick_along_ray(Vec3::ZERO, Vec3::NEG_Z, &candidates, layers::UNIT, 3.0);
        assert_eq!(hit, None, "both units are beyond max distance");
    }

    #[test]
    fn test_pick_ignores_units_behind_or_beside_the_ray() {
        let units = spawn_units(2);
        let candidates = [
            PickCandidate { entity: units[0], position: Vec3::new(0.0, 0.0, 5.0), radius: 0.5, layer: layers::UNIT },
            PickCandidate { entity: units[1], position: Vec3::new(2.0, 0.0, -5.0), radius: 0.5, layer: layers::UNIT },
        ];
        assert_eq!(pick_along_ray(Vec3::ZERO, Vec3::NEG_Z, &candidates, layers::ALL, f32::MAX), None);
    }

    #[test]
    fn test_ground_intersection() {
        let hit = intersect_ground(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 1.0).normalize());
        let hit = hit.expect("ray points at the ground");
        assert!(hit.y.abs() < 1e-4);
        assert!((hit.z - 10.0).abs() < 1e-4);

        assert_eq!(intersect_ground(Vec3::new(0.0, 10.0, 0.0), Vec3::Y), None);
        assert_eq!(intersect_ground(Vec3::new(0.0, 10.0, 0.0), Vec3::X), None);
    }
}
