use bevy::prelude::*;
use tankio::game::network::{
    DespawnBus, GameOver, GameOverBus, LocalPlayer, NetworkPlugin, OwnedUnits, Owner, PlayerId,
};
use tankio::game::selection::systems::{evict_foreign_units, process_selection_notifications};
use tankio::game::selection::{SelectionMarker, SpatialQuery, UnitSelection};
use tankio::game::unit::{Selected, Unit};

/// World (x, y) is the screen position; nothing is under the cursor.
struct TopDown;

impl SpatialQuery for TopDown {
    fn hit_test(&self, _screen_point: Vec2) -> Option<Entity> {
        None
    }

    fn world_to_screen(&self, world_point: Vec3) -> Option<Vec2> {
        Some(world_point.truncate())
    }
}

/// Marks units directly in the world.
struct WorldMarker<'w> {
    world: &'w mut World,
}

impl SelectionMarker for WorldMarker<'_> {
    fn select(&mut self, unit: Entity) {
        if let Ok(mut entity) = self.world.get_entity_mut(unit) {
            entity.insert(Selected);
        }
    }

    fn deselect(&mut self, unit: Entity) {
        if let Ok(mut entity) = self.world.get_entity_mut(unit) {
            entity.remove::<Selected>();
        }
    }
}

fn setup_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(NetworkPlugin);
    app.init_resource::<UnitSelection>();
    app.add_systems(Update, (process_selection_notifications, evict_foreign_units));
    app.update();
    app
}

fn spawn_unit(app: &mut App, player: u8, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Unit, Owner(PlayerId(player)), Transform::from_translation(position)))
        .id()
}

/// Drags a box from `from` to `to` over every unit in the world.
fn box_select(app: &mut App, from: Vec2, to: Vec2) {
    let local = *app.world().resource::<LocalPlayer>();
    let owned = {
        let world = app.world_mut();
        let mut query = world.query_filtered::<(Entity, &Owner, &Transform), With<Unit>>();
        OwnedUnits::collect(local, query.iter(world))
    };

    app.world_mut().resource_scope(|world, mut selection: Mut<UnitSelection>| {
        let mut marker = WorldMarker { world };
        selection.press(from, false, &mut marker);
        selection.drag(to);
        selection.release(to, &TopDown, &owned, &mut marker);
    });
}

fn selected(app: &App) -> Vec<Entity> {
    app.world().resource::<UnitSelection>().selected().iter().collect()
}

#[test]
fn test_box_selects_only_local_units() {
    let mut app = setup_app();
    let mine = spawn_unit(&mut app, 0, Vec3::new(2.0, 2.0, 0.0));
    let theirs = spawn_unit(&mut app, 1, Vec3::new(3.0, 3.0, 0.0));
    let outside = spawn_unit(&mut app, 0, Vec3::new(20.0, 2.0, 0.0));

    box_select(&mut app, Vec2::ZERO, Vec2::new(10.0, 10.0));

    assert_eq!(selected(&app), vec![mine]);
    assert!(app.world().get::<Selected>(mine).is_some());
    assert!(app.world().get::<Selected>(theirs).is_none());
    assert!(app.world().get::<Selected>(outside).is_none());
}

#[test]
fn test_despawned_unit_leaves_selection() {
    let mut app = setup_app();
    let a = spawn_unit(&mut app, 0, Vec3::new(2.0, 2.0, 0.0));
    let b = spawn_unit(&mut app, 0, Vec3::new(4.0, 4.0, 0.0));

    box_select(&mut app, Vec2::ZERO, Vec2::new(10.0, 10.0));
    assert_eq!(selected(&app), vec![a, b]);

    app.world_mut().despawn(a);
    app.update();

    assert_eq!(selected(&app), vec![b]);
}

#[test]
fn test_ownership_change_leaves_selection() {
    let mut app = setup_app();
    let lost = spawn_unit(&mut app, 0, Vec3::new(2.0, 2.0, 0.0));
    let kept = spawn_unit(&mut app, 0, Vec3::new(4.0, 4.0, 0.0));
    app.update();

    box_select(&mut app, Vec2::ZERO, Vec2::new(10.0, 10.0));
    app.update();
    assert_eq!(selected(&app), vec![lost, kept]);

    app.world_mut().entity_mut(lost).insert(Owner(PlayerId(1)));
    app.update();

    assert_eq!(selected(&app), vec![kept]);
    assert!(app.world().get::<Selected>(lost).is_none());
    assert!(app.world().get::<Selected>(kept).is_some());
}

#[test]
fn test_game_over_disables_selection() {
    let mut app = setup_app();
    let unit = spawn_unit(&mut app, 0, Vec3::new(2.0, 2.0, 0.0));

    app.world().resource::<GameOverBus>().publish(GameOver { winner: "blue".into() });
    app.update();
    assert!(app.world().resource::<UnitSelection>().is_disabled());

    box_select(&mut app, Vec2::ZERO, Vec2::new(10.0, 10.0));
    assert!(selected(&app).is_empty());
    assert!(app.world().get::<Selected>(unit).is_none());
}

#[test]
fn test_removing_selection_unsubscribes() {
    let mut app = setup_app();
    assert_eq!(app.world().resource::<DespawnBus>().subscriber_count(), 1);
    assert_eq!(app.world().resource::<GameOverBus>().subscriber_count(), 1);

    app.world_mut().remove_resource::<UnitSelection>();

    assert_eq!(app.world().resource::<DespawnBus>().subscriber_count(), 0);
    assert_eq!(app.world().resource::<GameOverBus>().subscriber_count(), 0);
}
