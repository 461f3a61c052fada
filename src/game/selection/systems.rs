use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::game::camera::RtsCamera;
use crate::game::config::{runtime_config, GameConfig, GameConfigHandle, InitialConfig};
use crate::game::network::{LocalPlayer, OwnedUnits, Owner};
use crate::game::unit::{HitCollider, Selected, Unit};

use super::controller::UnitSelection;
use super::set::SelectionMarker;
use super::spatial::{CameraSpatialQuery, PickCandidate};

/// Marker component for the selection box UI element
#[derive(Component)]
pub struct SelectionBox;

/// Marks units through deferred commands: inserts or removes [`Selected`].
pub struct CommandsMarker<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
}

impl SelectionMarker for CommandsMarker<'_, '_, '_> {
    fn select(&mut self, unit: Entity) {
        if let Ok(mut entity) = self.commands.get_entity(unit) {
            entity.try_insert(Selected);
        }
    }

    fn deselect(&mut self, unit: Entity) {
        if let Ok(mut entity) = self.commands.get_entity(unit) {
            entity.try_remove::<Selected>();
        }
    }
}

/// Builds the camera-backed spatial query for this frame.
pub fn camera_spatial_query<'a>(
    camera: &'a Camera,
    camera_transform: &'a GlobalTransform,
    pickables: &Query<(Entity, &Transform, &HitCollider), With<Unit>>,
    initial_config: &InitialConfig,
) -> CameraSpatialQuery<'a> {
    let candidates = pickables
        .iter()
        .map(|(entity, transform, collider)| PickCandidate {
            entity,
            position: transform.translation,
            radius: collider.radius,
            layer: collider.layer,
        })
        .collect();

    CameraSpatialQuery {
        camera,
        camera_transform,
        candidates,
        layer_mask: initial_config.selectable_layers,
        max_distance: initial_config.hit_test_max_distance,
    }
}

/// Setup the selection box UI element
pub fn setup_selection_box(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            border: UiRect::all(Val::Px(2.0)),
            ..default()
        },
        BorderColor::from(Color::WHITE),
        BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.1)),
        Visibility::Hidden,
        SelectionBox,
    ));
}

/// Drains despawn and game-over notifications before input is handled.
pub fn process_selection_notifications(mut selection: ResMut<UnitSelection>) {
    selection.process_notifications();
}

/// Evicts selected units whose owner is no longer the local player.
pub fn evict_foreign_units(
    mut commands: Commands,
    q_changed: Query<(Entity, &Owner), (With<Unit>, Changed<Owner>)>,
    local_player: Res<LocalPlayer>,
    mut selection: ResMut<UnitSelection>,
) {
    let mut marker = CommandsMarker { commands: &mut commands };
    for (entity, owner) in q_changed.iter() {
        if owner.0 != local_player.0 {
            selection.authority_lost(entity, &mut marker);
        }
    }
}

/// Feeds left-button press/drag/release into the selection subsystem.
///
/// Only one transition happens per frame: press wins over release, release
/// over drag. A release outside the window resolves at the last tracked
/// pointer.
pub fn handle_selection_input(
    mut commands: Commands,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    q_pickable: Query<(Entity, &Transform, &HitCollider), With<Unit>>,
    q_owned: Query<(Entity, &Owner, &Transform), With<Unit>>,
    local_player: Res<LocalPlayer>,
    initial_config: Res<InitialConfig>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    mut selection: ResMut<UnitSelection>,
) {
    let Some(config) = runtime_config(&config_handle, &game_configs) else { return };
    let cursor = q_window.iter().next().and_then(Window::cursor_position);

    selection.set_click_tolerance(config.selection_click_tolerance);
    let mut marker = CommandsMarker { commands: &mut commands };

    if mouse_button.just_pressed(MouseButton::Left) {
        let Some(cursor_position) = cursor else { return };
        let additive = keyboard.pressed(config.key_additive_select);
        selection.press(cursor_position, additive, &mut marker);
    } else if mouse_button.just_released(MouseButton::Left) {
        let Some((camera, camera_transform)) = q_camera.iter().next() else {
            selection.cancel_gesture();
            return;
        };
        let spatial = camera_spatial_query(camera, camera_transform, &q_pickable, &initial_config);
        // Ownership can change between ticks, so it is read fresh here.
        let owned = OwnedUnits::collect(*local_player, q_owned.iter());
        match cursor {
            Some(cursor_position) => selection.release(cursor_position, &spatial, &owned, &mut marker),
            None => selection.release_at_last_pointer(&spatial, &owned, &mut marker),
        }
    } else if mouse_button.pressed(MouseButton::Left) {
        if let Some(cursor_position) = cursor {
            selection.drag(cursor_position);
        }
    }
}

/// Mirrors the gesture rectangle onto the selection box UI node.
pub fn sync_selection_box(
    selection: Res<UnitSelection>,
    mut q_selection_box: Query<(&mut Node, &mut Visibility), With<SelectionBox>>,
) {
    if !selection.is_changed() {
        return;
    }
    let Ok((mut node, mut visibility)) = q_selection_box.single_mut() else { return };

    let gesture = selection.gesture();
    if !gesture.is_rect_visible() {
        *visibility = Visibility::Hidden;
        return;
    }

    let rect = gesture.rect();
    let min = rect.min();
    node.left = Val::Px(min.x);
    node.top = Val::Px(min.y);
    node.width = Val::Px(rect.size.x);
    node.height = Val::Px(rect.size.y);
    *visibility = Visibility::Visible;
}
