/// Turns the local player's selection into per-unit movement orders.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::game::camera::RtsCamera;
use crate::game::config::{runtime_config, GameConfig, GameConfigHandle, InitialConfig};
use crate::game::movement::{MovementCommand, UnitMoveOrder, UnitStopOrder};
use crate::game::selection::systems::camera_spatial_query;
use crate::game::selection::{SelectionSet, SelectionSystems, SpatialQuery, UnitSelection};
use crate::game::unit::{HitCollider, Unit};


pub struct CommandPlugin;

impl Plugin for CommandPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, issue_unit_commands.after(SelectionSystems::Input));
    }
}

/// One order per selected unit, in selection order.
pub fn dispatch(selection: &SelectionSet, command: MovementCommand) -> Vec<UnitMoveOrder> {
    selection
        .iter()
        .map(|entity| UnitMoveOrder { entity, command })
        .collect()
}

/// One stop order per selected unit, in selection order.
pub fn dispatch_stop(selection: &SelectionSet) -> Vec<UnitStopOrder> {
    selection.iter().map(|entity| UnitStopOrder { entity }).collect()
}

/// Picks the command for a right-click: follow the unit under the cursor if
/// there is one, otherwise walk to the ground point.
pub fn command_at_cursor(
    hit: Option<Entity>,
    ground_point: Option<Vec3>,
    speed_fraction: f32,
) -> Option<MovementCommand> {
    if let Some(target) = hit {
        return Some(MovementCommand::MoveToEntity { target, speed_fraction });
    }
    ground_point.map(|destination| MovementCommand::MoveToPoint { destination, speed_fraction })
}

/// Right-click issues a move, the stop key halts the selection.
pub fn issue_unit_commands(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    q_pickable: Query<(Entity, &Transform, &HitCollider), With<Unit>>,
    initial_config: Res<InitialConfig>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    selection: Res<UnitSelection>,
    mut move_orders: MessageWriter<UnitMoveOrder>,
    mut stop_orders: MessageWriter<UnitStopOrder>,
) {
    if selection.is_disabled() || selection.is_placing_building() || selection.selected().is_empty() {
        return;
    }
    let Some(config) = runtime_config(&config_handle, &game_configs) else { return };

    if keyboard.just_pressed(config.key_stop) {
        let orders = dispatch_stop(selection.selected());
        info!("Stopping {} units", orders.len());
        stop_orders.write_batch(orders);
        return;
    }

    if !mouse_button.just_pressed(MouseButton::Right) {
        return;
    }
    let Some((camera, camera_transform)) = q_camera.iter().next() else { return };
    let Some(window) = q_window.iter().next() else { return };
    let Some(cursor_position) = window.cursor_position() else { return };

    let spatial = camera_spatial_query(camera, camera_transform, &q_pickable, &initial_config);
    let speed_fraction = if keyboard.pressed(config.key_slow_move) {
        config.slow_speed_fraction
    } else {
        config.command_speed_fraction
    };
    let Some(command) = command_at_cursor(
        spatial.hit_test(cursor_position),
        spatial.ground_point(cursor_position),
        speed_fraction,
    ) else {
        return;
    };

    let orders = dispatch(selection.selected(), command);
    info!("Issuing {:?} to {} units", command, orders.len());
    move_orders.write_batch(orders);
}
