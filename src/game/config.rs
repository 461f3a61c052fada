use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

/// Static configuration loaded once at startup. These values describe the
/// units and the simulation and are not expected to change mid-session.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
pub struct InitialConfig {
    // Simulation
    pub tick_rate: f64,
    pub unit_max_speed: f32,
    pub unit_radius: f32,
    pub arrival_threshold: f32,

    // Hit testing
    pub hit_test_max_distance: f32,
    pub selectable_layers: u32,

    // Camera follow height limits
    pub camera_min_follow_y: f32,
    pub camera_max_follow_y: f32,
}

/// Runtime configuration that can be hot-reloaded during gameplay
/// (controls, camera feel, command tuning).
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct GameConfig {
    // Controls (hot-reloadable)
    pub key_additive_select: KeyCode,
    pub key_slow_move: KeyCode,
    pub key_stop: KeyCode,
    pub key_camera_forward: KeyCode,
    pub key_camera_backward: KeyCode,
    pub key_camera_left: KeyCode,
    pub key_camera_right: KeyCode,
    pub key_camera_rotate_left: KeyCode,
    pub key_camera_rotate_right: KeyCode,

    // Camera (hot-reloadable)
    pub camera_move_speed: f32,
    pub camera_rotation_speed: f32,
    pub camera_zoom_speed: f32,

    // Selection & commands (hot-reloadable)
    pub selection_click_tolerance: f32,
    pub command_speed_fraction: f32,
    pub slow_speed_fraction: f32,
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
           .add_systems(PreStartup, (load_initial_config, setup_runtime_config).chain());
    }
}

/// Load static initial configuration synchronously at startup.
fn load_initial_config(mut commands: Commands) {
    let initial_config_path = "assets/initial_config.ron";

    match std::fs::read_to_string(initial_config_path) {
        Ok(contents) => match ron::from_str::<InitialConfig>(&contents) {
            Ok(config) => {
                info!("Loaded initial config from {}", initial_config_path);
                commands.insert_resource(config);
            }
            Err(e) => {
                error!("Failed to parse initial config: {}", e);
                error!("Using default InitialConfig");
                commands.insert_resource(InitialConfig::default());
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", initial_config_path, e);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            unit_max_speed: 6.0,
            unit_radius: 0.5,
            arrival_threshold: 0.05,
            hit_test_max_distance: f32::MAX,
            selectable_layers: crate::game::unit::layers::UNIT,
            camera_min_follow_y: 2.0,
            camera_max_follow_y: 12.0,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            key_additive_select: KeyCode::ShiftLeft,
            key_slow_move: KeyCode::ControlLeft,
            key_stop: KeyCode::KeyH,
            key_camera_forward: KeyCode::KeyW,
            key_camera_backward: KeyCode::KeyS,
            key_camera_left: KeyCode::KeyA,
            key_camera_right: KeyCode::KeyD,
            key_camera_rotate_left: KeyCode::KeyQ,
            key_camera_rotate_right: KeyCode::KeyE,
            camera_move_speed: 25.0,
            camera_rotation_speed: 25.0,
            camera_zoom_speed: 2.5,
            selection_click_tolerance: 0.0,
            command_speed_fraction: 1.0,
            slow_speed_fraction: 0.5,
        }
    }
}

/// Returns the loaded runtime config, or `None` while the asset is still loading.
pub fn runtime_config<'a>(
    handle: &GameConfigHandle,
    configs: &'a Assets<GameConfig>,
) -> Option<&'a GameConfig> {
    configs.get(&handle.0)
}
