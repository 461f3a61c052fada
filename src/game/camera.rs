use bevy::prelude::*;
use bevy::input::mouse::MouseWheel;

use crate::game::config::{runtime_config, GameConfig, GameConfigHandle, InitialConfig};

pub struct RtsCameraPlugin;

impl Plugin for RtsCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraLock>()
           .add_systems(Startup, spawn_camera)
           .add_systems(Update, move_camera);
    }
}

#[derive(Component)]
pub struct RtsCamera;

/// Orbit rig: the camera sits at `follow_offset` from `pivot`, rotated by
/// `yaw`, and always looks at the pivot.
#[derive(Component, Debug, Clone, Copy)]
pub struct CameraRig {
    pub pivot: Vec3,
    /// Degrees around +Y
    pub yaw: f32,
    pub follow_offset: Vec3,
    /// Height the follow offset eases toward
    pub target_height: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            pivot: Vec3::ZERO,
            yaw: 0.0,
            follow_offset: Vec3::new(0.0, 10.0, 10.0),
            target_height: 10.0,
        }
    }
}

/// Suspends camera control while another mode owns the input.
///
/// Written by whoever owns design mode and the settings panels (neither
/// lives in this crate); the camera only reads it.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CameraLock {
    pub design_mode: bool,
    pub panel_open: bool,
}

impl CameraLock {
    pub fn is_locked(&self) -> bool {
        self.design_mode || self.panel_open
    }
}

impl CameraRig {
    /// Pans the pivot along the camera's ground-projected axes.
    pub fn pan(&mut self, input: Vec2, distance: f32) {
        let rotation = Quat::from_rotation_y(self.yaw.to_radians());
        let forward = rotation * Vec3::NEG_Z;
        let right = rotation * Vec3::X;
        self.pivot += (forward * input.y + right * input.x) * distance;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.yaw += degrees;
    }

    /// Raises or lowers the target height, kept within `[min, max]`.
    pub fn zoom(&mut self, amount: f32, min: f32, max: f32) {
        self.target_height = (self.target_height + amount).clamp(min, max);
    }

    /// Eases the follow height toward the target by `t` (clamped to [0, 1]).
    pub fn ease(&mut self, t: f32) {
        let t = t.clamp(0.0, 1.0);
        self.follow_offset.y += (self.target_height - self.follow_offset.y) * t;
    }

    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_rotation_y(self.yaw.to_radians());
        let offset = rotation * self.follow_offset;
        Transform::from_translation(self.pivot + offset).looking_at(self.pivot, Vec3::Y)
    }
}

fn spawn_camera(mut commands: Commands) {
    // RTS Camera: High up, looking down at an angle
    let rig = CameraRig::default();

    commands.spawn((
        Camera3d::default(),
        rig.transform(),
        rig,
        RtsCamera,
    ));
}

fn move_camera(
    mut query: Query<(&mut Transform, &mut CameraRig), With<RtsCamera>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut scroll_evr: MessageReader<MouseWheel>,
    time: Res<Time>,
    lock: Res<CameraLock>,
    initial_config: Res<InitialConfig>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
) {
    if lock.is_locked() {
        scroll_evr.clear();
        return;
    }
    let Ok((mut transform, mut rig)) = query.single_mut() else { return };
    let Some(config) = runtime_config(&config_handle, &game_configs) else { return };
    let dt = time.delta_secs();

    // Pan
    let mut input = Vec2::ZERO;
    if keys.pressed(config.key_camera_forward) {
        input.y += 1.0;
    }
    if keys.pressed(config.key_camera_backward) {
        input.y -= 1.0;
    }
    if keys.pressed(config.key_camera_left) {
        input.x -= 1.0;
    }
    if keys.pressed(config.key_camera_right) {
        input.x += 1.0;
    }
    rig.pan(input, config.camera_move_speed * dt);

    // Rotate
    let mut rotate = 0.0;
    if keys.pressed(config.key_camera_rotate_left) {
        rotate += 1.0;
    }
    if keys.pressed(config.key_camera_rotate_right) {
        rotate -= 1.0;
    }
    rig.rotate(rotate * config.camera_rotation_speed * dt);

    // Zoom (Scroll)
    for ev in scroll_evr.read() {
        rig.zoom(-ev.y, initial_config.camera_min_follow_y, initial_config.camera_max_follow_y);
    }
    rig.ease(dt * config.camera_zoom_speed);

    *transform = rig.transform();
}
