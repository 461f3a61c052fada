use bevy::prelude::*;
use rand::Rng;

pub mod camera;
pub mod command;
pub mod config;
pub mod movement;
pub mod network;
pub mod selection;
pub mod unit;

use camera::RtsCameraPlugin;
use command::CommandPlugin;
use config::{GameConfigPlugin, InitialConfig};
use movement::{MovementPlugin, Mover};
use network::{LocalPlayer, NetworkPlugin, Owner, PlayerId};
use selection::SelectionPlugin;
use unit::{HitCollider, NetId, UnitPlugin, Unit};

/// Units spawned per player in the skirmish scene
const UNITS_PER_PLAYER: u64 = 12;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GameConfigPlugin,
            NetworkPlugin,
            RtsCameraPlugin,
            UnitPlugin,
            SelectionPlugin,
            MovementPlugin,
            CommandPlugin,
        ))
        .add_systems(Startup, setup_game);
    }
}

fn setup_game(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    initial_config: Res<InitialConfig>,
    local_player: Res<LocalPlayer>,
) {
    info!("Game setup started");

    // Ground Plane
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(50.0, 50.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    // Light
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            intensity: 10_000_000.0,
            range: 100.0,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0),
    ));

    // UI Camera
    commands.spawn((
        Camera2d::default(),
        Camera {
            order: 1,
            ..default()
        },
    ));

    let enemy = PlayerId(local_player.0.0.wrapping_add(1));
    let mut rng = rand::rng();
    let mut next_id = 0;

    for (player, center) in [(local_player.0, Vec2::new(-8.0, 8.0)), (enemy, Vec2::new(8.0, -8.0))] {
        for _ in 0..UNITS_PER_PLAYER {
            let x = center.x + rng.random_range(-5.0..5.0);
            let z = center.y + rng.random_range(-5.0..5.0);
            commands.spawn((
                Unit,
                Owner(player),
                NetId(next_id),
                HitCollider {
                    radius: initial_config.unit_radius,
                    ..default()
                },
                Mover::new(initial_config.unit_max_speed),
                Transform::from_xyz(x, 1.0, z),
            ));
            next_id += 1;
        }
    }

    info!("Spawned {} units for {} players", next_id, 2);
}
