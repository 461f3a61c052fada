/// Unit movement.
///
/// This module is organized into:
/// - **pose**: `PoseSnapshot` and Euler conversion
/// - **agent**: the navigation capability seam and its ECS implementation
/// - **actions**: per-unit action arbitration
/// - **mover**: the `Mover` component (move, pause/resume, capture/restore)
/// - **events**: move/stop orders and save/load triggers
/// - **resources**: `PoseStore` and `MovementConfig`
/// - **systems**: order application and agent stepping

use bevy::prelude::*;

pub mod pose;
pub mod agent;
pub mod actions;
pub mod mover;
pub mod events;
pub mod resources;
pub mod systems;


pub use actions::{ActionArbiter, ActionKind, CurrentAction};
pub use agent::{step_agent, AgentBody, NavAgent, NavigationAgent};
pub use events::*;
pub use mover::Mover;
pub use pose::PoseSnapshot;
pub use resources::{MovementConfig, PoseStore};

// System sets for organizing execution order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum MoveSet {
    Orders,     // Applying stop and move orders
    Navigation, // Stepping agents toward their destinations
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementConfig>()
           .init_resource::<PoseStore>();

        // Register events
        app.add_message::<UnitMoveOrder>();
        app.add_message::<UnitStopOrder>();
        app.add_message::<CapturePoses>();
        app.add_message::<RestorePoses>();

        app.configure_sets(FixedUpdate, (MoveSet::Orders, MoveSet::Navigation).chain());

        app.add_systems(Startup, systems::init_movement_config);
        app.add_systems(Update, (
            systems::restore_poses,
            systems::capture_poses,
        ).chain());

        app.add_systems(FixedUpdate, (
            // Stops before moves within a tick
            (systems::apply_stop_orders, systems::apply_move_orders).chain().in_set(MoveSet::Orders),
            systems::step_nav_agents.in_set(MoveSet::Navigation),
        ));
    }
}
