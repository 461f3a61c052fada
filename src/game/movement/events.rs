/// Orders and persistence requests for unit movement.

use bevy::prelude::*;

/// A movement order for one unit. `speed_fraction` is clamped to [0, 1]
/// when applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementCommand {
    MoveToPoint { destination: Vec3, speed_fraction: f32 },
    MoveToEntity { target: Entity, speed_fraction: f32 },
}

/// Move `entity` according to `command`
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct UnitMoveOrder {
    pub entity: Entity,
    pub command: MovementCommand,
}

/// Cancel `entity`'s current action and pause its agent
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStopOrder {
    pub entity: Entity,
}

/// Save trigger: capture the pose of every persistent unit into the `PoseStore`
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct CapturePoses;

/// Load trigger: restore every persistent unit that has a stored pose
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RestorePoses;
