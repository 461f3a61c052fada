use bevy::prelude::*;

/// Marks an entity as a controllable unit
#[derive(Component)]
pub struct Unit;

/// Marks a unit as currently selected by the local player
#[derive(Component)]
pub struct Selected;

/// Marks the child entity that renders the selection ring
#[derive(Component)]
pub struct SelectionCircle;

/// Stable network identity of a unit, shared by every client in the session
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub u64);

/// Collision layers for filtering hit tests
pub mod layers {
    pub const NONE: u32 = 0;
    pub const UNIT: u32 = 1 << 0;
    pub const BUILDING: u32 = 1 << 1;
    pub const GROUND: u32 = 1 << 2;
    pub const ALL: u32 = u32::MAX;
}

/// Pick volume used when casting rays from the camera.
#[derive(Component, Debug, Clone, Copy)]
pub struct HitCollider {
    pub radius: f32,
    pub layer: u32,
}

impl Default for HitCollider {
    fn default() -> Self {
        Self {
            radius: 0.5,
            layer: layers::UNIT,
        }
    }
}
