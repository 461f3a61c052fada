mod components;
mod resources;
mod visuals;

use bevy::prelude::*;

// Re-export public types
pub use components::{layers, HitCollider, NetId, Selected, SelectionCircle, Unit};
pub use resources::{UnitMaterials, UnitMesh};

use resources::setup_unit_resources;
use visuals::{spawn_unit_visuals, update_selection_circle_visibility};

/// Plugin that manages unit entities and their visuals
pub struct UnitPlugin;

impl Plugin for UnitPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_unit_resources)
           .add_systems(Update, (
               spawn_unit_visuals,
               update_selection_circle_visibility,
           ).chain());
    }
}
