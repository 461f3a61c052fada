/// Unit selection for the local player.
///
/// This module is organized into:
/// - **spatial**: screen-space hit testing and rectangle containment
/// - **set**: the ordered, unique set of selected units
/// - **gesture**: click vs. drag-box state machine
/// - **resolve**: turning a finished gesture into selection changes
/// - **controller**: the `UnitSelection` resource tying it all together
/// - **systems**: Bevy input, notification and UI systems

use bevy::prelude::*;

pub mod spatial;
pub mod set;
pub mod gesture;
pub mod resolve;
pub mod controller;
pub mod systems;

#[cfg(test)]
mod tests;

pub use controller::UnitSelection;
pub use gesture::{GestureState, SelectionGesture};
pub use resolve::select_units;
pub use set::{SelectionMarker, SelectionSet};
pub use spatial::{CameraSpatialQuery, PickCandidate, SelectionRect, SpatialQuery};
pub use systems::SelectionBox;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SelectionSystems {
    Notifications,
    Input,
    Visuals,
}

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UnitSelection>()
           .configure_sets(Update, (
               SelectionSystems::Notifications,
               SelectionSystems::Input,
               SelectionSystems::Visuals,
           ).chain())
           .add_systems(Startup, systems::setup_selection_box)
           .add_systems(Update, (
               (
                   systems::process_selection_notifications,
                   systems::evict_foreign_units,
               ).in_set(SelectionSystems::Notifications),
               systems::handle_selection_input.in_set(SelectionSystems::Input),
               systems::sync_selection_box.in_set(SelectionSystems::Visuals),
           ));
    }
}
