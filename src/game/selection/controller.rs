use bevy::prelude::*;

use crate::game::network::{
    DespawnBus, GameOver, GameOverBus, Subscription, UnitDespawned, UnitOwnership,
};

use super::gesture::SelectionGesture;
use super::resolve::select_units;
use super::set::{SelectionMarker, SelectionSet};
use super::spatial::SpatialQuery;

/// The local player's selection subsystem: gesture state machine, selected
/// set, the building-placement gate and the terminal game-over switch.
#[derive(Resource)]
pub struct UnitSelection {
    gesture: SelectionGesture,
    selected: SelectionSet,
    placing_building: bool,
    disabled: bool,
    click_tolerance: f32,
    despawns: Option<Subscription<UnitDespawned>>,
    game_over: Option<Subscription<GameOver>>,
}

impl UnitSelection {
    /// Creates a selection subsystem that is not attached to any bus.
    pub fn new() -> Self {
        Self {
            gesture: SelectionGesture::default(),
            selected: SelectionSet::default(),
            placing_building: false,
            disabled: false,
            click_tolerance: 0.0,
            despawns: None,
            game_over: None,
        }
    }

    /// Creates a selection subsystem listening to both lifecycle buses.
    /// Dropping it releases the subscriptions.
    pub fn subscribed(despawns: &DespawnBus, game_over: &GameOverBus) -> Self {
        Self {
            despawns: Some(despawns.subscribe()),
            game_over: Some(game_over.subscribe()),
            ..Self::new()
        }
    }

    pub fn selected(&self) -> &SelectionSet {
        &self.selected
    }

    pub fn gesture(&self) -> &SelectionGesture {
        &self.gesture
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_placing_building(&self) -> bool {
        self.placing_building
    }

    pub fn begin_building_placement(&mut self) {
        self.placing_building = true;
    }

    pub fn end_building_placement(&mut self) {
        self.placing_building = false;
    }

    pub fn set_click_tolerance(&mut self, tolerance: f32) {
        self.click_tolerance = tolerance.max(0.0);
    }

    fn accepts_input(&self) -> bool {
        !self.disabled && !self.placing_building
    }

    /// Pointer pressed. Without the additive modifier the current selection is
    /// dropped before the new gesture starts.
    pub fn press(&mut self, pointer: Vec2, additive: bool, marker: &mut impl SelectionMarker) {
        if !self.accepts_input() {
            debug!("Selection press ignored (placing building or disabled)");
            return;
        }
        if self.gesture.is_dragging() {
            return;
        }
        if !additive && !self.selected.is_empty() {
            debug!("Clearing {} selected units", self.selected.len());
            self.selected.clear(marker);
        }
        self.gesture.begin(pointer);
    }

    /// Pointer moved with the button held.
    pub fn drag(&mut self, pointer: Vec2) {
        if !self.accepts_input() {
            return;
        }
        self.gesture.track(pointer);
    }

    /// Pointer released: hides the rectangle and resolves the gesture.
    pub fn release(
        &mut self,
        pointer: Vec2,
        spatial: &impl SpatialQuery,
        ownership: &impl UnitOwnership,
        marker: &mut impl SelectionMarker,
    ) {
        if !self.accepts_input() {
            return;
        }
        let Some(rect) = self.gesture.finish() else { return };

        let added = select_units(
            rect,
            pointer,
            self.click_tolerance,
            &mut self.selected,
            spatial,
            ownership,
            marker,
        );
        if added > 0 {
            info!("Selected {} units ({} total)", added, self.selected.len());
        }
    }

    /// Pointer released where its position is unknown (outside the window).
    /// Resolves at the last tracked pointer.
    pub fn release_at_last_pointer(
        &mut self,
        spatial: &impl SpatialQuery,
        ownership: &impl UnitOwnership,
        marker: &mut impl SelectionMarker,
    ) {
        let pointer = self.gesture.pointer();
        self.release(pointer, spatial, ownership, marker);
    }

    /// Drops a running gesture without touching the selection.
    pub fn cancel_gesture(&mut self) {
        if self.gesture.is_dragging() {
            debug!("Selection gesture canceled");
        }
        self.gesture.cancel();
    }

    /// Evicts a unit the local player no longer controls.
    pub fn authority_lost(&mut self, unit: Entity, marker: &mut impl SelectionMarker) -> bool {
        let removed = self.selected.remove(unit);
        if removed {
            marker.deselect(unit);
            debug!("Removed unit {:?} from selection after ownership change", unit);
        }
        removed
    }

    /// Evicts a despawned unit. Safe to call for units that were never selected.
    pub fn unit_despawned(&mut self, unit: Entity) -> bool {
        let removed = self.selected.remove(unit);
        if removed {
            debug!("Removed despawned unit {:?} from selection", unit);
        }
        removed
    }

    /// Permanently disables gesture processing for the rest of the session.
    pub fn game_over(&mut self, winner: &str) {
        if self.disabled {
            return;
        }
        info!("Game over (winner: {}), selection disabled", winner);
        self.disabled = true;
    }

    /// Applies every notification received since the last tick.
    pub fn process_notifications(&mut self) {
        let despawned = self.despawns.as_ref().map(Subscription::drain).unwrap_or_default();
        for UnitDespawned(unit) in despawned {
            self.unit_despawned(unit);
        }

        let endings = self.game_over.as_ref().map(Subscription::drain).unwrap_or_default();
        for GameOver { winner } in endings {
            self.game_over(&winner);
        }
    }
}

impl FromWorld for UnitSelection {
    fn from_world(world: &mut World) -> Self {
        world.init_resource::<DespawnBus>();
        world.init_resource::<GameOverBus>();
        Self::subscribed(world.resource::<DespawnBus>(), world.resource::<GameOverBus>())
    }
}
