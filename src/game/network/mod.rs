/// Boundary with the network layer.
///
/// - **bus**: notification bus with RAII subscriptions
/// - **events**: lifecycle notifications published by the network layer
/// - **ownership**: unit owners and the local player's authority

use bevy::prelude::*;
use crate::game::unit::Unit;

pub mod bus;
pub mod events;
pub mod ownership;

pub use bus::{NotificationBus, Subscription};
pub use events::{DespawnBus, GameOver, GameOverBus, UnitDespawned};
pub use ownership::{LocalPlayer, OwnedUnit, OwnedUnits, Owner, PlayerId, UnitOwnership};

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocalPlayer>()
           .init_resource::<DespawnBus>()
           .init_resource::<GameOverBus>()
           .add_systems(PreUpdate, announce_unit_despawns);
    }
}

/// Publishes a despawn notification for every unit removed from the world.
pub fn announce_unit_despawns(
    mut removed: RemovedComponents<Unit>,
    bus: Res<DespawnBus>,
) {
    for entity in removed.read() {
        debug!("Unit {:?} despawned", entity);
        bus.publish(UnitDespawned(entity));
    }
}
