//! Client-side view of who controls which unit.

use bevy::prelude::*;

/// Network player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlayerId(pub u8);

/// Replicated owner of a unit
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub PlayerId);

/// The player this client instance acts for
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LocalPlayer(pub PlayerId);

/// A unit owned by the local player, with its world position at collection time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnedUnit {
    pub entity: Entity,
    pub position: Vec3,
}

/// Answers authority questions for the local player.
pub trait UnitOwnership {
    /// True iff the local player may command `unit`.
    fn has_authority(&self, unit: Entity) -> bool;

    /// Every unit the local player currently owns, already authority-filtered.
    fn my_units(&self) -> &[OwnedUnit];
}

/// Snapshot of the local player's units, rebuilt whenever it is needed so it
/// never goes stale across ownership changes.
#[derive(Debug, Clone, Default)]
pub struct OwnedUnits {
    units: Vec<OwnedUnit>,
}

impl OwnedUnits {
    pub fn new(units: impl IntoIterator<Item = (Entity, Vec3)>) -> Self {
        Self {
            units: units
                .into_iter()
                .map(|(entity, position)| OwnedUnit { entity, position })
                .collect(),
        }
    }

    /// Collects the units whose owner matches `local`.
    pub fn collect<'a>(
        local: LocalPlayer,
        units: impl IntoIterator<Item = (Entity, &'a Owner, &'a Transform)>,
    ) -> Self {
        Self::new(
            units
                .into_iter()
                .filter(|(_, owner, _)| owner.0 == local.0)
                .map(|(entity, _, transform)| (entity, transform.translation)),
        )
    }
}

impl UnitOwnership for OwnedUnits {
    fn has_authority(&self, unit: Entity) -> bool {
        self.units.iter().any(|owned| owned.entity == unit)
    }

    fn my_units(&self) -> &[OwnedUnit] {
        &self.units
    }
}
