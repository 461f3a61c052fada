use bevy::prelude::*;

/// Receives select/deselect marks for individual units (ring visuals, the
/// `Selected` component).
pub trait SelectionMarker {
    fn select(&mut self, unit: Entity);
    fn deselect(&mut self, unit: Entity);
}

/// The local player's selected units.
///
/// Membership is unique and insertion order is kept so command dispatch and
/// deselect-all iterate deterministically. Only the selection module mutates
/// it; everyone else reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    units: Vec<Entity>,
}

impl SelectionSet {
    pub fn contains(&self, unit: Entity) -> bool {
        self.units.contains(&unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Members in selection order
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.units.iter().copied()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.units
    }

    /// Appends `unit` unless already present. Returns true if it was added.
    pub(super) fn insert(&mut self, unit: Entity) -> bool {
        if self.contains(unit) {
            return false;
        }
        self.units.push(unit);
        true
    }

    /// Returns true if `unit` was a member.
    pub(super) fn remove(&mut self, unit: Entity) -> bool {
        let Some(index) = self.units.iter().position(|&u| u == unit) else {
            return false;
        };
        self.units.remove(index);
        true
    }

    /// Deselects every member, then empties the set.
    pub(super) fn clear(&mut self, marker: &mut impl SelectionMarker) {
        for unit in self.units.drain(..) {
            marker.deselect(unit);
        }
    }
}
