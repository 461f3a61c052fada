use bevy::prelude::*;

use crate::game::network::UnitOwnership;

use super::set::{SelectionMarker, SelectionSet};
use super::spatial::{SelectionRect, SpatialQuery};

/// Resolves a finished gesture into selection changes.
///
/// A degenerate rectangle is a click: the unit under `pointer` is added if the
/// local player has authority over it, and every member is re-marked. Anything
/// else is a box: each owned unit that projects strictly inside the rectangle
/// is added. Neither branch ever removes members.
///
/// Returns the number of units added.
pub fn select_units(
    rect: SelectionRect,
    pointer: Vec2,
    click_tolerance: f32,
    selection: &mut SelectionSet,
    spatial: &impl SpatialQuery,
    ownership: &impl UnitOwnership,
    marker: &mut impl SelectionMarker,
) -> usize {
    if rect.is_degenerate(click_tolerance) {
        return select_clicked(pointer, selection, spatial, ownership, marker);
    }
    select_boxed(rect, selection, spatial, ownership, marker)
}

fn select_clicked(
    pointer: Vec2,
    selection: &mut SelectionSet,
    spatial: &impl SpatialQuery,
    ownership: &impl UnitOwnership,
    marker: &mut impl SelectionMarker,
) -> usize {
    let Some(unit) = spatial.hit_test(pointer) else { return 0 };
    if !ownership.has_authority(unit) {
        debug!("Ignoring click on {:?}: no authority", unit);
        return 0;
    }

    let added = selection.insert(unit);
    for member in selection.iter() {
        marker.select(member);
    }
    usize::from(added)
}

fn select_boxed(
    rect: SelectionRect,
    selection: &mut SelectionSet,
    spatial: &impl SpatialQuery,
    ownership: &impl UnitOwnership,
    marker: &mut impl SelectionMarker,
) -> usize {
    let mut added = 0;
    for owned in ownership.my_units() {
        if selection.contains(owned.entity) {
            continue;
        }
        let Some(screen_position) = spatial.world_to_screen(owned.position) else { continue };
        if rect.contains(screen_position) {
            selection.insert(owned.entity);
            marker.select(owned.entity);
            added += 1;
        }
    }
    added
}
