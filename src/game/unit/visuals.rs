use bevy::prelude::*;

use crate::game::network::{LocalPlayer, Owner};

use super::components::{Selected, SelectionCircle, Unit};
use super::resources::{UnitMaterials, UnitMesh};

/// Attaches a mesh and a hidden selection ring to newly spawned units.
/// Units owned by the local player get the friendly material.
pub(super) fn spawn_unit_visuals(
    mut commands: Commands,
    query: Query<(Entity, Option<&Owner>), Added<Unit>>,
    local_player: Option<Res<LocalPlayer>>,
    unit_mesh: Res<UnitMesh>,
    unit_materials: Res<UnitMaterials>,
) {
    let local = local_player.map(|player| player.0);

    for (entity, owner) in query.iter() {
        let friendly = owner.is_some_and(|owner| Some(owner.0) == local);
        let material = if friendly {
            unit_materials.friendly.clone()
        } else {
            unit_materials.hostile.clone()
        };

        commands.entity(entity).insert((
            Mesh3d(unit_mesh.unit.clone()),
            MeshMaterial3d(material),
        )).with_children(|parent| {
            parent.spawn((
                Mesh3d(unit_mesh.circle.clone()),
                MeshMaterial3d(unit_materials.selection_circle.clone()),
                Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
                    .with_translation(Vec3::new(0.0, -0.95, 0.0)),
                Visibility::Hidden,
                SelectionCircle,
            ));
        });
    }
}

/// Shows/hides selection circles based on Selected component
pub(super) fn update_selection_circle_visibility(
    q_added: Query<&Children, (With<Unit>, Added<Selected>)>,
    q_children_lookup: Query<&Children>,
    q_selected: Query<Entity, With<Selected>>,
    mut q_vis: Query<&mut Visibility, With<SelectionCircle>>,
    mut removed_selected: RemovedComponents<Selected>,
) {
    for children in q_added.iter() {
        for child in children.iter() {
            if let Ok(mut vis) = q_vis.get_mut(child) {
                *vis = Visibility::Visible;
            }
        }
    }

    for entity in removed_selected.read() {
        // Deselected and reselected within the same frame
        if q_selected.contains(entity) {
            continue;
        }
        let Ok(children) = q_children_lookup.get(entity) else { continue };
        for child in children.iter() {
            if let Ok(mut vis) = q_vis.get_mut(child) {
                *vis = Visibility::Hidden;
            }
        }
    }
}
