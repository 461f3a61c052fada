use bevy::prelude::*;

/// Shared mesh handles for unit rendering
#[derive(Resource)]
pub struct UnitMesh {
    pub unit: Handle<Mesh>,
    pub circle: Handle<Mesh>,
}

/// Shared material handles for unit rendering
#[derive(Resource)]
pub struct UnitMaterials {
    pub friendly: Handle<StandardMaterial>,
    pub hostile: Handle<StandardMaterial>,
    pub selection_circle: Handle<StandardMaterial>,
}

/// Sets up shared unit rendering resources (meshes and materials)
pub(super) fn setup_unit_resources(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Capsule3d::default());
    let circle_mesh = meshes.add(Annulus::new(0.6, 0.7)); // Inner radius 0.6, Outer 0.7

    commands.insert_resource(UnitMesh {
        unit: mesh,
        circle: circle_mesh,
    });

    let friendly_mat = materials.add(Color::srgb(0.3, 0.5, 0.9));
    let hostile_mat = materials.add(Color::srgb(0.8, 0.2, 0.2));
    let circle_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 1.0, 0.2),
        unlit: true,
        ..default()
    });

    commands.insert_resource(UnitMaterials {
        friendly: friendly_mat,
        hostile: hostile_mat,
        selection_circle: circle_mat,
    });
}
