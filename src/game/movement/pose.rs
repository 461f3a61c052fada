use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Position and rotation of a unit, captured for persistence.
///
/// `rotation` holds Euler angles in degrees (yaw, pitch, roll applied in
/// Y-X-Z order).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseSnapshot {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl From<&Transform> for PoseSnapshot {
    fn from(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            rotation: euler_degrees(transform.rotation),
        }
    }
}

/// Euler degrees (x = pitch, y = yaw, z = roll) of a rotation.
pub fn euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// Inverse of [`euler_degrees`].
pub fn rotation_from_euler_degrees(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}
