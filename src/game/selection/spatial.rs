//! Screen-space hit testing and rectangle containment.

use bevy::prelude::*;

/// Screen-space selection rectangle, stored the way the UI node lays it out:
/// centered on `center`, with a size that is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub center: Vec2,
    pub size: Vec2,
}

impl SelectionRect {
    /// Rectangle spanned by the gesture anchor and the live cursor.
    pub fn from_corners(anchor: Vec2, cursor: Vec2) -> Self {
        let delta = cursor - anchor;
        Self {
            center: anchor + delta / 2.0,
            size: delta.abs(),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }

    /// A degenerate rectangle means the gesture was a click. With a tolerance
    /// of zero only an exactly zero size counts.
    pub fn is_degenerate(&self, tolerance: f32) -> bool {
        self.size.length() <= tolerance
    }

    pub fn contains(&self, point: Vec2) -> bool {
        rect_contains(self.min(), self.max(), point)
    }
}

/// Strict containment: points on the edge are outside.
pub fn rect_contains(min: Vec2, max: Vec2, point: Vec2) -> bool {
    point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
}

/// Camera-backed queries the selection logic needs.
pub trait SpatialQuery {
    /// First unit under `screen_point`, if any.
    fn hit_test(&self, screen_point: Vec2) -> Option<Entity>;

    /// Projects a world point into viewport coordinates. `None` when the
    /// point cannot be projected (behind the camera, outside the frustum depth).
    fn world_to_screen(&self, world_point: Vec3) -> Option<Vec2>;
}

/// A pickable volume considered by [`pick_along_ray`].
#[derive(Debug, Clone, Copy)]
pub struct PickCandidate {
    pub entity: Entity,
    pub position: Vec3,
    pub radius: f32,
    pub layer: u32,
}

/// Returns the candidate nearest to the ray origin whose sphere the ray passes
/// through, considering only candidates on a layer in `layer_mask` and within
/// `max_distance` along the ray.
pub fn pick_along_ray(
    origin: Vec3,
    direction: Vec3,
    candidates: &[PickCandidate],
    layer_mask: u32,
    max_distance: f32,
) -> Option<Entity> {
    let mut closest_hit: Option<(Entity, f32)> = None;

    for candidate in candidates {
        if candidate.layer & layer_mask == 0 {
            continue;
        }
        let to_candidate = candidate.position - origin;
        let projection = to_candidate.dot(direction);
        if projection < 0.0 || projection > max_distance {
            continue;
        }
        let closest_point = origin + direction * projection;
        let distance_sq = closest_point.distance_squared(candidate.position);
        if distance_sq >= candidate.radius * candidate.radius {
            continue;
        }
        match closest_hit {
            Some((_, best)) if best <= projection => {}
            _ => closest_hit = Some((candidate.entity, projection)),
        }
    }

    closest_hit.map(|(entity, _)| entity)
}

/// Intersects a ray with the ground plane (y = 0).
pub fn intersect_ground(origin: Vec3, direction: Vec3) -> Option<Vec3> {
    let denom = direction.dot(Vec3::Y);
    if denom.abs() <= 0.0001 {
        return None;
    }
    let t = -origin.y / denom;
    if t < 0.0 {
        return None;
    }
    Some(origin + direction * t)
}

/// [`SpatialQuery`] backed by the active camera and the pickable units of the
/// current frame.
pub struct CameraSpatialQuery<'a> {
    pub camera: &'a Camera,
    pub camera_transform: &'a GlobalTransform,
    pub candidates: Vec<PickCandidate>,
    pub layer_mask: u32,
    pub max_distance: f32,
}

impl CameraSpatialQuery<'_> {
    /// Ground point under the cursor, used for move-to-point commands.
    pub fn ground_point(&self, screen_point: Vec2) -> Option<Vec3> {
        let ray = self.camera.viewport_to_world(self.camera_transform, screen_point).ok()?;
        intersect_ground(ray.origin, ray.direction.into())
    }
}

impl SpatialQuery for CameraSpatialQuery<'_> {
    fn hit_test(&self, screen_point: Vec2) -> Option<Entity> {
        let ray = self.camera.viewport_to_world(self.camera_transform, screen_point).ok()?;
        pick_along_ray(
            ray.origin,
            ray.direction.into(),
            &self.candidates,
            self.layer_mask,
            self.max_distance,
        )
    }

    fn world_to_screen(&self, world_point: Vec3) -> Option<Vec2> {
        self.camera.world_to_viewport(self.camera_transform, world_point).ok()
    }
}
