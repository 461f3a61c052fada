use bevy::prelude::*;

use super::pose::{euler_degrees, rotation_from_euler_degrees};

/// What the movement layer needs from a navigation capability.
pub trait NavigationAgent {
    /// The capability can be switched off externally (death, cutscenes).
    fn is_enabled(&self) -> bool;
    fn set_destination(&mut self, destination: Vec3);
    fn set_speed(&mut self, speed: f32);
    fn set_stopped(&mut self, stopped: bool);

    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    /// Euler degrees, see [`super::PoseSnapshot`].
    fn euler_angles(&self) -> Vec3;
    fn set_euler_angles(&mut self, degrees: Vec3);
}

/// Navigation state stepped by the movement systems.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct NavAgent {
    pub enabled: bool,
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub stopped: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            enabled: true,
            destination: None,
            speed: 0.0,
            stopped: false,
        }
    }
}

impl NavAgent {
    pub fn is_moving(&self) -> bool {
        self.enabled && !self.stopped && self.destination.is_some() && self.speed > 0.0
    }
}

/// A unit's agent together with the transform it drives.
pub struct AgentBody<'a> {
    pub agent: &'a mut NavAgent,
    pub transform: &'a mut Transform,
}

impl NavigationAgent for AgentBody<'_> {
    fn is_enabled(&self) -> bool {
        self.agent.enabled
    }

    fn set_destination(&mut self, destination: Vec3) {
        self.agent.destination = Some(destination);
    }

    fn set_speed(&mut self, speed: f32) {
        self.agent.speed = speed;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.agent.stopped = stopped;
    }

    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }

    fn euler_angles(&self) -> Vec3 {
        euler_degrees(self.transform.rotation)
    }

    fn set_euler_angles(&mut self, degrees: Vec3) {
        self.transform.rotation = rotation_from_euler_degrees(degrees);
    }
}

/// Advances `transform` across the ground plane toward the agent's
/// destination by at most `speed * dt`, turning to face the direction of
/// travel. The unit keeps its own height. Clears the destination on arrival.
pub fn step_agent(agent: &mut NavAgent, transform: &mut Transform, dt: f32, arrival_threshold: f32) {
    if !agent.is_moving() {
        return;
    }
    let Some(destination) = agent.destination else { return };

    let offset = Vec3::new(
        destination.x - transform.translation.x,
        0.0,
        destination.z - transform.translation.z,
    );
    let distance = offset.length();
    if distance <= arrival_threshold {
        agent.destination = None;
        return;
    }

    let step = agent.speed * dt;
    let direction = offset / distance;
    if step >= distance {
        transform.translation.x = destination.x;
        transform.translation.z = destination.z;
        agent.destination = None;
    } else {
        transform.translation += direction * step;
    }

    let target = transform.translation + direction;
    transform.look_at(target, Vec3::Y);
}
