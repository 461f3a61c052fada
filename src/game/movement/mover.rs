use bevy::prelude::*;

use super::actions::{ActionArbiter, ActionKind, CurrentAction};
use super::agent::{NavAgent, NavigationAgent};
use super::pose::PoseSnapshot;

/// Drives a unit's navigation agent: destinations, speed scaling, pause and
/// resume, and pose capture/restore.
///
/// Nothing here reports failure. While the agent's navigation is disabled the
/// calls quietly do less (see each method).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[require(NavAgent, CurrentAction, Transform)]
pub struct Mover {
    pub max_speed: f32,
}

impl Default for Mover {
    fn default() -> Self {
        Self { max_speed: 6.0 }
    }
}

impl Mover {
    pub fn new(max_speed: f32) -> Self {
        Self { max_speed }
    }

    /// `max_speed` scaled by `speed_fraction` clamped to [0, 1].
    pub fn effective_speed(&self, speed_fraction: f32) -> f32 {
        self.max_speed * speed_fraction.clamp(0.0, 1.0)
    }

    /// Heads for where `target_position` is now; the target is not tracked
    /// afterwards. Does nothing at all while navigation is disabled.
    pub fn move_to_target(&self, agent: &mut impl NavigationAgent, target_position: Vec3, speed_fraction: f32) {
        if !agent.is_enabled() {
            return;
        }
        agent.set_destination(target_position);
        agent.set_speed(self.effective_speed(speed_fraction));
        self.resume(agent);
    }

    /// Announces a move action (canceling other actions), then heads for
    /// `destination`. The speed is updated even while navigation is disabled;
    /// the destination is not.
    pub fn move_to(
        &self,
        agent: &mut impl NavigationAgent,
        arbiter: &mut impl ActionArbiter,
        destination: Vec3,
        speed_fraction: f32,
    ) {
        arbiter.start_action(ActionKind::Move);
        agent.set_speed(self.effective_speed(speed_fraction));
        if !agent.is_enabled() {
            return;
        }
        agent.set_destination(destination);
        self.resume(agent);
    }

    /// Halts motion without disabling the agent.
    pub fn pause(&self, agent: &mut impl NavigationAgent) {
        if !agent.is_enabled() {
            return;
        }
        agent.set_stopped(true);
    }

    pub fn resume(&self, agent: &mut impl NavigationAgent) {
        agent.set_stopped(false);
    }

    pub fn capture(&self, agent: &impl NavigationAgent) -> PoseSnapshot {
        PoseSnapshot {
            position: agent.position(),
            rotation: agent.euler_angles(),
        }
    }

    /// Teleports to `snapshot`. The agent is paused around the write so it
    /// does not steer against the new pose in the same tick.
    pub fn restore(&self, agent: &mut impl NavigationAgent, snapshot: PoseSnapshot) {
        self.pause(agent);
        agent.set_position(snapshot.position);
        agent.set_euler_angles(snapshot.rotation);
        self.resume(agent);
    }
}
