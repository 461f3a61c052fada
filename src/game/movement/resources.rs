use bevy::prelude::*;
use rustc_hash::FxHashMap;

use crate::game::unit::NetId;

use super::pose::PoseSnapshot;

/// Poses captured at the last save trigger, keyed by network identity so
/// they survive entity churn across sessions. The save system decides how
/// this is written to storage.
#[derive(Resource, Debug, Default, Clone)]
pub struct PoseStore {
    poses: FxHashMap<NetId, PoseSnapshot>,
}

impl PoseStore {
    pub fn insert(&mut self, id: NetId, snapshot: PoseSnapshot) {
        self.poses.insert(id, snapshot);
    }

    pub fn get(&self, id: NetId) -> Option<PoseSnapshot> {
        self.poses.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn clear(&mut self) {
        self.poses.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (NetId, PoseSnapshot)> + '_ {
        self.poses.iter().map(|(id, pose)| (*id, *pose))
    }
}

/// Simulation tuning copied from `InitialConfig` at startup.
#[derive(Resource, Debug, Clone, Copy)]
pub struct MovementConfig {
    pub arrival_threshold: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: 0.05,
        }
    }
}
