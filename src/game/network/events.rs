use bevy::prelude::*;

use super::bus::NotificationBus;

/// A unit left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDespawned(pub Entity);

/// The match ended. Carries the display name of the winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub winner: String,
}

pub type DespawnBus = NotificationBus<UnitDespawned>;
pub type GameOverBus = NotificationBus<GameOver>;
