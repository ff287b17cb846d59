//! Player snapshots handed to the engine by the host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Health a player is restored to after a saved death.
pub const FULL_HEALTH: f32 = 100.0;

/// Below this health the wound filter treats a player as about to die.
pub const CRITICAL_HEALTH: f32 = 1.0;

/// Stable player identifier (the host's user ID string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// World position of a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Who issued a chat/console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: PlayerId,
    pub name: String,
}

impl Caller {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Mutable view of a player at the moment an event fires.
///
/// The engine only ever writes `health` and `is_wounded`; the host copies
/// those back onto the live entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub health: f32,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub is_npc: bool,
    #[serde(default)]
    pub is_sleeping: bool,
    #[serde(default)]
    pub is_wounded: bool,
}

impl PlayerState {
    /// An awake, unwounded human player at full health.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            health: FULL_HEALTH,
            position: Position::default(),
            is_npc: false,
            is_sleeping: false,
            is_wounded: false,
        }
    }

    pub fn caller(&self) -> Caller {
        Caller::new(self.id.clone(), self.name.clone())
    }

    pub fn is_critical(&self) -> bool {
        self.health < CRITICAL_HEALTH
    }

    /// Bring the player back: full health, out of the wounded state.
    pub fn restore(&mut self) {
        self.health = FULL_HEALTH;
        if self.is_wounded {
            self.is_wounded = false;
        }
    }
}
