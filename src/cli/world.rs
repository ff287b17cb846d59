//! World file for the CLI host adapter.
//!
//! Describes the players a host would know about (state, permissions,
//! balance, zone membership), the event areas, and which collaborator
//! plugins are loaded. The CLI wires it into in-memory collaborators and
//! writes player state and balances back after an event.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::collaborators::memory::{
    BoxedTerritories, Bounds, MemoryLedger, MemoryNotifier, MemoryPermissions, MemoryZoneManager,
};
use crate::config::Config;
use crate::player::{PlayerId, PlayerState};
use crate::support::{LifeSupport, LifeSupportBuilder};

/// Which collaborator plugins are loaded in this world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedPlugins {
    pub economics: bool,
    pub raidable_bases: bool,
    pub dangerous_treasures: bool,
    pub zone_manager: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldPlayer {
    #[serde(flatten)]
    pub state: PlayerState,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub balance: f64,
    /// Zone manager zones the player is standing in.
    #[serde(default)]
    pub zones: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct World {
    pub plugins: LoadedPlugins,
    pub players: Vec<WorldPlayer>,
    pub raid_areas: Vec<Bounds>,
    pub treasure_areas: Vec<Bounds>,
}

/// Handles to the collaborators built from a world, kept so results can be
/// read back after the engine ran.
pub struct WorldCollaborators {
    pub permissions: MemoryPermissions,
    pub ledger: MemoryLedger,
    pub zones: MemoryZoneManager,
    pub notifier: MemoryNotifier,
}

impl World {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read world file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse world file: {}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let rendered = serde_json::to_string_pretty(self).context("Failed to serialize world")?;
        std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write world file: {}", path.display()))
    }

    pub fn player(&self, id: &PlayerId) -> Option<&WorldPlayer> {
        self.players.iter().find(|p| &p.state.id == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut WorldPlayer> {
        self.players.iter_mut().find(|p| &p.state.id == id)
    }

    /// Seed in-memory collaborators from the world.
    pub fn collaborators(&self) -> WorldCollaborators {
        let permissions = MemoryPermissions::default();
        let ledger = MemoryLedger::default();
        let zones = MemoryZoneManager::default();

        for player in &self.players {
            let id = &player.state.id;
            for permission in &player.permissions {
                permissions.grant(id, permission.clone());
            }
            ledger.set_balance(id, player.balance);
            for zone in &player.zones {
                zones.enter(zone.clone(), id);
            }
        }

        WorldCollaborators {
            permissions,
            ledger,
            zones,
            notifier: MemoryNotifier::default(),
        }
    }

    /// Start an engine builder with whatever plugins this world has loaded.
    pub fn builder(&self, config: Config, handles: &WorldCollaborators) -> LifeSupportBuilder {
        let mut builder =
            LifeSupport::builder(config, handles.permissions.clone(), handles.notifier.clone());
        if self.plugins.economics {
            builder = builder.economics(handles.ledger.clone());
        }
        if self.plugins.raidable_bases {
            builder = builder.raidable_bases(BoxedTerritories::new(self.raid_areas.clone()));
        }
        if self.plugins.dangerous_treasures {
            builder =
                builder.dangerous_treasures(BoxedTerritories::new(self.treasure_areas.clone()));
        }
        if self.plugins.zone_manager {
            builder = builder.zone_manager(handles.zones.clone());
        }
        builder
    }

    /// Copy a player's state and balance back after an event.
    pub fn record(&mut self, state: &PlayerState, ledger: &MemoryLedger) {
        if let Some(player) = self.player_mut(&state.id) {
            player.balance = ledger.balance_of(&state.id);
            player.state = state.clone();
        }
    }
}
