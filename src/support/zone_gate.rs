//! Zone exclusion checks.

use std::fmt;

use crate::collaborators::Collaborators;
use crate::config::Config;
use crate::error::CollaboratorError;
use crate::player::PlayerState;

/// Why the current location is off limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    RaidableBases,
    DangerousTreasures,
    ZoneManager(String),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::RaidableBases => f.write_str("Raidable Bases zone"),
            Exclusion::DangerousTreasures => f.write_str("Dangerous Treasures zone"),
            Exclusion::ZoneManager(zone) => write!(f, "Zone Manager zone {}", zone),
        }
    }
}

/// Borrowed view over everything a zone check needs.
pub struct ZoneGate<'a> {
    config: &'a Config,
    collaborators: &'a Collaborators,
    excluded_zones: &'a [String],
}

impl<'a> ZoneGate<'a> {
    pub fn new(
        config: &'a Config,
        collaborators: &'a Collaborators,
        excluded_zones: &'a [String],
    ) -> Self {
        Self {
            config,
            collaborators,
            excluded_zones,
        }
    }

    /// First source that excludes the player's location.
    ///
    /// Sources that are switched off or not loaded never exclude.
    pub fn check(&self, player: &PlayerState) -> Result<Option<Exclusion>, CollaboratorError> {
        if self.config.use_raidable_bases {
            if let Some(raids) = self.collaborators.raidable_bases.get() {
                if raids.event_territory(player.position)? {
                    return Ok(Some(Exclusion::RaidableBases));
                }
            }
        }

        if self.config.use_dangerous_treasures {
            if let Some(treasures) = self.collaborators.dangerous_treasures.get() {
                if treasures.event_territory(player.position)? {
                    return Ok(Some(Exclusion::DangerousTreasures));
                }
            }
        }

        if self.config.use_zone_manager {
            if let Some(zones) = self.collaborators.zone_manager.get() {
                for zone in self.excluded_zones {
                    if zones.is_player_in_zone(zone, player)? {
                        return Ok(Some(Exclusion::ZoneManager(zone.clone())));
                    }
                }
            }
        }

        Ok(None)
    }
}
