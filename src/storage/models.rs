//! Data models for the storage layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Everything the plugin persists between restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginData {
    /// Players who opted in with the toggle command.
    #[serde(rename = "activatedIDs")]
    pub activated_ids: BTreeSet<PlayerId>,
    /// Zone manager IDs where the feature is switched off, in insertion order.
    #[serde(rename = "excludedZones")]
    pub excluded_zones: Vec<String>,
}

impl PluginData {
    pub fn is_activated(&self, id: &PlayerId) -> bool {
        self.activated_ids.contains(id)
    }

    /// Flip a player's opt-in state. Returns `true` if now activated.
    pub fn toggle(&mut self, id: &PlayerId) -> bool {
        if self.activated_ids.remove(id) {
            false
        } else {
            self.activated_ids.insert(id.clone());
            true
        }
    }

    /// Append zones not already listed. Returns the ones actually added.
    pub fn add_zones<'a>(&mut self, zones: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut added = Vec::new();
        for zone in zones {
            if !self.excluded_zones.iter().any(|z| z == zone) {
                self.excluded_zones.push(zone.to_string());
                added.push(zone.to_string());
            }
        }
        added
    }

    /// Remove listed zones. Returns the ones that were present.
    pub fn remove_zones<'a>(&mut self, zones: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut removed = Vec::new();
        for zone in zones {
            if let Some(index) = self.excluded_zones.iter().position(|z| z == zone) {
                removed.push(self.excluded_zones.remove(index));
            }
        }
        removed
    }

    pub fn clear_zones(&mut self) {
        self.excluded_zones.clear();
    }
}
