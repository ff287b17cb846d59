//! The life support engine.
//!
//! [`LifeSupport`] owns the configuration, the persisted opt-in/zone state and
//! every collaborator. Hosts build one at startup, forward their death,
//! wound and item-drop events to it, and apply the returned outcomes.

pub mod commands;
pub mod save;
pub mod tiers;
pub mod zone_gate;

pub use commands::{ToggleOutcome, ZonesOutcome};
pub use save::{Decision, Payment, SaveOutcome, Settlement, SkipReason, WoundOutcome};
pub use tiers::cheapest_tier;
pub use zone_gate::{Exclusion, ZoneGate};

use tracing::{debug, info};

use crate::collaborators::{
    Collaborators, Economics, EventZones, Notifier, Permissions, Plugin, SaveVeto, ZoneManager,
};
use crate::config::{Config, PERMISSION_BLOCKED};
use crate::error::StorageError;
use crate::notice::Notice;
use crate::player::PlayerId;
use crate::storage::{DataStore, PluginData};

pub struct LifeSupport {
    config: Config,
    data: PluginData,
    store: Option<DataStore>,
    permissions: Box<dyn Permissions>,
    notifier: Box<dyn Notifier>,
    collaborators: Collaborators,
    vetoes: Vec<Box<dyn SaveVeto>>,
}

impl LifeSupport {
    pub fn builder(
        config: Config,
        permissions: impl Permissions + 'static,
        notifier: impl Notifier + 'static,
    ) -> LifeSupportBuilder {
        LifeSupportBuilder {
            config,
            data: None,
            store: None,
            permissions: Box::new(permissions),
            notifier: Box::new(notifier),
            collaborators: Collaborators::default(),
            vetoes: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data(&self) -> &PluginData {
        &self.data
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.collaborators
    }

    pub fn is_activated(&self, player: &PlayerId) -> bool {
        self.data.is_activated(player)
    }

    /// Host notification that a collaborator plugin came up (or was reloaded).
    pub fn on_plugin_loaded(&mut self, plugin: Plugin) {
        let title = plugin.kind().title();
        self.collaborators.load(plugin);
        info!(collaborator = title, "collaborator loaded");
    }

    /// Host notification that a plugin went away.
    pub fn on_plugin_unloaded(&mut self, title: &str) {
        if self.collaborators.unload(title) {
            info!(collaborator = title, "collaborator unloaded");
        }
    }

    /// Subscribe another handler to the "saving life" hook.
    pub fn add_veto(&mut self, veto: impl SaveVeto + 'static) {
        self.vetoes.push(Box::new(veto));
    }

    fn is_blocked(&self, player: &PlayerId) -> bool {
        self.permissions.has_permission(player, PERMISSION_BLOCKED)
    }

    fn zone_gate(&self) -> ZoneGate<'_> {
        ZoneGate::new(&self.config, &self.collaborators, &self.data.excluded_zones)
    }

    fn notify(&self, player: &PlayerId, notice: Notice) {
        self.notifier.reply(player, notice);
    }

    /// Write `data` out and adopt it. On a failed write the current state is kept.
    fn commit(&mut self, data: PluginData) -> Result<(), StorageError> {
        match &self.store {
            Some(store) => store.save(&data)?,
            None => debug!("no data store configured, keeping state in memory"),
        }
        self.data = data;
        Ok(())
    }
}

pub struct LifeSupportBuilder {
    config: Config,
    data: Option<PluginData>,
    store: Option<DataStore>,
    permissions: Box<dyn Permissions>,
    notifier: Box<dyn Notifier>,
    collaborators: Collaborators,
    vetoes: Vec<Box<dyn SaveVeto>>,
}

impl LifeSupportBuilder {
    /// Start from this state instead of reading the store.
    pub fn data(mut self, data: PluginData) -> Self {
        self.data = Some(data);
        self
    }

    /// Persist command mutations here. Without explicit data, state is read from it.
    pub fn store(mut self, store: DataStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn economics(mut self, economics: impl Economics + 'static) -> Self {
        self.collaborators.load(Plugin::economics(economics));
        self
    }

    pub fn raidable_bases(mut self, zones: impl EventZones + 'static) -> Self {
        self.collaborators.load(Plugin::raidable_bases(zones));
        self
    }

    pub fn dangerous_treasures(mut self, zones: impl EventZones + 'static) -> Self {
        self.collaborators.load(Plugin::dangerous_treasures(zones));
        self
    }

    pub fn zone_manager(mut self, zones: impl ZoneManager + 'static) -> Self {
        self.collaborators.load(Plugin::zone_manager(zones));
        self
    }

    pub fn veto(mut self, veto: impl SaveVeto + 'static) -> Self {
        self.vetoes.push(Box::new(veto));
        self
    }

    pub fn build(self) -> Result<LifeSupport, StorageError> {
        let data = match (self.data, &self.store) {
            (Some(data), _) => data,
            (None, Some(store)) => store.load()?,
            (None, None) => PluginData::default(),
        };

        for permission in self.config.permissions() {
            self.permissions.register_permission(permission);
        }

        info!(
            tiers = self.config.tiers.len(),
            activated = data.activated_ids.len(),
            excluded_zones = data.excluded_zones.len(),
            economics = self.config.use_economics,
            "life support ready"
        );

        Ok(LifeSupport {
            config: self.config,
            data,
            store: self.store,
            permissions: self.permissions,
            notifier: self.notifier,
            collaborators: self.collaborators,
            vetoes: self.vetoes,
        })
    }
}
