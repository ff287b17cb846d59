//! Player and admin commands.

use tracing::{info, warn};

use super::tiers::cheapest_tier;
use super::LifeSupport;
use crate::error::Result;
use crate::notice::Notice;
use crate::player::Caller;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Help,
    NotUnderstood,
    NoPermission,
    /// `cost` is what each save will charge (0 with economics off).
    Activated { cost: u32 },
    Deactivated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZonesOutcome {
    NoPermission,
    NotUnderstood,
    Added(Vec<String>),
    Removed(Vec<String>),
    Cleared,
    Listed(Vec<String>),
}

impl LifeSupport {
    /// `/lifesupport [help]`: flip the caller's opt-in.
    pub fn toggle<S: AsRef<str>>(&mut self, caller: &Caller, args: &[S]) -> Result<ToggleOutcome> {
        if self.is_blocked(&caller.id) {
            self.notify(&caller.id, Notice::NoPermission);
            return Ok(ToggleOutcome::NoPermission);
        }

        match args {
            [] => {}
            [only] if only.as_ref().eq_ignore_ascii_case("help") => {
                self.notify(&caller.id, Notice::Help);
                return Ok(ToggleOutcome::Help);
            }
            _ => {
                self.notify(&caller.id, Notice::DontUnderstand);
                return Ok(ToggleOutcome::NotUnderstood);
            }
        }

        if self.data.is_activated(&caller.id) {
            let mut data = self.data.clone();
            data.toggle(&caller.id);
            self.commit(data)?;
            self.notify(&caller.id, Notice::Deactivated);
            info!(player = %caller.name, id = %caller.id, "life support deactivated");
            return Ok(ToggleOutcome::Deactivated);
        }

        let Some(tier) = cheapest_tier(&self.config.tiers, &*self.permissions, &caller.id) else {
            self.notify(&caller.id, Notice::NoPermission);
            return Ok(ToggleOutcome::NoPermission);
        };
        let tier_cost = tier.cost;
        let cost = if self.config.use_economics { tier_cost } else { 0 };

        let mut data = self.data.clone();
        data.toggle(&caller.id);
        self.commit(data)?;
        self.notify(&caller.id, Notice::Activated { cost });
        info!(player = %caller.name, id = %caller.id, cost = tier_cost, "life support activated");
        Ok(ToggleOutcome::Activated { cost })
    }

    /// `/lsZones add|remove|clear|list [ids...]`: manage excluded zones.
    pub fn zones<S: AsRef<str>>(&mut self, caller: &Caller, args: &[S]) -> Result<ZonesOutcome> {
        if !self
            .permissions
            .has_permission(&caller.id, &self.config.admin_permission)
        {
            self.notify(&caller.id, Notice::NoPermission);
            warn!(player = %caller.name, id = %caller.id, "zone command without permission");
            return Ok(ZonesOutcome::NoPermission);
        }

        let Some((subcommand, ids)) = args.split_first() else {
            self.notify(&caller.id, Notice::DontUnderstand);
            return Ok(ZonesOutcome::NotUnderstood);
        };
        let ids = ids.iter().map(|id| id.as_ref());

        let outcome = match subcommand.as_ref().to_lowercase().as_str() {
            "add" => {
                let mut data = self.data.clone();
                let added = data.add_zones(ids);
                self.commit(data)?;
                info!(player = %caller.name, zones = ?added, "excluded zones added");
                self.notify(&caller.id, Notice::ZonesAdded(added.clone()));
                ZonesOutcome::Added(added)
            }
            "remove" => {
                let mut data = self.data.clone();
                let removed = data.remove_zones(ids);
                self.commit(data)?;
                info!(player = %caller.name, zones = ?removed, "excluded zones removed");
                self.notify(&caller.id, Notice::ZonesRemoved(removed.clone()));
                ZonesOutcome::Removed(removed)
            }
            "clear" => {
                let mut data = self.data.clone();
                data.clear_zones();
                self.commit(data)?;
                info!(player = %caller.name, "excluded zones cleared");
                self.notify(&caller.id, Notice::ZonesCleared);
                ZonesOutcome::Cleared
            }
            "list" => {
                let zones = self.data.excluded_zones.clone();
                self.notify(&caller.id, Notice::ZoneList(zones.clone()));
                ZonesOutcome::Listed(zones)
            }
            _ => {
                self.notify(&caller.id, Notice::DontUnderstand);
                ZonesOutcome::NotUnderstood
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::memory::{MemoryNotifier, MemoryPermissions};
    use crate::config::{Config, PERMISSION_BLOCKED};
    use crate::storage::DataStore;
    use tempfile::TempDir;

    const NO_ARGS: &[&str] = &[];

    fn setup(config: Config) -> (TempDir, MemoryPermissions, MemoryNotifier, LifeSupport) {
        let temp = TempDir::new().unwrap();
        let permissions = MemoryPermissions::default();
        let notifier = MemoryNotifier::default();
        let support = LifeSupport::builder(config, permissions.clone(), notifier.clone())
            .store(DataStore::in_dir(temp.path()).unwrap())
            .build()
            .unwrap();
        (temp, permissions, notifier, support)
    }

    fn bob() -> Caller {
        Caller::new("2", "bob")
    }

    #[test]
    fn test_toggle_activates_with_cheapest_cost() {
        let (_temp, permissions, notifier, mut support) = setup(Config::default());
        permissions.grant(&bob().id, "lifesupport.default");
        permissions.grant(&bob().id, "lifesupport.vip");

        let outcome = support.toggle(&bob(), NO_ARGS).unwrap();

        assert_eq!(outcome, ToggleOutcome::Activated { cost: 200 });
        assert!(support.is_activated(&bob().id));
        assert_eq!(
            notifier.notices_for(&bob().id),
            vec![Notice::Activated { cost: 200 }]
        );
    }

    #[test]
    fn test_toggle_twice_is_identity_and_persisted() {
        let (temp, permissions, _notifier, mut support) = setup(Config::default());
        permissions.grant(&bob().id, "lifesupport.vip");

        support.toggle(&bob(), NO_ARGS).unwrap();
        let on_disk = DataStore::in_dir(temp.path()).unwrap().load().unwrap();
        assert!(on_disk.is_activated(&bob().id));

        assert_eq!(
            support.toggle(&bob(), NO_ARGS).unwrap(),
            ToggleOutcome::Deactivated
        );
        let on_disk = DataStore::in_dir(temp.path()).unwrap().load().unwrap();
        assert!(!on_disk.is_activated(&bob().id));
        assert!(!support.is_activated(&bob().id));
    }

    #[test]
    fn test_toggle_reports_zero_cost_without_economics() {
        let config = Config {
            use_economics: false,
            ..Config::default()
        };
        let (_temp, permissions, _notifier, mut support) = setup(config);
        permissions.grant(&bob().id, "lifesupport.default");

        assert_eq!(
            support.toggle(&bob(), NO_ARGS).unwrap(),
            ToggleOutcome::Activated { cost: 0 }
        );
    }

    #[test]
    fn test_toggle_requires_tier_to_activate_only() {
        let (_temp, permissions, _notifier, mut support) = setup(Config::default());

        assert_eq!(
            support.toggle(&bob(), NO_ARGS).unwrap(),
            ToggleOutcome::NoPermission
        );

        permissions.grant(&bob().id, "lifesupport.vip");
        support.toggle(&bob(), NO_ARGS).unwrap();
        permissions.revoke(&bob().id, "lifesupport.vip");

        assert_eq!(
            support.toggle(&bob(), NO_ARGS).unwrap(),
            ToggleOutcome::Deactivated
        );
    }

    #[test]
    fn test_toggle_blocked() {
        let (_temp, permissions, _notifier, mut support) = setup(Config::default());
        permissions.grant(&bob().id, "lifesupport.admin");
        permissions.grant(&bob().id, PERMISSION_BLOCKED);

        assert_eq!(
            support.toggle(&bob(), NO_ARGS).unwrap(),
            ToggleOutcome::NoPermission
        );
        assert_eq!(support.toggle(&bob(), &["help"]).unwrap(), ToggleOutcome::NoPermission);
        assert!(!support.is_activated(&bob().id));
    }

    #[test]
    fn test_toggle_help_and_garbage() {
        let (_temp, _permissions, notifier, mut support) = setup(Config::default());

        assert_eq!(support.toggle(&bob(), &["HELP"]).unwrap(), ToggleOutcome::Help);
        assert_eq!(
            support.toggle(&bob(), &["help", "me"]).unwrap(),
            ToggleOutcome::NotUnderstood
        );
        assert_eq!(
            notifier.notices_for(&bob().id),
            vec![Notice::Help, Notice::DontUnderstand]
        );
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let (temp, permissions, _notifier, mut support) = setup(Config::default());
        permissions.grant(&bob().id, "lifesupport.admin");
        let store = DataStore::in_dir(temp.path()).unwrap();
        std::fs::create_dir(store.path()).unwrap();

        assert!(support.toggle(&bob(), NO_ARGS).is_err());
        assert!(!support.is_activated(&bob().id));

        assert!(support.zones(&bob(), &["add", "ZoneA"]).is_err());
        assert!(support.data().excluded_zones.is_empty());
    }

    #[test]
    fn test_zones_requires_admin() {
        let (_temp, _permissions, notifier, mut support) = setup(Config::default());

        assert_eq!(
            support.zones(&bob(), &["add", "ZoneA"]).unwrap(),
            ZonesOutcome::NoPermission
        );
        assert!(support.data().excluded_zones.is_empty());
        assert_eq!(notifier.notices_for(&bob().id), vec![Notice::NoPermission]);
    }

    #[test]
    fn test_zones_lifecycle() {
        let (temp, permissions, _notifier, mut support) = setup(Config::default());
        permissions.grant(&bob().id, "lifesupport.admin");

        assert_eq!(
            support.zones(&bob(), &["add", "ZoneA", "ZoneB"]).unwrap(),
            ZonesOutcome::Added(vec!["ZoneA".into(), "ZoneB".into()])
        );
        assert_eq!(
            support.zones(&bob(), &["LIST"]).unwrap(),
            ZonesOutcome::Listed(vec!["ZoneA".into(), "ZoneB".into()])
        );
        assert_eq!(
            support.zones(&bob(), &["remove", "ZoneA"]).unwrap(),
            ZonesOutcome::Removed(vec!["ZoneA".into()])
        );

        let on_disk = DataStore::in_dir(temp.path()).unwrap().load().unwrap();
        assert_eq!(on_disk.excluded_zones, vec!["ZoneB"]);

        assert_eq!(support.zones(&bob(), &["clear"]).unwrap(), ZonesOutcome::Cleared);
        let on_disk = DataStore::in_dir(temp.path()).unwrap().load().unwrap();
        assert!(on_disk.excluded_zones.is_empty());
    }

    #[test]
    fn test_zones_custom_admin_permission() {
        let config = Config {
            admin_permission: "server.owner".to_string(),
            ..Config::default()
        };
        let (_temp, permissions, _notifier, mut support) = setup(config);
        permissions.grant(&bob().id, "lifesupport.admin");
        assert_eq!(support.zones(&bob(), &["list"]).unwrap(), ZonesOutcome::NoPermission);

        permissions.grant(&bob().id, "server.owner");
        assert_eq!(
            support.zones(&bob(), &["list"]).unwrap(),
            ZonesOutcome::Listed(vec![])
        );
    }

    #[test]
    fn test_zones_unknown_subcommand() {
        let (_temp, permissions, _notifier, mut support) = setup(Config::default());
        permissions.grant(&bob().id, "lifesupport.admin");

        assert_eq!(
            support.zones(&bob(), &["purge"]).unwrap(),
            ZonesOutcome::NotUnderstood
        );
        assert_eq!(support.zones(&bob(), NO_ARGS).unwrap(), ZonesOutcome::NotUnderstood);
    }
}
