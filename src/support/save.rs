//! Death interception: the save decision, currency settlement, and the wound
//! and item-drop hooks built on top of them.

use tracing::{debug, error, info, warn};

use super::tiers::cheapest_tier;
use super::zone_gate::Exclusion;
use super::LifeSupport;
use crate::error::{CollaboratorError, Result};
use crate::notice::Notice;
use crate::player::PlayerState;

/// Why a save did not happen. The host lets the event proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoPlayer,
    Npc,
    Sleeping,
    Blocked,
    Vetoed(String),
    Excluded(Exclusion),
    NotActive,
    NoTier,
    EconomicsUnavailable,
    CantAfford { balance: i64, cost: u32 },
    WithdrawDeclined { cost: u32 },
}

/// How a saved life was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payment {
    /// Economics is switched off; saves are unconditional.
    EconomicsDisabled,
    /// The player's tier costs nothing.
    Free,
    /// This much was withdrawn from the player's balance.
    Withdrawn(u32),
}

impl Payment {
    pub fn charged(&self) -> u32 {
        match self {
            Payment::Withdrawn(cost) => *cost,
            Payment::EconomicsDisabled | Payment::Free => 0,
        }
    }
}

/// Read-only verdict before any money moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Intervene { cost: u32 },
    Skip(SkipReason),
}

/// Result of the currency step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Paid(Payment),
    Refused(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Payment),
    Skipped(SkipReason),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// What the host should do with a pending wound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WoundOutcome {
    /// Let the player go down as usual.
    Proceed,
    /// Cancel the wound; the player keeps standing.
    Suppress,
    /// Health was critical: the life was saved and the wound cancelled.
    Saved(Payment),
}

impl LifeSupport {
    /// Decide whether to intervene for this player, and at what cost.
    ///
    /// Consults permissions, veto hooks and zone providers but changes nothing.
    pub fn decide(&self, player: &PlayerState) -> Result<Decision> {
        if player.is_npc {
            return Ok(Decision::Skip(SkipReason::Npc));
        }
        if player.is_sleeping {
            return Ok(Decision::Skip(SkipReason::Sleeping));
        }
        if self.is_blocked(&player.id) {
            return Ok(Decision::Skip(SkipReason::Blocked));
        }

        if let Some(reason) = self.vetoes.iter().find_map(|veto| veto.on_saving_life(player)) {
            info!(player = %player.name, id = %player.id, reason = %reason, "life support canceled by plugin");
            return Ok(Decision::Skip(SkipReason::Vetoed(reason)));
        }

        if let Some(exclusion) = self.zone_gate().check(player)? {
            debug!(player = %player.name, id = %player.id, zone = %exclusion, "death in excluded zone");
            return Ok(Decision::Skip(SkipReason::Excluded(exclusion)));
        }

        if !self.data.is_activated(&player.id) {
            info!(player = %player.name, id = %player.id, "player died, life support not active");
            return Ok(Decision::Skip(SkipReason::NotActive));
        }

        // Tiers can be revoked after activation.
        match cheapest_tier(&self.config.tiers, &*self.permissions, &player.id) {
            Some(tier) => Ok(Decision::Intervene { cost: tier.cost }),
            None => Ok(Decision::Skip(SkipReason::NoTier)),
        }
    }

    /// Collect payment for a save, if economics is in use.
    pub fn settle(&self, player: &PlayerState, cost: u32) -> Result<Settlement> {
        if !self.config.use_economics {
            return Ok(Settlement::Paid(Payment::EconomicsDisabled));
        }

        let Some(economics) = self.collaborators.economics.get() else {
            self.notify(&player.id, Notice::EconomicsUnavailable);
            error!(player = %player.name, id = %player.id, "economics is enabled but the Economics plugin is not available");
            return Ok(Settlement::Refused(SkipReason::EconomicsUnavailable));
        };

        if cost == 0 {
            return Ok(Settlement::Paid(Payment::Free));
        }

        let balance = economics.balance(&player.id)?;
        if !balance.is_finite() {
            error!(player = %player.name, id = %player.id, balance, "ledger reported a non-finite balance");
            return Err(CollaboratorError::new(
                "Economics",
                format!("non-finite balance {} for player {}", balance, player.id),
            )
            .into());
        }
        let balance = balance.floor();
        if balance < f64::from(cost) {
            self.notify(&player.id, Notice::CantAfford);
            info!(player = %player.name, id = %player.id, balance, cost, "player died, could not afford life support");
            return Ok(Settlement::Refused(SkipReason::CantAfford {
                balance: balance as i64,
                cost,
            }));
        }

        if !economics.withdraw(&player.id, f64::from(cost))? {
            self.notify(&player.id, Notice::CantAfford);
            warn!(player = %player.name, id = %player.id, cost, "ledger declined life support withdrawal");
            return Ok(Settlement::Refused(SkipReason::WithdrawDeclined { cost }));
        }

        Ok(Settlement::Paid(Payment::Withdrawn(cost)))
    }

    /// Try to keep the player alive.
    ///
    /// On success the player is at full health and no longer wounded.
    pub fn save_life(&self, player: &mut PlayerState) -> Result<SaveOutcome> {
        let cost = match self.decide(player)? {
            Decision::Intervene { cost } => cost,
            Decision::Skip(reason) => return Ok(SaveOutcome::Skipped(reason)),
        };

        let payment = match self.settle(player, cost)? {
            Settlement::Paid(payment) => payment,
            Settlement::Refused(reason) => return Ok(SaveOutcome::Skipped(reason)),
        };

        match payment {
            Payment::EconomicsDisabled => {
                self.notify(&player.id, Notice::SavedYourLife);
                info!(player = %player.name, id = %player.id, "prevented death, economics inactive");
            }
            Payment::Free | Payment::Withdrawn(_) => {
                let charged = payment.charged();
                self.notify(&player.id, Notice::SavedYourLifeCost { cost: charged });
                info!(player = %player.name, id = %player.id, cost = charged, "prevented death");
            }
        }

        player.restore();
        Ok(SaveOutcome::Saved(payment))
    }

    /// Host death hook.
    pub fn on_player_death(&self, player: Option<&mut PlayerState>) -> Result<SaveOutcome> {
        match player {
            Some(player) => self.save_life(player),
            None => Ok(SaveOutcome::Skipped(SkipReason::NoPlayer)),
        }
    }

    /// Host hook fired before a player enters the wounded state.
    pub fn on_player_wound(&self, player: Option<&mut PlayerState>) -> Result<WoundOutcome> {
        let Some(player) = player else {
            return Ok(WoundOutcome::Proceed);
        };
        if self.is_blocked(&player.id) {
            return Ok(WoundOutcome::Proceed);
        }

        if let Some(exclusion) = self.zone_gate().check(player)? {
            self.notify(&player.id, Notice::ExcludedZone);
            info!(player = %player.name, id = %player.id, zone = %exclusion, "life support disabled in zone");
            return Ok(WoundOutcome::Proceed);
        }

        let protected = self.data.is_activated(&player.id)
            && cheapest_tier(&self.config.tiers, &*self.permissions, &player.id).is_some();
        if !protected {
            return Ok(WoundOutcome::Proceed);
        }

        if !player.is_critical() {
            return Ok(WoundOutcome::Suppress);
        }

        match self.save_life(player)? {
            SaveOutcome::Saved(payment) => Ok(WoundOutcome::Saved(payment)),
            SaveOutcome::Skipped(_) => Ok(WoundOutcome::Proceed),
        }
    }

    /// Host query: may the player's active item drop when they go down?
    ///
    /// Collaborator failures are logged and returned.
    pub fn can_drop_active_item(&self, player: Option<&PlayerState>) -> Result<bool> {
        let Some(player) = player else {
            return Ok(true);
        };
        if player.is_npc || self.is_blocked(&player.id) {
            return Ok(true);
        }

        let excluded = self.zone_gate().check(player).map_err(|err| {
            error!(player = %player.name, id = %player.id, error = %err, "can_drop_active_item failed");
            err
        })?;
        if excluded.is_some() {
            return Ok(true);
        }

        Ok(!self.data.is_activated(&player.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::memory::{MemoryLedger, MemoryNotifier, MemoryPermissions};
    use crate::collaborators::{EventZones, SaveVeto};
    use crate::config::{Config, PERMISSION_BLOCKED};
    use crate::error::{CollaboratorError, LifeSupportError};
    use crate::player::{PlayerId, Position, FULL_HEALTH};
    use crate::storage::PluginData;

    struct Harness {
        permissions: MemoryPermissions,
        ledger: MemoryLedger,
        notifier: MemoryNotifier,
        player: PlayerState,
    }

    impl Harness {
        fn new() -> Self {
            let mut player = PlayerState::new("76561198000000001", "alice");
            player.health = 0.0;
            Self {
                permissions: MemoryPermissions::default(),
                ledger: MemoryLedger::default(),
                notifier: MemoryNotifier::default(),
                player,
            }
        }

        fn id(&self) -> PlayerId {
            self.player.id.clone()
        }

        fn support(&self, config: Config, activated: bool) -> LifeSupport {
            let mut data = PluginData::default();
            if activated {
                data.toggle(&self.player.id);
            }
            LifeSupport::builder(config, self.permissions.clone(), self.notifier.clone())
                .data(data)
                .economics(self.ledger.clone())
                .build()
                .unwrap()
        }
    }

    struct AlwaysVeto;

    impl SaveVeto for AlwaysVeto {
        fn on_saving_life(&self, _player: &PlayerState) -> Option<String> {
            Some("arena".to_string())
        }
    }

    struct BrokenZones;

    impl EventZones for BrokenZones {
        fn event_territory(&self, _position: Position) -> Result<bool, CollaboratorError> {
            Err(CollaboratorError::new("RaidableBases", "not ready"))
        }
    }

    #[test]
    fn test_default_tier_pays_400() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.default");
        h.ledger.set_balance(&h.id(), 500.0);
        let support = h.support(Config::default(), true);

        let outcome = support.save_life(&mut h.player).unwrap();

        assert_eq!(outcome, SaveOutcome::Saved(Payment::Withdrawn(400)));
        assert_eq!(h.ledger.balance_of(&h.id()), 100.0);
        assert_eq!(h.player.health, FULL_HEALTH);
        assert_eq!(
            h.notifier.notices_for(&h.id()),
            vec![Notice::SavedYourLifeCost { cost: 400 }]
        );
    }

    #[test]
    fn test_admin_tier_is_free() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.default");
        h.permissions.grant(&h.id(), "lifesupport.admin");
        let support = h.support(Config::default(), true);

        let outcome = support.save_life(&mut h.player).unwrap();

        assert_eq!(outcome, SaveOutcome::Saved(Payment::Free));
        assert!(h.ledger.withdrawals().is_empty());
        assert_eq!(h.player.health, FULL_HEALTH);
    }

    #[test]
    fn test_cannot_afford_by_one() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.vip");
        h.ledger.set_balance(&h.id(), 199.0);
        let support = h.support(Config::default(), true);

        let outcome = support.save_life(&mut h.player).unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Skipped(SkipReason::CantAfford { balance: 199, cost: 200 })
        );
        assert!(h.ledger.withdrawals().is_empty());
        assert_eq!(h.player.health, 0.0);
        assert_eq!(h.notifier.notices_for(&h.id()), vec![Notice::CantAfford]);
    }

    #[test]
    fn test_fractional_balance_is_floored() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.vip");
        h.ledger.set_balance(&h.id(), 199.99);
        let support = h.support(Config::default(), true);

        let outcome = support.save_life(&mut h.player).unwrap();
        assert!(!outcome.is_saved());
        assert!(h.ledger.withdrawals().is_empty());
    }

    #[test]
    fn test_nan_balance_is_a_ledger_error() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.default");
        h.ledger.set_balance(&h.id(), f64::NAN);
        let support = h.support(Config::default(), true);

        let err = support.save_life(&mut h.player).unwrap_err();

        assert!(matches!(err, LifeSupportError::Collaborator(_)));
        assert!(h.ledger.withdrawals().is_empty());
        assert_eq!(h.player.health, 0.0);
    }

    #[test]
    fn test_economics_disabled_saves_unconditionally() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.default");
        let config = Config {
            use_economics: false,
            ..Config::default()
        };
        let support = h.support(config, true);

        let outcome = support.save_life(&mut h.player).unwrap();

        assert_eq!(outcome, SaveOutcome::Saved(Payment::EconomicsDisabled));
        assert!(h.ledger.withdrawals().is_empty());
        assert_eq!(h.notifier.notices_for(&h.id()), vec![Notice::SavedYourLife]);
    }

    #[test]
    fn test_economics_unloaded_aborts() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.default");
        h.ledger.set_balance(&h.id(), 1000.0);
        let mut support = h.support(Config::default(), true);
        support.on_plugin_unloaded("Economics");

        let outcome = support.save_life(&mut h.player).unwrap();

        assert_eq!(outcome, SaveOutcome::Skipped(SkipReason::EconomicsUnavailable));
        assert_eq!(h.player.health, 0.0);
        assert_eq!(
            h.notifier.notices_for(&h.id()),
            vec![Notice::EconomicsUnavailable]
        );
    }

    #[test]
    fn test_not_active_never_touches_player() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.default");
        h.ledger.set_balance(&h.id(), 1000.0);
        let support = h.support(Config::default(), false);

        let outcome = support.save_life(&mut h.player).unwrap();

        assert_eq!(outcome, SaveOutcome::Skipped(SkipReason::NotActive));
        assert_eq!(h.player.health, 0.0);
        assert!(h.ledger.withdrawals().is_empty());
    }

    #[test]
    fn test_blocked_wins_over_everything() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.admin");
        h.permissions.grant(&h.id(), PERMISSION_BLOCKED);
        let support = h.support(Config::default(), true);

        assert_eq!(
            support.save_life(&mut h.player).unwrap(),
            SaveOutcome::Skipped(SkipReason::Blocked)
        );
        h.player.health = 0.5;
        assert_eq!(
            support.on_player_wound(Some(&mut h.player)).unwrap(),
            WoundOutcome::Proceed
        );
        assert!(support.can_drop_active_item(Some(&h.player)).unwrap());
        assert_eq!(h.player.health, 0.5);
        assert!(h.notifier.sent().is_empty());
    }

    #[test]
    fn test_revoked_tier_skips() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.default");
        let support = h.support(Config::default(), true);
        h.permissions.revoke(&h.id(), "lifesupport.default");

        assert_eq!(
            support.save_life(&mut h.player).unwrap(),
            SaveOutcome::Skipped(SkipReason::NoTier)
        );
    }

    #[test]
    fn test_npc_and_sleeping_skip() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.admin");
        let support = h.support(Config::default(), true);

        h.player.is_npc = true;
        assert_eq!(
            support.save_life(&mut h.player).unwrap(),
            SaveOutcome::Skipped(SkipReason::Npc)
        );

        h.player.is_npc = false;
        h.player.is_sleeping = true;
        assert_eq!(
            support.save_life(&mut h.player).unwrap(),
            SaveOutcome::Skipped(SkipReason::Sleeping)
        );
    }

    #[test]
    fn test_missing_player() {
        let h = Harness::new();
        let support = h.support(Config::default(), true);
        assert_eq!(
            support.on_player_death(None).unwrap(),
            SaveOutcome::Skipped(SkipReason::NoPlayer)
        );
        assert_eq!(support.on_player_wound(None).unwrap(), WoundOutcome::Proceed);
        assert!(support.can_drop_active_item(None).unwrap());
    }

    #[test]
    fn test_veto_cancels() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.admin");
        let mut support = h.support(Config::default(), true);
        support.add_veto(AlwaysVeto);

        assert_eq!(
            support.save_life(&mut h.player).unwrap(),
            SaveOutcome::Skipped(SkipReason::Vetoed("arena".to_string()))
        );
        assert_eq!(h.player.health, 0.0);
    }

    #[test]
    fn test_wounded_state_cleared() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.admin");
        h.player.is_wounded = true;
        let support = h.support(Config::default(), true);

        assert!(support.save_life(&mut h.player).unwrap().is_saved());
        assert!(!h.player.is_wounded);
    }

    #[test]
    fn test_wound_suppressed_when_healthy() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.default");
        h.player.health = 35.0;
        let support = h.support(Config::default(), true);

        assert_eq!(
            support.on_player_wound(Some(&mut h.player)).unwrap(),
            WoundOutcome::Suppress
        );
        assert!(h.ledger.withdrawals().is_empty());
        assert_eq!(h.player.health, 35.0);
    }

    #[test]
    fn test_wound_at_critical_health_saves() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.vip");
        h.ledger.set_balance(&h.id(), 250.0);
        h.player.health = 0.4;
        let support = h.support(Config::default(), true);

        assert_eq!(
            support.on_player_wound(Some(&mut h.player)).unwrap(),
            WoundOutcome::Saved(Payment::Withdrawn(200))
        );
        assert_eq!(h.player.health, FULL_HEALTH);
    }

    #[test]
    fn test_wound_at_critical_health_unaffordable_proceeds() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.vip");
        h.player.health = 0.4;
        let support = h.support(Config::default(), true);

        assert_eq!(
            support.on_player_wound(Some(&mut h.player)).unwrap(),
            WoundOutcome::Proceed
        );
    }

    #[test]
    fn test_wound_not_active_proceeds() {
        let mut h = Harness::new();
        h.permissions.grant(&h.id(), "lifesupport.vip");
        h.player.health = 20.0;
        let support = h.support(Config::default(), false);

        assert_eq!(
            support.on_player_wound(Some(&mut h.player)).unwrap(),
            WoundOutcome::Proceed
        );
    }

    #[test]
    fn test_drop_denied_for_active_player() {
        let mut h = Harness::new();
        h.player.health = 50.0;
        let support = h.support(Config::default(), true);
        assert!(!support.can_drop_active_item(Some(&h.player)).unwrap());

        let inactive = h.support(Config::default(), false);
        assert!(inactive.can_drop_active_item(Some(&h.player)).unwrap());
    }

    #[test]
    fn test_drop_check_reraises_collaborator_failure() {
        let h = Harness::new();
        let config = Config {
            use_raidable_bases: true,
            ..Config::default()
        };
        let mut support = h.support(config, true);
        support.collaborators_mut().raidable_bases =
            crate::collaborators::Collaborator::Loaded(Box::new(BrokenZones));

        let result = support.can_drop_active_item(Some(&h.player));
        assert!(matches!(result, Err(LifeSupportError::Collaborator(_))));
    }
}
