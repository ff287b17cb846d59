//! In-memory collaborators.
//!
//! Used by the CLI host adapter and by tests. Handles are cheap clones that
//! share state, so a caller can keep one and hand another to the engine.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{Economics, EventZones, Notifier, Permissions, ZoneManager};
use crate::error::CollaboratorError;
use crate::notice::Notice;
use crate::player::{PlayerId, PlayerState, Position};

/// Per-player permission sets.
#[derive(Debug, Clone, Default)]
pub struct MemoryPermissions {
    grants: Rc<RefCell<HashMap<PlayerId, HashSet<String>>>>,
    registered: Rc<RefCell<Vec<String>>>,
}

impl MemoryPermissions {
    pub fn grant(&self, player: &PlayerId, permission: impl Into<String>) {
        self.grants
            .borrow_mut()
            .entry(player.clone())
            .or_default()
            .insert(permission.into());
    }

    pub fn revoke(&self, player: &PlayerId, permission: &str) {
        if let Some(perms) = self.grants.borrow_mut().get_mut(player) {
            perms.remove(permission);
        }
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered.borrow().clone()
    }
}

impl Permissions for MemoryPermissions {
    fn has_permission(&self, player: &PlayerId, permission: &str) -> bool {
        self.grants
            .borrow()
            .get(player)
            .is_some_and(|perms| perms.contains(permission))
    }

    fn register_permission(&self, permission: &str) {
        let mut registered = self.registered.borrow_mut();
        if !registered.iter().any(|p| p == permission) {
            registered.push(permission.to_string());
        }
    }
}

/// A withdrawal the ledger accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    pub player: PlayerId,
    pub amount: f64,
}

/// Balances plus a journal of accepted withdrawals.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: Rc<RefCell<HashMap<PlayerId, f64>>>,
    journal: Rc<RefCell<Vec<Withdrawal>>>,
}

impl MemoryLedger {
    pub fn set_balance(&self, player: &PlayerId, amount: f64) {
        self.balances.borrow_mut().insert(player.clone(), amount);
    }

    pub fn balance_of(&self, player: &PlayerId) -> f64 {
        self.balances.borrow().get(player).copied().unwrap_or(0.0)
    }

    pub fn withdrawals(&self) -> Vec<Withdrawal> {
        self.journal.borrow().clone()
    }
}

impl Economics for MemoryLedger {
    fn balance(&self, player: &PlayerId) -> Result<f64, CollaboratorError> {
        Ok(self.balance_of(player))
    }

    fn withdraw(&self, player: &PlayerId, amount: f64) -> Result<bool, CollaboratorError> {
        if amount < 0.0 {
            return Err(CollaboratorError::new("Economics", "negative withdrawal"));
        }
        let mut balances = self.balances.borrow_mut();
        let balance = balances.entry(player.clone()).or_insert(0.0);
        if *balance < amount {
            return Ok(false);
        }
        *balance -= amount;
        self.journal.borrow_mut().push(Withdrawal {
            player: player.clone(),
            amount,
        });
        Ok(true)
    }
}

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    pub fn contains(&self, p: Position) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
}

/// Event territories as a list of boxes.
#[derive(Debug, Clone, Default)]
pub struct BoxedTerritories {
    areas: Vec<Bounds>,
}

impl BoxedTerritories {
    pub fn new(areas: Vec<Bounds>) -> Self {
        Self { areas }
    }
}

impl EventZones for BoxedTerritories {
    fn event_territory(&self, position: Position) -> Result<bool, CollaboratorError> {
        Ok(self.areas.iter().any(|area| area.contains(position)))
    }
}

/// Named zones with explicit member lists.
#[derive(Debug, Clone, Default)]
pub struct MemoryZoneManager {
    members: Rc<RefCell<HashMap<String, HashSet<PlayerId>>>>,
}

impl MemoryZoneManager {
    pub fn enter(&self, zone_id: impl Into<String>, player: &PlayerId) {
        self.members
            .borrow_mut()
            .entry(zone_id.into())
            .or_default()
            .insert(player.clone());
    }

    pub fn leave(&self, zone_id: &str, player: &PlayerId) {
        if let Some(members) = self.members.borrow_mut().get_mut(zone_id) {
            members.remove(player);
        }
    }
}

impl ZoneManager for MemoryZoneManager {
    fn is_player_in_zone(
        &self,
        zone_id: &str,
        player: &PlayerState,
    ) -> Result<bool, CollaboratorError> {
        Ok(self
            .members
            .borrow()
            .get(zone_id)
            .is_some_and(|members| members.contains(&player.id)))
    }
}

/// Collects every notice sent, in order.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    sent: Rc<RefCell<Vec<(PlayerId, Notice)>>>,
}

impl MemoryNotifier {
    pub fn sent(&self) -> Vec<(PlayerId, Notice)> {
        self.sent.borrow().clone()
    }

    pub fn notices_for(&self, player: &PlayerId) -> Vec<Notice> {
        self.sent
            .borrow()
            .iter()
            .filter(|(to, _)| to == player)
            .map(|(_, notice)| notice.clone())
            .collect()
    }

    pub fn take(&self) -> Vec<(PlayerId, Notice)> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }
}

impl Notifier for MemoryNotifier {
    fn reply(&self, player: &PlayerId, notice: Notice) {
        self.sent.borrow_mut().push((player.clone(), notice));
    }
}
