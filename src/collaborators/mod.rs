//! External systems the engine depends on but does not implement.
//!
//! Optional collaborators (ledger, zone providers) are held in a
//! [`Collaborator`] so "not loaded" is an explicit state rather than a null
//! reference. Every check that consults one treats `Unavailable` as "no
//! restriction from this source".

pub mod memory;

use crate::error::CollaboratorError;
use crate::notice::Notice;
use crate::player::{PlayerId, PlayerState, Position};

/// The host's permission system.
pub trait Permissions {
    fn has_permission(&self, player: &PlayerId, permission: &str) -> bool;

    /// Announce a permission the plugin owns. Hosts without a registry can ignore it.
    fn register_permission(&self, _permission: &str) {}
}

/// Currency ledger.
pub trait Economics {
    fn balance(&self, player: &PlayerId) -> Result<f64, CollaboratorError>;

    /// Debit `amount`. `Ok(false)` means the ledger declined.
    fn withdraw(&self, player: &PlayerId, amount: f64) -> Result<bool, CollaboratorError>;
}

/// A provider of temporary event areas (raid bases, treasure events).
pub trait EventZones {
    fn event_territory(&self, position: Position) -> Result<bool, CollaboratorError>;
}

/// A general zone manager with named zones.
pub trait ZoneManager {
    fn is_player_in_zone(&self, zone_id: &str, player: &PlayerState)
        -> Result<bool, CollaboratorError>;
}

/// Subscriber to the "about to save a life" hook.
pub trait SaveVeto {
    /// Return `Some(reason)` to cancel the save.
    fn on_saving_life(&self, player: &PlayerState) -> Option<String>;
}

/// Delivers messages to a player's chat/console.
pub trait Notifier {
    fn reply(&self, player: &PlayerId, notice: Notice);
}

/// An optional collaborator: loaded or not.
pub enum Collaborator<T: ?Sized> {
    Loaded(Box<T>),
    Unavailable,
}

impl<T: ?Sized> Collaborator<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            Collaborator::Loaded(inner) => Some(inner.as_ref()),
            Collaborator::Unavailable => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Collaborator::Loaded(_))
    }
}

impl<T: ?Sized> Default for Collaborator<T> {
    fn default() -> Self {
        Collaborator::Unavailable
    }
}

impl<T: ?Sized> std::fmt::Debug for Collaborator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collaborator::Loaded(_) => f.write_str("Loaded"),
            Collaborator::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Names hosts use for the optional collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorKind {
    RaidableBases,
    DangerousTreasures,
    ZoneManager,
    Economics,
}

impl CollaboratorKind {
    /// Match a host plugin title. Unknown titles are not ours.
    pub fn from_title(title: &str) -> Option<Self> {
        match title {
            "RaidableBases" => Some(Self::RaidableBases),
            "DangerousTreasures" => Some(Self::DangerousTreasures),
            "ZoneManager" => Some(Self::ZoneManager),
            "Economics" => Some(Self::Economics),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::RaidableBases => "RaidableBases",
            Self::DangerousTreasures => "DangerousTreasures",
            Self::ZoneManager => "ZoneManager",
            Self::Economics => "Economics",
        }
    }
}

/// A collaborator plugin the host just brought up.
pub enum Plugin {
    RaidableBases(Box<dyn EventZones>),
    DangerousTreasures(Box<dyn EventZones>),
    ZoneManager(Box<dyn ZoneManager>),
    Economics(Box<dyn Economics>),
}

impl Plugin {
    pub fn raidable_bases(zones: impl EventZones + 'static) -> Self {
        Self::RaidableBases(Box::new(zones))
    }

    pub fn dangerous_treasures(zones: impl EventZones + 'static) -> Self {
        Self::DangerousTreasures(Box::new(zones))
    }

    pub fn zone_manager(zones: impl ZoneManager + 'static) -> Self {
        Self::ZoneManager(Box::new(zones))
    }

    pub fn economics(economics: impl Economics + 'static) -> Self {
        Self::Economics(Box::new(economics))
    }

    pub fn kind(&self) -> CollaboratorKind {
        match self {
            Self::RaidableBases(_) => CollaboratorKind::RaidableBases,
            Self::DangerousTreasures(_) => CollaboratorKind::DangerousTreasures,
            Self::ZoneManager(_) => CollaboratorKind::ZoneManager,
            Self::Economics(_) => CollaboratorKind::Economics,
        }
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Plugin").field(&self.kind().title()).finish()
    }
}

/// The optional collaborators, re-resolved whenever the host loads or
/// unloads a plugin.
#[derive(Debug, Default)]
pub struct Collaborators {
    pub raidable_bases: Collaborator<dyn EventZones>,
    pub dangerous_treasures: Collaborator<dyn EventZones>,
    pub zone_manager: Collaborator<dyn ZoneManager>,
    pub economics: Collaborator<dyn Economics>,
}

impl Collaborators {
    /// Install a plugin, replacing whatever held its slot.
    pub fn load(&mut self, plugin: Plugin) {
        match plugin {
            Plugin::RaidableBases(zones) => self.raidable_bases = Collaborator::Loaded(zones),
            Plugin::DangerousTreasures(zones) => {
                self.dangerous_treasures = Collaborator::Loaded(zones)
            }
            Plugin::ZoneManager(zones) => self.zone_manager = Collaborator::Loaded(zones),
            Plugin::Economics(economics) => self.economics = Collaborator::Loaded(economics),
        }
    }

    /// Mark a collaborator as gone. Returns `false` for unknown titles.
    pub fn unload(&mut self, title: &str) -> bool {
        let Some(kind) = CollaboratorKind::from_title(title) else {
            return false;
        };
        match kind {
            CollaboratorKind::RaidableBases => self.raidable_bases = Collaborator::Unavailable,
            CollaboratorKind::DangerousTreasures => {
                self.dangerous_treasures = Collaborator::Unavailable
            }
            CollaboratorKind::ZoneManager => self.zone_manager = Collaborator::Unavailable,
            CollaboratorKind::Economics => self.economics = Collaborator::Unavailable,
        }
        true
    }

    pub fn is_loaded(&self, kind: CollaboratorKind) -> bool {
        match kind {
            CollaboratorKind::RaidableBases => self.raidable_bases.is_loaded(),
            CollaboratorKind::DangerousTreasures => self.dangerous_treasures.is_loaded(),
            CollaboratorKind::ZoneManager => self.zone_manager.is_loaded(),
            CollaboratorKind::Economics => self.economics.is_loaded(),
        }
    }
}
