//! Player-facing messages.
//!
//! Hosts that localize can match on [`Notice`]; the `Display` impl is the
//! built-in English text.

use std::fmt;

const HELP: &str = "When active LifeSupport will prevent a player's death if\n\
they have permission and a sufficient amount of coins\n\
or if Economics is turned off.\n\
It also prevents dropping their active item.\n\
Type /lifesupport in chat to toggle on and off.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Help,
    DontUnderstand,
    NoPermission,
    Activated { cost: u32 },
    Deactivated,
    ExcludedZone,
    EconomicsUnavailable,
    CantAfford,
    SavedYourLife,
    SavedYourLifeCost { cost: u32 },
    ZonesAdded(Vec<String>),
    ZonesRemoved(Vec<String>),
    ZonesCleared,
    ZoneList(Vec<String>),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Help => f.write_str(HELP),
            Notice::DontUnderstand => f.write_str("Don't understand."),
            Notice::NoPermission => f.write_str("You do not have permission to use this command."),
            Notice::Activated { cost } => {
                write!(f, "Life Support activated. Cost per life {} coins", cost)
            }
            Notice::Deactivated => f.write_str("Life Support de-activated."),
            Notice::ExcludedZone => f.write_str("LifeSupport is disabled in this zone"),
            Notice::EconomicsUnavailable => f.write_str(
                "LifeSupport could not save your life.\n\
                 Economics is enabled but the Economics plugin is not available.",
            ),
            Notice::CantAfford => f.write_str("Sorry, insufficient coins to use LifeSupport."),
            Notice::SavedYourLife => f.write_str("Life Support saved your life."),
            Notice::SavedYourLifeCost { cost } => {
                write!(f, "Life Support saved your life. Cost: {} coins", cost)
            }
            Notice::ZonesAdded(zones) => write_zones(
                f,
                "Added the following zone(s) to LifeSupport exclusionary list",
                zones,
            ),
            Notice::ZonesRemoved(zones) => write_zones(
                f,
                "Removed the following zone(s) from LifeSupport exclusionary list",
                zones,
            ),
            Notice::ZonesCleared => f.write_str("Cleared all zones from LifeSupport exclusionary list"),
            Notice::ZoneList(zones) => {
                write_zones(f, "LifeSupport is disabled in the following zones", zones)
            }
        }
    }
}

fn write_zones(f: &mut fmt::Formatter<'_>, header: &str, zones: &[String]) -> fmt::Result {
    f.write_str(header)?;
    for zone in zones {
        write!(f, "\n{}", zone)?;
    }
    Ok(())
}
