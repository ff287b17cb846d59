//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pay-to-survive death prevention for game servers.
#[derive(Parser, Debug)]
#[command(name = "lifesupport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the data file, hook scripts and logs.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to config.json in the data directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// World file describing players and loaded plugins.
    #[arg(long, global = true)]
    pub world: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the config, data file and hooks directory.
    Init(InitArgs),

    /// Show configuration and persisted state.
    Status,

    /// Toggle life support for a player (`/lifesupport`).
    Toggle(PlayerCommandArgs),

    /// Manage excluded zones (`/lsZones`).
    Zones(PlayerCommandArgs),

    /// Fire a host event for a player.
    Event(EventArgs),
}

/// Arguments for the init command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Only initialize if not already initialized.
    #[arg(long)]
    pub if_needed: bool,
}

/// A chat command issued by a player.
#[derive(Parser, Debug)]
pub struct PlayerCommandArgs {
    /// ID of the player issuing the command.
    #[arg(long)]
    pub player: String,

    /// Arguments passed through to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the event command.
#[derive(Parser, Debug)]
pub struct EventArgs {
    /// ID of the player the event fires for.
    #[arg(long)]
    pub player: String,

    /// Which host hook to fire.
    #[arg(value_enum)]
    pub kind: EventKind,
}

/// Host events that can be fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum EventKind {
    /// The player is about to die.
    Death,
    /// The player is about to be wounded.
    Wound,
    /// The host asks whether the active item may drop.
    Drop,
}
