//! CLI module for lifesupport.
//!
//! Argument parsing plus the world file the CLI uses to stand in for a host.

pub mod args;
pub mod world;

pub use args::{Cli, Command};
pub use world::World;
