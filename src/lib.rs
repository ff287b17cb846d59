//! LifeSupport library - pay-to-survive death prevention for game servers.
//!
//! This crate provides the decision engine that intercepts player deaths and
//! wounds, the collaborator traits it consults (permissions, economics, zone
//! providers, veto hooks), persisted opt-in state, and Lua veto scripts.

pub mod cli;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod logging;
pub mod lua;
pub mod notice;
pub mod player;
pub mod storage;
pub mod support;

pub use config::Config;
pub use error::{LifeSupportError, Result};
pub use player::{Caller, PlayerId, PlayerState};
pub use support::LifeSupport;
