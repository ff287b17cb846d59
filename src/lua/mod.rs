//! Lua veto hooks.
//!
//! Server owners can drop `*.lua` scripts into a hooks directory to cancel
//! saves under their own rules (arenas, events, duels).

pub mod api;
pub mod engine;
pub mod hooks;
pub mod sandbox;

pub use api::register_api;
pub use engine::LuaEngine;
pub use hooks::{HookScript, LuaHooks};
