//! Hook script loading and the Lua-backed veto.
//!
//! A hook script returns a table exporting `on_saving_life(player)`. Any
//! non-nil return value cancels the save and is reported as the reason.

use std::path::Path;

use anyhow::{bail, Context, Result};
use mlua::{Function, Table, Value};
use tracing::{debug, info, warn};

use super::engine::{describe_value, LuaEngine};
use crate::collaborators::SaveVeto;
use crate::player::PlayerState;

/// Function every hook script must export.
const REQUIRED_FUNCTION: &str = "on_saving_life";

/// Source of one hook script.
pub struct HookScript {
    name: String,
    source: String,
}

impl HookScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid hook script path: {}", path.display()))?
            .to_string();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hook script: {}", path.display()))?;

        Ok(Self { name, source })
    }

    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the script and pull out its handler.
    fn handler(&self, engine: &LuaEngine) -> Result<Function> {
        let exports: Table = engine.load_exports(&self.name, &self.source)?;
        match exports.get::<Value>(REQUIRED_FUNCTION)? {
            Value::Function(func) => Ok(func),
            Value::Nil => bail!(
                "Hook script '{}' missing required function '{}'",
                self.name,
                REQUIRED_FUNCTION
            ),
            other => bail!(
                "Hook script '{}' exports '{}' as {} instead of function",
                self.name,
                REQUIRED_FUNCTION,
                other.type_name()
            ),
        }
    }
}

/// All loaded hook scripts sharing one sandboxed Lua state.
pub struct LuaHooks {
    engine: LuaEngine,
    handlers: Vec<(String, Function)>,
}

impl LuaHooks {
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: LuaEngine::new()?,
            handlers: Vec::new(),
        })
    }

    /// Load and validate a script. Invalid scripts are rejected whole.
    pub fn add(&mut self, script: &HookScript) -> Result<()> {
        let handler = script.handler(&self.engine)?;
        debug!(script = script.name(), "hook script loaded");
        self.handlers.push((script.name().to_string(), handler));
        Ok(())
    }

    /// Load every `*.lua` in `dir`, in file-name order. A missing directory
    /// means no hooks.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut hooks = Self::new()?;
        if !dir.is_dir() {
            return Ok(hooks);
        }

        let pattern = dir.join("*.lua");
        let pattern = pattern
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Non UTF-8 hooks path: {}", dir.display()))?;

        let mut paths = glob::glob(pattern)
            .context("Invalid hooks glob pattern")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list hook scripts")?;
        paths.sort();

        for path in paths {
            let script = HookScript::from_file(&path)?;
            hooks.add(&script)?;
        }

        info!(dir = %dir.display(), count = hooks.len(), "hook scripts loaded");
        Ok(hooks)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl SaveVeto for LuaHooks {
    fn on_saving_life(&self, player: &PlayerState) -> Option<String> {
        if self.handlers.is_empty() {
            return None;
        }

        let player_value = match self.engine.to_lua(player) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "could not hand player to hook scripts");
                return None;
            }
        };

        for (name, handler) in &self.handlers {
            match handler.call::<Value>(player_value.clone()) {
                Ok(Value::Nil) => continue,
                Ok(value) => return Some(format!("{}: {}", name, describe_value(&value))),
                Err(err) => {
                    warn!(script = %name, error = %err, "hook script failed, ignoring");
                }
            }
        }
        None
    }
}
