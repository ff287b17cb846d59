//! Sandboxed Lua state for hook scripts.

use anyhow::{Context, Result};
use mlua::{Lua, LuaSerdeExt, Table, Value};
use serde::Serialize;

use super::api::register_api;
use super::sandbox::apply_sandbox;

/// A Lua state with the sandbox and the `lifesupport` API installed.
pub struct LuaEngine {
    lua: Lua,
}

impl LuaEngine {
    pub fn new() -> Result<Self> {
        let lua = Lua::new();
        apply_sandbox(&lua)?;
        register_api(&lua)?;
        Ok(Self { lua })
    }

    /// Run a chunk that must return a table of exports.
    pub fn load_exports(&self, name: &str, source: &str) -> Result<Table> {
        self.lua
            .load(source)
            .set_name(name)
            .eval()
            .with_context(|| format!("Failed to evaluate hook script '{}'", name))
    }

    /// Convert any serializable value into a Lua value.
    pub fn to_lua<T: Serialize>(&self, value: &T) -> Result<Value> {
        self.lua
            .to_value(value)
            .context("Failed to convert value for Lua")
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

/// Short human-readable rendering of a Lua value.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s
            .to_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|_| "<invalid utf8>".to_string()),
        Value::Table(_) => "<table>".to_string(),
        Value::Function(_) => "<function>".to_string(),
        Value::Error(e) => format!("<error: {}>", e),
        other => format!("<{}>", other.type_name()),
    }
}
