//! Lua sandbox configuration.
//!
//! Hook scripts run inside the game server process, so they get no file,
//! process or module-loading access.

use anyhow::Result;
use mlua::{Lua, Value};

/// Globals removed from every hook state.
const BLOCKED_GLOBALS: &[&str] = &[
    "os",
    "io",
    "debug",
    "package",
    "loadfile",
    "dofile",
    "load",
    "loadstring",
    "rawget",
    "rawset",
    "rawequal",
    "collectgarbage",
    "getmetatable",
    "setmetatable",
];

/// Apply sandbox restrictions to a Lua state.
pub fn apply_sandbox(lua: &Lua) -> Result<()> {
    let globals = lua.globals();

    for name in BLOCKED_GLOBALS {
        globals.set(*name, Value::Nil)?;
    }

    let deny_require = lua.create_function(|_lua, module: String| -> mlua::Result<Value> {
        Err(mlua::Error::runtime(format!(
            "require '{}' is not allowed in lifesupport hooks",
            module
        )))
    })?;
    globals.set("require", deny_require)?;

    Ok(())
}

/// Check if a Lua state has sandbox applied.
pub fn is_sandboxed(lua: &Lua) -> bool {
    let globals = lua.globals();

    BLOCKED_GLOBALS
        .iter()
        .all(|name| matches!(globals.get::<Value>(*name), Ok(Value::Nil)))
}
