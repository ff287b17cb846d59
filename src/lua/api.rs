//! The `lifesupport` table exposed to hook scripts.

use anyhow::Result;
use mlua::{Function, Lua};

use crate::player::{CRITICAL_HEALTH, FULL_HEALTH};

/// Register the `lifesupport` module in the Lua global namespace.
pub fn register_api(lua: &Lua) -> Result<()> {
    let lifesupport = lua.create_table()?;

    lifesupport.set("log", create_log(lua)?)?;
    lifesupport.set("full_health", FULL_HEALTH)?;
    lifesupport.set("critical_health", CRITICAL_HEALTH)?;

    lua.globals().set("lifesupport", lifesupport)?;
    Ok(())
}

fn create_log(lua: &Lua) -> Result<Function> {
    let func = lua.create_function(|_lua, (level, message): (String, String)| {
        log_message(&level, &message);
        Ok(())
    })?;
    Ok(func)
}

/// Forward a script log line to tracing at the requested level.
fn log_message(level: &str, message: &str) {
    match level.to_lowercase().as_str() {
        "trace" => tracing::trace!(target: "lifesupport::script", "{}", message),
        "debug" => tracing::debug!(target: "lifesupport::script", "{}", message),
        "warn" | "warning" => tracing::warn!(target: "lifesupport::script", "{}", message),
        "error" => tracing::error!(target: "lifesupport::script", "{}", message),
        _ => tracing::info!(target: "lifesupport::script", "{}", message),
    }
}
