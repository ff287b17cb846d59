//! Plugin configuration.
//!
//! The file uses the same human-readable property names server owners already
//! know from the config UI. JSON is the default; a `.yaml`/`.yml` extension
//! switches to YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Permission that disables the feature for a player outright.
pub const PERMISSION_BLOCKED: &str = "lifesupport.blocked";

/// Default permission required for the zone admin command.
pub const PERMISSION_ADMIN: &str = "lifesupport.admin";

/// A permission and what one saved life costs a player holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTier {
    #[serde(rename = "Permission")]
    pub permission: String,
    #[serde(rename = "Cost")]
    pub cost: u32,
}

impl PermissionTier {
    pub fn new(permission: impl Into<String>, cost: u32) -> Self {
        Self {
            permission: permission.into(),
            cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "Use Zone Manager (true/false)")]
    pub use_zone_manager: bool,

    #[serde(rename = "Use Economics (true/false)")]
    pub use_economics: bool,

    #[serde(rename = "Disable LifeSupport in RaidableBases Zones (true/false)")]
    pub use_raidable_bases: bool,

    #[serde(rename = "Disable LifeSupport in DangerousTreasures Zones (true/false)")]
    pub use_dangerous_treasures: bool,

    #[serde(rename = "Enable Log file (true/false)")]
    pub log_to_file: bool,

    #[serde(rename = "Log output to console (true/false)")]
    pub log_to_console: bool,

    #[serde(rename = "Admin permission")]
    pub admin_permission: String,

    #[serde(rename = "Permissions and cost")]
    pub tiers: Vec<PermissionTier>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_zone_manager: false,
            use_economics: true,
            use_raidable_bases: false,
            use_dangerous_treasures: false,
            log_to_file: true,
            log_to_console: true,
            admin_permission: PERMISSION_ADMIN.to_string(),
            tiers: vec![
                PermissionTier::new("lifesupport.default", 400),
                PermissionTier::new("lifesupport.vip", 200),
                PermissionTier::new(PERMISSION_ADMIN, 0),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

impl Config {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = match Format::of(path) {
            Format::Json => serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            Format::Yaml => serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load the config, falling back to defaults.
    ///
    /// A missing file is created with the defaults. Any other failure is
    /// handed back so the caller can log it once logging is up; the broken
    /// file is left untouched for the owner to fix.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        let path = path.as_ref();
        if !path.exists() {
            let config = Config::default();
            return match config.save(path) {
                Ok(()) => (config, None),
                Err(err) => (config, Some(err)),
            };
        }

        match Config::load(path) {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        }
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let rendered = match Format::of(path) {
            Format::Json => serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            Format::Yaml => serde_yaml::to_string(self).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
        };

        std::fs::write(path, rendered).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_permission.trim().is_empty() {
            return Err(ConfigError::Invalid("admin permission is empty".to_string()));
        }
        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.permission.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "tier #{} has an empty permission name",
                    index + 1
                )));
            }
        }
        Ok(())
    }

    /// Every permission the plugin owns: the tiers plus the block flag.
    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.tiers
            .iter()
            .map(|tier| tier.permission.as_str())
            .chain(std::iter::once(PERMISSION_BLOCKED))
    }
}
