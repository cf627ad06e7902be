//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`PLANAR_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use planar_physics::{EngineConfig, PhysicsConfig};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Physics world configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Fixed-timestep engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`PLANAR_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        // Load default config (required)
        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // PLANAR_ENGINE__FIXED_TIMESTEP=0.01 -> engine.fixed_timestep = 0.01
        figment = figment.merge(Env::prefixed("PLANAR_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.physics.gravity.y, -9.81);
        assert!(config.physics.parallel);
        assert_eq!(config.engine.fixed_timestep, 0.02);
        assert_eq!(config.engine.max_frame_time, 0.25);
    }

    #[test]
    fn test_config_serialization() {
        let config = SimConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("gravity"));
        assert!(toml.contains("fixed_timestep"));
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let config = SimConfig::load_from("no/such/dir").unwrap();
        assert_eq!(config.engine.fixed_timestep, 0.02);
    }
}
