use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default engine host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default engine port
pub const DEFAULT_PORT: u16 = 11434;

/// Default engine model tag
pub const DEFAULT_MODEL: &str = "qwen2.5:0.5b";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Storage root override; defaults to ~/.modelbench
    pub root: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".modelbench").join("config.toml"))
    }

    /// Storage root the installer writes under
    pub fn storage_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.storage.root {
            return Ok(root.clone());
        }
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;
        Ok(home.join(".modelbench"))
    }

    /// Base URL of the engine API
    pub fn engine_url(&self) -> String {
        format!("http://{}:{}", self.engine.host, self.engine.port)
    }

    /// Apply command-line overrides on top of the loaded file
    pub fn with_overrides(
        mut self,
        host: Option<&str>,
        port: Option<u16>,
        model: Option<&str>,
    ) -> Self {
        if let Some(host) = host {
            self.engine.host = host.to_string();
        }
        if let Some(port) = port {
            self.engine.port = port;
        }
        if let Some(model) = model {
            self.engine.model = model.to_string();
        }
        self
    }
}
