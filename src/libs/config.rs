//! Configuration management for the bodylog service.
//!
//! The configuration is a small JSON file in the platform application data
//! directory (resolved through [`DataStorage`]). A missing file is not an
//! error; defaults apply, so the service runs without any setup.
//!
//! - **Windows**: `%LOCALAPPDATA%\lacodda\bodylog\config.json`
//! - **macOS**: `~/Library/Application Support/lacodda/bodylog/config.json`
//! - **Linux**: `~/.local/share/lacodda/bodylog/config.json`

use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_PORT: u16 = 5002;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the API binds to on 127.0.0.1.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: DEFAULT_PORT }
    }
}

/// Root configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Loads the configuration, falling back to defaults when no file exists.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str).context(Message::ConfigParseError)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<String> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(&config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(config_file_path.display().to_string())
    }
}
