//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name used under the platform config/data folders
pub const APP_DIR_NAME: &str = "affiliate-studio";

/// Database file name inside the data folder
pub const DATABASE_FILE: &str = "studio.db";

/// Environment variable overriding the data folder
pub const DATA_FOLDER_ENV: &str = "STUDIO_DATA_FOLDER";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7000;
pub const DEFAULT_IMAGE_CDN_BASE: &str = "https://down-br.img.susercontent.com/file/";

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub data_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub logging: LoggingConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Outbound HTTP settings for product import and image download
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    pub download_concurrency: usize,
    /// Prefix for Shopee image ids that are not full URLs
    pub image_cdn_base: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            download_concurrency: 4,
            image_cdn_base: DEFAULT_IMAGE_CDN_BASE.to_string(),
        }
    }
}

/// Outcome of looking for the config file
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// No config path was given or found
    Defaults,
    Loaded(PathBuf),
    /// Path given but no file there
    Missing(PathBuf),
    /// File present but unreadable or malformed
    Invalid(String),
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => info!("No config file, using defaults"),
            ConfigSource::Loaded(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Missing(path) => {
                warn!("Config file not found at {}, using defaults", path.display())
            }
            ConfigSource::Invalid(reason) => warn!("{}; using defaults", reason),
        }
    }
}

impl TomlConfig {
    /// Parse a config file. Missing or malformed files are errors here;
    /// see [`TomlConfig::load_or_default`] for the forgiving variant.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the config file, falling back to defaults, and report what
    /// happened without logging it.
    ///
    /// Callers that load config before tracing is installed log the returned
    /// [`ConfigSource`] once the subscriber is up.
    pub fn load_with_source(path: Option<&Path>) -> (Self, ConfigSource) {
        let Some(path) = path else {
            return (Self::default(), ConfigSource::Defaults);
        };

        if !path.exists() {
            return (Self::default(), ConfigSource::Missing(path.to_path_buf()));
        }

        match Self::load(path) {
            Ok(config) => (config, ConfigSource::Loaded(path.to_path_buf())),
            Err(e) => (Self::default(), ConfigSource::Invalid(e.to_string())),
        }
    }

    /// Load the config file, falling back to defaults with a warning.
    ///
    /// A missing config never stops startup.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let (config, source) = Self::load_with_source(path);
        source.log();
        config
    }

    /// Resolve host and port: explicit values (CLI or env) win over TOML.
    pub fn bind_address(&self, host: Option<String>, port: Option<u16>) -> (String, u16) {
        let host = host
            .or_else(|| self.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = port.or(self.port).unwrap_or(DEFAULT_PORT);
        (host, port)
    }
}

/// Platform config file location, e.g. `~/.config/affiliate-studio/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./studio_data"))
}

/// Data folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default
pub fn resolve_data_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.data_folder {
        return path.clone();
    }

    default_data_folder()
}

/// Create the data folder if missing and return the database path inside it
pub fn prepare_data_folder(folder: &Path) -> Result<PathBuf> {
    if !folder.exists() {
        std::fs::create_dir_all(folder)?;
        info!("Created data folder: {}", folder.display());
    }
    Ok(folder.join(DATABASE_FILE))
}
