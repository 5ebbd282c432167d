use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the photo-organizer library.
///
/// Controls which file extensions are treated as photos, how the
/// reverse-geocoding service is reached, and output behavior.
///
/// # Loading
///
/// ```rust,no_run
/// use photo_organizer::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.geocoder.language = "en".into();
/// config.output.dry_run = true;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Lowercase file extensions treated as photos.
    pub extensions: Vec<String>,
    /// Reverse-geocoding service settings.
    pub geocoder: GeocoderConfig,
    /// Output behavior (dry run).
    pub output: OutputConfig,
}

/// Reverse-geocoding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Reverse-geocoding endpoint URL.
    pub endpoint: String,
    /// `accept-language` hint sent with each lookup.
    pub language: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Minimum gap between consecutive requests, in milliseconds. The
    /// Nominatim usage policy caps clients at one request per second.
    pub min_interval_ms: u64,
    /// User-Agent identifying this tool to the service.
    pub user_agent: String,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// If `true`, resolve every destination without moving any file.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: [
                "jpg", "jpeg", "png", "heic", "heif", "raw", "cr2", "nef", "arw",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            geocoder: GeocoderConfig::default(),
            output: OutputConfig { dry_run: false },
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/reverse".to_string(),
            language: "fr".to_string(),
            timeout_secs: 10,
            min_interval_ms: 1000,
            user_agent: "photo-organizer/0.1.0".to_string(),
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
