use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming the TOML config file
pub const CONFIG_ENV: &str = "METAR_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// ICAO location indicator echoed with every encoded group
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Unit of incoming speeds: knots, mps, kph or mph
    pub speed_unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub station: Option<StationConfig>,
    pub server: Option<ServerConfig>,
    pub encoder: Option<EncoderConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from METAR_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.toml".to_string());
        if Path::new(&path).exists() {
            Self::load_from(&path)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    }

    /// Get HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
    }

    pub fn station_id(&self) -> Option<String> {
        self.station.as_ref().and_then(|s| s.id.clone())
    }

    /// Unit of incoming speeds (default "knots")
    pub fn speed_unit(&self) -> String {
        self.encoder
            .as_ref()
            .and_then(|e| e.speed_unit.clone())
            .unwrap_or_else(|| "knots".to_string())
    }
}
