use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub remote_cameras: RemoteCameraConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API server address
    #[serde(default = "default_address")]
    pub address: String,
    /// API server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory the dashboard bundle is served from
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4750
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

/// External camera-creation endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteCameraConfig {
    /// Whether camera creation goes through the remote endpoint at all
    #[serde(default)]
    pub enabled: bool,
    /// Camera creation endpoint URL
    #[serde(default = "default_camera_endpoint")]
    pub endpoint: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_camera_timeout")]
    pub timeout_ms: u64,
}

fn default_camera_endpoint() -> String {
    "http://localhost:9000/api/cameras".to_string()
}

fn default_camera_timeout() -> u64 {
    30000 // 30 seconds
}

/// Dashboard behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Load the demo rooms/cameras/behaviors at startup
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    /// Page size for the flattened camera listing
    #[serde(default = "default_cameras_per_page")]
    pub cameras_per_page: usize,
    /// Buffered capacity of the change-event channel
    #[serde(default = "default_event_capacity")]
    pub event_channel_capacity: usize,
}

fn default_seed_demo_data() -> bool {
    true
}

fn default_cameras_per_page() -> usize {
    8
}

fn default_event_capacity() -> usize {
    64
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            log_level: default_log_level(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for RemoteCameraConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_camera_endpoint(),
            timeout_ms: default_camera_timeout(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
            cameras_per_page: default_cameras_per_page(),
            event_channel_capacity: default_event_capacity(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            remote_cameras: RemoteCameraConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

/// Load configuration from a file or use default
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => {
            let config_str = std::fs::read_to_string(path)
                .context(format!("Failed to read config file: {:?}", path))?;

            let config = if path.extension().map_or(false, |ext| ext == "json") {
                serde_json::from_str(&config_str).context("Failed to parse JSON config")?
            } else if path.extension().map_or(false, |ext| ext == "toml") {
                toml::from_str(&config_str).context("Failed to parse TOML config")?
            } else {
                return Err(anyhow::anyhow!("Unsupported config file format"));
            };

            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.api.port, 4750);
        assert_eq!(config.dashboard.cameras_per_page, 8);
        assert!(!config.remote_cameras.enabled);
        assert!(config.dashboard.seed_demo_data);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            port = 8080

            [remote_cameras]
            enabled = true
            endpoint = "http://cameras.internal/api/cameras"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.address, "0.0.0.0");
        assert!(config.remote_cameras.enabled);
        assert_eq!(config.remote_cameras.timeout_ms, 30000);
        assert_eq!(config.dashboard.cameras_per_page, 8);
    }
}
