//! Configuration loading for coopguard.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::capability::FoodTables;
use crate::error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Get the coopguard home directory (~/.coopguard).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".coopguard"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load and validate settings from a specific file.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&content)?;

    validate_settings(&settings)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings or return default if not found.
///
/// A missing file is the normal case and stays quiet; a broken one is
/// reported before falling back.
pub fn load_settings_or_default(path: Option<&Path>) -> Settings {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match get_settings_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Failed to locate settings: {}, using defaults", e);
                return Settings::default();
            }
        },
    };

    if !path.exists() {
        tracing::debug!("No settings at {}, using defaults", path.display());
        return Settings::default();
    }

    load_settings_from(&path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings: {}, using defaults", e);
        Settings::default()
    })
}

fn validate_settings(settings: &Settings) -> Result<()> {
    let url = &settings.client.server_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "client.server_url '{}' must start with http:// or https://",
            url
        )));
    }
    if settings.client.timeout_secs == 0 || settings.client.discovery_timeout_secs == 0 {
        return Err(Error::Config("client timeouts must be at least 1 second".to_string()));
    }
    Ok(())
}

/// Exchange server configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional JSON file replacing the built-in food tables
    pub foods_file: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            foods_file: None,
        }
    }
}

impl ServerSettings {
    /// Food tables to serve: the configured file, or the built-in tables.
    pub fn food_tables(&self) -> Result<FoodTables> {
        match &self.foods_file {
            Some(path) => FoodTables::from_file(path),
            None => Ok(FoodTables::default()),
        }
    }
}

/// Requester configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClientSettings {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_discovery_timeout_secs")]
    pub discovery_timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_discovery_timeout_secs() -> u64 {
    10
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            discovery_timeout_secs: default_discovery_timeout_secs(),
        }
    }
}

/// coopguard settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub client: ClientSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_settings(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.client.server_url, "http://localhost:8080");
        assert_eq!(settings.client.timeout_secs, 30);
        assert_eq!(settings.client.discovery_timeout_secs, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = write_settings(r#"{"server": {"port": 9090}}"#);
        let settings = load_settings_from(file.path()).unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.client, ClientSettings::default());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let file = write_settings(r#"{"client": {"server_url": "localhost:8080"}}"#);
        assert!(matches!(load_settings_from(file.path()), Err(Error::Config(_))));

        let file = write_settings(r#"{"client": {"timeout_secs": 0}}"#);
        assert!(matches!(load_settings_from(file.path()), Err(Error::Config(_))));

        let file = write_settings("not json");
        assert!(matches!(load_settings_from(file.path()), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert!(matches!(load_settings_from(&path), Err(Error::Config(_))));
        assert_eq!(load_settings_or_default(Some(&path)), Settings::default());
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let file = write_settings("{");
        assert_eq!(load_settings_or_default(Some(file.path())), Settings::default());
    }

    #[test]
    fn test_food_tables_from_settings() {
        let foods = write_settings(r#"{"safe": ["grubs"], "unsafe": []}"#);
        let server = ServerSettings {
            foods_file: Some(foods.path().to_path_buf()),
            ..Default::default()
        };

        let tables = server.food_tables().unwrap();
        assert_eq!(tables.classify("Grubs"), crate::capability::SafetyStatus::Safe);
        assert_eq!(ServerSettings::default().food_tables().unwrap(), FoodTables::default());
    }
}
