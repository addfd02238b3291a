//! Persisted configuration for Centra Panel.
//!
//! The console keeps three JSON files in a per-user application-data
//! directory (`<data_dir>/centra-panel/config/` by default):
//!
//! - `db-config.json`  -- where the `SQLite` database lives
//! - `bot-config.json` -- community bot credentials
//! - `vds-config.json` -- remote game server credentials
//!
//! Missing files are written with defaults on first run. Defaults never carry
//! secrets; credential fields start empty and must be filled in by the
//! operator.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const DB_CONFIG_FILE: &str = "db-config.json";
pub const BOT_CONFIG_FILE: &str = "bot-config.json";
pub const VDS_CONFIG_FILE: &str = "vds-config.json";

const APP_DIR: &str = "centra-panel";

/// Database location and pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: app_data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("centra_panel.db"),
            max_connections: 5,
            busy_timeout_secs: 5,
        }
    }
}

/// Community bot credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotConfig {
    pub token: String,
    pub client_id: String,
    pub guild_id: String,
}

impl BotConfig {
    /// Whether the operator has supplied a bot token.
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &redact(&self.token))
            .field("client_id", &self.client_id)
            .field("guild_id", &self.guild_id)
            .finish()
    }
}

/// Remote game server (VDS) credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VdsConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for VdsConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 22,
            username: String::new(),
            password: String::new(),
        }
    }
}

impl VdsConfig {
    /// Whether the operator has supplied login credentials.
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for VdsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VdsConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

const fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

/// All three configuration files, loaded together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub database: DatabaseConfig,
    pub bot: BotConfig,
    pub vds: VdsConfig,
}

impl ConsoleConfig {
    /// Load every config file from `dir`, writing defaults for missing ones.
    pub fn load_or_init(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            Error::Config(format!("Failed to create config dir {}: {e}", dir.display()))
        })?;

        Ok(Self {
            database: load_or_init(&dir.join(DB_CONFIG_FILE))?,
            bot: load_or_init(&dir.join(BOT_CONFIG_FILE))?,
            vds: load_or_init(&dir.join(VDS_CONFIG_FILE))?,
        })
    }
}

/// Per-user application-data directory (`<data_dir>/centra-panel`).
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR))
}

/// Default directory for the JSON config files.
pub fn default_config_dir() -> Option<PathBuf> {
    app_data_dir().map(|d| d.join("config"))
}

/// Read a JSON config file, or write `T::default()` to it when absent.
pub fn load_or_init<T>(path: &Path) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    if path.exists() {
        debug!(path = %path.display(), "Loading config file");
        return load_config_file(path);
    }

    let value = T::default();
    write_config_file(path, &value)?;
    info!(path = %path.display(), "Wrote default config file");
    Ok(value)
}

fn load_config_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {e}", path.display()))
    })
}

/// Write a config file as pretty JSON. Files are owner-only on Unix since
/// they hold credentials.
pub fn write_config_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_no_secrets() {
        let bot = BotConfig::default();
        let vds = VdsConfig::default();
        assert!(bot.token.is_empty());
        assert!(vds.password.is_empty());
        assert!(!bot.is_configured());
        assert!(!vds.is_configured());
    }

    #[test]
    fn first_run_writes_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig::load_or_init(dir.path()).unwrap();

        for file in [DB_CONFIG_FILE, BOT_CONFIG_FILE, VDS_CONFIG_FILE] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
        assert_eq!(config.vds.port, 22);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BOT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{"token": "abc", "clientId": "123", "guildId": "456"}"#,
        )
        .unwrap();

        let bot: BotConfig = load_or_init(&path).unwrap();
        assert_eq!(bot.token, "abc");
        assert_eq!(bot.client_id, "123");
        assert_eq!(bot.guild_id, "456");
        assert!(std::fs::read_to_string(&path).unwrap().contains("abc"));
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(VDS_CONFIG_FILE);
        std::fs::write(&path, r#"{"host": "10.0.0.5"}"#).unwrap();

        let vds: VdsConfig = load_or_init(&path).unwrap();
        assert_eq!(vds.host, "10.0.0.5");
        assert_eq!(vds.port, 22);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DB_CONFIG_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let err = load_or_init::<DatabaseConfig>(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let vds = VdsConfig {
            password: "hunter2".into(),
            ..VdsConfig::default()
        };
        let printed = format!("{vds:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[cfg(unix)]
    #[test]
    fn config_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(VDS_CONFIG_FILE);
        let _: VdsConfig = load_or_init(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
