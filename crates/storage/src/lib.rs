use keymapper_context::Mode;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("invalid value for setting '{key}': {value}")]
    InvalidValue { key: String, value: String },
    #[error("database mutex poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StorageError>;

const KEY_ACTIVE_MODE: &str = "active_mode";
const KEY_AUTO_SWITCH: &str = "auto_switch_enabled";

/// Settings that survive restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSettings {
    pub active_mode: Mode,
    pub auto_switch_enabled: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            active_mode: Mode::Default,
            auto_switch_enabled: true,
        }
    }
}

/// Repository for persisted engine settings.
pub trait SettingsRepository: Send + Sync {
    /// Load settings; missing keys take their defaults.
    fn load_settings(&self) -> Result<PersistedSettings>;
    fn save_settings(&self, settings: &PersistedSettings) -> Result<()>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        tracing::debug!(path = %path.display(), "opened settings database");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Read a raw setting.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write a raw setting.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            (key, value),
        )?;
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(StorageError::InvalidValue {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}

impl SettingsRepository for Database {
    fn load_settings(&self) -> Result<PersistedSettings> {
        let defaults = PersistedSettings::default();

        let active_mode = match self.get_setting(KEY_ACTIVE_MODE)? {
            Some(value) => value.parse().map_err(|_| StorageError::InvalidValue {
                key: KEY_ACTIVE_MODE.to_string(),
                value,
            })?,
            None => defaults.active_mode,
        };

        let auto_switch_enabled = match self.get_setting(KEY_AUTO_SWITCH)? {
            Some(value) => parse_bool(KEY_AUTO_SWITCH, &value)?,
            None => defaults.auto_switch_enabled,
        };

        Ok(PersistedSettings {
            active_mode,
            auto_switch_enabled,
        })
    }

    fn save_settings(&self, settings: &PersistedSettings) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            (KEY_ACTIVE_MODE, settings.active_mode.as_str()),
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            (KEY_AUTO_SWITCH, settings.auto_switch_enabled.to_string()),
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// Settings kept in memory only. For tests and hosts without a writable disk.
#[derive(Default)]
pub struct InMemorySettings {
    settings: Mutex<Option<PersistedSettings>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(settings: PersistedSettings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
        }
    }

    /// Last saved value, if anything was saved.
    pub fn saved(&self) -> Option<PersistedSettings> {
        *self.settings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SettingsRepository for InMemorySettings {
    fn load_settings(&self) -> Result<PersistedSettings> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save_settings(&self, settings: &PersistedSettings) -> Result<()> {
        *self.settings.lock().map_err(|_| StorageError::LockPoisoned)? = Some(*settings);
        Ok(())
    }
}
