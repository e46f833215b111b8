use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "settings.json";
const BACKUP_PREFIX: &str = "settings_";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Loads, saves and snapshots [`Config`] as JSON on disk.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Lays out `<base>/settings.json` and `<base>/backups/`.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let backups_dir = base.join("backups");
        fs::create_dir_all(&backups_dir)?;
        Ok(Self::new(base.join(CONFIG_FILE), backups_dir))
    }

    /// Uses the platform configuration directory.
    pub fn default_location() -> Result<Self, ConfigError> {
        Self::with_base_dir(Config::default_base_dir())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Reads the stored configuration, or the defaults when nothing is stored yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        read_config(&self.config_path)
    }

    /// Writes through a temporary file so a crash never leaves half a config behind.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        let tmp = self.config_path.with_extension("json.tmp");
        write_json(&tmp, config)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }

    /// Stores a timestamped copy of `config` and returns its file name.
    pub fn backup(&self, config: &Config) -> Result<String, ConfigError> {
        fs::create_dir_all(&self.backups_dir)?;
        let stamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT);
        let mut name = format!("{BACKUP_PREFIX}{stamp}.{BACKUP_EXTENSION}");
        let mut attempt = 1;
        while self.backups_dir.join(&name).exists() {
            attempt += 1;
            name = format!("{BACKUP_PREFIX}{stamp}-{attempt}.{BACKUP_EXTENSION}");
        }
        write_json(&self.backups_dir.join(&name), config)?;
        Ok(name)
    }

    /// Reads a backup; the caller decides whether to `save` it as the active config.
    pub fn restore(&self, backup_name: &str) -> Result<Config, ConfigError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("configuration backup `{backup_name}` not found"),
            )));
        }
        read_config(&path)
    }

    /// Backup names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort_by_key(|name| Reverse((backup_timestamp(name), name.clone())));
        Ok(names)
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path)?;
    let config: Config =
        serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
    config.validate()?;
    Ok(config)
}

fn write_json(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(config).map_err(|err| ConfigError::Serde(err.to_string()))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn backup_timestamp(name: &str) -> Option<NaiveDateTime> {
    let stem = name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(&format!(".{BACKUP_EXTENSION}"))?;
    let stamp = stem.split('-').next()?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT).ok()
}
