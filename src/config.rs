use crate::error::ConfigError;
use serde::Deserialize;
use std::{fs, io, path::Path};
use toml_edit::{DocumentMut, Item, Table, value};

pub const DEFAULT_CONFIG_PATH: &str = ".config/taskpane.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// The dev backend serves a self-signed localhost certificate.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_base_url() -> String {
    "https://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            accept_invalid_certs: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(&path) {
            Err(ConfigError::ReadFile { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Config::default())
            }
            other => other,
        }
    }

    /// Persist a new backend URL, keeping the rest of the file as the user wrote it.
    pub fn set_base_url(path: impl AsRef<Path>, base_url: &str) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let mut doc = content.parse::<DocumentMut>()?;

        // `[api]` and `api = { ... }` are both edited in place.
        match doc.get("api").map(Item::is_table_like) {
            None => doc["api"] = Item::Table(Table::new()),
            Some(true) => {}
            Some(false) => {
                return Err(ConfigError::NotATable {
                    key: "api".to_string(),
                    path: path.to_path_buf(),
                });
            }
        }
        doc["api"]["base_url"] = value(base_url);

        let write_err = |source| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        fs::write(path, doc.to_string()).map_err(write_err)?;
        Ok(())
    }
}
