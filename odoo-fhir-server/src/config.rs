use odoo_fhir_core::CustomFields;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Server configuration loaded from YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub odoo: OdooSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Mount point of the FHIR API
    pub base_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OdooSettings {
    /// `http(s)://host:port` of the Odoo instance
    pub url: String,
    pub database: String,
    pub timeout_secs: u64,
    /// External id (`module.name`) of the product category holding drugs
    pub drugs_category_ext_id: Option<String>,
    pub fields: CustomFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// How long an Odoo login is reused before authenticating again
    pub session_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub audit_db: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_path: "/odoo/fhir/R4".to_string(),
        }
    }
}

impl Default for OdooSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8069".to_string(),
            database: "odoo".to_string(),
            timeout_secs: 30,
            drugs_category_ext_id: None,
            fields: CustomFields::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_secs: 15 * 60,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            audit_db: "audit.sqlite".to_string(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ServerConfig {
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("ODOO_FHIR_HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("ODOO_FHIR_PORT")
            && let Ok(port_num) = port.parse()
        {
            self.server.port = port_num;
        }

        if let Some(url) = var("ODOO_URL") {
            self.odoo.url = url;
        }

        if let Some(database) = var("ODOO_DATABASE") {
            self.odoo.database = database;
        }

        if let Some(ext_id) = var("ODOO_DRUGS_CATEGORY_EXT_ID") {
            self.odoo.drugs_category_ext_id = Some(ext_id);
        }

        if let Some(data_dir) = var("ODOO_FHIR_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }
    }

    /// Reject settings the adapter cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.odoo.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("odoo.url is required".to_string()));
        }
        if self.odoo.database.trim().is_empty() {
            return Err(ConfigError::Invalid("odoo.database is required".to_string()));
        }

        let scheme = url.split_once("://").map(|(scheme, _)| scheme.to_ascii_lowercase());
        if !matches!(scheme.as_deref(), Some("http") | Some("https")) {
            return Err(ConfigError::Invalid(format!(
                "odoo.url must use http or https: {}",
                url
            )));
        }

        Ok(())
    }

    pub fn audit_db_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.audit_db)
    }

    pub fn odoo_timeout(&self) -> Duration {
        Duration::from_secs(self.odoo.timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.session_ttl_secs)
    }

    /// Base path normalised to `/segment/...` without a trailing slash; empty for the root.
    pub fn base_path(&self) -> String {
        let trimmed = self.server.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}
