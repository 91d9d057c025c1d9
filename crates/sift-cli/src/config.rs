//! Persistent CLI configuration.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sift_core::permissions::StaticDomainPermissions;
use sift_core::{Permission, SearchConfig};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";
const DB_FILE_NAME: &str = "sift.db";
const DB_PATH_ENV: &str = "SIFT_DB_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    /// Database used when neither `--db-path` nor `SIFT_DB_PATH` is given
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub search: SearchConfig,
    /// Per-domain permissions handed to the search engine
    #[serde(default)]
    pub grants: Vec<DomainGrant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainGrant {
    pub user: String,
    pub domain: String,
    /// Comma separated permission names, e.g. `"read,write"`
    pub permission: String,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sift").join(CONFIG_FILE_NAME))
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map_or_else(|| PathBuf::from("."), |dir| dir.join("sift"))
        .join(DB_FILE_NAME)
}

impl CliConfig {
    /// Load the config at `explicit`, or the default location.
    ///
    /// A missing file yields the defaults; an explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        match explicit {
            Some(path) if !path.exists() => Err(CliError::Config(format!(
                "Config file {} does not exist",
                path.display()
            ))),
            Some(path) => Self::load_from_path(path),
            None => default_config_path()
                .map_or_else(|| Ok(Self::default()), |path| Self::load_from_path(&path)),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
            .map_err(|error| CliError::Config(format!("{}: {error}", path.display())))
    }

    pub fn parse(raw: &str) -> Result<Self, CliError> {
        let mut config = serde_json::from_str::<Self>(raw)
            .map_err(|error| CliError::Config(error.to_string()))?;
        config.search = config.search.validated()?;
        Ok(config)
    }

    /// `--db-path`, then `SIFT_DB_PATH`, then the config file, then the
    /// platform data directory
    pub fn resolve_db_path(&self, cli_db_path: Option<PathBuf>) -> PathBuf {
        cli_db_path
            .or_else(|| env::var_os(DB_PATH_ENV).map(PathBuf::from))
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(default_db_path)
    }

    pub fn domain_permissions(&self) -> Result<StaticDomainPermissions, CliError> {
        self.grants
            .iter()
            .try_fold(StaticDomainPermissions::new(), |permissions, grant| {
                let permission = grant.permission.parse::<Permission>().map_err(|error| {
                    CliError::Config(format!(
                        "Grant for {} on {}: {error}",
                        grant.user, grant.domain
                    ))
                })?;
                Ok(permissions.grant(grant.user.as_str(), grant.domain.as_str(), permission))
            })
    }
}
