// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Governance Configuration
//!
//! This module loads and validates the node configuration.
//!
//! ## Configuration Structure
//!
//! - Instance id of this node (owner of its locks and acknowledgements)
//! - Lock settings
//! - Logical databases with their data sources, rules and properties
//!
//! ## Example
//!
//! ```yaml
//! instance_id: node-1
//! lock:
//!   timeout_millis: 3000
//! databases:
//!   - name: sharding_db
//!     data_sources:
//!       ds_0: { url: "jdbc:mysql://127.0.0.1:3306/ds_0", username: root, password: "" }
//!     rules:
//!       - type: readwrite_splitting
//!         props: { write_data_source: ds_0, read_data_sources: ds_0 }
//!     props:
//!       check-table-metadata-enabled: "false"
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sql_governance_metadata::{Properties, RuleConfiguration};

/// Default time to wait for a cluster lock
pub const DEFAULT_LOCK_TIMEOUT_MILLIS: u64 = 3000;

/// Lock settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    /// How long a reload waits for the database lock
    #[serde(default = "default_lock_timeout_millis")]
    pub timeout_millis: u64,
}

fn default_lock_timeout_millis() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MILLIS
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_millis: DEFAULT_LOCK_TIMEOUT_MILLIS,
        }
    }
}

/// Connection settings of one data source
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// JDBC URL, e.g. `jdbc:mysql://127.0.0.1:3306/ds_0`
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl DataSourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Builder method: set credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for DataSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// One logical database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    #[serde(default)]
    pub data_sources: BTreeMap<String, DataSourceConfig>,
    #[serde(default)]
    pub rules: Vec<RuleConfiguration>,
    #[serde(default)]
    pub props: Properties,
}

impl DatabaseConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_sources: BTreeMap::new(),
            rules: Vec::new(),
            props: Properties::new(),
        }
    }

    /// Builder method: add a data source
    pub fn with_data_source(mut self, name: impl Into<String>, config: DataSourceConfig) -> Self {
        self.data_sources.insert(name.into(), config);
        self
    }

    /// Builder method: add a rule configuration
    pub fn with_rule(mut self, rule: RuleConfiguration) -> Self {
        self.rules.push(rule);
        self
    }

    /// Builder method: replace properties
    pub fn with_props(mut self, props: Properties) -> Self {
        self.props = props;
        self
    }
}

/// Configuration of a governance node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    pub instance_id: String,
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub databases: Vec<DatabaseConfig>,
}

impl GovernanceConfig {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            lock: LockConfig::default(),
            databases: Vec::new(),
        }
    }

    /// Builder method: add a database
    pub fn with_database(mut self, database: DatabaseConfig) -> Self {
        self.databases.push(database);
        self
    }

    /// Parse a YAML document (not validated)
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read, parse and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn database(&self, name: &str) -> Option<&DatabaseConfig> {
        self.databases.iter().find(|database| database.name == name)
    }

    /// Validate the configuration
    ///
    /// Checks that:
    /// - The instance id is not empty
    /// - The lock timeout is positive
    /// - Database names are present and unique
    /// - Data source URLs are JDBC URLs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_id.trim().is_empty() {
            return Err(ConfigError::MissingInstanceId);
        }

        if self.lock.timeout_millis == 0 {
            return Err(ConfigError::InvalidLockTimeout);
        }

        let mut names = HashSet::new();
        for database in &self.databases {
            if database.name.trim().is_empty() {
                return Err(ConfigError::MissingDatabaseName);
            }
            if !names.insert(database.name.as_str()) {
                return Err(ConfigError::DuplicateDatabase(database.name.clone()));
            }

            for (name, data_source) in &database.data_sources {
                if !data_source.url.trim_start().starts_with("jdbc:") {
                    return Err(ConfigError::InvalidDataSourceUrl {
                        database: database.name.clone(),
                        data_source: name.clone(),
                        reason: "URL must start with 'jdbc:'".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// Invalid YAML or unexpected structure
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("instance_id is required")]
    MissingInstanceId,

    #[error("lock.timeout_millis must be > 0")]
    InvalidLockTimeout,

    #[error("Database name is required")]
    MissingDatabaseName,

    #[error("Database '{0}' is configured more than once")]
    DuplicateDatabase(String),

    #[error("Invalid URL for data source '{data_source}' of database '{database}': {reason}")]
    InvalidDataSourceUrl {
        database: String,
        data_source: String,
        reason: String,
    },
}
