// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Creating data sources from configuration

use std::sync::Arc;

use sql_governance_metadata::{DataSource, DataSourceMap, MetadataResult};

use crate::config::{DataSourceConfig, DatabaseConfig};

/// Turns data source settings into live data sources
pub trait DataSourceFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns `MetadataError::ConfigurationError` for settings this factory
    /// cannot serve.
    fn create(&self, name: &str, config: &DataSourceConfig) -> MetadataResult<Arc<dyn DataSource>>;

    /// Create every data source of a database
    fn create_all(&self, database: &DatabaseConfig) -> MetadataResult<DataSourceMap> {
        database
            .data_sources
            .iter()
            .map(|(name, config)| Ok((name.clone(), self.create(name, config)?)))
            .collect()
    }
}

/// Factory for MySQL-protocol data sources
#[cfg(feature = "mysql")]
#[derive(Debug, Default)]
pub struct MySqlDataSourceFactory;

#[cfg(feature = "mysql")]
impl DataSourceFactory for MySqlDataSourceFactory {
    fn create(&self, name: &str, config: &DataSourceConfig) -> MetadataResult<Arc<dyn DataSource>> {
        tracing::debug!("Creating MySQL data source {}", name);
        let data_source = sql_governance_metadata::MySqlDataSource::new(
            config.url.clone(),
            config.username.as_deref(),
            config.password.as_deref(),
        )?;
        Ok(Arc::new(data_source))
    }
}
