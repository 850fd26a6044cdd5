// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Resources
//!
//! The data sources backing one logical database, together with what can be
//! derived from them: the database type, per-source connection metadata and a
//! snapshot of one representative connection's driver metadata.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sql_governance_dialect::DatabaseType;
use tracing::debug;

use crate::datasource::{DataSource, DataSourceMap, DriverMetadata};
use crate::error::MetadataResult;
use crate::recognizer::DatabaseTypeRecognizer;

/// Connection coordinates parsed from a data source URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceMetadata {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub catalog: Option<String>,
    pub user_name: Option<String>,
}

impl DataSourceMetadata {
    /// Parse host, port and catalog out of a JDBC URL
    ///
    /// Handles `jdbc:<type>://host:port/catalog?params`,
    /// `jdbc:sqlserver://host:port;DatabaseName=catalog`,
    /// `jdbc:oracle:thin:@[//]host:port(/service|:sid)` and
    /// `jdbc:h2:mem:catalog;params`. Missing parts are `None`.
    pub fn parse(url: &str, user_name: Option<&str>) -> Self {
        let user_name = user_name.map(str::to_string);

        if let Some((_, target)) = url.split_once(":@") {
            return Self::parse_oracle_target(target, user_name);
        }

        let Some((_, rest)) = url.split_once("//") else {
            let catalog = url
                .split(';')
                .next()
                .and_then(|head| head.rsplit(':').next())
                .filter(|catalog| !catalog.is_empty())
                .map(str::to_string);
            return Self {
                host: None,
                port: None,
                catalog,
                user_name,
            };
        };

        let authority_end = rest.find(['/', ';', '?']).unwrap_or(rest.len());
        let (authority, tail) = rest.split_at(authority_end);
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, port.parse().ok()),
            None => (authority, None),
        };

        let catalog = match tail.strip_prefix('/') {
            Some(path) => path.split(['?', ';']).next().map(str::to_string),
            None => tail.split(';').find_map(|param| {
                let (key, value) = param.split_once('=')?;
                key.eq_ignore_ascii_case("databaseName")
                    .then(|| value.to_string())
            }),
        }
        .filter(|catalog| !catalog.is_empty());

        Self {
            host: (!host.is_empty()).then(|| host.to_string()),
            port,
            catalog,
            user_name,
        }
    }

    /// The part of an Oracle URL after `@`
    ///
    /// A TNS descriptor such as `(DESCRIPTION=...)` carries no plain address
    /// and yields no coordinates.
    fn parse_oracle_target(target: &str, user_name: Option<String>) -> Self {
        let target = target.strip_prefix("//").unwrap_or(target);
        if target.starts_with('(') {
            return Self {
                host: None,
                port: None,
                catalog: None,
                user_name,
            };
        }

        let (address, service) = match target.split_once('/') {
            Some((address, service)) => (address, Some(service)),
            None => (target, None),
        };
        let mut parts = address.splitn(3, ':');
        let host = parts.next().filter(|host| !host.is_empty());
        let port = parts.next().and_then(|port| port.parse().ok());
        let sid = parts.next();

        let catalog = service
            .or(sid)
            .and_then(|catalog| catalog.split(['?', ';']).next())
            .filter(|catalog| !catalog.is_empty())
            .map(str::to_string);

        Self {
            host: host.map(str::to_string),
            port,
            catalog,
            user_name,
        }
    }

    /// Whether two data sources point at the same database instance
    pub fn is_same_instance(&self, other: &Self) -> bool {
        self.host.is_some() && self.host == other.host && self.port == other.port
    }
}

/// Data sources of a database and the metadata derived from them
#[derive(Debug, Clone)]
pub struct Resource {
    data_sources: DataSourceMap,
    data_sources_metadata: BTreeMap<String, DataSourceMetadata>,
    cached_database_metadata: Option<DriverMetadata>,
    database_type: DatabaseType,
}

impl Resource {
    /// Build a resource from configured data sources
    ///
    /// Opens one connection to the first data source to capture its driver
    /// metadata. The connection is released before this returns, on success
    /// and on error alike.
    ///
    /// # Errors
    ///
    /// Propagates the failure to open that connection or read its metadata.
    /// An empty data source set is not an error.
    pub async fn create(
        data_sources: DataSourceMap,
        recognizer: &DatabaseTypeRecognizer,
    ) -> MetadataResult<Self> {
        let database_type = recognizer.database_type(data_sources.values());
        let data_sources_metadata = data_sources
            .iter()
            .map(|(name, data_source)| {
                (
                    name.clone(),
                    DataSourceMetadata::parse(data_source.url(), data_source.user_name()),
                )
            })
            .collect();
        let cached_database_metadata = Self::capture_driver_metadata(&data_sources).await?;

        Ok(Self {
            data_sources,
            data_sources_metadata,
            cached_database_metadata,
            database_type,
        })
    }

    async fn capture_driver_metadata(
        data_sources: &DataSourceMap,
    ) -> MetadataResult<Option<DriverMetadata>> {
        let Some((name, data_source)) = data_sources.iter().next() else {
            return Ok(None);
        };

        let mut connection = data_source.connection().await?;
        let metadata = connection.metadata().await?;
        debug!(
            "Captured driver metadata from data source {}: {} {}",
            name, metadata.database_product_name, metadata.database_product_version
        );
        Ok(Some(metadata))
    }

    pub fn data_sources(&self) -> &DataSourceMap {
        &self.data_sources
    }

    pub fn data_source(&self, name: &str) -> Option<&Arc<dyn DataSource>> {
        self.data_sources.get(name)
    }

    pub fn data_source_names(&self) -> Vec<String> {
        self.data_sources.keys().cloned().collect()
    }

    pub fn data_source_metadata(&self, name: &str) -> Option<&DataSourceMetadata> {
        self.data_sources_metadata.get(name)
    }

    pub fn cached_database_metadata(&self) -> Option<&DriverMetadata> {
        self.cached_database_metadata.as_ref()
    }

    pub fn database_type(&self) -> &DatabaseType {
        &self.database_type
    }

    pub fn is_empty(&self) -> bool {
        self.data_sources.is_empty()
    }

    /// Active schema of the representative connection, per dialect rules
    pub fn active_schema(&self) -> Option<String> {
        let metadata = self.cached_database_metadata.as_ref()?;
        self.database_type
            .resolve_schema(metadata.schema.as_deref(), metadata.user_name.as_deref())
    }

    /// One data source name per distinct database instance
    ///
    /// Data sources sharing host and port are the same instance; the first
    /// by name represents it. Sources without a host are always kept.
    pub fn instance_data_source_names(&self) -> BTreeSet<String> {
        let mut representatives: Vec<(&String, &DataSourceMetadata)> = Vec::new();
        for (name, metadata) in &self.data_sources_metadata {
            if !representatives
                .iter()
                .any(|(_, seen)| seen.is_same_instance(metadata))
            {
                representatives.push((name, metadata));
            }
        }
        representatives
            .into_iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}
