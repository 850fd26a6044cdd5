// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Data sources and connections
//!
//! The narrow interface this crate needs from a connection pool: a JDBC URL
//! to recognize the dialect, and connections able to report driver metadata
//! and introspect their current schema.
//!
//! Connections are scoped values: dropping one releases it, so every early
//! return through `?` gives the connection back.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sql_governance_ir::TableMetadata;

use crate::error::MetadataResult;

/// Data sources of one logical database, keyed and ordered by name
pub type DataSourceMap = BTreeMap<String, Arc<dyn DataSource>>;

/// A configured, pooled data source
#[async_trait::async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// JDBC URL, used to recognize the database type
    fn url(&self) -> &str;

    /// Configured login user, if any
    fn user_name(&self) -> Option<&str> {
        None
    }

    /// Open (or borrow from the pool) a connection
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::ConnectionFailed` if the data source is unreachable.
    async fn connection(&self) -> MetadataResult<Box<dyn Connection>>;
}

/// A live connection to one data source
#[async_trait::async_trait]
pub trait Connection: Send {
    /// Snapshot of the driver and server metadata of this connection
    async fn metadata(&mut self) -> MetadataResult<DriverMetadata>;

    /// Tables, columns and indexes of the connection's current schema
    async fn load_tables(&mut self) -> MetadataResult<Vec<TableMetadata>>;
}

/// Driver metadata captured from a live connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverMetadata {
    pub url: String,
    pub user_name: Option<String>,
    /// Schema the connection is currently using
    pub schema: Option<String>,
    pub database_product_name: String,
    pub database_product_version: String,
    pub driver_name: String,
    pub driver_version: Option<String>,
    /// Quote string reported by the server for identifiers
    pub identifier_quote_string: String,
}
