// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Governance - Database Metadata
//!
//! This crate assembles the metadata of a logical database and decides
//! whether it is ready to serve traffic.
//!
//! ## Architecture
//!
//! - **Resources**: the data sources backing a database, the recognized
//!   [`DatabaseType`](sql_governance_dialect::DatabaseType) and a snapshot of
//!   one connection's driver metadata
//! - **Rules**: rule instances built from configuration plus pre-built ones
//! - **Schemas**: user tables discovered through a [`SchemaLoader`], merged
//!   with the dialect's system schemas by the [`DatabaseLoader`]
//! - **Contexts**: [`MetadataContexts`] publishes whole database snapshots so
//!   readers never see a half-updated database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sql_governance_dialect::DialectRegistry;
//! use sql_governance_metadata::{DatabaseLoader, DatabaseTypeRecognizer, DataSourceSchemaLoader};
//!
//! let registry = Arc::new(DialectRegistry::new());
//! let recognizer = DatabaseTypeRecognizer::new(registry.clone());
//! let loader = DatabaseLoader::new(registry, Arc::new(DataSourceSchemaLoader::new()));
//!
//! let database_type = recognizer.database_type(data_sources.values());
//! let loaded = loader
//!     .load("sharding_db", &database_type, &data_sources, &rules, &props)
//!     .await?;
//! ```
//!
//! ## Implementing a Data Source
//!
//! ```rust,ignore
//! use sql_governance_metadata::{Connection, DataSource, MetadataResult};
//!
//! #[derive(Debug)]
//! struct MyDataSource { url: String }
//!
//! #[async_trait::async_trait]
//! impl DataSource for MyDataSource {
//!     fn url(&self) -> &str {
//!         &self.url
//!     }
//!
//!     async fn connection(&self) -> MetadataResult<Box<dyn Connection>> {
//!         // Open a connection here
//!     }
//! }
//! ```

pub mod contexts;
pub mod database;
pub mod datasource;
pub mod error;
#[cfg(feature = "mysql")]
pub mod live_mysql;
pub mod loader;
pub mod props;
pub mod recognizer;
pub mod resource;
pub mod rule;

// Re-exports
pub use contexts::MetadataContexts;
pub use database::{DatabaseConfiguration, DatabaseMetadata};
pub use datasource::{Connection, DataSource, DataSourceMap, DriverMetadata};
pub use error::{MetadataError, MetadataResult};
#[cfg(feature = "mysql")]
pub use live_mysql::{MySqlConnection, MySqlDataSource};
pub use loader::{DataSourceSchemaLoader, DatabaseLoader, LoadedDatabase, SchemaLoader};
pub use props::Properties;
pub use recognizer::DatabaseTypeRecognizer;
pub use resource::{DataSourceMetadata, Resource};
pub use rule::{Rule, RuleBuilder, RuleBuilders, RuleConfiguration, RuleMetadata};
