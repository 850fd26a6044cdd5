// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Governance Node
//!
//! Wires configuration, the dialect registry, metadata loading and the
//! cluster lock together.
//!
//! ## Architecture
//!
//! - **Config**: YAML node configuration ([`GovernanceConfig`])
//! - **Data sources**: [`DataSourceFactory`] turns settings into data sources
//! - **Context manager**: bootstraps all databases and reloads one database
//!   at a time under its cluster lock ([`ContextManager`])

pub mod config;
pub mod context_manager;
pub mod data_source;
pub mod error;

pub use config::{ConfigError, DataSourceConfig, DatabaseConfig, GovernanceConfig, LockConfig};
pub use context_manager::{ContextManager, metadata_lock_name};
#[cfg(feature = "mysql")]
pub use data_source::MySqlDataSourceFactory;
pub use data_source::DataSourceFactory;
pub use error::{ServerError, ServerResult};
