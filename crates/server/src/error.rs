// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for the governance node

use sql_governance_metadata::MetadataError;
use sql_governance_registry::RegistryError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for node operations
pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The cluster lock was not acquired in time
    #[error("Timed out after {timeout_millis}ms waiting for lock '{lock_name}'")]
    LockTimeout {
        lock_name: String,
        timeout_millis: u64,
    },
}
