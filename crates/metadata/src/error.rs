// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for metadata operations
//!
//! This module defines the error types used throughout the metadata layer.
//! A database that lacks rules or data sources is not an error; see
//! [`DatabaseMetadata::is_complete`](crate::DatabaseMetadata::is_complete).

use serde::Serialize;
use thiserror::Error;

/// Result type alias for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors that can occur while building database metadata
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum MetadataError {
    /// Failed to open a connection to a data source
    #[error("Failed to connect to data source: {0}")]
    ConnectionFailed(String),

    /// A metadata query failed on an open connection
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Schema discovery produced inconsistent results
    #[error("Schema discovery failed: {0}")]
    DiscoveryFailed(String),

    /// No rule builder is registered for a configured rule type
    #[error("Unknown rule type: {0}")]
    UnknownRuleType(String),

    /// A rule configuration is missing or contradicts required settings
    #[error("Invalid {rule_type} rule configuration: {reason}")]
    InvalidRuleConfiguration { rule_type: String, reason: String },

    /// Invalid data source configuration
    #[error("Invalid data source configuration: {0}")]
    ConfigurationError(String),

    /// The feature is not supported by this back end
    #[error("Feature not supported: {0}")]
    NotSupported(String),
}
