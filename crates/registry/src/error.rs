// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for registry center operations

use serde::Serialize;
use thiserror::Error;

/// Result type alias for registry center operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised by a registry center back end
///
/// Lock operations pass these through to their caller as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum RegistryError {
    /// Connection to the registry center was lost
    #[error("Lost connection to registry center: {0}")]
    ConnectionLost(String),

    /// The client session expired; its ephemeral keys and locks are gone
    #[error("Registry session expired: {0}")]
    SessionExpired(String),

    /// A registry call did not complete in time
    #[error("Registry operation timed out after {0}ms")]
    Timeout(u64),

    /// Any other back end failure
    #[error("Registry operation failed: {0}")]
    OperationFailed(String),
}
