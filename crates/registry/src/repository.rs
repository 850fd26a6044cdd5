// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Registry center repository
//!
//! The client interface of a registry center back end.

use std::time::Duration;

use crate::error::RegistryResult;

/// Client of a registry center
///
/// Implementations own the coordination protocol, including retries and
/// session handling. Callers in this workspace never retry on their own.
///
/// # Examples
///
/// ```rust,ignore
/// use sql_governance_registry::RegistryCenterRepository;
///
/// async fn guarded(repository: &dyn RegistryCenterRepository) -> RegistryResult<()> {
///     if repository.try_lock("/lock/locks/demo", Duration::from_millis(50)).await? {
///         repository.release_lock("/lock/locks/demo").await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait RegistryCenterRepository: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> RegistryResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn persist(&self, key: &str, value: &str) -> RegistryResult<()>;

    /// Delete `key`; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> RegistryResult<()>;

    /// Try to acquire the lock at `key`, waiting at most `timeout`
    ///
    /// Returns `Ok(false)` when the timeout elapsed first. A timed-out call
    /// leaves nothing to clean up.
    async fn try_lock(&self, key: &str, timeout: Duration) -> RegistryResult<bool>;

    /// Release the lock at `key`
    ///
    /// Whether releasing a lock this client does not hold is an error is up
    /// to the implementation.
    async fn release_lock(&self, key: &str) -> RegistryResult<()>;
}
