// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lock registry center
//!
//! Translates lock operations on logical lock names into registry center
//! calls on [`LockNode`] paths. Errors from the repository are returned
//! unchanged; retry policy belongs to the repository.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::RegistryResult;
use crate::node::LockNode;
use crate::repository::RegistryCenterRepository;

/// Cluster-wide locks backed by a registry center
#[derive(Clone)]
pub struct LockRegistryCenter {
    repository: Arc<dyn RegistryCenterRepository>,
}

impl LockRegistryCenter {
    pub fn new(repository: Arc<dyn RegistryCenterRepository>) -> Self {
        Self { repository }
    }

    /// Try to acquire the lock `lock_name`, waiting at most `timeout_millis`
    ///
    /// Returns `Ok(false)` if the lock was not acquired in time.
    pub async fn try_lock(&self, lock_name: &str, timeout_millis: u64) -> RegistryResult<bool> {
        let path = LockNode::lock_node_path(lock_name);
        let acquired = self
            .repository
            .try_lock(&path, Duration::from_millis(timeout_millis))
            .await?;

        debug!(
            "try_lock: lock={}, timeout={}ms, acquired={}",
            lock_name, timeout_millis, acquired
        );
        Ok(acquired)
    }

    /// Release the lock `lock_name`
    ///
    /// Ownership is not checked here; releasing a lock this node does not
    /// hold behaves however the repository defines it.
    pub async fn release_lock(&self, lock_name: &str) -> RegistryResult<()> {
        self.repository
            .release_lock(&LockNode::lock_node_path(lock_name))
            .await?;

        debug!("release_lock: lock={}", lock_name);
        Ok(())
    }

    /// Record that this node observed the locked operation complete
    pub async fn ack_lock(&self, ack_id: &str, value: &str) -> RegistryResult<()> {
        self.repository
            .persist(&LockNode::lock_ack_node_path(ack_id), value)
            .await
    }

    /// Read an acknowledgement back
    pub async fn lock_ack(&self, ack_id: &str) -> RegistryResult<Option<String>> {
        self.repository
            .get(&LockNode::lock_ack_node_path(ack_id))
            .await
    }

    /// Delete an acknowledgement
    pub async fn delete_lock_ack(&self, ack_id: &str) -> RegistryResult<()> {
        self.repository
            .delete(&LockNode::lock_ack_node_path(ack_id))
            .await?;

        debug!("delete_lock_ack: ack={}", ack_id);
        Ok(())
    }
}

impl std::fmt::Debug for LockRegistryCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockRegistryCenter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRegistryRepository;

    #[tokio::test]
    async fn test_lock_round_trip_on_memory_repository() {
        let repository = MemoryRegistryRepository::new("node-1");
        let locks = LockRegistryCenter::new(Arc::new(repository.clone()));

        assert!(locks.try_lock("test", 50).await.unwrap());
        assert_eq!(
            repository.lock_owner(&LockNode::lock_node_path("test")),
            Some("node-1".to_string())
        );

        locks.release_lock("test").await.unwrap();
        assert_eq!(repository.lock_owner(&LockNode::lock_node_path("test")), None);
    }

    #[tokio::test]
    async fn test_ack_lifecycle() {
        let locks = LockRegistryCenter::new(Arc::new(MemoryRegistryRepository::new("node-1")));

        locks.ack_lock("node-1", "reloaded").await.unwrap();
        assert_eq!(
            locks.lock_ack("node-1").await.unwrap(),
            Some("reloaded".to_string())
        );

        locks.delete_lock_ack("node-1").await.unwrap();
        assert_eq!(locks.lock_ack("node-1").await.unwrap(), None);
    }
}
