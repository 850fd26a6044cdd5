// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # In-memory registry center
//!
//! A registry center living inside the process. Several sessions (one per
//! simulated cluster node) can share one store:
//!
//! - Locks are session-scoped and reentrant: the owning session may acquire
//!   again and must release as many times
//! - Waiters are woken when any lock is released
//! - Releasing a lock the session does not hold is a no-op
//! - Closing a session drops all of its locks, like an expired ephemeral node

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::repository::RegistryCenterRepository;

/// Upper bound for waits whose deadline would overflow `Instant`
const MAX_WAIT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug)]
struct LockHolder {
    owner: String,
    holds: usize,
}

#[derive(Debug, Default)]
struct MemoryStore {
    locks: Mutex<HashMap<String, LockHolder>>,
    values: Mutex<BTreeMap<String, String>>,
    released: Notify,
}

/// One session on an in-memory registry center
#[derive(Debug, Clone)]
pub struct MemoryRegistryRepository {
    instance_id: String,
    closed: Arc<AtomicBool>,
    store: Arc<MemoryStore>,
}

impl MemoryRegistryRepository {
    /// Create a new store with a first session
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            closed: Arc::new(AtomicBool::new(false)),
            store: Arc::new(MemoryStore::default()),
        }
    }

    /// Open another session on the same store
    pub fn session(&self, instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            closed: Arc::new(AtomicBool::new(false)),
            store: Arc::clone(&self.store),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Instance id of the session holding the lock at `key`
    pub fn lock_owner(&self, key: &str) -> Option<String> {
        self.store
            .locks
            .lock()
            .get(key)
            .map(|holder| holder.owner.clone())
    }

    /// End this session and drop every lock it holds
    ///
    /// Later calls on this session fail with [`RegistryError::SessionExpired`].
    pub fn close(&self) {
        // Set under the lock table, which try_acquire also holds.
        let mut locks = self.store.locks.lock();
        self.closed.store(true, Ordering::SeqCst);
        let before = locks.len();
        locks.retain(|_, holder| holder.owner != self.instance_id);
        let dropped = before - locks.len();
        drop(locks);

        debug!(
            "Closed registry session {}, dropped {} locks",
            self.instance_id, dropped
        );
        self.store.released.notify_waiters();
    }

    fn ensure_open(&self) -> RegistryResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RegistryError::SessionExpired(self.instance_id.clone()));
        }
        Ok(())
    }

    fn try_acquire(&self, key: &str) -> RegistryResult<bool> {
        let mut locks = self.store.locks.lock();
        self.ensure_open()?;
        let acquired = match locks.get_mut(key) {
            Some(holder) if holder.owner == self.instance_id => {
                holder.holds += 1;
                true
            }
            Some(_) => false,
            None => {
                locks.insert(
                    key.to_string(),
                    LockHolder {
                        owner: self.instance_id.clone(),
                        holds: 1,
                    },
                );
                true
            }
        };
        Ok(acquired)
    }
}

#[async_trait]
impl RegistryCenterRepository for MemoryRegistryRepository {
    async fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        self.ensure_open()?;
        Ok(self.store.values.lock().get(key).cloned())
    }

    async fn persist(&self, key: &str, value: &str) -> RegistryResult<()> {
        self.ensure_open()?;
        self.store
            .values
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> RegistryResult<()> {
        self.ensure_open()?;
        self.store.values.lock().remove(key);
        Ok(())
    }

    async fn try_lock(&self, key: &str, timeout: Duration) -> RegistryResult<bool> {
        self.ensure_open()?;
        let deadline = Instant::now()
            .checked_add(timeout)
            .unwrap_or_else(|| Instant::now() + MAX_WAIT);

        loop {
            // Register for wake-ups before checking, so a release between the
            // check and the wait is not missed.
            let mut released = std::pin::pin!(self.store.released.notified());
            released.as_mut().enable();

            if self.try_acquire(key)? {
                debug!("Session {} acquired lock {}", self.instance_id, key);
                return Ok(true);
            }

            if tokio::time::timeout_at(deadline, released).await.is_err() {
                debug!(
                    "Session {} timed out after {:?} waiting for lock {}",
                    self.instance_id, timeout, key
                );
                return Ok(false);
            }
            self.ensure_open()?;
        }
    }

    async fn release_lock(&self, key: &str) -> RegistryResult<()> {
        self.ensure_open()?;
        let mut locks = self.store.locks.lock();
        let released = match locks.get_mut(key) {
            Some(holder) if holder.owner == self.instance_id => {
                holder.holds -= 1;
                if holder.holds == 0 {
                    locks.remove(key);
                    true
                } else {
                    false
                }
            }
            _ => {
                debug!(
                    "Session {} does not hold lock {}, nothing to release",
                    self.instance_id, key
                );
                false
            }
        };
        drop(locks);

        if released {
            debug!("Session {} released lock {}", self.instance_id, key);
            self.store.released.notify_waiters();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "/lock/locks/test";

    #[tokio::test]
    async fn test_lock_is_exclusive_across_sessions() {
        let node1 = MemoryRegistryRepository::new("node-1");
        let node2 = node1.session("node-2");

        assert!(node1.try_lock(KEY, Duration::ZERO).await.unwrap());
        assert!(!node2.try_lock(KEY, Duration::ZERO).await.unwrap());
        assert_eq!(node2.lock_owner(KEY), Some("node-1".to_string()));
    }

    #[tokio::test]
    async fn test_lock_is_reentrant_within_session() {
        let node1 = MemoryRegistryRepository::new("node-1");
        let node2 = node1.session("node-2");

        assert!(node1.try_lock(KEY, Duration::ZERO).await.unwrap());
        assert!(node1.try_lock(KEY, Duration::ZERO).await.unwrap());

        node1.release_lock(KEY).await.unwrap();
        assert!(!node2.try_lock(KEY, Duration::ZERO).await.unwrap());

        node1.release_lock(KEY).await.unwrap();
        assert!(node2.try_lock(KEY, Duration::ZERO).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_by_non_owner_is_noop() {
        let node1 = MemoryRegistryRepository::new("node-1");
        let node2 = node1.session("node-2");

        node2.release_lock(KEY).await.unwrap();
        assert!(node1.try_lock(KEY, Duration::ZERO).await.unwrap());
        node2.release_lock(KEY).await.unwrap();
        assert_eq!(node1.lock_owner(KEY), Some("node-1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_try_lock_times_out() {
        let node1 = MemoryRegistryRepository::new("node-1");
        let node2 = node1.session("node-2");
        assert!(node1.try_lock(KEY, Duration::ZERO).await.unwrap());

        let started = Instant::now();
        let acquired = node2.try_lock(KEY, Duration::from_millis(50)).await.unwrap();

        assert!(!acquired);
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(node1.lock_owner(KEY), Some("node-1".to_string()));
    }

    #[tokio::test]
    async fn test_waiter_acquires_after_release() {
        let node1 = MemoryRegistryRepository::new("node-1");
        let node2 = node1.session("node-2");
        assert!(node1.try_lock(KEY, Duration::ZERO).await.unwrap());

        let waiter = tokio::spawn(async move {
            node2.try_lock(KEY, Duration::from_secs(5)).await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        node1.release_lock(KEY).await.unwrap();

        assert!(waiter.await.unwrap().unwrap());
        assert_eq!(node1.lock_owner(KEY), Some("node-2".to_string()));
    }

    #[tokio::test]
    async fn test_close_drops_locks_and_expires_session() {
        let node1 = MemoryRegistryRepository::new("node-1");
        let node2 = node1.session("node-2");
        assert!(node1.try_lock(KEY, Duration::ZERO).await.unwrap());

        node1.close();

        assert!(node2.try_lock(KEY, Duration::ZERO).await.unwrap());
        assert!(matches!(
            node1.try_lock(KEY, Duration::ZERO).await,
            Err(RegistryError::SessionExpired(_))
        ));
        assert!(node1.get("/any").await.is_err());
    }

    #[test]
    fn test_closed_session_cannot_insert_lock() {
        let node1 = MemoryRegistryRepository::new("node-1");
        let node2 = node1.session("node-2");

        node1.close();

        assert!(matches!(
            node1.try_acquire(KEY),
            Err(RegistryError::SessionExpired(_))
        ));
        assert_eq!(node2.lock_owner(KEY), None);
    }

    #[tokio::test]
    async fn test_close_wakes_waiter_with_session_expired() {
        let node1 = MemoryRegistryRepository::new("node-1");
        let node2 = node1.session("node-2");
        assert!(node2.try_lock(KEY, Duration::ZERO).await.unwrap());

        let waiter = {
            let node1 = node1.clone();
            tokio::spawn(async move { node1.try_lock(KEY, Duration::from_secs(5)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        node1.close();
        node2.release_lock(KEY).await.unwrap();

        assert!(matches!(
            waiter.await.unwrap(),
            Err(RegistryError::SessionExpired(_))
        ));
        assert_eq!(node2.lock_owner(KEY), None);
    }

    #[tokio::test]
    async fn test_key_values() {
        let repository = MemoryRegistryRepository::new("node-1");

        repository.persist("/lock/ack/test", "done").await.unwrap();
        assert_eq!(
            repository.get("/lock/ack/test").await.unwrap(),
            Some("done".to_string())
        );

        repository.delete("/lock/ack/test").await.unwrap();
        repository.delete("/lock/ack/test").await.unwrap();
        assert_eq!(repository.get("/lock/ack/test").await.unwrap(), None);
    }
}
