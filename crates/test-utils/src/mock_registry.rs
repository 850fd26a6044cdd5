// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Recording registry center repository
//!
//! Records every call with its arguments so tests can assert the exact keys
//! and timeouts the lock coordinator passes down.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use parking_lot::Mutex;
use sql_governance_registry::{RegistryCenterRepository, RegistryError, RegistryResult};

/// Repository operations, used to target failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryOperation {
    Get,
    Persist,
    Delete,
    TryLock,
    ReleaseLock,
}

/// One recorded repository call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Get(String),
    Persist { key: String, value: String },
    Delete(String),
    TryLock { key: String, timeout: Duration },
    ReleaseLock(String),
}

/// In-memory repository that records calls
#[derive(Debug)]
pub struct MockRegistryRepository {
    calls: Mutex<Vec<RegistryCall>>,
    values: Mutex<BTreeMap<String, String>>,
    failures: HashMap<RegistryOperation, RegistryError>,
    lock_acquired: bool,
}

impl Default for MockRegistryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegistryRepository {
    /// Create a repository that grants every lock
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            values: Mutex::new(BTreeMap::new()),
            failures: HashMap::new(),
            lock_acquired: true,
        }
    }

    /// Builder method: set what `try_lock` reports
    pub fn with_lock_acquired(mut self, acquired: bool) -> Self {
        self.lock_acquired = acquired;
        self
    }

    /// Builder method: make one operation fail with `error`
    pub fn with_failure(mut self, operation: RegistryOperation, error: RegistryError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    /// Builder method: seed a stored value
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.lock().insert(key.into(), value.into());
        self
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().clone()
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn record(&self, operation: RegistryOperation, call: RegistryCall) -> RegistryResult<()> {
        self.calls.lock().push(call);
        match self.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl RegistryCenterRepository for MockRegistryRepository {
    async fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        self.record(RegistryOperation::Get, RegistryCall::Get(key.to_string()))?;
        Ok(self.values.lock().get(key).cloned())
    }

    async fn persist(&self, key: &str, value: &str) -> RegistryResult<()> {
        self.record(
            RegistryOperation::Persist,
            RegistryCall::Persist {
                key: key.to_string(),
                value: value.to_string(),
            },
        )?;
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> RegistryResult<()> {
        self.record(RegistryOperation::Delete, RegistryCall::Delete(key.to_string()))?;
        self.values.lock().remove(key);
        Ok(())
    }

    async fn try_lock(&self, key: &str, timeout: Duration) -> RegistryResult<bool> {
        self.record(
            RegistryOperation::TryLock,
            RegistryCall::TryLock {
                key: key.to_string(),
                timeout,
            },
        )?;
        Ok(self.lock_acquired)
    }

    async fn release_lock(&self, key: &str) -> RegistryResult<()> {
        self.record(
            RegistryOperation::ReleaseLock,
            RegistryCall::ReleaseLock(key.to_string()),
        )
    }
}
