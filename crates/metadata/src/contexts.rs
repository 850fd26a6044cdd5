// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata contexts
//!
//! The published set of [`DatabaseMetadata`] snapshots. Publishing swaps in a
//! new map; readers holding a previous snapshot keep it unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::database::DatabaseMetadata;

type DatabaseMap = HashMap<String, Arc<DatabaseMetadata>>;

/// Published database metadata, keyed by database name
#[derive(Debug, Default)]
pub struct MetadataContexts {
    databases: RwLock<Arc<DatabaseMap>>,
}

impl MetadataContexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of one database
    pub fn get(&self, name: &str) -> Option<Arc<DatabaseMetadata>> {
        self.databases.read().get(name).cloned()
    }

    /// Current snapshot of all databases
    pub fn snapshot(&self) -> Arc<DatabaseMap> {
        self.databases.read().clone()
    }

    /// Publish a database, replacing any previous version wholesale
    ///
    /// Returns the replaced snapshot, if any.
    pub fn publish(&self, metadata: DatabaseMetadata) -> Option<Arc<DatabaseMetadata>> {
        let name = metadata.name().to_string();
        let complete = metadata.is_complete();

        let mut databases = self.databases.write();
        let mut next = DatabaseMap::clone(&databases);
        let previous = next.insert(name.clone(), Arc::new(metadata));
        *databases = Arc::new(next);
        drop(databases);

        info!("Published database {} (complete: {})", name, complete);
        previous
    }

    pub fn remove(&self, name: &str) -> Option<Arc<DatabaseMetadata>> {
        let mut databases = self.databases.write();
        if !databases.contains_key(name) {
            return None;
        }
        let mut next = DatabaseMap::clone(&databases);
        let removed = next.remove(name);
        *databases = Arc::new(next);
        removed
    }

    pub fn database_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.read().keys().cloned().collect();
        names.sort();
        names
    }
}
