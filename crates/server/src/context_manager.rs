// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Context manager
//!
//! Builds database metadata from configuration and publishes it.
//!
//! Reloads are serialized across the cluster with a lock per database.
//! Under the lock the node clears its previous acknowledgement; after a
//! successful reload it acknowledges under its instance id, and the
//! acknowledgement stays visible to other nodes until its next reload.
//!
//! A failed build never replaces the published snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use sql_governance_dialect::DialectRegistry;
use sql_governance_metadata::{
    DatabaseConfiguration, DatabaseLoader, DatabaseMetadata, DatabaseTypeRecognizer,
    MetadataContexts, RuleBuilders, SchemaLoader,
};
use sql_governance_registry::{LockRegistryCenter, RegistryCenterRepository};
use tracing::{info, warn};

use crate::config::{DatabaseConfig, GovernanceConfig};
use crate::data_source::DataSourceFactory;
use crate::error::{ServerError, ServerResult};

/// Name of the lock guarding reloads of `database`
pub fn metadata_lock_name(database: &str) -> String {
    format!("metadata_{}", database)
}

pub struct ContextManager {
    instance_id: String,
    lock_timeout_millis: u64,
    locks: LockRegistryCenter,
    contexts: Arc<MetadataContexts>,
    recognizer: DatabaseTypeRecognizer,
    loader: DatabaseLoader,
    rule_builders: RuleBuilders,
    data_source_factory: Arc<dyn DataSourceFactory>,
}

impl ContextManager {
    pub fn new(
        config: &GovernanceConfig,
        registry: Arc<DialectRegistry>,
        repository: Arc<dyn RegistryCenterRepository>,
        schema_loader: Arc<dyn SchemaLoader>,
        data_source_factory: Arc<dyn DataSourceFactory>,
    ) -> Self {
        Self {
            instance_id: config.instance_id.clone(),
            lock_timeout_millis: config.lock.timeout_millis,
            locks: LockRegistryCenter::new(repository),
            contexts: Arc::new(MetadataContexts::new()),
            recognizer: DatabaseTypeRecognizer::new(registry.clone()),
            loader: DatabaseLoader::new(registry, schema_loader),
            rule_builders: RuleBuilders::new(),
            data_source_factory,
        }
    }

    /// Builder method: replace the rule builders
    pub fn with_rule_builders(mut self, rule_builders: RuleBuilders) -> Self {
        self.rule_builders = rule_builders;
        self
    }

    pub fn contexts(&self) -> &Arc<MetadataContexts> {
        &self.contexts
    }

    pub fn database(&self, name: &str) -> Option<Arc<DatabaseMetadata>> {
        self.contexts.get(name)
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build and publish every configured database
    ///
    /// Runs before the node serves traffic, so no locks are taken.
    ///
    /// # Errors
    ///
    /// Stops at the first database that fails to build; databases built
    /// before it stay published.
    pub async fn bootstrap(&self, config: &GovernanceConfig) -> ServerResult<()> {
        for database in &config.databases {
            let metadata = self.build_database(database).await?;
            if !metadata.is_complete() {
                warn!(
                    "Database {} is incomplete (data sources: {}, rules: {})",
                    database.name,
                    metadata.has_data_source(),
                    !metadata.rule_metadata().is_empty()
                );
            }
            self.contexts.publish(metadata);
        }

        info!(
            "Bootstrapped {} databases on instance {}",
            config.databases.len(),
            self.instance_id
        );
        Ok(())
    }

    /// Rebuild one database under its cluster lock and publish it
    ///
    /// The lock is released whether or not the build succeeds. This node's
    /// previous acknowledgement is cleared under the lock, and a new one
    /// naming the database is written once the lock is released.
    ///
    /// # Errors
    ///
    /// - `ServerError::LockTimeout` if the lock is not acquired in time
    /// - the build failure, in which case the previous snapshot stays published
    /// - registry failures, unchanged
    pub async fn reload_database(&self, database: &DatabaseConfig) -> ServerResult<()> {
        let lock_name = metadata_lock_name(&database.name);
        if !self
            .locks
            .try_lock(&lock_name, self.lock_timeout_millis)
            .await?
        {
            return Err(ServerError::LockTimeout {
                lock_name,
                timeout_millis: self.lock_timeout_millis,
            });
        }

        let published = self.clear_ack_and_publish(database).await;
        let released = self.locks.release_lock(&lock_name).await;

        if let Err(e) = &published {
            warn!(
                "Reload of database {} failed, keeping previous snapshot: {}",
                database.name, e
            );
        }
        published?;
        released?;

        self.locks
            .ack_lock(&self.instance_id, &database.name)
            .await?;

        info!("Reloaded database {}", database.name);
        Ok(())
    }

    /// The database this instance last acknowledged a reload of
    pub async fn acknowledged_reload(&self) -> ServerResult<Option<String>> {
        Ok(self.locks.lock_ack(&self.instance_id).await?)
    }

    async fn clear_ack_and_publish(&self, database: &DatabaseConfig) -> ServerResult<()> {
        self.locks.delete_lock_ack(&self.instance_id).await?;
        let metadata = self.build_database(database).await?;
        self.contexts.publish(metadata);
        Ok(())
    }

    /// Build the metadata of one database without publishing it
    ///
    /// Assembles resource and rules first, since discovery needs both, then
    /// loads the schemas. Databases without data sources get a skeleton load.
    pub async fn build_database(&self, database: &DatabaseConfig) -> ServerResult<DatabaseMetadata> {
        let data_sources = self.data_source_factory.create_all(database)?;
        let metadata = DatabaseMetadata::create(
            database.name.clone(),
            HashMap::new(),
            DatabaseConfiguration::new(data_sources, database.rules.clone()),
            Vec::new(),
            &self.recognizer,
            &self.rule_builders,
        )
        .await?;

        let resource = metadata.resource();
        let loaded = if resource.is_empty() {
            self.loader
                .load_skeleton(&database.name, resource.database_type())
        } else {
            self.loader
                .load(
                    &database.name,
                    resource.database_type(),
                    resource.data_sources(),
                    metadata.rule_metadata().rules(),
                    &database.props,
                )
                .await?
        };

        Ok(metadata.with_schemas(loaded.into_schemas()))
    }
}

impl std::fmt::Debug for ContextManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextManager")
            .field("instance_id", &self.instance_id)
            .field("lock_timeout_millis", &self.lock_timeout_millis)
            .field("databases", &self.contexts.database_names())
            .finish_non_exhaustive()
    }
}
