// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for bootstrap and lock-gated reloads

use std::sync::Arc;
use std::time::Duration;

use sql_governance_dialect::DialectRegistry;
use sql_governance_dialect::builtin::mysql::MYSQL;
use sql_governance_ir::Schema;
use sql_governance_metadata::{
    DataSource, MetadataError, MetadataResult, RuleConfiguration, SchemaLoader,
};
use sql_governance_registry::{
    LockNode, LockRegistryCenter, MemoryRegistryRepository, RegistryCenterRepository,
    RegistryError,
};
use sql_governance_server::{
    ContextManager, DataSourceConfig, DataSourceFactory, DatabaseConfig, GovernanceConfig,
    ServerError, metadata_lock_name,
};
use sql_governance_test_utils::{
    MockDataSource, MockRegistryRepository, MockSchemaLoader, RegistryCall, RegistryOperation,
    TableFixtures, UrlFixtures,
};

const UNREACHABLE_URL: &str = "jdbc:mysql://unreachable:3306/ds_0";

/// Creates mock data sources; URLs pointing at `unreachable` refuse connections
struct MockDataSourceFactory;

impl DataSourceFactory for MockDataSourceFactory {
    fn create(&self, _name: &str, config: &DataSourceConfig) -> MetadataResult<Arc<dyn DataSource>> {
        let data_source = MockDataSource::new(config.url.clone());
        if config.url == UNREACHABLE_URL {
            return Ok(Arc::new(data_source.failing_connect(
                MetadataError::ConnectionFailed("connection refused".to_string()),
            )));
        }
        Ok(Arc::new(data_source))
    }
}

fn sharding_db(url: &str) -> DatabaseConfig {
    DatabaseConfig::new("sharding_db")
        .with_data_source("ds_0", DataSourceConfig::new(url))
        .with_rule(
            RuleConfiguration::new("readwrite_splitting")
                .with_prop("write_data_source", "ds_0")
                .with_prop("read_data_sources", "ds_0"),
        )
}

fn config() -> GovernanceConfig {
    GovernanceConfig::new("node-1")
        .with_database(sharding_db(UrlFixtures::mysql()))
        .with_database(DatabaseConfig::new("pending_db"))
}

fn manager(
    config: &GovernanceConfig,
    repository: Arc<dyn RegistryCenterRepository>,
    schema_loader: Arc<dyn SchemaLoader>,
) -> ContextManager {
    ContextManager::new(
        config,
        Arc::new(DialectRegistry::new()),
        repository,
        schema_loader,
        Arc::new(MockDataSourceFactory),
    )
}

fn orders_schema() -> Arc<MockSchemaLoader> {
    MockSchemaLoader::returning(Schema::from_tables([TableFixtures::orders()]))
}

#[tokio::test]
async fn test_bootstrap_full_and_skeleton_databases() {
    let config = config();
    let schema_loader = orders_schema();
    let manager = manager(
        &config,
        Arc::new(MockRegistryRepository::new()),
        schema_loader.clone(),
    );

    manager.bootstrap(&config).await.unwrap();

    let sharding_db = manager.database("sharding_db").unwrap();
    assert!(sharding_db.is_complete());
    assert_eq!(sharding_db.resource().database_type().name(), "MySQL");
    assert!(sharding_db.schema().unwrap().contains_table("t_order"));
    assert!(sharding_db.schema_by_name("information_schema").is_some());
    assert_eq!(sharding_db.schemas().len(), 5);

    let pending_db = manager.database("pending_db").unwrap();
    assert!(!pending_db.has_data_source());
    assert!(!pending_db.is_complete());
    assert!(pending_db.schema().is_none());
    assert_eq!(pending_db.resource().database_type().name(), "SQL92");
    assert!(pending_db.schemas().is_empty());

    // Only the database with data sources is discovered
    assert_eq!(schema_loader.calls(), 1);
}

#[tokio::test]
async fn test_bootstrap_stops_at_first_failure() {
    let config = GovernanceConfig::new("node-1")
        .with_database(DatabaseConfig::new("pending_db"))
        .with_database(sharding_db(UNREACHABLE_URL));
    let manager = manager(
        &config,
        Arc::new(MockRegistryRepository::new()),
        orders_schema(),
    );

    let result = manager.bootstrap(&config).await;

    assert!(matches!(
        result,
        Err(ServerError::Metadata(MetadataError::ConnectionFailed(_)))
    ));
    assert_eq!(manager.contexts().database_names(), vec!["pending_db"]);
}

#[tokio::test]
async fn test_reload_locks_publishes_releases_and_acknowledges() {
    let config = config();
    let repository = Arc::new(MockRegistryRepository::new());
    let manager = manager(&config, repository.clone(), orders_schema());
    manager.bootstrap(&config).await.unwrap();
    let before = manager.database("sharding_db").unwrap();

    manager
        .reload_database(&config.databases[0])
        .await
        .unwrap();

    let lock_path = LockNode::lock_node_path(&metadata_lock_name("sharding_db"));
    assert_eq!(
        repository.calls(),
        vec![
            RegistryCall::TryLock {
                key: lock_path.clone(),
                timeout: Duration::from_millis(3000),
            },
            RegistryCall::Delete("/lock/ack/node-1".to_string()),
            RegistryCall::ReleaseLock(lock_path),
            RegistryCall::Persist {
                key: "/lock/ack/node-1".to_string(),
                value: "sharding_db".to_string(),
            },
        ]
    );

    let after = manager.database("sharding_db").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.is_complete());
}

#[tokio::test]
async fn test_acknowledgement_is_visible_to_other_sessions() {
    let config = config();
    let node_1 = MemoryRegistryRepository::new("node-1");
    let observer = LockRegistryCenter::new(Arc::new(node_1.session("node-2")));
    let manager = manager(&config, Arc::new(node_1.clone()), orders_schema());

    manager
        .reload_database(&config.databases[0])
        .await
        .unwrap();

    assert_eq!(
        observer.lock_ack("node-1").await.unwrap(),
        Some("sharding_db".to_string())
    );
    assert_eq!(
        manager.acknowledged_reload().await.unwrap(),
        Some("sharding_db".to_string())
    );

    // The next reload clears it under the lock; a failed one writes no new ack
    let result = manager
        .reload_database(&sharding_db(UNREACHABLE_URL))
        .await;
    assert!(result.is_err());
    assert_eq!(observer.lock_ack("node-1").await.unwrap(), None);

    manager
        .reload_database(&config.databases[1])
        .await
        .unwrap();
    assert_eq!(
        observer.lock_ack("node-1").await.unwrap(),
        Some("pending_db".to_string())
    );
}

#[tokio::test]
async fn test_ack_clear_failure_releases_lock() {
    let config = config();
    let expired = RegistryError::SessionExpired("node-1".to_string());
    let repository = Arc::new(
        MockRegistryRepository::new().with_failure(RegistryOperation::Delete, expired.clone()),
    );
    let manager = manager(&config, repository.clone(), orders_schema());

    let result = manager.reload_database(&config.databases[0]).await;

    assert_eq!(result, Err(ServerError::Registry(expired)));
    assert!(manager.database("sharding_db").is_none());
    let lock_path = LockNode::lock_node_path("metadata_sharding_db");
    assert!(repository.calls().contains(&RegistryCall::ReleaseLock(lock_path)));
}

#[tokio::test]
async fn test_build_database_assembles_configured_rules() {
    let config = config();
    let manager = manager(
        &config,
        Arc::new(MockRegistryRepository::new()),
        orders_schema(),
    );

    let metadata = manager.build_database(&config.databases[0]).await.unwrap();

    assert_eq!(metadata.name(), "sharding_db");
    assert_eq!(metadata.rule_metadata().configurations().len(), 1);
    assert_eq!(metadata.rule_metadata().rules().len(), 1);
    assert!(metadata.resource().cached_database_metadata().is_some());
    assert!(metadata.schema().unwrap().contains_table("t_order"));
    assert!(manager.database("sharding_db").is_none());
}

#[tokio::test]
async fn test_unknown_rule_type_fails_build() {
    let config = config();
    let manager = manager(
        &config,
        Arc::new(MockRegistryRepository::new()),
        orders_schema(),
    );
    let database = sharding_db(UrlFixtures::mysql()).with_rule(RuleConfiguration::new("mask"));

    let result = manager.build_database(&database).await;

    assert_eq!(
        result.err(),
        Some(ServerError::Metadata(MetadataError::UnknownRuleType(
            "mask".to_string()
        )))
    );
}

#[tokio::test]
async fn test_substituted_dialect_registry() {
    let config = config();
    let schema_loader = orders_schema();
    let manager = ContextManager::new(
        &config,
        Arc::new(DialectRegistry::with_builders(vec![MYSQL], Vec::new())),
        Arc::new(MockRegistryRepository::new()),
        schema_loader,
        Arc::new(MockDataSourceFactory),
    );

    manager.bootstrap(&config).await.unwrap();

    // Without a MySQL system schema builder only the discovered schema is loaded
    let sharding_db = manager.database("sharding_db").unwrap();
    assert_eq!(sharding_db.resource().database_type().name(), "MySQL");
    assert_eq!(sharding_db.schemas().len(), 1);
    assert!(sharding_db.schema_by_name("information_schema").is_none());
}

#[tokio::test]
async fn test_reload_without_lock_times_out() {
    let config = config();
    let repository = Arc::new(MockRegistryRepository::new().with_lock_acquired(false));
    let manager = manager(&config, repository.clone(), orders_schema());
    manager.bootstrap(&config).await.unwrap();
    let before = manager.database("sharding_db").unwrap();

    let result = manager.reload_database(&config.databases[0]).await;

    assert_eq!(
        result,
        Err(ServerError::LockTimeout {
            lock_name: "metadata_sharding_db".to_string(),
            timeout_millis: 3000,
        })
    );
    assert_eq!(repository.calls().len(), 1);
    assert!(Arc::ptr_eq(
        &before,
        &manager.database("sharding_db").unwrap()
    ));
}

#[tokio::test]
async fn test_failed_reload_keeps_snapshot_and_releases_lock() {
    let config = config();
    let repository = Arc::new(MockRegistryRepository::new());
    let manager = manager(&config, repository.clone(), orders_schema());
    manager.bootstrap(&config).await.unwrap();
    let before = manager.database("sharding_db").unwrap();

    let result = manager
        .reload_database(&sharding_db(UNREACHABLE_URL))
        .await;

    assert!(matches!(result, Err(ServerError::Metadata(_))));
    let lock_path = LockNode::lock_node_path("metadata_sharding_db");
    assert_eq!(
        repository.calls(),
        vec![
            RegistryCall::TryLock {
                key: lock_path.clone(),
                timeout: Duration::from_millis(3000),
            },
            RegistryCall::Delete("/lock/ack/node-1".to_string()),
            RegistryCall::ReleaseLock(lock_path),
        ]
    );
    assert!(Arc::ptr_eq(
        &before,
        &manager.database("sharding_db").unwrap()
    ));
}

#[tokio::test]
async fn test_release_failure_is_reported_after_publish() {
    let config = config();
    let expired = RegistryError::SessionExpired("node-1".to_string());
    let repository = Arc::new(
        MockRegistryRepository::new().with_failure(RegistryOperation::ReleaseLock, expired.clone()),
    );
    let manager = manager(&config, repository.clone(), orders_schema());

    let result = manager.reload_database(&config.databases[0]).await;

    assert_eq!(result, Err(ServerError::Registry(expired)));
    assert!(manager.database("sharding_db").is_some());
    assert!(
        !repository
            .calls()
            .iter()
            .any(|call| matches!(call, RegistryCall::Persist { .. }))
    );
}

#[tokio::test]
async fn test_reload_contends_with_other_session() {
    let config = config();
    let node_1 = MemoryRegistryRepository::new("node-1");
    let node_2 = node_1.session("node-2");
    let mut short_timeout = config.clone();
    short_timeout.lock.timeout_millis = 50;
    let manager = manager(&short_timeout, Arc::new(node_1.clone()), orders_schema());

    let lock_path = LockNode::lock_node_path(&metadata_lock_name("sharding_db"));
    assert!(
        node_2
            .try_lock(&lock_path, Duration::from_millis(10))
            .await
            .unwrap()
    );

    let result = manager.reload_database(&config.databases[0]).await;
    assert!(matches!(result, Err(ServerError::LockTimeout { .. })));

    node_2.close();
    manager
        .reload_database(&config.databases[0])
        .await
        .unwrap();
    assert!(manager.database("sharding_db").unwrap().is_complete());
    assert_eq!(node_1.lock_owner(&lock_path), None);
}
