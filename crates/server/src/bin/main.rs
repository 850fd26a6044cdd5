// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use sql_governance_dialect::DialectRegistry;
use sql_governance_metadata::DataSourceSchemaLoader;
use sql_governance_registry::MemoryRegistryRepository;
use sql_governance_server::{ContextManager, GovernanceConfig, MySqlDataSourceFactory};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_CONFIG_PATH: &str = "conf/governance.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = GovernanceConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    tracing::info!(
        "Starting SQL governance node {} with {} databases",
        config.instance_id,
        config.databases.len()
    );

    let repository = MemoryRegistryRepository::new(config.instance_id.clone());
    let manager = ContextManager::new(
        &config,
        Arc::new(DialectRegistry::new()),
        Arc::new(repository.clone()),
        Arc::new(DataSourceSchemaLoader::new()),
        Arc::new(MySqlDataSourceFactory),
    );
    manager.bootstrap(&config).await?;

    for name in manager.contexts().database_names() {
        if let Some(database) = manager.database(&name) {
            tracing::info!(
                "Database {}: type={}, complete={}, schemas={}",
                name,
                database.resource().database_type(),
                database.is_complete(),
                database.schemas().len()
            );
        }
    }

    wait_for_reloads(&manager, &config_path).await?;

    repository.close();
    tracing::info!("Stopped SQL governance node {}", manager.instance_id());
    Ok(())
}

/// Reload all databases on SIGHUP until interrupted
#[cfg(unix)]
async fn wait_for_reloads(manager: &ContextManager, config_path: &Path) -> anyhow::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup()).context("Failed to listen for SIGHUP")?;
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                return Ok(());
            }
            _ = hangup.recv() => {
                let config = match GovernanceConfig::from_file(config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring reload request: {}", e);
                        continue;
                    }
                };
                for database in &config.databases {
                    if let Err(e) = manager.reload_database(database).await {
                        tracing::warn!("Failed to reload database {}: {}", database.name, e);
                    }
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_reloads(_manager: &ContextManager, _config_path: &Path) -> anyhow::Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")
}
