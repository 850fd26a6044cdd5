// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Tests for loading configuration files

use std::path::PathBuf;

use sql_governance_server::{ConfigError, GovernanceConfig};

fn conf_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("conf").join(file)
}

#[test]
fn test_shipped_configuration_is_valid() {
    let config = GovernanceConfig::from_file(conf_path("governance.yaml")).unwrap();

    assert_eq!(config.instance_id, "node-1");
    assert_eq!(config.lock.timeout_millis, 3000);
    assert_eq!(config.databases.len(), 2);
    assert_eq!(config.databases[0].data_sources.len(), 2);
    assert!(config.database("pending_db").unwrap().data_sources.is_empty());
}

#[test]
fn test_missing_file() {
    let result = GovernanceConfig::from_file(conf_path("missing.yaml"));

    assert!(matches!(result, Err(ConfigError::Io { .. })));
}
