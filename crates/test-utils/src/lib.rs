// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sql-governance
//!
//! This crate provides common testing components including:
//! - A recording registry center repository with failure injection
//! - Mock data sources and connections that track open connections
//! - Mock schema loaders, rules and rule builders
//! - Test fixtures and sample table definitions

pub mod fixtures;
pub mod mock_datasource;
pub mod mock_registry;
pub mod mock_rule;
pub mod mock_schema_loader;

// Re-exports for convenience
pub use fixtures::{TableFixtures, UrlFixtures, data_source_map};
pub use mock_datasource::{MockConnection, MockDataSource};
pub use mock_registry::{MockRegistryRepository, RegistryCall, RegistryOperation};
pub use mock_rule::{MockRule, MockRuleBuilder};
pub use mock_schema_loader::MockSchemaLoader;
