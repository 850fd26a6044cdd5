// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Dialect Registry
//!
//! This crate provides the fixed catalog of supported database types and the
//! system schemas each of them synthesizes.
//!
//! ## Features
//!
//! - Static dialect facts: JDBC URL prefixes, quote characters, system schema names
//! - Per-dialect system schema builders (MySQL family, PostgreSQL family)
//! - An explicitly constructed, read-only [`DialectRegistry`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sql_governance_dialect::DialectRegistry;
//!
//! let registry = DialectRegistry::new();
//! let mysql = registry.database_type("MySQL").unwrap();
//! assert!(mysql.contains_system_schema("information_schema"));
//!
//! if let Some(builder) = registry.system_schema_builder("MySQL") {
//!     let schemas = builder.build("sharding_db");
//!     assert!(schemas.contains_key("sys"));
//! }
//! ```

pub mod builtin;
pub mod database_type;
pub mod registry;
pub mod system_schema;

// Re-exports from ir for convenience
pub use sql_governance_ir::{QuoteCharacter, Schema, TableMetadata};

pub use database_type::{ActiveSchema, DatabaseType, TableNamePattern};
pub use registry::DialectRegistry;
pub use system_schema::DialectSystemSchemaBuilder;
