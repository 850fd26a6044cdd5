// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect system schemas
//!
//! System schemas (`information_schema`, `pg_catalog`, ...) are not
//! discovered from user data sources. Each dialect that has them provides a
//! [`DialectSystemSchemaBuilder`] that synthesizes their table definitions.

use std::collections::HashMap;

use sql_governance_ir::{Schema, TableMetadata, TableType};

use crate::database_type::DatabaseType;

/// Synthesizes the system schemas of one database type
pub trait DialectSystemSchemaBuilder: Send + Sync {
    /// Name of the database type this builder serves (registry key)
    fn database_type(&self) -> &str;

    /// Build all system schemas, keyed by schema name
    ///
    /// `base_schema_name` is the logical database being loaded. System schema
    /// names never depend on it; it is only used for diagnostics.
    fn build(&self, base_schema_name: &str) -> HashMap<String, Schema>;
}

/// Build one [`Schema`] per system schema name of `database_type`
///
/// `tables_of` returns the table definitions of a system schema; a schema
/// it knows nothing about still gets an (empty) entry so callers always see
/// the full set of system schema names.
pub(crate) fn build_system_schemas(
    database_type: &DatabaseType,
    base_schema_name: &str,
    tables_of: impl Fn(&str) -> Vec<TableMetadata>,
) -> HashMap<String, Schema> {
    let schemas: HashMap<String, Schema> = database_type
        .system_schemas()
        .iter()
        .map(|name| {
            let tables = tables_of(name)
                .into_iter()
                .map(|table| table.with_type(TableType::System));
            (name.to_string(), Schema::from_tables(tables))
        })
        .collect();

    tracing::debug!(
        "Built {} system schemas for {} (database: {})",
        schemas.len(),
        database_type,
        base_schema_name
    );

    schemas
}
