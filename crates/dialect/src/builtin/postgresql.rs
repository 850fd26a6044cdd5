// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! PostgreSQL family database types and system schemas

use std::collections::HashMap;

use sql_governance_ir::{ColumnMetadata, DataType, QuoteCharacter, Schema, TableMetadata};

use crate::database_type::DatabaseType;
use crate::system_schema::{DialectSystemSchemaBuilder, build_system_schemas};

pub const POSTGRESQL: DatabaseType = DatabaseType::new(
    "PostgreSQL",
    &["jdbc:postgresql:"],
    QuoteCharacter::Quote,
    &["information_schema", "pg_catalog"],
);

pub const OPENGAUSS: DatabaseType = DatabaseType::new(
    "openGauss",
    &["jdbc:opengauss:"],
    QuoteCharacter::Quote,
    &[
        "information_schema",
        "pg_catalog",
        "blockchain",
        "cstore",
        "db4ai",
        "dbe_perf",
        "dbe_pldebugger",
        "gaussdb",
        "oracle",
        "pkg_service",
        "snapshot",
        "sqladvisor",
    ],
);

/// System schema builder shared by PostgreSQL and openGauss
#[derive(Debug, Clone)]
pub struct PostgreSqlSystemSchemaBuilder {
    database_type: DatabaseType,
}

impl PostgreSqlSystemSchemaBuilder {
    pub fn new(database_type: DatabaseType) -> Self {
        Self { database_type }
    }
}

impl DialectSystemSchemaBuilder for PostgreSqlSystemSchemaBuilder {
    fn database_type(&self) -> &str {
        self.database_type.name()
    }

    fn build(&self, base_schema_name: &str) -> HashMap<String, Schema> {
        build_system_schemas(&self.database_type, base_schema_name, system_tables)
    }
}

fn name_column(name: &str) -> ColumnMetadata {
    ColumnMetadata::new(name, DataType::Varchar(Some(64)))
}

/// Table definitions of a PostgreSQL system schema
///
/// openGauss-only schemas have no synthesized tables.
pub fn system_tables(schema: &str) -> Vec<TableMetadata> {
    match schema {
        "information_schema" => vec![
            TableMetadata::new("schemata").with_columns(vec![
                name_column("catalog_name"),
                name_column("schema_name"),
                name_column("schema_owner"),
            ]),
            TableMetadata::new("tables").with_columns(vec![
                name_column("table_catalog"),
                name_column("table_schema"),
                name_column("table_name"),
                ColumnMetadata::new("table_type", DataType::Varchar(None)),
                ColumnMetadata::new("is_insertable_into", DataType::Varchar(Some(3))),
            ]),
            TableMetadata::new("columns").with_columns(vec![
                name_column("table_catalog"),
                name_column("table_schema"),
                name_column("table_name"),
                name_column("column_name"),
                ColumnMetadata::new("ordinal_position", DataType::Integer),
                ColumnMetadata::new("column_default", DataType::Varchar(None)).with_nullable(true),
                ColumnMetadata::new("is_nullable", DataType::Varchar(Some(3))),
                ColumnMetadata::new("data_type", DataType::Varchar(None)),
            ]),
        ],
        "pg_catalog" => vec![
            TableMetadata::new("pg_namespace").with_columns(vec![
                ColumnMetadata::new("oid", DataType::BigInt).with_primary_key(),
                name_column("nspname"),
                ColumnMetadata::new("nspowner", DataType::BigInt),
            ]),
            TableMetadata::new("pg_class").with_columns(vec![
                ColumnMetadata::new("oid", DataType::BigInt).with_primary_key(),
                name_column("relname"),
                ColumnMetadata::new("relnamespace", DataType::BigInt),
                ColumnMetadata::new("relkind", DataType::Char(Some(1))),
            ]),
            TableMetadata::new("pg_database").with_columns(vec![
                ColumnMetadata::new("oid", DataType::BigInt).with_primary_key(),
                name_column("datname"),
                ColumnMetadata::new("encoding", DataType::Integer),
                ColumnMetadata::new("datallowconn", DataType::Boolean),
            ]),
            TableMetadata::new("pg_tables").with_columns(vec![
                name_column("schemaname"),
                name_column("tablename"),
                name_column("tableowner"),
                ColumnMetadata::new("hasindexes", DataType::Boolean),
            ]),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgresql_facts() {
        assert_eq!(POSTGRESQL.jdbc_url_prefixes(), &["jdbc:postgresql:"]);
        assert_eq!(POSTGRESQL.quote_character(), QuoteCharacter::Quote);
        assert!(POSTGRESQL.contains_system_schema("pg_catalog"));
        assert!(!POSTGRESQL.contains_system_schema("public"));
    }

    #[test]
    fn test_opengauss_builder_includes_empty_schemas() {
        let schemas = PostgreSqlSystemSchemaBuilder::new(OPENGAUSS).build("logic_db");

        assert_eq!(schemas.len(), OPENGAUSS.system_schemas().len());
        assert!(schemas["pg_catalog"].contains_table("pg_class"));
        assert!(schemas["db4ai"].is_empty());
    }
}
