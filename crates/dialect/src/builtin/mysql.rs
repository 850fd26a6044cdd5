// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! MySQL family database types and system schemas

use std::collections::HashMap;

use sql_governance_ir::{ColumnMetadata, DataType, QuoteCharacter, Schema, TableMetadata};

use crate::database_type::DatabaseType;
use crate::system_schema::{DialectSystemSchemaBuilder, build_system_schemas};

const MYSQL_SYSTEM_SCHEMAS: &[&str] = &["information_schema", "performance_schema", "mysql", "sys"];

pub const MYSQL: DatabaseType = DatabaseType::new(
    "MySQL",
    &["jdbc:mysql:", "jdbc:mysqlx:"],
    QuoteCharacter::BackQuote,
    MYSQL_SYSTEM_SCHEMAS,
);

pub const MARIADB: DatabaseType = DatabaseType::new(
    "MariaDB",
    &["jdbc:mariadb:"],
    QuoteCharacter::BackQuote,
    MYSQL_SYSTEM_SCHEMAS,
);

/// System schema builder shared by MySQL and MariaDB
#[derive(Debug, Clone)]
pub struct MySqlSystemSchemaBuilder {
    database_type: DatabaseType,
}

impl MySqlSystemSchemaBuilder {
    pub fn new(database_type: DatabaseType) -> Self {
        Self { database_type }
    }
}

impl DialectSystemSchemaBuilder for MySqlSystemSchemaBuilder {
    fn database_type(&self) -> &str {
        self.database_type.name()
    }

    fn build(&self, base_schema_name: &str) -> HashMap<String, Schema> {
        build_system_schemas(&self.database_type, base_schema_name, system_tables)
    }
}

fn varchar(name: &str, len: usize) -> ColumnMetadata {
    ColumnMetadata::new(name, DataType::Varchar(Some(len)))
}

/// Table definitions of a MySQL system schema
pub fn system_tables(schema: &str) -> Vec<TableMetadata> {
    match schema {
        "information_schema" => vec![
            TableMetadata::new("SCHEMATA").with_columns(vec![
                varchar("CATALOG_NAME", 64),
                varchar("SCHEMA_NAME", 64),
                varchar("DEFAULT_CHARACTER_SET_NAME", 64),
                varchar("DEFAULT_COLLATION_NAME", 64),
                varchar("SQL_PATH", 512).with_nullable(true),
            ]),
            TableMetadata::new("TABLES").with_columns(vec![
                varchar("TABLE_CATALOG", 64),
                varchar("TABLE_SCHEMA", 64),
                varchar("TABLE_NAME", 64),
                varchar("TABLE_TYPE", 64),
                varchar("ENGINE", 64).with_nullable(true),
                ColumnMetadata::new("TABLE_ROWS", DataType::BigInt).with_nullable(true),
                ColumnMetadata::new("CREATE_TIME", DataType::DateTime),
                varchar("TABLE_COMMENT", 2048).with_nullable(true),
            ]),
            TableMetadata::new("COLUMNS").with_columns(vec![
                varchar("TABLE_CATALOG", 64),
                varchar("TABLE_SCHEMA", 64),
                varchar("TABLE_NAME", 64),
                varchar("COLUMN_NAME", 64),
                ColumnMetadata::new("ORDINAL_POSITION", DataType::Integer),
                ColumnMetadata::new("COLUMN_DEFAULT", DataType::Text).with_nullable(true),
                varchar("IS_NULLABLE", 3),
                ColumnMetadata::new("DATA_TYPE", DataType::Text),
                ColumnMetadata::new("COLUMN_TYPE", DataType::Text),
                varchar("COLUMN_KEY", 3),
                varchar("EXTRA", 256).with_nullable(true),
            ]),
            TableMetadata::new("STATISTICS").with_columns(vec![
                varchar("TABLE_CATALOG", 64),
                varchar("TABLE_SCHEMA", 64),
                varchar("TABLE_NAME", 64),
                ColumnMetadata::new("NON_UNIQUE", DataType::Integer),
                varchar("INDEX_NAME", 64),
                ColumnMetadata::new("SEQ_IN_INDEX", DataType::Integer),
                varchar("COLUMN_NAME", 64),
            ]),
            TableMetadata::new("VIEWS").with_columns(vec![
                varchar("TABLE_CATALOG", 64),
                varchar("TABLE_SCHEMA", 64),
                varchar("TABLE_NAME", 64),
                ColumnMetadata::new("VIEW_DEFINITION", DataType::Text),
                varchar("IS_UPDATABLE", 3),
            ]),
            TableMetadata::new("ENGINES").with_columns(vec![
                varchar("ENGINE", 64),
                varchar("SUPPORT", 8),
                varchar("COMMENT", 80),
                varchar("TRANSACTIONS", 3).with_nullable(true),
            ]),
        ],
        "performance_schema" => vec![
            TableMetadata::new("threads").with_columns(vec![
                ColumnMetadata::new("THREAD_ID", DataType::BigInt).with_primary_key(),
                varchar("NAME", 128),
                varchar("TYPE", 10),
                ColumnMetadata::new("PROCESSLIST_ID", DataType::BigInt).with_nullable(true),
                varchar("PROCESSLIST_USER", 32).with_nullable(true),
                varchar("PROCESSLIST_DB", 64).with_nullable(true),
            ]),
            TableMetadata::new("global_status").with_columns(vec![
                varchar("VARIABLE_NAME", 64).with_primary_key(),
                varchar("VARIABLE_VALUE", 1024).with_nullable(true),
            ]),
        ],
        "mysql" => vec![
            TableMetadata::new("user").with_columns(vec![
                ColumnMetadata::new("Host", DataType::Char(Some(255))).with_primary_key(),
                ColumnMetadata::new("User", DataType::Char(Some(32))).with_primary_key(),
                varchar("plugin", 64),
                ColumnMetadata::new("authentication_string", DataType::Text)
                    .with_nullable(true),
            ]),
            TableMetadata::new("db").with_columns(vec![
                ColumnMetadata::new("Host", DataType::Char(Some(255))).with_primary_key(),
                ColumnMetadata::new("Db", DataType::Char(Some(64))).with_primary_key(),
                ColumnMetadata::new("User", DataType::Char(Some(32))).with_primary_key(),
                ColumnMetadata::new("Select_priv", DataType::Char(Some(1))),
            ]),
        ],
        "sys" => vec![
            TableMetadata::new("sys_config").with_columns(vec![
                varchar("variable", 128).with_primary_key(),
                varchar("value", 128).with_nullable(true),
                ColumnMetadata::new("set_time", DataType::Timestamp),
                varchar("set_by", 128).with_nullable(true),
            ]),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_facts() {
        assert_eq!(MYSQL.name(), "MySQL");
        assert_eq!(MYSQL.jdbc_url_prefixes(), &["jdbc:mysql:", "jdbc:mysqlx:"]);
        assert_eq!(MYSQL.format_table_name_pattern("tbl"), "tbl");
        assert_eq!(MYSQL.quote_character().start_delimiter(), "`");
        assert_eq!(MYSQL.quote_character().end_delimiter(), "`");
    }

    #[test]
    fn test_mysql_system_schemas() {
        assert!(MYSQL.contains_system_schema("information_schema"));
        assert!(MYSQL.contains_system_schema("performance_schema"));
        assert!(MYSQL.contains_system_schema("mysql"));
        assert!(MYSQL.contains_system_schema("sys"));
        assert!(!MYSQL.contains_system_schema("sharding_db"));
    }

    #[test]
    fn test_builder_covers_every_system_schema() {
        let schemas = MySqlSystemSchemaBuilder::new(MYSQL).build("sharding_db");

        assert_eq!(schemas.len(), 4);
        assert!(!schemas.contains_key("sharding_db"));
        assert!(schemas["information_schema"].contains_table("tables"));
        assert!(schemas["mysql"].contains_table("user"));
    }

    #[test]
    fn test_mariadb_shares_mysql_schemas() {
        let schemas = MySqlSystemSchemaBuilder::new(MARIADB).build("logic_db");
        assert_eq!(MARIADB.jdbc_url_prefixes(), &["jdbc:mariadb:"]);
        assert!(schemas.contains_key("performance_schema"));
    }
}
