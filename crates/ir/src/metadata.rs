// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! This module defines the types used to represent table metadata:
//! tables, their columns and their indexes.

use serde::{Deserialize, Serialize};

/// SQL data types (unified across dialects)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    // Numeric types
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    Decimal,
    Float,
    Double,

    // String types
    Varchar(Option<usize>),
    Char(Option<usize>),
    Text,

    // Binary types
    Binary,
    VarBinary(Option<usize>),
    Blob,

    // Date/Time types
    Date,
    Time,
    DateTime,
    Timestamp,

    // Boolean
    Boolean,

    // JSON
    Json,

    // Unknown/Other (with original type name)
    Other(String),
}

impl DataType {
    /// Parse a SQL type name as reported by a catalog query
    ///
    /// Accepts type strings such as `"varchar(255)"`, `"int"`, `"longtext"`
    /// or `"bigint unsigned"`. Unrecognized names are kept verbatim in
    /// [`DataType::Other`].
    pub fn from_sql_type(sql_type: &str) -> Self {
        let type_lower = sql_type.trim().to_lowercase();

        // Parse type with parameters (e.g., varchar(255), decimal(10,2))
        let type_name: String = type_lower
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();

        match type_name.as_str() {
            // Integer types
            "tinyint" | "int1" => DataType::TinyInt,
            "smallint" | "int2" => DataType::SmallInt,
            "int" | "integer" | "int4" | "mediumint" => DataType::Integer,
            "bigint" | "int8" | "oid" => DataType::BigInt,

            // Decimal types
            "decimal" | "numeric" => DataType::Decimal,
            "float" | "real" | "float4" => DataType::Float,
            "double" | "float8" => DataType::Double,

            // String types
            "varchar" | "character" if type_lower.starts_with("character varying") => {
                DataType::Varchar(Self::extract_length(&type_lower))
            }
            "varchar" | "name" => DataType::Varchar(Self::extract_length(&type_lower)),
            "char" | "character" | "bpchar" => DataType::Char(Self::extract_length(&type_lower)),
            "text" | "tinytext" | "mediumtext" | "longtext" => DataType::Text,

            // Binary types
            "binary" => DataType::Binary,
            "varbinary" => DataType::VarBinary(Self::extract_length(&type_lower)),
            "blob" | "tinyblob" | "mediumblob" | "longblob" | "bytea" => DataType::Blob,

            // Date/Time types
            "date" => DataType::Date,
            "time" => DataType::Time,
            "datetime" => DataType::DateTime,
            "timestamp" | "timestamptz" => DataType::Timestamp,

            // Boolean
            "bool" | "boolean" => DataType::Boolean,

            // JSON
            "json" | "jsonb" => DataType::Json,

            _ => DataType::Other(sql_type.trim().to_string()),
        }
    }

    /// Extract length from type string (e.g., "varchar(255)" -> Some(255))
    fn extract_length(type_str: &str) -> Option<usize> {
        type_str
            .find('(')
            .and_then(|pos| {
                let end = type_str[pos..].find(')')?;
                type_str[pos + 1..pos + end].trim().parse().ok()
            })
            .and_then(|len: usize| if len == 0 { None } else { Some(len) })
    }
}

/// Table type classification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TableType {
    #[default]
    Table,
    View,
    System,
    Other(String),
}

/// Metadata for a database column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether the column is nullable
    pub nullable: bool,
    /// Whether this is a primary key column
    pub is_primary_key: bool,
    /// Whether the value is generated by the database (auto increment, identity)
    pub generated: bool,
    /// Whether comparisons on this column are case sensitive
    pub case_sensitive: bool,
}

impl ColumnMetadata {
    /// Create a new column metadata with builder pattern
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            is_primary_key: false,
            generated: false,
            case_sensitive: false,
        }
    }

    /// Builder method: set nullable
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder method: mark as primary key
    pub fn with_primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Builder method: mark as generated
    pub fn with_generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Builder method: set case sensitivity
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// Metadata for a table index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub name: String,
    /// Indexed columns, in key order
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            unique: false,
        }
    }

    /// Builder method: append an indexed column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Builder method: mark as unique
    pub fn with_unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,
    /// Column definitions, in ordinal order
    pub columns: Vec<ColumnMetadata>,
    /// Index definitions
    pub indexes: Vec<IndexMetadata>,
    /// Table type (TABLE, VIEW, SYSTEM)
    pub table_type: TableType,
}

impl TableMetadata {
    /// Create new table metadata with builder pattern
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            table_type: TableType::Table,
        }
    }

    /// Builder method: add columns
    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method: add indexes
    pub fn with_indexes(mut self, indexes: Vec<IndexMetadata>) -> Self {
        self.indexes = indexes;
        self
    }

    /// Builder method: set table type
    pub fn with_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Get column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get index by name (case-insensitive)
    pub fn get_index(&self, name: &str) -> Option<&IndexMetadata> {
        self.indexes.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Get primary key columns
    pub fn primary_keys(&self) -> Vec<&ColumnMetadata> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_varchar_with_length() {
        assert_eq!(DataType::from_sql_type("varchar(255)"), DataType::Varchar(Some(255)));
        assert_eq!(
            DataType::from_sql_type("character varying(64)"),
            DataType::Varchar(Some(64))
        );
    }

    #[test]
    fn test_parse_integer_family() {
        assert_eq!(DataType::from_sql_type("INT"), DataType::Integer);
        assert_eq!(DataType::from_sql_type("bigint unsigned"), DataType::BigInt);
        assert_eq!(DataType::from_sql_type("int2"), DataType::SmallInt);
    }

    #[test]
    fn test_parse_unknown_type_is_kept() {
        assert_eq!(
            DataType::from_sql_type("geometry"),
            DataType::Other("geometry".to_string())
        );
    }

    #[test]
    fn test_extract_length_zero_is_none() {
        assert_eq!(DataType::extract_length("char(0)"), None);
        assert_eq!(DataType::extract_length("text"), None);
    }

    #[test]
    fn test_table_lookups_ignore_case() {
        let table = TableMetadata::new("t_order")
            .with_columns(vec![
                ColumnMetadata::new("order_id", DataType::BigInt).with_primary_key(),
                ColumnMetadata::new("user_id", DataType::Integer),
            ])
            .with_indexes(vec![IndexMetadata::new("idx_user").with_column("user_id")]);

        assert!(table.get_column("ORDER_ID").is_some());
        assert!(table.get_index("IDX_USER").is_some());
        assert_eq!(table.primary_keys().len(), 1);
    }
}
