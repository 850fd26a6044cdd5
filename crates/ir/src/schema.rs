// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema
//!
//! A schema maps table names to table definitions. Table names are stored
//! lower-cased so lookups behave the same regardless of how a dialect folds
//! identifier case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metadata::TableMetadata;

/// Tables of one logical namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    tables: BTreeMap<String, TableMetadata>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from a list of tables
    ///
    /// When two tables share a name (ignoring case) the first one is kept.
    pub fn from_tables(tables: impl IntoIterator<Item = TableMetadata>) -> Self {
        let mut schema = Self::new();
        for table in tables {
            schema
                .tables
                .entry(table.name.to_lowercase())
                .or_insert(table);
        }
        schema
    }

    /// Insert or replace a table definition
    pub fn put(&mut self, table: TableMetadata) -> Option<TableMetadata> {
        self.tables.insert(table.name.to_lowercase(), table)
    }

    /// Get a table by name (case-insensitive)
    pub fn get(&self, table_name: &str) -> Option<&TableMetadata> {
        self.tables.get(&table_name.to_lowercase())
    }

    /// Remove a table by name (case-insensitive)
    pub fn remove(&mut self, table_name: &str) -> Option<TableMetadata> {
        self.tables.remove(&table_name.to_lowercase())
    }

    pub fn contains_table(&self, table_name: &str) -> bool {
        self.tables.contains_key(&table_name.to_lowercase())
    }

    /// Lower-cased table names, sorted
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableMetadata> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
