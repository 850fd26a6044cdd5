// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use std::collections::HashMap;
use std::sync::Arc;

use crate::builtin;
use crate::database_type::DatabaseType;
use crate::system_schema::DialectSystemSchemaBuilder;

/// Registry of supported database types
///
/// This struct stores the dialect facts and system schema builders for every
/// supported database type. It is built once at startup and only read
/// afterwards; share it behind an `Arc`.
#[derive(Clone)]
pub struct DialectRegistry {
    /// Database types in URL recognition order
    database_types: Vec<DatabaseType>,
    /// System schema builders keyed by database type name
    builders: HashMap<String, Arc<dyn DialectSystemSchemaBuilder>>,
    /// Type reported when nothing more specific is known
    default_database_type: DatabaseType,
}

impl DialectRegistry {
    /// Create a registry with all builtin database types loaded
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use sql_governance_dialect::DialectRegistry;
    ///
    /// let registry = DialectRegistry::new();
    /// let mysql = registry.database_type("MySQL");
    /// ```
    pub fn new() -> Self {
        Self::with_builders(
            builtin::all_database_types(),
            builtin::all_system_schema_builders(),
        )
    }

    /// Create a registry from an explicit catalog
    ///
    /// Used to substitute dialects in tests. When two builders serve the same
    /// database type the last one wins.
    pub fn with_builders(
        database_types: Vec<DatabaseType>,
        builders: Vec<Arc<dyn DialectSystemSchemaBuilder>>,
    ) -> Self {
        let builders = builders
            .into_iter()
            .map(|builder| (builder.database_type().to_string(), builder))
            .collect();

        Self {
            database_types,
            builders,
            default_database_type: builtin::other::SQL92,
        }
    }

    /// Lookup a database type by name
    ///
    /// # Arguments
    ///
    /// * `name` - The database type name (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(&DatabaseType)` if found, `None` otherwise
    pub fn database_type(&self, name: &str) -> Option<&DatabaseType> {
        self.database_types
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Find the database type whose JDBC URL prefix matches `url`
    pub fn database_type_of_url(&self, url: &str) -> Option<&DatabaseType> {
        self.database_types.iter().find(|t| t.matches_url(url))
    }

    /// The "no specific dialect" marker type (`SQL92`)
    pub fn default_database_type(&self) -> &DatabaseType {
        &self.default_database_type
    }

    pub fn database_types(&self) -> &[DatabaseType] {
        &self.database_types
    }

    /// Lookup the system schema builder of a database type
    ///
    /// Absence is not an error: the dialect simply defines no system schemas.
    pub fn system_schema_builder(&self, name: &str) -> Option<&dyn DialectSystemSchemaBuilder> {
        self.builders.get(name).map(|builder| builder.as_ref())
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builders: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        builders.sort_unstable();
        f.debug_struct("DialectRegistry")
            .field("database_types", &self.database_types)
            .field("builders", &builders)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry() {
        let registry = DialectRegistry::new();

        assert_eq!(registry.database_types().len(), 8);
        assert!(registry.system_schema_builder("MySQL").is_some());
        assert!(registry.system_schema_builder("PostgreSQL").is_some());
    }

    #[test]
    fn test_database_type_case_insensitive() {
        let registry = DialectRegistry::new();

        let upper = registry.database_type("MYSQL");
        let lower = registry.database_type("mysql");

        assert!(upper.is_some());
        assert_eq!(upper, lower);
        assert!(registry.database_type("DB2").is_none());
    }

    #[test]
    fn test_database_type_of_url() {
        let registry = DialectRegistry::new();

        let mysqlx = registry.database_type_of_url("jdbc:mysqlx://127.0.0.1:33060/ds");
        assert_eq!(mysqlx.map(DatabaseType::name), Some("MySQL"));

        let pg = registry.database_type_of_url("jdbc:postgresql://127.0.0.1:5432/ds");
        assert_eq!(pg.map(DatabaseType::name), Some("PostgreSQL"));

        assert!(registry.database_type_of_url("jdbc:db2://127.0.0.1/ds").is_none());
    }

    #[test]
    fn test_missing_builder_is_none() {
        let registry = DialectRegistry::new();

        assert!(registry.system_schema_builder("Oracle").is_none());
        assert!(registry.system_schema_builder("SQL92").is_none());
        assert_eq!(registry.default_database_type().name(), "SQL92");
    }

    #[test]
    fn test_with_builders_substitutes_catalog() {
        let registry = DialectRegistry::with_builders(vec![builtin::mysql::MYSQL], Vec::new());

        assert_eq!(registry.database_types().len(), 1);
        assert!(registry.system_schema_builder("MySQL").is_none());
    }
}
