// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Database types
//!
//! A [`DatabaseType`] is compiled-in reference data describing one SQL
//! product: how to recognize it from a JDBC URL, how it quotes identifiers,
//! which schemas it treats as system catalogs and how it folds names.

use std::fmt;

use sql_governance_ir::QuoteCharacter;

/// How a dialect expects table name search patterns to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableNamePattern {
    /// Pattern is passed through as written
    Unchanged,
    /// Dialect stores unquoted names upper-cased (Oracle)
    UpperCase,
}

/// Where the active schema of a live connection comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveSchema {
    /// The schema reported by the connection itself
    ConnectionSchema,
    /// The upper-cased login user (Oracle maps users to schemas)
    UpperCaseUser,
}

/// Immutable description of a SQL dialect
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseType {
    name: &'static str,
    jdbc_url_prefixes: &'static [&'static str],
    quote_character: QuoteCharacter,
    system_schemas: &'static [&'static str],
    table_name_pattern: TableNamePattern,
    active_schema: ActiveSchema,
}

impl DatabaseType {
    /// Create a database type with pass-through name rules
    pub const fn new(
        name: &'static str,
        jdbc_url_prefixes: &'static [&'static str],
        quote_character: QuoteCharacter,
        system_schemas: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            jdbc_url_prefixes,
            quote_character,
            system_schemas,
            table_name_pattern: TableNamePattern::Unchanged,
            active_schema: ActiveSchema::ConnectionSchema,
        }
    }

    pub const fn with_table_name_pattern(mut self, pattern: TableNamePattern) -> Self {
        self.table_name_pattern = pattern;
        self
    }

    pub const fn with_active_schema(mut self, active_schema: ActiveSchema) -> Self {
        self.active_schema = active_schema;
        self
    }

    /// Display name, also the registry key
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn jdbc_url_prefixes(&self) -> &'static [&'static str] {
        self.jdbc_url_prefixes
    }

    pub fn quote_character(&self) -> QuoteCharacter {
        self.quote_character
    }

    pub fn system_schemas(&self) -> &'static [&'static str] {
        self.system_schemas
    }

    /// Check whether `schema` is one of this dialect's system schemas
    pub fn contains_system_schema(&self, schema: &str) -> bool {
        self.system_schemas
            .iter()
            .any(|s| s.eq_ignore_ascii_case(schema))
    }

    /// Format a table name search pattern for catalog queries
    pub fn format_table_name_pattern(&self, pattern: &str) -> String {
        match self.table_name_pattern {
            TableNamePattern::Unchanged => pattern.to_string(),
            TableNamePattern::UpperCase => pattern.to_uppercase(),
        }
    }

    /// Derive the active schema name from what a live connection reports
    pub fn resolve_schema(
        &self,
        connection_schema: Option<&str>,
        user_name: Option<&str>,
    ) -> Option<String> {
        match self.active_schema {
            ActiveSchema::ConnectionSchema => connection_schema.map(str::to_string),
            ActiveSchema::UpperCaseUser => user_name.map(str::to_uppercase),
        }
    }

    /// Check whether a JDBC URL belongs to this dialect
    pub fn matches_url(&self, url: &str) -> bool {
        let url = url.trim();
        self.jdbc_url_prefixes.iter().any(|prefix| {
            url.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TYPE: DatabaseType = DatabaseType::new(
        "Test",
        &["jdbc:test:"],
        QuoteCharacter::Quote,
        &["catalog"],
    );

    #[test]
    fn test_matches_url_prefix_ignoring_case() {
        assert!(TEST_TYPE.matches_url("jdbc:test://localhost/db"));
        assert!(TEST_TYPE.matches_url("JDBC:TEST://localhost/db"));
        assert!(!TEST_TYPE.matches_url("jdbc:te"));
        assert!(!TEST_TYPE.matches_url("jdbc:mysql://localhost/db"));
    }

    #[test]
    fn test_resolve_schema_rules() {
        assert_eq!(
            TEST_TYPE.resolve_schema(Some("ds"), Some("root")),
            Some("ds".to_string())
        );

        let upper = TEST_TYPE.with_active_schema(ActiveSchema::UpperCaseUser);
        assert_eq!(
            upper.resolve_schema(Some("ds"), Some("scott")),
            Some("SCOTT".to_string())
        );
        assert_eq!(upper.resolve_schema(Some("ds"), None), None);
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(TEST_TYPE.to_string(), "Test");
    }
}
