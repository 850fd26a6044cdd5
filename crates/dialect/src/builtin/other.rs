// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Database types without synthesized system schemas

use sql_governance_ir::QuoteCharacter;

use crate::database_type::{ActiveSchema, DatabaseType, TableNamePattern};

pub const ORACLE: DatabaseType = DatabaseType::new(
    "Oracle",
    &["jdbc:oracle:"],
    QuoteCharacter::Quote,
    &[],
)
.with_table_name_pattern(TableNamePattern::UpperCase)
.with_active_schema(ActiveSchema::UpperCaseUser);

pub const SQLSERVER: DatabaseType = DatabaseType::new(
    "SQLServer",
    &["jdbc:microsoft:sqlserver:", "jdbc:sqlserver:"],
    QuoteCharacter::Brackets,
    &[],
);

pub const H2: DatabaseType = DatabaseType::new("H2", &["jdbc:h2:"], QuoteCharacter::Quote, &[]);

/// Marker for "no specific dialect": matches no URL, defines nothing
pub const SQL92: DatabaseType = DatabaseType::new("SQL92", &[], QuoteCharacter::Quote, &[]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_folds_to_upper_case() {
        assert_eq!(ORACLE.format_table_name_pattern("t_order%"), "T_ORDER%");
        assert_eq!(
            ORACLE.resolve_schema(None, Some("scott")),
            Some("SCOTT".to_string())
        );
    }

    #[test]
    fn test_sqlserver_uses_brackets() {
        assert_eq!(SQLSERVER.quote_character().wrap("t_order"), "[t_order]");
        assert!(SQLSERVER.matches_url("jdbc:sqlserver://127.0.0.1:1433;DatabaseName=ds"));
    }

    #[test]
    fn test_sql92_matches_nothing() {
        assert!(!SQL92.matches_url("jdbc:mysql://127.0.0.1/ds"));
        assert!(!SQL92.matches_url(""));
        assert!(SQL92.system_schemas().is_empty());
    }
}
