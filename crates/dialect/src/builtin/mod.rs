// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builtin database types and system schema definitions
//!
//! This module contains the dialect facts for every supported database type.

use std::sync::Arc;

use crate::database_type::DatabaseType;
use crate::system_schema::DialectSystemSchemaBuilder;

pub mod mysql;
pub mod other;
pub mod postgresql;

/// All builtin database types, in URL recognition order
pub fn all_database_types() -> Vec<DatabaseType> {
    vec![
        mysql::MYSQL,
        mysql::MARIADB,
        postgresql::POSTGRESQL,
        postgresql::OPENGAUSS,
        other::ORACLE,
        other::SQLSERVER,
        other::H2,
        other::SQL92,
    ]
}

/// All builtin system schema builders
pub fn all_system_schema_builders() -> Vec<Arc<dyn DialectSystemSchemaBuilder>> {
    vec![
        Arc::new(mysql::MySqlSystemSchemaBuilder::new(mysql::MYSQL)),
        Arc::new(mysql::MySqlSystemSchemaBuilder::new(mysql::MARIADB)),
        Arc::new(postgresql::PostgreSqlSystemSchemaBuilder::new(
            postgresql::POSTGRESQL,
        )),
        Arc::new(postgresql::PostgreSqlSystemSchemaBuilder::new(
            postgresql::OPENGAUSS,
        )),
    ]
}
