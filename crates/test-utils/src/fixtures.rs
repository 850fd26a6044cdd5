// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures: sample tables and data source URLs

use std::sync::Arc;

use sql_governance_ir::{ColumnMetadata, DataType, IndexMetadata, TableMetadata};
use sql_governance_metadata::{DataSource, DataSourceMap};

/// Sample JDBC URLs
pub struct UrlFixtures;

impl UrlFixtures {
    pub const fn mysql() -> &'static str {
        "jdbc:mysql://127.0.0.1:3306/ds_0?serverTimezone=UTC"
    }

    pub const fn mysql_replica() -> &'static str {
        "jdbc:mysql://127.0.0.1:3307/ds_1"
    }

    pub const fn postgresql() -> &'static str {
        "jdbc:postgresql://127.0.0.1:5432/ds_0"
    }

    pub const fn oracle() -> &'static str {
        "jdbc:oracle:thin:@127.0.0.1:1521/ds_0"
    }

    pub const fn unknown() -> &'static str {
        "jdbc:unknowndb://127.0.0.1:9999/ds_0"
    }
}

/// Sample table definitions
pub struct TableFixtures;

impl TableFixtures {
    pub fn users() -> TableMetadata {
        TableMetadata::new("t_user").with_columns(vec![
            ColumnMetadata::new("user_id", DataType::BigInt).with_primary_key(),
            ColumnMetadata::new("email", DataType::Varchar(Some(255))),
            ColumnMetadata::new("nickname", DataType::Varchar(Some(100))).with_nullable(true),
        ])
    }

    pub fn orders() -> TableMetadata {
        TableMetadata::new("t_order")
            .with_columns(vec![
                ColumnMetadata::new("order_id", DataType::BigInt)
                    .with_primary_key()
                    .with_generated(),
                ColumnMetadata::new("user_id", DataType::BigInt),
                ColumnMetadata::new("status", DataType::Varchar(Some(50))).with_nullable(true),
            ])
            .with_indexes(vec![IndexMetadata::new("idx_user_id").with_column("user_id")])
    }

    /// `t_order` with an extra column, to provoke definition mismatches
    pub fn orders_with_remark() -> TableMetadata {
        let mut table = Self::orders();
        table
            .columns
            .push(ColumnMetadata::new("remark", DataType::Text).with_nullable(true));
        table
    }
}

/// Build a data source map from named data sources
pub fn data_source_map<D>(data_sources: impl IntoIterator<Item = (&'static str, D)>) -> DataSourceMap
where
    D: DataSource + 'static,
{
    data_sources
        .into_iter()
        .map(|(name, data_source)| (name.to_string(), Arc::new(data_source) as Arc<dyn DataSource>))
        .collect()
}
