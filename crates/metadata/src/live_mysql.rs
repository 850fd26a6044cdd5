// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Live MySQL data sources
//!
//! [`DataSource`] and [`Connection`] implementations backed by a sqlx MySQL
//! pool. Schema information is read from `information_schema` for the
//! connection's current database.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sql_governance_metadata::live_mysql::MySqlDataSource;
//!
//! let data_source = MySqlDataSource::new(
//!     "jdbc:mysql://127.0.0.1:3306/ds_0?serverTimezone=UTC",
//!     Some("root"),
//!     Some("secret"),
//! )?;
//! let mut connection = data_source.connection().await?;
//! let tables = connection.load_tables().await?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, Pool};
use sql_governance_ir::{ColumnMetadata, DataType, IndexMetadata, TableMetadata, TableType};

use crate::datasource::{Connection, DataSource, DriverMetadata};
use crate::error::{MetadataError, MetadataResult};

/// Default connection pool size
const DEFAULT_POOL_SIZE: u32 = 10;

const JDBC_PREFIXES: [&str; 2] = ["jdbc:mysql://", "jdbc:mariadb://"];

/// A MySQL data source configured with a JDBC URL
pub struct MySqlDataSource {
    url: String,
    user_name: Option<String>,
    pool: Pool<MySql>,
}

impl MySqlDataSource {
    /// Create a data source; the pool connects lazily
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::ConfigurationError` if the URL is not a MySQL
    /// JDBC URL or cannot be parsed.
    pub fn new(
        url: impl Into<String>,
        user_name: Option<&str>,
        password: Option<&str>,
    ) -> MetadataResult<Self> {
        Self::with_pool_size(url, user_name, password, DEFAULT_POOL_SIZE)
    }

    /// Create a data source with a custom pool size
    pub fn with_pool_size(
        url: impl Into<String>,
        user_name: Option<&str>,
        password: Option<&str>,
        pool_size: u32,
    ) -> MetadataResult<Self> {
        let url = url.into();
        if pool_size == 0 {
            return Err(MetadataError::ConfigurationError(
                "pool_size must be greater than 0".to_string(),
            ));
        }

        let connection_string = Self::connection_string(&url)?;
        let mut options = MySqlConnectOptions::from_str(&connection_string).map_err(|e| {
            MetadataError::ConfigurationError(format!("Invalid MySQL URL '{}': {}", url, e))
        })?;
        if let Some(user_name) = user_name {
            options = options.username(user_name);
        }
        if let Some(password) = password {
            options = options.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(pool_size)
            .connect_lazy_with(options);

        Ok(Self {
            url,
            user_name: user_name.map(str::to_string),
            pool,
        })
    }

    /// Convert a JDBC URL into a sqlx connection string
    ///
    /// JDBC query parameters are driver specific and dropped.
    fn connection_string(url: &str) -> MetadataResult<String> {
        let url = url.trim();
        let rest = JDBC_PREFIXES
            .iter()
            .find_map(|prefix| {
                url.get(..prefix.len())
                    .filter(|head| head.eq_ignore_ascii_case(prefix))
                    .map(|_| &url[prefix.len()..])
            })
            .ok_or_else(|| {
                MetadataError::ConfigurationError(format!(
                    "url must start with 'jdbc:mysql://', got: {}",
                    url.chars().take(16).collect::<String>()
                ))
            })?;

        let rest = rest.split('?').next().unwrap_or_default();
        Ok(format!("mysql://{}", rest))
    }
}

impl fmt::Debug for MySqlDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlDataSource")
            .field("url", &self.url)
            .field("user_name", &self.user_name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DataSource for MySqlDataSource {
    fn url(&self) -> &str {
        &self.url
    }

    fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    async fn connection(&self) -> MetadataResult<Box<dyn Connection>> {
        let connection = self.pool.acquire().await.map_err(|e| {
            MetadataError::ConnectionFailed(format!("Failed to connect to {}: {}", self.url, e))
        })?;
        Ok(Box::new(MySqlConnection {
            url: self.url.clone(),
            connection,
        }))
    }
}

/// A pooled MySQL connection, returned to the pool on drop
pub struct MySqlConnection {
    url: String,
    connection: PoolConnection<MySql>,
}

impl MySqlConnection {
    fn query_failed(what: &str, e: sqlx::Error) -> MetadataError {
        MetadataError::QueryFailed(format!("Failed to {}: {}", what, e))
    }

    fn table_type(db_table_type: String) -> TableType {
        match db_table_type.as_str() {
            "BASE TABLE" => TableType::Table,
            "VIEW" => TableType::View,
            "SYSTEM VIEW" => TableType::System,
            _ => TableType::Other(db_table_type),
        }
    }

    fn is_case_sensitive(collation: Option<&str>) -> bool {
        collation.is_some_and(|collation| {
            let collation = collation.to_ascii_lowercase();
            collation.ends_with("_bin") || collation.ends_with("_cs")
        })
    }
}

#[async_trait]
impl Connection for MySqlConnection {
    async fn metadata(&mut self) -> MetadataResult<DriverMetadata> {
        let (version, schema, current_user) =
            sqlx::query_as::<_, (String, Option<String>, String)>(
                "SELECT VERSION(), DATABASE(), CURRENT_USER()",
            )
            .fetch_one(&mut *self.connection)
            .await
            .map_err(|e| Self::query_failed("read server metadata", e))?;

        let user_name = current_user
            .split('@')
            .next()
            .filter(|user| !user.is_empty())
            .map(str::to_string);

        Ok(DriverMetadata {
            url: self.url.clone(),
            user_name,
            schema,
            database_product_name: "MySQL".to_string(),
            database_product_version: version,
            driver_name: "sqlx-mysql".to_string(),
            driver_version: None,
            identifier_quote_string: "`".to_string(),
        })
    }

    async fn load_tables(&mut self) -> MetadataResult<Vec<TableMetadata>> {
        let table_rows = sqlx::query_as::<_, (String, String)>(
            r#"
                SELECT TABLE_NAME, TABLE_TYPE
                FROM information_schema.TABLES
                WHERE TABLE_SCHEMA = DATABASE()
                ORDER BY TABLE_NAME
            "#,
        )
        .fetch_all(&mut *self.connection)
        .await
        .map_err(|e| Self::query_failed("list tables", e))?;

        let column_rows =
            sqlx::query_as::<_, (String, String, String, String, String, String, Option<String>)>(
                r#"
                    SELECT TABLE_NAME, COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE,
                           COLUMN_KEY, EXTRA, COLLATION_NAME
                    FROM information_schema.COLUMNS
                    WHERE TABLE_SCHEMA = DATABASE()
                    ORDER BY TABLE_NAME, ORDINAL_POSITION
                "#,
            )
            .fetch_all(&mut *self.connection)
            .await
            .map_err(|e| Self::query_failed("list columns", e))?;

        let index_rows = sqlx::query_as::<_, (String, String, String, i64)>(
            r#"
                SELECT TABLE_NAME, INDEX_NAME, COLUMN_NAME, CAST(NON_UNIQUE AS SIGNED)
                FROM information_schema.STATISTICS
                WHERE TABLE_SCHEMA = DATABASE()
                ORDER BY TABLE_NAME, INDEX_NAME, SEQ_IN_INDEX
            "#,
        )
        .fetch_all(&mut *self.connection)
        .await
        .map_err(|e| Self::query_failed("list indexes", e))?;

        let mut columns: BTreeMap<String, Vec<ColumnMetadata>> = BTreeMap::new();
        for (table, name, column_type, is_nullable, column_key, extra, collation) in column_rows {
            let mut column = ColumnMetadata::new(name, DataType::from_sql_type(&column_type))
                .with_nullable(is_nullable == "YES")
                .with_case_sensitive(Self::is_case_sensitive(collation.as_deref()));
            if column_key == "PRI" {
                column = column.with_primary_key();
            }
            if extra.to_ascii_lowercase().contains("auto_increment") {
                column = column.with_generated();
            }
            columns.entry(table).or_default().push(column);
        }

        let mut indexes: BTreeMap<String, Vec<IndexMetadata>> = BTreeMap::new();
        for (table, index_name, column_name, non_unique) in index_rows {
            let table_indexes = indexes.entry(table).or_default();
            match table_indexes.last_mut() {
                Some(index) if index.name == index_name => index.columns.push(column_name),
                _ => {
                    let mut index = IndexMetadata::new(index_name).with_column(column_name);
                    if non_unique == 0 {
                        index = index.with_unique();
                    }
                    table_indexes.push(index);
                }
            }
        }

        let tables = table_rows
            .into_iter()
            .map(|(name, table_type)| {
                let table_columns = columns.remove(&name).unwrap_or_default();
                let table_indexes = indexes.remove(&name).unwrap_or_default();
                TableMetadata::new(name)
                    .with_type(Self::table_type(table_type))
                    .with_columns(table_columns)
                    .with_indexes(table_indexes)
            })
            .collect();

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_string_strips_jdbc_parameters() {
        let converted = MySqlDataSource::connection_string(
            "jdbc:mysql://127.0.0.1:3306/ds_0?serverTimezone=UTC&useSSL=false",
        )
        .unwrap();

        assert_eq!(converted, "mysql://127.0.0.1:3306/ds_0");
    }

    #[test]
    fn test_connection_string_accepts_mariadb() {
        let converted =
            MySqlDataSource::connection_string("jdbc:mariadb://db.internal:3307/orders").unwrap();

        assert_eq!(converted, "mysql://db.internal:3307/orders");
    }

    #[test]
    fn test_connection_string_rejects_other_dialects() {
        let result = MySqlDataSource::connection_string("jdbc:postgresql://127.0.0.1:5432/ds_0");

        assert!(matches!(result, Err(MetadataError::ConfigurationError(_))));
    }

    #[test]
    fn test_table_type() {
        assert_eq!(
            MySqlConnection::table_type("BASE TABLE".to_string()),
            TableType::Table
        );
        assert_eq!(
            MySqlConnection::table_type("VIEW".to_string()),
            TableType::View
        );
        assert_eq!(
            MySqlConnection::table_type("SEQUENCE".to_string()),
            TableType::Other("SEQUENCE".to_string())
        );
    }

    #[test]
    fn test_case_sensitive_collation() {
        assert!(MySqlConnection::is_case_sensitive(Some("utf8mb4_bin")));
        assert!(MySqlConnection::is_case_sensitive(Some("utf8mb4_0900_as_cs")));
        assert!(!MySqlConnection::is_case_sensitive(Some("utf8mb4_general_ci")));
        assert!(!MySqlConnection::is_case_sensitive(None));
    }

    #[tokio::test]
    async fn test_new_connects_lazily() {
        let data_source =
            MySqlDataSource::new("jdbc:mysql://127.0.0.1:1/ds_0", Some("root"), None).unwrap();

        assert_eq!(data_source.url(), "jdbc:mysql://127.0.0.1:1/ds_0");
        assert_eq!(data_source.user_name(), Some("root"));
    }
}
