// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock data sources and connections
//!
//! Connections count themselves while open, so tests can check that every
//! connection is released on success and on error paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sql_governance_ir::TableMetadata;
use sql_governance_metadata::{
    Connection, DataSource, DriverMetadata, MetadataError, MetadataResult,
};

#[derive(Debug, Default)]
struct ConnectionCounters {
    open: AtomicUsize,
    opened: AtomicUsize,
}

/// In-memory data source for testing
#[derive(Debug, Clone)]
pub struct MockDataSource {
    url: String,
    user_name: Option<String>,
    schema: Option<String>,
    tables: Vec<TableMetadata>,
    connect_error: Option<MetadataError>,
    metadata_error: Option<MetadataError>,
    load_error: Option<MetadataError>,
    counters: Arc<ConnectionCounters>,
}

impl MockDataSource {
    /// Create a reachable data source with no tables
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_name: None,
            schema: None,
            tables: Vec::new(),
            connect_error: None,
            metadata_error: None,
            load_error: None,
            counters: Arc::new(ConnectionCounters::default()),
        }
    }

    /// Builder method: set the login user
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Builder method: set the schema connections report as current
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Builder method: add a table connections report
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.tables.push(table);
        self
    }

    /// Builder method: fail to open connections
    pub fn failing_connect(mut self, error: MetadataError) -> Self {
        self.connect_error = Some(error);
        self
    }

    /// Builder method: open connections, but fail to read driver metadata
    pub fn failing_metadata(mut self, error: MetadataError) -> Self {
        self.metadata_error = Some(error);
        self
    }

    /// Builder method: open connections, but fail to load tables
    pub fn failing_load(mut self, error: MetadataError) -> Self {
        self.load_error = Some(error);
        self
    }

    /// Connections currently open
    pub fn open_connections(&self) -> usize {
        self.counters.open.load(Ordering::SeqCst)
    }

    /// Connections opened so far
    pub fn opened_connections(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DataSource for MockDataSource {
    fn url(&self) -> &str {
        &self.url
    }

    fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    async fn connection(&self) -> MetadataResult<Box<dyn Connection>> {
        if let Some(error) = &self.connect_error {
            return Err(error.clone());
        }
        self.counters.open.fetch_add(1, Ordering::SeqCst);
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            data_source: self.clone(),
        }))
    }
}

/// Connection handed out by [`MockDataSource`]
#[derive(Debug)]
pub struct MockConnection {
    data_source: MockDataSource,
}

#[async_trait::async_trait]
impl Connection for MockConnection {
    async fn metadata(&mut self) -> MetadataResult<DriverMetadata> {
        let source = &self.data_source;
        if let Some(error) = &source.metadata_error {
            return Err(error.clone());
        }
        Ok(DriverMetadata {
            url: source.url.clone(),
            user_name: source.user_name.clone(),
            schema: source.schema.clone(),
            database_product_name: "Mock".to_string(),
            database_product_version: "1.0".to_string(),
            driver_name: "mock".to_string(),
            driver_version: None,
            identifier_quote_string: "\"".to_string(),
        })
    }

    async fn load_tables(&mut self) -> MetadataResult<Vec<TableMetadata>> {
        match &self.data_source.load_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.data_source.tables.clone()),
        }
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.data_source.counters.open.fetch_sub(1, Ordering::SeqCst);
    }
}
