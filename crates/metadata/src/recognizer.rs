// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Database type recognition
//!
//! Recognizes the dialect of a database from the JDBC URLs of its data
//! sources. Recognition never opens a connection and never fails.

use std::sync::Arc;

use sql_governance_dialect::{DatabaseType, DialectRegistry};
use tracing::{debug, warn};

use crate::datasource::DataSource;

/// Recognizes [`DatabaseType`]s using a dialect registry
#[derive(Debug, Clone)]
pub struct DatabaseTypeRecognizer {
    registry: Arc<DialectRegistry>,
}

impl DatabaseTypeRecognizer {
    pub fn new(registry: Arc<DialectRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<DialectRegistry> {
        &self.registry
    }

    /// Recognize the database type of a set of data sources
    ///
    /// The first data source whose URL matches a known dialect decides. An
    /// empty set, or one where nothing matches, yields the registry's default
    /// ("no specific dialect") type.
    pub fn database_type<'a>(
        &self,
        data_sources: impl IntoIterator<Item = &'a Arc<dyn DataSource>>,
    ) -> DatabaseType {
        let mut recognized: Option<&DatabaseType> = None;

        for data_source in data_sources {
            let Some(database_type) = self.registry.database_type_of_url(data_source.url()) else {
                continue;
            };

            match recognized {
                None => recognized = Some(database_type),
                Some(first) if first != database_type => warn!(
                    "Data source {} is {}, but the database was recognized as {}",
                    data_source.url(),
                    database_type,
                    first
                ),
                Some(_) => {}
            }
        }

        let database_type = recognized
            .unwrap_or_else(|| self.registry.default_database_type())
            .clone();
        debug!("Recognized database type: {}", database_type);
        database_type
    }
}
