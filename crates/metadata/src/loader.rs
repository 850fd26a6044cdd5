// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Database loading
//!
//! Produces the schemas of a database: the user schema discovered from its
//! data sources (full load) and the system schemas the dialect synthesizes.
//! A database without data sources gets only the system schemas (skeleton
//! load), so system-catalog queries still resolve.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use sql_governance_dialect::{DatabaseType, DialectRegistry};
use sql_governance_ir::{Schema, TableMetadata};
use tracing::{debug, info, warn};

use crate::datasource::DataSourceMap;
use crate::error::{MetadataError, MetadataResult};
use crate::props::Properties;
use crate::rule::Rule;

/// Discovers the user schema of a database from its data sources
#[async_trait]
pub trait SchemaLoader: Send + Sync {
    /// # Errors
    ///
    /// Any discovery failure; callers never receive a partial schema.
    async fn load(
        &self,
        data_sources: &DataSourceMap,
        rules: &[Arc<dyn Rule>],
        props: &Properties,
    ) -> MetadataResult<Schema>;
}

/// Schema loader that introspects every primary data source
///
/// Tables from all data sources are merged; the first definition of a table
/// (by data source name) wins. Replica data sources reported by the rules
/// are skipped unless nothing else is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSourceSchemaLoader;

impl DataSourceSchemaLoader {
    pub fn new() -> Self {
        Self
    }

    fn merge(
        schema: &mut Schema,
        origins: &mut HashMap<String, String>,
        data_source_name: &str,
        tables: Vec<TableMetadata>,
        check_table_metadata: bool,
    ) -> MetadataResult<()> {
        for table in tables {
            match schema.get(&table.name) {
                None => {
                    origins.insert(table.name.to_lowercase(), data_source_name.to_string());
                    schema.put(table);
                }
                Some(existing) if check_table_metadata && *existing != table => {
                    let first = origins
                        .get(&table.name.to_lowercase())
                        .map(String::as_str)
                        .unwrap_or_default();
                    return Err(MetadataError::DiscoveryFailed(format!(
                        "table '{}' differs between data sources '{}' and '{}'",
                        table.name, first, data_source_name
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaLoader for DataSourceSchemaLoader {
    async fn load(
        &self,
        data_sources: &DataSourceMap,
        rules: &[Arc<dyn Rule>],
        props: &Properties,
    ) -> MetadataResult<Schema> {
        let replicas: HashSet<String> = rules
            .iter()
            .flat_map(|rule| rule.replica_data_source_names())
            .collect();
        let primaries: Vec<_> = data_sources
            .iter()
            .filter(|(name, _)| !replicas.contains(*name))
            .collect();
        let targets = if primaries.is_empty() {
            data_sources.iter().collect()
        } else {
            primaries
        };

        let check_table_metadata = props.check_table_metadata_enabled();
        let mut schema = Schema::new();
        let mut origins = HashMap::new();

        for (name, data_source) in targets {
            let mut connection = data_source.connection().await?;
            let tables = connection.load_tables().await?;
            debug!("Discovered {} tables in data source {}", tables.len(), name);
            Self::merge(
                &mut schema,
                &mut origins,
                name,
                tables,
                check_table_metadata,
            )?;
        }

        Ok(schema)
    }
}

/// Schemas of a loaded database, keyed by schema name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDatabase {
    schemas: HashMap<String, Schema>,
}

impl LoadedDatabase {
    pub fn new(schemas: HashMap<String, Schema>) -> Self {
        Self { schemas }
    }

    pub fn schemas(&self) -> &HashMap<String, Schema> {
        &self.schemas
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn into_schemas(self) -> HashMap<String, Schema> {
        self.schemas
    }
}

/// Loads the schemas of databases
pub struct DatabaseLoader {
    registry: Arc<DialectRegistry>,
    schema_loader: Arc<dyn SchemaLoader>,
}

impl DatabaseLoader {
    pub fn new(registry: Arc<DialectRegistry>, schema_loader: Arc<dyn SchemaLoader>) -> Self {
        Self {
            registry,
            schema_loader,
        }
    }

    /// Full load: discovered user schema plus dialect system schemas
    ///
    /// The discovered schema is stored under `name`. System schemas never
    /// replace it, even if one shares its name.
    ///
    /// # Errors
    ///
    /// Propagates schema discovery failures.
    pub async fn load(
        &self,
        name: &str,
        database_type: &DatabaseType,
        data_sources: &DataSourceMap,
        rules: &[Arc<dyn Rule>],
        props: &Properties,
    ) -> MetadataResult<LoadedDatabase> {
        let schema = self.schema_loader.load(data_sources, rules, props).await?;

        let mut schemas = HashMap::new();
        schemas.insert(name.to_string(), schema);
        self.merge_system_schemas(name, database_type, &mut schemas);

        info!(
            "Loaded database {} ({}) with {} schemas",
            name,
            database_type,
            schemas.len()
        );
        Ok(LoadedDatabase::new(schemas))
    }

    /// Skeleton load: only the dialect's system schemas
    pub fn load_skeleton(&self, name: &str, database_type: &DatabaseType) -> LoadedDatabase {
        let mut schemas = HashMap::new();
        self.merge_system_schemas(name, database_type, &mut schemas);

        info!(
            "Loaded skeleton database {} ({}) with {} system schemas",
            name,
            database_type,
            schemas.len()
        );
        LoadedDatabase::new(schemas)
    }

    fn merge_system_schemas(
        &self,
        name: &str,
        database_type: &DatabaseType,
        schemas: &mut HashMap<String, Schema>,
    ) {
        let Some(builder) = self.registry.system_schema_builder(database_type.name()) else {
            debug!("{} defines no system schemas", database_type);
            return;
        };

        for (schema_name, schema) in builder.build(name) {
            match schemas.entry(schema_name) {
                Entry::Vacant(entry) => {
                    entry.insert(schema);
                }
                Entry::Occupied(entry) => warn!(
                    "Schema {} of database {} shadows the {} system schema of the same name",
                    entry.key(),
                    name,
                    database_type
                ),
            }
        }
    }
}

impl std::fmt::Debug for DatabaseLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseLoader")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
