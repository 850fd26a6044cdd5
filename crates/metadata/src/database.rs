// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Database metadata
//!
//! [`DatabaseMetadata`] is the complete picture of one logical database:
//! its resources, its rules and its schemas. It is assembled once and
//! replaced as a whole when the database changes.

use std::collections::HashMap;
use std::sync::Arc;

use sql_governance_ir::Schema;

use crate::datasource::DataSourceMap;
use crate::error::MetadataResult;
use crate::recognizer::DatabaseTypeRecognizer;
use crate::resource::Resource;
use crate::rule::{Rule, RuleBuilders, RuleConfiguration, RuleMetadata};

/// Data sources and rule configurations of one database
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfiguration {
    pub data_sources: DataSourceMap,
    pub rule_configurations: Vec<RuleConfiguration>,
}

impl DatabaseConfiguration {
    pub fn new(data_sources: DataSourceMap, rule_configurations: Vec<RuleConfiguration>) -> Self {
        Self {
            data_sources,
            rule_configurations,
        }
    }
}

/// Metadata of one logical database
#[derive(Debug, Clone)]
pub struct DatabaseMetadata {
    name: String,
    resource: Resource,
    rule_metadata: RuleMetadata,
    schemas: HashMap<String, Schema>,
}

impl DatabaseMetadata {
    pub fn new(
        name: impl Into<String>,
        resource: Resource,
        rule_metadata: RuleMetadata,
        schemas: HashMap<String, Schema>,
    ) -> Self {
        Self {
            name: name.into(),
            resource,
            rule_metadata,
            schemas,
        }
    }

    /// Assemble database metadata from configuration
    ///
    /// Recognizes the database type, captures driver metadata from the first
    /// data source, builds the configured rules and appends `rules`.
    ///
    /// # Errors
    ///
    /// Fails if the driver metadata cannot be read or a rule cannot be built.
    /// Missing rules or data sources are not errors, see [`Self::is_complete`].
    pub async fn create(
        name: impl Into<String>,
        schemas: HashMap<String, Schema>,
        config: DatabaseConfiguration,
        rules: Vec<Arc<dyn Rule>>,
        recognizer: &DatabaseTypeRecognizer,
        rule_builders: &RuleBuilders,
    ) -> MetadataResult<Self> {
        let name = name.into();
        let DatabaseConfiguration {
            data_sources,
            rule_configurations,
        } = config;

        let resource = Resource::create(data_sources, recognizer).await?;
        let rule_metadata = RuleMetadata::build(
            &name,
            rule_configurations,
            rules,
            &resource.data_source_names(),
            rule_builders,
        )?;

        Ok(Self::new(name, resource, rule_metadata, schemas))
    }

    /// Builder method: replace the schemas
    ///
    /// Used once discovery has run against the assembled resource and rules.
    pub fn with_schemas(mut self, schemas: HashMap<String, Schema>) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn rule_metadata(&self) -> &RuleMetadata {
        &self.rule_metadata
    }

    /// Whether the database has both rules and data sources
    pub fn is_complete(&self) -> bool {
        !self.rule_metadata.is_empty() && !self.resource.is_empty()
    }

    pub fn has_data_source(&self) -> bool {
        !self.resource.is_empty()
    }

    /// The schema named after the database itself
    pub fn schema(&self) -> Option<&Schema> {
        self.schemas.get(&self.name)
    }

    pub fn schema_by_name(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn schemas(&self) -> &HashMap<String, Schema> {
        &self.schemas
    }
}
