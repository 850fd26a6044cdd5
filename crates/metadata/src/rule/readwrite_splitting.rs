// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Read/write splitting: one write data source plus read replicas

use std::sync::Arc;

use super::{Rule, RuleBuilder, RuleConfiguration};
use crate::error::{MetadataError, MetadataResult};

pub const RULE_TYPE: &str = "readwrite_splitting";

const WRITE_DATA_SOURCE: &str = "write_data_source";
const READ_DATA_SOURCES: &str = "read_data_sources";

#[derive(Debug)]
pub struct ReadwriteSplittingRule {
    write_data_source: String,
    read_data_sources: Vec<String>,
}

impl ReadwriteSplittingRule {
    pub fn new(write_data_source: impl Into<String>, read_data_sources: Vec<String>) -> Self {
        Self {
            write_data_source: write_data_source.into(),
            read_data_sources,
        }
    }

    pub fn write_data_source(&self) -> &str {
        &self.write_data_source
    }

    pub fn read_data_sources(&self) -> &[String] {
        &self.read_data_sources
    }
}

impl Rule for ReadwriteSplittingRule {
    fn rule_type(&self) -> &str {
        RULE_TYPE
    }

    fn replica_data_source_names(&self) -> Vec<String> {
        self.read_data_sources
            .iter()
            .filter(|name| **name != self.write_data_source)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct ReadwriteSplittingRuleBuilder;

impl ReadwriteSplittingRuleBuilder {
    fn invalid(reason: String) -> MetadataError {
        MetadataError::InvalidRuleConfiguration {
            rule_type: RULE_TYPE.to_string(),
            reason,
        }
    }

    fn require_known(
        database_name: &str,
        name: &str,
        data_source_names: &[String],
    ) -> MetadataResult<()> {
        if data_source_names.iter().any(|known| known == name) {
            Ok(())
        } else {
            Err(Self::invalid(format!(
                "data source '{}' does not exist in database '{}'",
                name, database_name
            )))
        }
    }
}

impl RuleBuilder for ReadwriteSplittingRuleBuilder {
    fn rule_type(&self) -> &str {
        RULE_TYPE
    }

    fn build(
        &self,
        database_name: &str,
        config: &RuleConfiguration,
        data_source_names: &[String],
    ) -> MetadataResult<Arc<dyn Rule>> {
        let write_data_source = config
            .prop(WRITE_DATA_SOURCE)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Self::invalid(format!("'{}' is required", WRITE_DATA_SOURCE)))?;
        Self::require_known(database_name, write_data_source, data_source_names)?;

        let read_data_sources: Vec<String> = config
            .prop(READ_DATA_SOURCES)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        for name in &read_data_sources {
            Self::require_known(database_name, name, data_source_names)?;
        }

        Ok(Arc::new(ReadwriteSplittingRule::new(
            write_data_source,
            read_data_sources,
        )))
    }
}
