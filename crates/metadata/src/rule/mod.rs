// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Rules
//!
//! Rules are the governance features applied to a database (read/write
//! splitting, sharding, encryption and so on). A database carries rules built
//! from its configuration plus any rule instances handed in by the caller.

pub mod readwrite_splitting;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MetadataError, MetadataResult};

pub use readwrite_splitting::{ReadwriteSplittingRule, ReadwriteSplittingRuleBuilder};

/// A rule instance applied to one database
pub trait Rule: Send + Sync + fmt::Debug {
    /// Rule type identifier, e.g. `readwrite_splitting`
    fn rule_type(&self) -> &str;

    /// Data sources that only replicate another data source
    ///
    /// Schema discovery skips them, the primary already has the same tables.
    fn replica_data_source_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Declarative configuration of one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfiguration {
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

impl RuleConfiguration {
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            props: BTreeMap::new(),
        }
    }

    /// Builder method: set a property
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn prop(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }
}

/// Turns a [`RuleConfiguration`] of one type into a [`Rule`]
pub trait RuleBuilder: Send + Sync {
    /// Rule type this builder handles
    fn rule_type(&self) -> &str;

    /// Build the rule for a database
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::InvalidRuleConfiguration` when the
    /// configuration is incomplete or refers to unknown data sources.
    fn build(
        &self,
        database_name: &str,
        config: &RuleConfiguration,
        data_source_names: &[String],
    ) -> MetadataResult<Arc<dyn Rule>>;
}

/// Rule builders keyed by rule type
#[derive(Clone)]
pub struct RuleBuilders {
    builders: HashMap<String, Arc<dyn RuleBuilder>>,
}

impl RuleBuilders {
    /// Create a set holding every built-in rule builder
    pub fn new() -> Self {
        let mut builders = Self::empty();
        builders.register(Arc::new(ReadwriteSplittingRuleBuilder));
        builders
    }

    /// Create a set without any builder
    pub fn empty() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Register a builder, replacing any previous one for the same type
    pub fn register(&mut self, builder: Arc<dyn RuleBuilder>) {
        self.builders
            .insert(builder.rule_type().to_string(), builder);
    }

    /// Builder method: register a builder
    pub fn with_builder(mut self, builder: Arc<dyn RuleBuilder>) -> Self {
        self.register(builder);
        self
    }

    pub fn get(&self, rule_type: &str) -> Option<&Arc<dyn RuleBuilder>> {
        self.builders.get(rule_type)
    }
}

impl Default for RuleBuilders {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleBuilders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.builders.keys().collect();
        types.sort();
        f.debug_struct("RuleBuilders").field("types", &types).finish()
    }
}

/// Rule configurations of a database together with the rule instances
#[derive(Debug, Clone, Default)]
pub struct RuleMetadata {
    configurations: Vec<RuleConfiguration>,
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleMetadata {
    pub fn new(configurations: Vec<RuleConfiguration>, rules: Vec<Arc<dyn Rule>>) -> Self {
        Self {
            configurations,
            rules,
        }
    }

    /// Build rules from configurations and append the supplied instances
    ///
    /// Configured rules come first, in configuration order, followed by
    /// `supplied` in the order given.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::UnknownRuleType` for a configuration without a
    /// registered builder, or whatever the builder reports.
    pub fn build(
        database_name: &str,
        configurations: Vec<RuleConfiguration>,
        supplied: Vec<Arc<dyn Rule>>,
        data_source_names: &[String],
        builders: &RuleBuilders,
    ) -> MetadataResult<Self> {
        let mut rules = Vec::with_capacity(configurations.len() + supplied.len());

        for config in &configurations {
            let builder = builders
                .get(&config.rule_type)
                .ok_or_else(|| MetadataError::UnknownRuleType(config.rule_type.clone()))?;
            rules.push(builder.build(database_name, config, data_source_names)?);
        }
        rules.extend(supplied);

        debug!(
            "Built {} rules for database {} ({} configured)",
            rules.len(),
            database_name,
            configurations.len()
        );

        Ok(Self {
            configurations,
            rules,
        })
    }

    pub fn configurations(&self) -> &[RuleConfiguration] {
        &self.configurations
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules of the given type, in order
    pub fn find_rules<'a>(&'a self, rule_type: &'a str) -> impl Iterator<Item = &'a Arc<dyn Rule>> {
        self.rules
            .iter()
            .filter(move |rule| rule.rule_type() == rule_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NamedRule(&'static str);

    impl Rule for NamedRule {
        fn rule_type(&self) -> &str {
            self.0
        }
    }

    fn data_sources() -> Vec<String> {
        vec!["ds_0".to_string(), "ds_1".to_string()]
    }

    #[test]
    fn test_build_unions_configured_and_supplied() {
        let configurations = vec![
            RuleConfiguration::new("readwrite_splitting")
                .with_prop("write_data_source", "ds_0")
                .with_prop("read_data_sources", "ds_1"),
        ];
        let supplied: Vec<Arc<dyn Rule>> = vec![Arc::new(NamedRule("sharding"))];

        let metadata = RuleMetadata::build(
            "sharding_db",
            configurations,
            supplied,
            &data_sources(),
            &RuleBuilders::new(),
        )
        .unwrap();

        let types: Vec<&str> = metadata.rules().iter().map(|r| r.rule_type()).collect();
        assert_eq!(types, vec!["readwrite_splitting", "sharding"]);
        assert_eq!(metadata.configurations().len(), 1);
        assert_eq!(metadata.find_rules("sharding").count(), 1);
    }

    #[test]
    fn test_build_unknown_rule_type() {
        let result = RuleMetadata::build(
            "sharding_db",
            vec![RuleConfiguration::new("mask")],
            Vec::new(),
            &data_sources(),
            &RuleBuilders::new(),
        );

        assert_eq!(
            result.unwrap_err(),
            MetadataError::UnknownRuleType("mask".to_string())
        );
    }

    #[test]
    fn test_build_empty() {
        let metadata = RuleMetadata::build(
            "sharding_db",
            Vec::new(),
            Vec::new(),
            &[],
            &RuleBuilders::empty(),
        )
        .unwrap();

        assert!(metadata.is_empty());
    }

    #[test]
    fn test_rule_configuration_yaml_shape() {
        let config: RuleConfiguration =
            serde_json::from_str(r#"{"type": "readwrite_splitting"}"#).unwrap();

        assert_eq!(config.rule_type, "readwrite_splitting");
        assert!(config.props.is_empty());
    }
}
