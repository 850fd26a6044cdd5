// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock rules and rule builders

use std::sync::Arc;

use sql_governance_metadata::{MetadataError, MetadataResult, Rule, RuleBuilder, RuleConfiguration};

/// Rule with a configurable type and replica set
#[derive(Debug, Clone)]
pub struct MockRule {
    rule_type: String,
    replicas: Vec<String>,
}

impl MockRule {
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            replicas: Vec::new(),
        }
    }

    /// Builder method: report a data source as replica
    pub fn with_replica(mut self, name: impl Into<String>) -> Self {
        self.replicas.push(name.into());
        self
    }

    pub fn shared(self) -> Arc<dyn Rule> {
        Arc::new(self)
    }
}

impl Rule for MockRule {
    fn rule_type(&self) -> &str {
        &self.rule_type
    }

    fn replica_data_source_names(&self) -> Vec<String> {
        self.replicas.clone()
    }
}

/// Builds [`MockRule`]s, or fails when configured to
#[derive(Debug, Clone)]
pub struct MockRuleBuilder {
    rule_type: String,
    failure: Option<String>,
}

impl MockRuleBuilder {
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            failure: None,
        }
    }

    /// Builder method: reject every configuration with `reason`
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }
}

impl RuleBuilder for MockRuleBuilder {
    fn rule_type(&self) -> &str {
        &self.rule_type
    }

    fn build(
        &self,
        _database_name: &str,
        config: &RuleConfiguration,
        _data_source_names: &[String],
    ) -> MetadataResult<Arc<dyn Rule>> {
        if let Some(reason) = &self.failure {
            return Err(MetadataError::InvalidRuleConfiguration {
                rule_type: config.rule_type.clone(),
                reason: reason.clone(),
            });
        }
        Ok(MockRule::new(config.rule_type.clone()).shared())
    }
}
