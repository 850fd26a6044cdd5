// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Configuration properties passed to schema discovery

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// String properties of a database, with typed accessors for known keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Fail discovery when a table has different definitions across data sources
    pub const CHECK_TABLE_METADATA_ENABLED: &'static str = "check-table-metadata-enabled";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set a property
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Read a boolean property, falling back to `default` when unset or unparsable
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn check_table_metadata_enabled(&self) -> bool {
        self.get_bool(Self::CHECK_TABLE_METADATA_ENABLED, false)
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(props: BTreeMap<String, String>) -> Self {
        Self(props)
    }
}
