// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock schema loader returning a canned schema or error

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sql_governance_ir::Schema;
use sql_governance_metadata::{
    DataSourceMap, MetadataError, MetadataResult, Properties, Rule, SchemaLoader,
};

#[derive(Debug)]
pub struct MockSchemaLoader {
    result: MetadataResult<Schema>,
    calls: AtomicUsize,
}

impl MockSchemaLoader {
    /// Loader that always discovers `schema`
    pub fn returning(schema: Schema) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(schema),
            calls: AtomicUsize::new(0),
        })
    }

    /// Loader that always fails with `error`
    pub fn failing(error: MetadataError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of `load` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SchemaLoader for MockSchemaLoader {
    async fn load(
        &self,
        _data_sources: &DataSourceMap,
        _rules: &[Arc<dyn Rule>],
        _props: &Properties,
    ) -> MetadataResult<Schema> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
