// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Governance - Data Model
//!
//! Plain data types describing what a logical database contains:
//! - Tables, columns and indexes discovered from live connections
//! - Schemas, keyed by table name
//! - Dialect quote characters
//!
//! Everything here is immutable once built and serializable, so a whole
//! database snapshot can be cloned, compared and persisted freely.

pub mod metadata;
pub mod quote;
pub mod schema;

// Re-export commonly used types
pub use metadata::{ColumnMetadata, DataType, IndexMetadata, TableMetadata, TableType};
pub use quote::QuoteCharacter;
pub use schema::Schema;
