// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Governance - Registry Center Locks
//!
//! Cluster-wide mutual exclusion on top of a registry center (a
//! ZooKeeper/etcd-class key-value store with ephemeral locks).
//!
//! This crate does not speak any coordination protocol itself. It provides:
//!
//! - [`LockNode`]: the key layout of locks and lock acknowledgements
//! - [`RegistryCenterRepository`]: the client interface a back end implements
//! - [`LockRegistryCenter`]: lock operations in domain terms
//! - [`MemoryRegistryRepository`]: an in-process back end with session-scoped locks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sql_governance_registry::{LockRegistryCenter, MemoryRegistryRepository};
//!
//! let repository = Arc::new(MemoryRegistryRepository::new("node-1"));
//! let locks = LockRegistryCenter::new(repository);
//!
//! if locks.try_lock("metadata_sharding_db", 3000).await? {
//!     // mutate shared cluster configuration
//!     locks.release_lock("metadata_sharding_db").await?;
//! }
//! ```

pub mod error;
pub mod lock;
pub mod memory;
pub mod node;
pub mod repository;

// Re-exports
pub use error::{RegistryError, RegistryResult};
pub use lock::LockRegistryCenter;
pub use memory::MemoryRegistryRepository;
pub use node::LockNode;
pub use repository::RegistryCenterRepository;
