// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lock node paths
//!
//! Key layout of the lock subtree in the registry center:
//!
//! ```text
//! /lock
//! ├── locks/<lock name>    lock nodes
//! └── ack/<ack id>         acknowledgements, outside the locks subtree
//! ```
//!
//! Paths are a pure function of their inputs so every node in the cluster
//! derives the same key for the same lock name.

/// Registry center key layout for locks
///
/// # Example
///
/// ```
/// use sql_governance_registry::LockNode;
///
/// assert_eq!(LockNode::lock_node_path("test"), "/lock/locks/test");
/// assert_eq!(LockNode::lock_ack_node_path("node-1"), "/lock/ack/node-1");
/// ```
pub struct LockNode;

impl LockNode {
    /// Root of everything lock related
    pub const LOCK_ROOT: &'static str = "/lock";

    const LOCKS_NODE: &'static str = "locks";

    const ACK_NODE: &'static str = "ack";

    /// Parent path of all lock nodes
    #[must_use]
    pub fn locks_root() -> String {
        format!("{}/{}", Self::LOCK_ROOT, Self::LOCKS_NODE)
    }

    /// Parent path of all acknowledgement nodes
    #[must_use]
    pub fn lock_ack_root() -> String {
        format!("{}/{}", Self::LOCK_ROOT, Self::ACK_NODE)
    }

    /// Returns the lock node path of a lock name
    #[must_use]
    pub fn lock_node_path(lock_name: &str) -> String {
        format!("{}/{}/{}", Self::LOCK_ROOT, Self::LOCKS_NODE, lock_name)
    }

    /// Returns the acknowledgement node path of an ack id
    #[must_use]
    pub fn lock_ack_node_path(ack_id: &str) -> String {
        format!("{}/{}/{}", Self::LOCK_ROOT, Self::ACK_NODE, ack_id)
    }

    /// Recover the lock name from a lock node path
    ///
    /// Returns `None` for paths outside the locks subtree.
    #[must_use]
    pub fn lock_name(lock_node_path: &str) -> Option<&str> {
        lock_node_path
            .strip_prefix(Self::LOCK_ROOT)?
            .strip_prefix('/')?
            .strip_prefix(Self::LOCKS_NODE)?
            .strip_prefix('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_node_path() {
        assert_eq!(LockNode::lock_node_path("test"), "/lock/locks/test");
        assert_eq!(LockNode::locks_root(), "/lock/locks");
    }

    #[test]
    fn test_lock_node_path_is_deterministic() {
        assert_eq!(
            LockNode::lock_node_path("metadata_sharding_db"),
            LockNode::lock_node_path("metadata_sharding_db")
        );
    }

    #[test]
    fn test_distinct_names_never_collide() {
        let names = ["a", "b", "a/b", "a_b", "", "ab", "A"];
        let paths: std::collections::HashSet<String> =
            names.iter().map(|n| LockNode::lock_node_path(n)).collect();
        assert_eq!(paths.len(), names.len());
    }

    #[test]
    fn test_ack_nodes_are_outside_locks_subtree() {
        let ack = LockNode::lock_ack_node_path("test");
        assert_eq!(ack, "/lock/ack/test");
        assert!(!ack.starts_with(&LockNode::locks_root()));
        assert_ne!(ack, LockNode::lock_node_path("test"));
        assert_eq!(LockNode::lock_ack_root(), "/lock/ack");
    }

    #[test]
    fn test_lock_name_round_trips() {
        for name in ["test", "a/b", ""] {
            assert_eq!(LockNode::lock_name(&LockNode::lock_node_path(name)), Some(name));
        }
        assert_eq!(LockNode::lock_name("/lock/ack/test"), None);
        assert_eq!(LockNode::lock_name("/lock/locksmith"), None);
    }
}
