//! Read-only access to the node inventory.
//!
//! The authorizer only ever needs one thing from the inventory: the parent of
//! a given node. [`NodeInventory`] is that single lookup, so any store (a
//! database client, a cache, a test fixture) can be plugged in.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;

/// What the authorizer knows about a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    hostname: String,
    parent_hostname: Option<String>,
}

impl NodeRecord {
    /// Creates a record for a node without a parent.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            parent_hostname: None,
        }
    }

    /// Sets the hostname of the node this node is hosted on.
    pub fn with_parent(mut self, parent_hostname: impl Into<String>) -> Self {
        self.parent_hostname = Some(parent_hostname.into());
        self
    }

    /// Returns the node's hostname.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Returns the hostname of the parent node, if this node has one.
    pub fn parent_hostname(&self) -> Option<&str> {
        self.parent_hostname.as_deref()
    }
}

/// Lookup of nodes by hostname.
///
/// `Ok(None)` means the node does not exist. `Err` is reserved for the
/// inventory being unable to answer; the authorizer denies in both cases.
pub trait NodeInventory: Send + Sync {
    /// Returns the node with the given hostname, if any.
    fn lookup(&self, hostname: &str) -> Result<Option<NodeRecord>, Error>;
}

impl<T: NodeInventory + ?Sized> NodeInventory for &T {
    fn lookup(&self, hostname: &str) -> Result<Option<NodeRecord>, Error> {
        (**self).lookup(hostname)
    }
}

impl<T: NodeInventory + ?Sized> NodeInventory for Arc<T> {
    fn lookup(&self, hostname: &str) -> Result<Option<NodeRecord>, Error> {
        (**self).lookup(hostname)
    }
}

/// A node inventory held in memory.
///
/// # Examples
///
/// ```
/// use node_authz::{MemoryInventory, NodeInventory, NodeRecord};
///
/// let inventory = MemoryInventory::new()
///     .with_node(NodeRecord::new("host1.example.com").with_parent("parent1.example.com"));
///
/// let node = inventory.lookup("host1.example.com").unwrap().unwrap();
/// assert_eq!(node.parent_hostname(), Some("parent1.example.com"));
/// assert!(inventory.lookup("unknown.example.com").unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryInventory {
    nodes: HashMap<String, NodeRecord>,
}

impl MemoryInventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, returning the inventory for chaining.
    pub fn with_node(mut self, node: NodeRecord) -> Self {
        self.insert(node);
        self
    }

    /// Adds or replaces a node.
    pub fn insert(&mut self, node: NodeRecord) {
        self.nodes.insert(node.hostname.clone(), node);
    }

    /// Removes a node, returning it if it was present.
    pub fn remove(&mut self, hostname: &str) -> Option<NodeRecord> {
        self.nodes.remove(hostname)
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the inventory has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<NodeRecord> for MemoryInventory {
    fn from_iter<I: IntoIterator<Item = NodeRecord>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for node in iter {
            inventory.insert(node);
        }
        inventory
    }
}

impl NodeInventory for MemoryInventory {
    fn lookup(&self, hostname: &str) -> Result<Option<NodeRecord>, Error> {
        Ok(self.nodes.get(hostname).cloned())
    }
}
