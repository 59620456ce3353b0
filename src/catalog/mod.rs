//! Service catalog
//!
//! An arena-backed forest of service types. Nodes live in a slotmap keyed by
//! [`ServiceKey`] with ordered child-key lists, and parents sit in a separate
//! secondary map, so ancestor walks cost one map hop per level and the
//! structure carries no cyclic references.

use rustc_hash::FxHashMap;
use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;

use crate::wire::ServiceRecord;

pub mod error;

pub(crate) mod builder;
pub(crate) mod node;

pub use error::CatalogError;
pub use node::{ServiceKey, ServiceNode};

/// The service-type forest for one branch-configuration session.
///
/// Built once when the session opens and immutable afterwards; all selection
/// state lives outside it, in the assignment set.
#[derive(Debug)]
pub struct ServiceCatalog {
    nodes: SlotMap<ServiceKey, ServiceNode>,
    ids: FxHashMap<String, ServiceKey>,
    parents: SecondaryMap<ServiceKey, ServiceKey>,
    roots: SmallVec<[ServiceKey; 4]>,
}

impl ServiceCatalog {
    /// Build a catalog from flat parent-pointer records.
    ///
    /// Every record lands in the forest exactly once: missing, unknown and
    /// self-referential parents promote a record to a root, and parent
    /// cycles are cut at their first member in input order. Siblings and
    /// roots sort by `display_order` where present and keep input order
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::DuplicateId`] if two records share an id.
    pub fn from_records(records: &[ServiceRecord]) -> Result<Self, CatalogError> {
        builder::from_records(records)
    }

    /// Look up a node by key.
    pub fn get(&self, key: ServiceKey) -> Option<&ServiceNode> {
        self.nodes.get(key)
    }

    /// Look up the arena key for a public service id.
    pub fn key_of(&self, id: &str) -> Option<ServiceKey> {
        self.ids.get(id).copied()
    }

    /// Key of a node's parent, if it has one.
    pub fn parent_of(&self, key: ServiceKey) -> Option<ServiceKey> {
        self.parents.get(key).copied()
    }

    /// Walk from a node's parent up to its root.
    pub fn ancestors(&self, key: ServiceKey) -> impl Iterator<Item = ServiceKey> + '_ {
        std::iter::successors(self.parent_of(key), |&ancestor| self.parent_of(ancestor))
    }

    /// Root keys in display order.
    pub fn roots(&self) -> &[ServiceKey] {
        &self.roots
    }

    /// Number of nodes in the catalog.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the catalog holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (ServiceKey, &ServiceNode)> {
        self.nodes.iter()
    }

    /// Collect the orderable (childless) services of a subtree, depth-first.
    ///
    /// A childless starting node collects as itself, so the result is always
    /// the set of nodes a toggle of `key` would touch.
    pub fn leaf_descendants(&self, key: ServiceKey) -> SmallVec<[ServiceKey; 8]> {
        let mut leaves = SmallVec::new();
        let mut stack: SmallVec<[ServiceKey; 8]> = SmallVec::new();
        stack.push(key);

        while let Some(current) = stack.pop() {
            let Some(current_node) = self.nodes.get(current) else {
                continue;
            };

            if current_node.has_children() {
                stack.extend(current_node.children.iter().rev().copied());
            } else {
                leaves.push(current);
            }
        }

        leaves
    }
}
