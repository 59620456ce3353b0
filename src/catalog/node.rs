//! Catalog nodes

use rust_decimal::Decimal;
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Key identifying a service node within one catalog arena.
    pub struct ServiceKey;
}

/// A node in the service catalog forest.
///
/// Traversal classifies nodes by `children` alone: a childless node is an
/// orderable service that can be toggled and priced individually, a node with
/// children only groups others. The `leaf` flag is source metadata carried
/// for display and never consulted by the algorithms, so a mislabelled record
/// cannot put toggling and aggregation out of step.
#[derive(Debug, Clone)]
pub struct ServiceNode {
    /// Opaque identifier from the source catalog.
    pub id: String,

    /// Display name; the search filter matches against this.
    pub name: String,

    /// Optional display code.
    pub code: Option<String>,

    /// Leaf/group classification as declared by the source data.
    pub leaf: bool,

    /// Price suggestion used to pre-fill a new assignment.
    pub default_cost: Option<Decimal>,

    /// Ordered child keys; empty for orderable services.
    pub children: SmallVec<[ServiceKey; 4]>,
}

impl ServiceNode {
    /// Whether this node groups other nodes rather than being orderable itself.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
