//! Canopy prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    assignments::{Assignment, AssignmentSet, parse_cost},
    catalog::{CatalogError, ServiceCatalog, ServiceKey, ServiceNode},
    filter::{visible_children, visible_ids, visible_roots},
    payload::{AssignmentEntry, SavePayload},
    selection::is_assigned,
    session::{BranchSession, SessionError},
    wire::{ServiceRecord, ServiceTreeNode, WireError, records_from_json, tree_from_json},
};
