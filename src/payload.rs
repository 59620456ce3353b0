//! Save payload
//!
//! The persistence endpoint replaces a branch's entire assignment set with
//! the submitted list; nothing is merged. The payload therefore carries the
//! complete desired end-state, one entry per assigned service, and an empty
//! list is the legitimate way to clear a branch.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{assignments::AssignmentSet, catalog::ServiceCatalog};

/// One priced service in a save payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentEntry {
    /// Identifier of the orderable service.
    pub service_type_id: String,

    /// Agreed price; never negative.
    pub cost: Decimal,
}

/// Full-replacement payload for a branch's assignment set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavePayload {
    /// The complete desired end-state for the branch.
    pub assignments: Vec<AssignmentEntry>,
}

impl SavePayload {
    /// Build the payload from the current assignment set.
    ///
    /// Emits exactly one entry per assigned service. Entries sort by service
    /// id so equal states always serialize identically; the endpoint itself
    /// is order-independent.
    pub fn build(catalog: &ServiceCatalog, set: &AssignmentSet) -> Self {
        let mut assignments: Vec<AssignmentEntry> = set
            .iter()
            .filter_map(|(key, assignment)| {
                catalog.get(key).map(|node| AssignmentEntry {
                    service_type_id: node.id.clone(),
                    cost: assignment.cost,
                })
            })
            .collect();

        assignments.sort_by(|a, b| a.service_type_id.cmp(&b.service_type_id));

        Self { assignments }
    }

    /// Number of entries in the payload.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the payload clears the branch.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Serialize the payload to the JSON body the endpoint accepts.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
