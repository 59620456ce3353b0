//! Assignment store and toggle engine
//!
//! The assignment set is the single source of truth for "what is selected":
//! a map from service key to priced assignment, holding childless nodes only.
//! Group keys never enter the store; toggling a group cascades to every
//! orderable service beneath it. Mutations follow an immutable-update
//! discipline, returning a fresh set so state transitions stay easy to
//! reason about and to discard.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::{
    catalog::{ServiceCatalog, ServiceKey},
    wire::ServiceRecord,
};

/// A branch's priced offering of one orderable service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Agreed price at this branch; never negative.
    pub cost: Decimal,
}

/// The set of services a branch offers, with their prices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSet {
    entries: FxHashMap<ServiceKey, Assignment>,
}

impl AssignmentSet {
    /// Create an empty assignment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a set from fetched records: childless records marked assigned
    /// become entries, with missing or negative persisted costs clamped to
    /// zero. Assigned flags on grouping records are ignored.
    pub fn seeded(catalog: &ServiceCatalog, records: &[ServiceRecord]) -> Self {
        let mut entries = FxHashMap::default();

        for record in records {
            if !record.assigned {
                continue;
            }

            let Some(key) = catalog.key_of(&record.service_type_id) else {
                continue;
            };

            let Some(node) = catalog.get(key) else {
                continue;
            };

            if node.has_children() {
                continue;
            }

            let cost = record.cost.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
            entries.insert(key, Assignment { cost });
        }

        Self { entries }
    }

    /// Apply a check/uncheck action to a node, returning the updated set.
    ///
    /// A childless node is inserted (keeping an already-edited cost, else
    /// pre-filling the catalog suggestion, else zero) or removed. A node
    /// with children cascades the same desired state to every orderable
    /// service in its subtree, and any stale entry under the group's own key
    /// is purged.
    #[must_use]
    pub fn toggle(&self, catalog: &ServiceCatalog, key: ServiceKey, desired: bool) -> Self {
        let mut next = self.clone();
        next.apply_toggle(catalog, key, desired);

        next
    }

    fn apply_toggle(&mut self, catalog: &ServiceCatalog, key: ServiceKey, desired: bool) {
        let Some(node) = catalog.get(key) else {
            return;
        };

        if node.has_children() {
            self.entries.remove(&key);

            for &child in &node.children {
                self.apply_toggle(catalog, child, desired);
            }
        } else if desired {
            let cost = self
                .entries
                .get(&key)
                .map(|assignment| assignment.cost)
                .or(node.default_cost)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO);

            self.entries.insert(key, Assignment { cost });
        } else {
            self.entries.remove(&key);
        }
    }

    /// Re-price an assigned service, returning the updated set.
    ///
    /// A no-op when the key is not currently assigned; negative costs clamp
    /// to zero.
    #[must_use]
    pub fn set_cost(&self, key: ServiceKey, cost: Decimal) -> Self {
        let mut next = self.clone();

        if let Some(assignment) = next.entries.get_mut(&key) {
            assignment.cost = cost.max(Decimal::ZERO);
        }

        next
    }

    /// Whether a service is currently assigned.
    pub fn contains(&self, key: ServiceKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Current price of an assigned service.
    pub fn cost_of(&self, key: ServiceKey) -> Option<Decimal> {
        self.entries.get(&key).map(|assignment| assignment.cost)
    }

    /// Number of assigned services.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no services are assigned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the assigned services in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (ServiceKey, &Assignment)> {
        self.entries.iter().map(|(&key, assignment)| (key, assignment))
    }

    /// Sum of all assigned costs, for the informational footer display.
    pub fn total_cost(&self) -> Decimal {
        self.entries
            .values()
            .fold(Decimal::ZERO, |total, assignment| {
                total.saturating_add(assignment.cost)
            })
    }
}

/// Normalize raw operator cost input: valid numeric strings parse, anything
/// else clamps to zero, as do negative values. Formatting mistakes are not
/// business-rule violations, so this never errors.
pub fn parse_cost(raw: &str) -> Decimal {
    raw.trim()
        .parse::<Decimal>()
        .map_or(Decimal::ZERO, |cost| cost.max(Decimal::ZERO))
}
