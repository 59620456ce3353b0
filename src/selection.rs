//! Aggregate selection state
//!
//! Group nodes store no selection of their own; what a group displays is
//! derived from the assignment set on every read, so there is no cached
//! state to invalidate when the set changes.
//!
//! A group reads as assigned only when every orderable service beneath it is
//! assigned. A partially covered group reads the same as an untouched one;
//! no third "partial" state is surfaced, and toggling such a group on
//! assigns only the remaining services.

use crate::{
    assignments::AssignmentSet,
    catalog::{ServiceCatalog, ServiceKey},
};

/// Displayed selection state of a node, derived from the assignment set.
///
/// Childless nodes read their own entry; nodes with children read as
/// assigned iff **every** orderable service in their subtree is assigned.
/// An unknown key (or a subtree with nothing orderable) reads as unassigned.
pub fn is_assigned(catalog: &ServiceCatalog, key: ServiceKey, set: &AssignmentSet) -> bool {
    let Some(node) = catalog.get(key) else {
        return false;
    };

    if node.has_children() {
        let leaves = catalog.leaf_descendants(key);

        !leaves.is_empty() && leaves.iter().all(|&leaf| set.contains(leaf))
    } else {
        set.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{catalog::CatalogError, wire::ServiceRecord};

    use super::*;

    fn record(id: &str, parent: Option<&str>) -> ServiceRecord {
        ServiceRecord {
            service_type_id: id.to_owned(),
            parent_service_type_id: parent.map(str::to_owned),
            name: id.to_owned(),
            code: None,
            leaf: parent.is_some(),
            display_order: None,
            cost: None,
            assigned: false,
        }
    }

    fn clinic() -> Result<ServiceCatalog, CatalogError> {
        ServiceCatalog::from_records(&[
            record("general", None),
            record("consultation", Some("general")),
            record("lab-test", Some("general")),
        ])
    }

    fn key(catalog: &ServiceCatalog, id: &str) -> Result<ServiceKey, String> {
        catalog.key_of(id).ok_or_else(|| format!("{id} missing"))
    }

    #[test]
    fn childless_node_tracks_its_own_entry() -> TestResult {
        let catalog = clinic()?;
        let consultation = key(&catalog, "consultation")?;

        let empty = AssignmentSet::new();
        assert!(!is_assigned(&catalog, consultation, &empty));

        let set = empty.toggle(&catalog, consultation, true);
        assert!(is_assigned(&catalog, consultation, &set));

        Ok(())
    }

    #[test]
    fn group_follows_its_own_toggle() -> TestResult {
        let catalog = clinic()?;
        let general = key(&catalog, "general")?;

        let on = AssignmentSet::new().toggle(&catalog, general, true);
        assert!(is_assigned(&catalog, general, &on));

        let off = on.toggle(&catalog, general, false);
        assert!(!is_assigned(&catalog, general, &off));

        Ok(())
    }

    #[test]
    fn untouched_group_reads_unassigned() -> TestResult {
        let catalog = clinic()?;
        let general = key(&catalog, "general")?;

        assert!(!is_assigned(&catalog, general, &AssignmentSet::new()));

        Ok(())
    }

    #[test]
    fn partially_assigned_group_reads_unassigned() -> TestResult {
        // Current behavior: a group with some but not all services assigned
        // displays exactly like an untouched one.
        let catalog = clinic()?;
        let general = key(&catalog, "general")?;
        let lab_test = key(&catalog, "lab-test")?;

        let partial = AssignmentSet::new()
            .toggle(&catalog, general, true)
            .toggle(&catalog, lab_test, false);

        assert_eq!(partial.len(), 1);
        assert!(!is_assigned(&catalog, general, &partial));

        Ok(())
    }
}
