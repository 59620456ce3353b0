//! Ancestor-preserving search filter
//!
//! Filtering answers "which nodes stay visible for this search term". A node
//! matches when its own name contains the term (case-insensitive) or when
//! any descendant matches; a match pulls the node's whole ancestor chain
//! into visibility so deep hits stay reachable from a root. Nodes outside
//! the visible set are pruned from the rendered tree entirely, not hidden
//! in place.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::catalog::{ServiceCatalog, ServiceKey};

/// Compute the set of visible node keys for a search term.
///
/// A blank or whitespace-only term leaves every node visible.
pub fn visible_ids(catalog: &ServiceCatalog, term: &str) -> FxHashSet<ServiceKey> {
    let needle = term.trim().to_lowercase();
    let mut visible = FxHashSet::default();

    if needle.is_empty() {
        visible.extend(catalog.iter().map(|(key, _)| key));

        return visible;
    }

    for &root in catalog.roots() {
        mark_matches(catalog, root, &needle, &mut visible);
    }

    visible
}

/// Post-order walk: mark a subtree and report whether anything in it matched.
/// Ancestor inclusion falls out of the recursion, since a child match makes
/// every node on the way back up count as matching.
fn mark_matches(
    catalog: &ServiceCatalog,
    key: ServiceKey,
    needle: &str,
    visible: &mut FxHashSet<ServiceKey>,
) -> bool {
    let Some(node) = catalog.get(key) else {
        return false;
    };

    let mut matched = node.name.to_lowercase().contains(needle);

    for &child in &node.children {
        matched |= mark_matches(catalog, child, needle, visible);
    }

    if matched {
        visible.insert(key);
    }

    matched
}

/// Roots that survive the filter, in display order.
pub fn visible_roots(
    catalog: &ServiceCatalog,
    visible: &FxHashSet<ServiceKey>,
) -> SmallVec<[ServiceKey; 4]> {
    catalog
        .roots()
        .iter()
        .copied()
        .filter(|root| visible.contains(root))
        .collect()
}

/// A node's children that survive the filter, in display order.
pub fn visible_children(
    catalog: &ServiceCatalog,
    key: ServiceKey,
    visible: &FxHashSet<ServiceKey>,
) -> SmallVec<[ServiceKey; 4]> {
    let Some(node) = catalog.get(key) else {
        return SmallVec::new();
    };

    node.children
        .iter()
        .copied()
        .filter(|child| visible.contains(child))
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{catalog::CatalogError, wire::ServiceRecord};

    use super::*;

    fn record(id: &str, name: &str, parent: Option<&str>) -> ServiceRecord {
        ServiceRecord {
            service_type_id: id.to_owned(),
            parent_service_type_id: parent.map(str::to_owned),
            name: name.to_owned(),
            code: None,
            leaf: parent.is_some(),
            display_order: None,
            cost: None,
            assigned: false,
        }
    }

    /// imaging -> radiology -> {x-ray, mri}; general -> consultation.
    fn clinic() -> Result<ServiceCatalog, CatalogError> {
        ServiceCatalog::from_records(&[
            record("imaging", "Imaging", None),
            record("radiology", "Radiology", Some("imaging")),
            record("x-ray", "X-Ray", Some("radiology")),
            record("mri", "MRI", Some("radiology")),
            record("general", "General", None),
            record("consultation", "Consultation", Some("general")),
        ])
    }

    fn key(catalog: &ServiceCatalog, id: &str) -> Result<ServiceKey, String> {
        catalog.key_of(id).ok_or_else(|| format!("{id} missing"))
    }

    #[test]
    fn blank_term_shows_everything() -> TestResult {
        let catalog = clinic()?;

        assert_eq!(visible_ids(&catalog, "").len(), catalog.len());
        assert_eq!(visible_ids(&catalog, "   ").len(), catalog.len());

        Ok(())
    }

    #[test]
    fn leaf_match_pulls_its_ancestor_chain() -> TestResult {
        let catalog = clinic()?;
        let visible = visible_ids(&catalog, "x-ray");

        assert!(visible.contains(&key(&catalog, "x-ray")?));
        assert!(visible.contains(&key(&catalog, "radiology")?));
        assert!(visible.contains(&key(&catalog, "imaging")?));
        assert!(!visible.contains(&key(&catalog, "mri")?));
        assert!(!visible.contains(&key(&catalog, "general")?));

        Ok(())
    }

    #[test]
    fn matching_is_case_insensitive_substring() -> TestResult {
        let catalog = clinic()?;
        let visible = visible_ids(&catalog, "CONSULT");

        assert!(visible.contains(&key(&catalog, "consultation")?));
        assert!(visible.contains(&key(&catalog, "general")?));
        assert_eq!(visible.len(), 2);

        Ok(())
    }

    #[test]
    fn group_match_does_not_reveal_its_children() -> TestResult {
        // Matching a group keeps the group visible; its non-matching
        // children stay pruned.
        let catalog = clinic()?;
        let visible = visible_ids(&catalog, "radiology");

        assert!(visible.contains(&key(&catalog, "radiology")?));
        assert!(visible.contains(&key(&catalog, "imaging")?));
        assert!(!visible.contains(&key(&catalog, "x-ray")?));
        assert!(!visible.contains(&key(&catalog, "mri")?));

        Ok(())
    }

    #[test]
    fn no_match_prunes_everything() -> TestResult {
        let catalog = clinic()?;

        assert!(visible_ids(&catalog, "dermatology").is_empty());

        Ok(())
    }

    #[test]
    fn visible_roots_and_children_prune_in_display_order() -> TestResult {
        let catalog = clinic()?;
        let visible = visible_ids(&catalog, "x-ray");

        let roots = visible_roots(&catalog, &visible);
        assert_eq!(roots.as_slice(), &[key(&catalog, "imaging")?]);

        let radiology = key(&catalog, "radiology")?;
        let children = visible_children(&catalog, radiology, &visible);
        assert_eq!(children.as_slice(), &[key(&catalog, "x-ray")?]);

        Ok(())
    }
}
