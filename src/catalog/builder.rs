//! Assembly of a service catalog from flat parent-pointer records.

use rustc_hash::FxHashMap;
use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;

use crate::{
    catalog::{
        ServiceCatalog,
        error::CatalogError,
        node::{ServiceKey, ServiceNode},
    },
    wire::ServiceRecord,
};

/// Records without an explicit order sort after every ordered sibling.
const UNORDERED: u32 = u32::MAX;

pub(crate) fn from_records(records: &[ServiceRecord]) -> Result<ServiceCatalog, CatalogError> {
    let mut nodes: SlotMap<ServiceKey, ServiceNode> = SlotMap::with_capacity_and_key(records.len());
    let mut ids: FxHashMap<String, ServiceKey> = FxHashMap::default();
    let mut order: Vec<ServiceKey> = Vec::with_capacity(records.len());
    let mut display_orders: SecondaryMap<ServiceKey, u32> = SecondaryMap::new();

    for record in records {
        if ids.contains_key(&record.service_type_id) {
            return Err(CatalogError::DuplicateId(record.service_type_id.clone()));
        }

        let key = nodes.insert(ServiceNode {
            id: record.service_type_id.clone(),
            name: record.name.clone(),
            code: record.code.clone(),
            leaf: record.leaf,
            default_cost: record.cost,
            children: SmallVec::new(),
        });

        ids.insert(record.service_type_id.clone(), key);
        display_orders.insert(key, record.display_order.unwrap_or(UNORDERED));
        order.push(key);
    }

    // Resolve declared parents. Unknown and self-referential parents promote
    // the record to a root rather than erroring; source data is assumed
    // eventually consistent.
    let mut parents: SecondaryMap<ServiceKey, ServiceKey> = SecondaryMap::new();

    for (record, &key) in records.iter().zip(&order) {
        let Some(parent_id) = record.parent_service_type_id.as_deref() else {
            continue;
        };

        if parent_id == record.service_type_id {
            continue;
        }

        if let Some(&parent_key) = ids.get(parent_id) {
            parents.insert(key, parent_key);
        }
    }

    break_parent_cycles(&order, &mut parents);

    // Attach children and collect roots, both in input order.
    let mut roots: SmallVec<[ServiceKey; 4]> = SmallVec::new();

    for &key in &order {
        match parents.get(key).copied() {
            Some(parent_key) => {
                if let Some(parent) = nodes.get_mut(parent_key) {
                    parent.children.push(key);
                }
            }
            None => roots.push(key),
        }
    }

    // Stable sorts keep input order among siblings without an explicit order.
    roots.sort_by_key(|&key| display_orders.get(key).copied().unwrap_or(UNORDERED));

    for node in nodes.values_mut() {
        node.children
            .sort_by_key(|&key| display_orders.get(key).copied().unwrap_or(UNORDERED));
    }

    Ok(ServiceCatalog {
        nodes,
        ids,
        parents,
        roots,
    })
}

/// Cut each parent-pointer cycle at its first member in input order, so every
/// record stays reachable from exactly one root.
fn break_parent_cycles(order: &[ServiceKey], parents: &mut SecondaryMap<ServiceKey, ServiceKey>) {
    for &key in order {
        let mut cursor = parents.get(key).copied();

        // A walk longer than the arena means the chain runs into a cycle the
        // walked node is not part of; that cycle is cut when its own first
        // member comes up.
        for _ in 0..order.len() {
            match cursor {
                Some(ancestor) if ancestor == key => {
                    parents.remove(key);
                    break;
                }
                Some(ancestor) => cursor = parents.get(ancestor).copied(),
                None => break,
            }
        }
    }
}
