//! Wire types for the branch-services endpoints
//!
//! The fetch endpoint returns the service catalog either as a nested forest
//! ([`ServiceTreeNode`]) or as a pre-flattened record list
//! ([`ServiceRecord`]); both carry the branch's persisted assignment state
//! alongside the catalog metadata. Decoding failures are blocking: a session
//! cannot open without a tree.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors decoding a fetched service tree.
#[derive(Debug, Error)]
pub enum WireError {
    /// The response body did not decode into the expected shape.
    #[error("failed to decode service tree: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Flat catalog record: one service type with a nullable parent pointer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Unique identifier of the service type.
    pub service_type_id: String,

    /// Identifier of the parent grouping, if any.
    #[serde(default)]
    pub parent_service_type_id: Option<String>,

    /// Display name.
    pub name: String,

    /// Optional display code.
    #[serde(default)]
    pub code: Option<String>,

    /// Leaf/group classification declared by the source.
    #[serde(default)]
    pub leaf: bool,

    /// Sibling ordering hint; records without one keep input order.
    #[serde(default)]
    pub display_order: Option<u32>,

    /// Persisted price for assigned services, or the catalog suggestion.
    #[serde(default)]
    pub cost: Option<Decimal>,

    /// Whether the branch currently offers this service.
    #[serde(default)]
    pub assigned: bool,
}

/// Nested node shape as served by the fetch endpoint, children inline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTreeNode {
    /// Unique identifier of the service type.
    pub service_type_id: String,

    /// Display name.
    pub name: String,

    /// Optional display code.
    #[serde(default)]
    pub code: Option<String>,

    /// Leaf/group classification declared by the source.
    #[serde(default)]
    pub leaf: bool,

    /// Sibling ordering hint.
    #[serde(default)]
    pub display_order: Option<u32>,

    /// Persisted price for assigned services, or the catalog suggestion.
    #[serde(default)]
    pub cost: Option<Decimal>,

    /// Whether the branch currently offers this service.
    #[serde(default)]
    pub assigned: bool,

    /// Child nodes, empty for orderable services.
    #[serde(default)]
    pub children: Vec<ServiceTreeNode>,
}

impl ServiceTreeNode {
    /// Flatten a fetched forest into parent-pointer records.
    ///
    /// Parents precede their children in the output, so the records can be
    /// fed straight into catalog construction.
    pub fn flatten_forest(forest: Vec<ServiceTreeNode>) -> Vec<ServiceRecord> {
        let mut records = Vec::new();

        for node in forest {
            node.flatten_into(None, &mut records);
        }

        records
    }

    fn flatten_into(self, parent: Option<&str>, records: &mut Vec<ServiceRecord>) {
        let ServiceTreeNode {
            service_type_id,
            name,
            code,
            leaf,
            display_order,
            cost,
            assigned,
            children,
        } = self;

        records.push(ServiceRecord {
            service_type_id: service_type_id.clone(),
            parent_service_type_id: parent.map(str::to_owned),
            name,
            code,
            leaf,
            display_order,
            cost,
            assigned,
        });

        for child in children {
            child.flatten_into(Some(&service_type_id), records);
        }
    }
}

/// Decode a fetched nested forest from a JSON body.
///
/// # Errors
///
/// Returns a [`WireError::Decode`] if the body is not a valid service forest.
pub fn tree_from_json(body: &str) -> Result<Vec<ServiceTreeNode>, WireError> {
    Ok(serde_json::from_str(body)?)
}

/// Decode a pre-flattened record list from a JSON body.
///
/// # Errors
///
/// Returns a [`WireError::Decode`] if the body is not a valid record list.
pub fn records_from_json(body: &str) -> Result<Vec<ServiceRecord>, WireError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn record_list_decodes_with_defaults() -> TestResult {
        let body = r#"[
            {"serviceTypeId": "imaging", "name": "Imaging", "leaf": false},
            {"serviceTypeId": "x-ray", "parentServiceTypeId": "imaging", "name": "X-Ray", "leaf": true, "cost": 40.0, "assigned": true}
        ]"#;

        let records = records_from_json(body)?;

        assert_eq!(records.len(), 2);

        let imaging = records.first().ok_or("missing first record")?;
        assert_eq!(imaging.service_type_id, "imaging");
        assert_eq!(imaging.parent_service_type_id, None);
        assert!(!imaging.assigned);
        assert_eq!(imaging.cost, None);
        assert_eq!(imaging.display_order, None);

        let x_ray = records.get(1).ok_or("missing second record")?;
        assert_eq!(x_ray.parent_service_type_id.as_deref(), Some("imaging"));
        assert!(x_ray.assigned);
        assert_eq!(x_ray.cost, Some(rust_decimal::Decimal::from(40)));

        Ok(())
    }

    #[test]
    fn nested_tree_decodes_and_flattens() -> TestResult {
        let body = r#"[
            {
                "serviceTypeId": "general",
                "name": "General",
                "children": [
                    {"serviceTypeId": "consultation", "name": "Consultation", "leaf": true, "cost": 20.0},
                    {"serviceTypeId": "lab-test", "name": "Lab Test", "leaf": true, "cost": 15.0}
                ]
            }
        ]"#;

        let forest = tree_from_json(body)?;
        let records = ServiceTreeNode::flatten_forest(forest);

        let ids: Vec<&str> = records
            .iter()
            .map(|record| record.service_type_id.as_str())
            .collect();

        // parents precede their children
        assert_eq!(ids, vec!["general", "consultation", "lab-test"]);

        let consultation = records.get(1).ok_or("missing consultation record")?;
        assert_eq!(
            consultation.parent_service_type_id.as_deref(),
            Some("general")
        );

        let general = records.first().ok_or("missing general record")?;
        assert_eq!(general.parent_service_type_id, None);

        Ok(())
    }

    #[test]
    fn malformed_body_errors() {
        let result = tree_from_json("{\"not\": \"a forest\"}");

        assert!(matches!(result, Err(WireError::Decode(_))));
    }
}
