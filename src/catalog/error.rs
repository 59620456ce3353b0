//! Catalog errors

use thiserror::Error;

/// Errors that can occur when building a service catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The same identifier appeared on more than one source record.
    #[error("duplicate service id in source records: {0}")]
    DuplicateId(String),
}
