//! Branch editing session
//!
//! A session owns everything one operator edits for one branch: the catalog,
//! the live assignment set, the baseline captured at open (or last
//! successful save), the search term and the expansion set. Nothing here is
//! ambient; the search term and expansion set are ordinary fields handed to
//! the pure filter and render steps.
//!
//! Persistence is a single atomic call. At most one save is outstanding at a
//! time: edits are refused while one is in flight, a failed save keeps every
//! edit so the operator can retry, and abandoning the session just drops it
//! with no side effects.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    assignments::{self, AssignmentSet},
    catalog::{CatalogError, ServiceCatalog, ServiceKey},
    filter,
    payload::SavePayload,
    wire::ServiceRecord,
};

/// Errors from session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The id does not name a node in this session's catalog.
    #[error("unknown service id: {0}")]
    UnknownService(String),

    /// Edits and further saves are refused while a save is outstanding.
    #[error("a save is already in flight")]
    SaveInFlight,
}

/// Save lifecycle; at most one request is ever outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveState {
    Idle,
    InFlight,
}

/// One branch's in-memory editing state.
#[derive(Debug)]
pub struct BranchSession {
    branch_id: String,
    catalog: ServiceCatalog,
    assignments: AssignmentSet,
    baseline: AssignmentSet,
    search_term: String,
    expanded: FxHashSet<ServiceKey>,
    save_state: SaveState,
    last_save_error: Option<String>,
}

impl BranchSession {
    /// Open a session from the fetched records for a branch.
    ///
    /// Seeds the assignment set from records marked assigned, captures the
    /// baseline for dirty tracking, and starts with every grouping node
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the records do not form a valid
    /// catalog; the session cannot open without one.
    pub fn open(
        branch_id: impl Into<String>,
        records: &[ServiceRecord],
    ) -> Result<Self, CatalogError> {
        let branch_id = branch_id.into();
        let catalog = ServiceCatalog::from_records(records)?;
        let assignments = AssignmentSet::seeded(&catalog, records);
        let expanded = catalog
            .iter()
            .filter(|(_, node)| node.has_children())
            .map(|(key, _)| key)
            .collect();

        info!(
            branch = %branch_id,
            services = catalog.len(),
            assigned = assignments.len(),
            "opened branch session"
        );

        Ok(Self {
            branch_id,
            baseline: assignments.clone(),
            assignments,
            catalog,
            search_term: String::new(),
            expanded,
            save_state: SaveState::Idle,
            last_save_error: None,
        })
    }

    /// The branch this session edits.
    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    /// The catalog backing this session.
    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// The live assignment set.
    pub fn assignments(&self) -> &AssignmentSet {
        &self.assignments
    }

    /// Check or uncheck a node by its public id, cascading for groups.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SaveInFlight`] while a save is outstanding,
    /// or [`SessionError::UnknownService`] for an id outside the catalog.
    pub fn toggle(&mut self, id: &str, desired: bool) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let key = self.resolve(id)?;

        self.assignments = self.assignments.toggle(&self.catalog, key, desired);

        debug!(
            branch = %self.branch_id,
            service = id,
            desired,
            assigned = self.assignments.len(),
            "toggled"
        );

        Ok(())
    }

    /// Re-price an assigned service by its public id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SaveInFlight`] while a save is outstanding,
    /// or [`SessionError::UnknownService`] for an id outside the catalog.
    pub fn set_cost(&mut self, id: &str, cost: Decimal) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let key = self.resolve(id)?;

        self.assignments = self.assignments.set_cost(key, cost);

        Ok(())
    }

    /// Re-price from raw operator input, normalizing before applying.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SaveInFlight`] while a save is outstanding,
    /// or [`SessionError::UnknownService`] for an id outside the catalog.
    pub fn set_cost_input(&mut self, id: &str, raw: &str) -> Result<(), SessionError> {
        self.set_cost(id, assignments::parse_cost(raw))
    }

    /// Replace the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// The current search term.
    pub fn search(&self) -> &str {
        &self.search_term
    }

    /// Visible node keys for the current search term, recomputed on demand.
    pub fn visible_ids(&self) -> FxHashSet<ServiceKey> {
        filter::visible_ids(&self.catalog, &self.search_term)
    }

    /// Flip a grouping node between expanded and collapsed.
    ///
    /// View state only, so this stays available while a save is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownService`] for an id outside the
    /// catalog.
    pub fn toggle_expanded(&mut self, id: &str) -> Result<(), SessionError> {
        let key = self.resolve(id)?;

        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }

        Ok(())
    }

    /// Whether a node is currently expanded.
    pub fn is_expanded(&self, key: ServiceKey) -> bool {
        self.expanded.contains(&key)
    }

    /// Whether the live set differs from the baseline. Drives Save
    /// enablement only; the payload is always the full current state.
    pub fn is_dirty(&self) -> bool {
        self.assignments != self.baseline
    }

    /// Number of assigned services, for the footer display.
    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// Sum of assigned costs, for the footer display.
    pub fn total_cost(&self) -> Decimal {
        self.assignments.total_cost()
    }

    /// Whether a save is currently outstanding.
    pub fn is_saving(&self) -> bool {
        self.save_state == SaveState::InFlight
    }

    /// Message from the most recent failed save, if any.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Start a save: returns the full-replacement payload and blocks further
    /// edits until [`complete_save`](Self::complete_save) or
    /// [`fail_save`](Self::fail_save). An empty payload is a valid clear-all.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SaveInFlight`] if a save is already
    /// outstanding.
    pub fn begin_save(&mut self) -> Result<SavePayload, SessionError> {
        self.ensure_editable()?;

        self.save_state = SaveState::InFlight;
        self.last_save_error = None;

        let payload = SavePayload::build(&self.catalog, &self.assignments);

        info!(
            branch = %self.branch_id,
            entries = payload.len(),
            "save started"
        );

        Ok(payload)
    }

    /// Record a confirmed save: the saved state becomes the new baseline.
    pub fn complete_save(&mut self) {
        self.save_state = SaveState::Idle;
        self.baseline = self.assignments.clone();
        self.last_save_error = None;

        info!(branch = %self.branch_id, "save confirmed");
    }

    /// Record a failed save. Every edit is kept so the operator can retry,
    /// and the server's message is held for display.
    pub fn fail_save(&mut self, message: impl Into<String>) {
        let message = message.into();

        warn!(
            branch = %self.branch_id,
            error = %message,
            "save failed; edits retained"
        );

        self.save_state = SaveState::Idle;
        self.last_save_error = Some(message);
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        match self.save_state {
            SaveState::InFlight => Err(SessionError::SaveInFlight),
            SaveState::Idle => Ok(()),
        }
    }

    fn resolve(&self, id: &str) -> Result<ServiceKey, SessionError> {
        self.catalog
            .key_of(id)
            .ok_or_else(|| SessionError::UnknownService(id.to_owned()))
    }
}
