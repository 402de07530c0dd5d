//! Record Manager
//!
//! Keeps the visible list of consumption records in step with the record
//! service and tracks the draft form and the single record being edited.
//!
//! ## Failure handling
//!
//! Service failures are logged and absorbed: nothing is retried or rolled
//! back, and local state stays as it was before the call. Every operation
//! reports what happened through an [`Outcome`] so callers can sequence
//! follow-up work without matching on errors.

use std::sync::Arc;
use tokio::sync::watch;

use super::form::{ConsumptionForm, ValidationReport, Validator};
use super::model::ConsumptionRecord;
use super::notify::{Confirmer, NotificationLevel, Notifier};
use super::service::ConsumptionService;

pub const MSG_ADDED: &str = "item added successfully.";
pub const MSG_EDIT_CANCELLED: &str = "item editing cancelled.";
pub const MSG_EDITED: &str = "item edited successfully.";
pub const MSG_DELETED: &str = "item deleted successfully.";
pub const DELETE_PROMPT: &str = "Are you sure you want to permanently delete this item?";

/// Progress of the most recent full load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Result of a manager operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The service call succeeded and local state was updated
    Completed,
    /// The service call failed; the error was logged
    Failed(String),
    /// The draft did not pass validation; no call was made
    Rejected(ValidationReport),
    /// The user declined the confirmation; no call was made
    Declined,
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// CRUD state for the consumption screen
pub struct RecordManager {
    service: Arc<dyn ConsumptionService>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    records: Vec<ConsumptionRecord>,
    form: ConsumptionForm,
    editing: Option<ConsumptionRecord>,
    load_state: watch::Sender<LoadState>,
}

impl RecordManager {
    /// Create a manager with an empty list and a fresh draft form
    pub fn new(
        service: Arc<dyn ConsumptionService>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        let (load_state, _) = watch::channel(LoadState::Loading);
        Self {
            service,
            notifier,
            confirmer,
            records: Vec::new(),
            form: ConsumptionForm::new(),
            editing: None,
            load_state,
        }
    }

    /// Create a manager and run the initial load
    pub async fn init(
        service: Arc<dyn ConsumptionService>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        let mut manager = Self::new(service, notifier, confirmer);
        manager.load().await;
        manager
    }

    pub fn records(&self) -> &[ConsumptionRecord] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&ConsumptionRecord> {
        self.records.iter().find(|r| r.has_id(id))
    }

    pub fn form(&self) -> &ConsumptionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ConsumptionForm {
        &mut self.form
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.load_state.borrow(), LoadState::Loading)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state.borrow().clone()
    }

    /// Receiver that observes every load state transition
    pub fn subscribe_load_state(&self) -> watch::Receiver<LoadState> {
        self.load_state.subscribe()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Record currently being edited
    pub fn edit_subject(&self) -> Option<&ConsumptionRecord> {
        self.editing.as_ref()
    }

    pub fn edit_subject_mut(&mut self) -> Option<&mut ConsumptionRecord> {
        self.editing.as_mut()
    }

    /// Replace the local list with the service's records.
    ///
    /// The load state leaves `Loading` on both paths; a failure keeps the
    /// previous list.
    pub async fn load(&mut self) -> Outcome {
        self.load_state.send_replace(LoadState::Loading);

        match self.service.list().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Loaded consumption records");
                self.records = records;
                self.load_state.send_replace(LoadState::Ready);
                Outcome::Completed
            }
            Err(e) => {
                tracing::error!(operation = "load", error = %e, "Failed to load consumption records");
                let message = e.to_string();
                self.load_state.send_replace(LoadState::Failed(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    /// Submit the draft form.
    ///
    /// Invalid drafts are rejected before any service call. On success the
    /// stored record is appended and the form is reset; on failure the form
    /// keeps its values.
    pub async fn create(&mut self) -> Outcome {
        let new = match self.form.to_new_consumption() {
            Ok(new) => new,
            Err(report) => {
                tracing::debug!(violations = %report, "Draft rejected by validation");
                return Outcome::Rejected(report);
            }
        };

        match self.service.create(&new).await {
            Ok(record) if record.id.is_some() => {
                tracing::info!(record_id = ?record.id, name = %record.name, "Created consumption record");
                self.records.push(record);
                self.form.reset();
                self.notifier.notify(MSG_ADDED, NotificationLevel::Success);
                Outcome::Completed
            }
            Ok(_) => {
                let message = "service returned a record without an id".to_string();
                tracing::error!(operation = "create", error = %message, "Failed to create consumption record");
                Outcome::Failed(message)
            }
            Err(e) => {
                tracing::error!(operation = "create", error = %e, "Failed to create consumption record");
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Enter edit mode for a record. No service call.
    pub fn begin_edit(&mut self, record: &ConsumptionRecord) {
        tracing::debug!(record_id = ?record.id, "Editing consumption record");
        self.editing = Some(record.clone());
    }

    /// Leave edit mode and reload the list to drop unsaved changes
    pub async fn cancel_edit(&mut self) -> Outcome {
        self.editing = None;
        self.notifier
            .notify(MSG_EDIT_CANCELLED, NotificationLevel::Warning);
        self.load().await
    }

    /// Submit a modified record.
    ///
    /// The record must pass the same rules as a new draft; otherwise it is
    /// rejected without a service call. On success edit mode ends and the
    /// local entry with the same id is replaced. On failure edit mode stays on.
    pub async fn commit_edit(&mut self, record: ConsumptionRecord) -> Outcome {
        let report = Validator::consumption().validate_record(&record);
        if !report.is_valid() {
            tracing::debug!(record_id = ?record.id, violations = %report, "Edit rejected by validation");
            return Outcome::Rejected(report);
        }

        match self.service.update(&record).await {
            Ok(()) => {
                tracing::info!(record_id = ?record.id, "Updated consumption record");
                if let Some(id) = record.id.as_deref() {
                    if let Some(slot) = self.records.iter_mut().find(|r| r.has_id(id)) {
                        *slot = record.clone();
                    }
                }
                self.editing = None;
                self.notifier.notify(MSG_EDITED, NotificationLevel::Success);
                Outcome::Completed
            }
            Err(e) => {
                tracing::error!(
                    operation = "update",
                    record_id = ?record.id,
                    error = %e,
                    "Failed to update consumption record"
                );
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Commit the current edit subject, if any
    pub async fn commit_current_edit(&mut self) -> Option<Outcome> {
        let record = self.editing.clone()?;
        Some(self.commit_edit(record).await)
    }

    /// Delete a record after the user confirms.
    ///
    /// The confirmer may block on user input, so it runs on tokio's blocking
    /// pool.
    pub async fn delete(&mut self, record: &ConsumptionRecord) -> Outcome {
        let confirmer = Arc::clone(&self.confirmer);
        let confirmed = tokio::task::spawn_blocking(move || confirmer.confirm(DELETE_PROMPT))
            .await
            .unwrap_or(false);
        if !confirmed {
            tracing::debug!(record_id = ?record.id, "Deletion declined");
            return Outcome::Declined;
        }

        match self.service.delete(record).await {
            Ok(()) => {
                tracing::info!(record_id = ?record.id, "Deleted consumption record");
                if let Some(id) = record.id.as_deref() {
                    if let Some(pos) = self.records.iter().position(|r| r.has_id(id)) {
                        self.records.remove(pos);
                    }
                }
                self.notifier.notify(MSG_DELETED, NotificationLevel::Success);
                Outcome::Completed
            }
            Err(e) => {
                tracing::error!(
                    operation = "delete",
                    record_id = ?record.id,
                    error = %e,
                    "Failed to delete consumption record"
                );
                Outcome::Failed(e.to_string())
            }
        }
    }
}
