//! Consumption Records
//!
//! Everything behind the expense CRUD screen.
//!
//! ## Architecture
//!
//! - **Model**: `ConsumptionRecord` and the `NewConsumption` payload
//! - **Form**: the draft form and its rule-based validator
//! - **Service**: the remote record store (`ConsumptionService`)
//! - **Notify**: notification and confirmation collaborators
//! - **Manager**: `RecordManager`, which ties the pieces together
//!
//! Collaborators are passed to the manager at construction; nothing is
//! looked up from global state.

mod form;
mod manager;
mod model;
mod notify;
mod service;

pub use form::{ConsumptionForm, Field, Rule, ValidationReport, Validator, Violation};
pub use manager::{
    LoadState, Outcome, RecordManager, DELETE_PROMPT, MSG_ADDED, MSG_DELETED, MSG_EDITED,
    MSG_EDIT_CANCELLED,
};
pub use model::{parse_date, ConsumptionRecord, NewConsumption, DISPLAY_DATE_FORMAT};
pub use notify::{
    ask, ConsoleNotifier, Confirmer, FixedAnswer, LogNotifier, NotificationLevel,
    NotificationLog, Notifier, StdinConfirmer,
};
pub use service::{
    ConsumptionService, HttpConsumptionService, HttpServiceConfig, InMemoryConsumptionService,
    ServiceError,
};
