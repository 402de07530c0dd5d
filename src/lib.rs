//! # Spendline
//!
//! Personal expense tracking: a record manager that keeps a list of
//! consumption records in step with a record service, and a line chart
//! renderer that draws numeric series to SVG.
//!
//! ## Modules
//!
//! - [`records`]: consumption records, the draft form and the record manager
//! - [`chart`]: scales, layout, scene building and SVG output
//! - [`api`]: reference record server with Axum
//! - [`config`]: TOML config with environment overrides
//! - [`logging`]: tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spendline::records::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = Arc::new(HttpConsumptionService::new(HttpServiceConfig::default())?);
//!     let mut manager =
//!         RecordManager::init(service, Arc::new(LogNotifier), Arc::new(FixedAnswer(true))).await;
//!
//!     manager.form_mut().set(Field::Name, "Lunch");
//!     manager.form_mut().set(Field::Type, "food");
//!     manager.form_mut().set(Field::Category, "daily");
//!     manager.form_mut().set(Field::Value, "12.5");
//!     manager.form_mut().set(Field::Source, "cash");
//!
//!     let outcome = manager.create().await;
//!     println!("{:?}, {} records", outcome, manager.records().len());
//!
//!     let svg = spendline::chart::render_chart_svg(&Default::default())?;
//!     std::fs::write("chart.svg", svg)?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod logging;
pub mod records;

// Re-export top-level types for convenience
pub use records::{
    ConsumptionForm, ConsumptionRecord, ConsumptionService, LoadState, NewConsumption, Outcome,
    RecordManager, ServiceError,
};

pub use chart::{build_scene, render_chart_svg, ChartError, ChartOptions, Scene, Series};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState, RecordStore};

pub use config::{Config, ConfigError, LoggingConfig};
