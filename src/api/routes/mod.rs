//! API Routes
//!
//! Route handlers organized by functionality.

pub mod consumptions;
pub mod health;
