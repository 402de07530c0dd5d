//! Response bodies that are not records themselves.

use serde::{Deserialize, Serialize};

/// Response from `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
    pub persistent: bool,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Response from `DELETE /api/consumption/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: String,
}
