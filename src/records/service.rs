//! Record service
//!
//! The manager talks to the remote store through [`ConsumptionService`].
//! Two implementations ship with the crate: an HTTP client for the REST
//! routes and a process-local store used for tests and offline runs.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

use super::model::{ConsumptionRecord, NewConsumption};

/// Remote consumption record store
#[async_trait]
pub trait ConsumptionService: Send + Sync {
    /// Fetch every stored record
    async fn list(&self) -> Result<Vec<ConsumptionRecord>, ServiceError>;

    /// Persist a new record; returns the stored form including its id
    async fn create(&self, new: &NewConsumption) -> Result<ConsumptionRecord, ServiceError>;

    /// Overwrite a stored record
    async fn update(&self, record: &ConsumptionRecord) -> Result<(), ServiceError>;

    /// Remove a stored record
    async fn delete(&self, record: &ConsumptionRecord) -> Result<(), ServiceError>;
}

/// Errors from a record service call
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Record service unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record has no id")]
    MissingId,
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else if e.is_connect() {
            ServiceError::Unavailable
        } else {
            ServiceError::Request(e)
        }
    }
}

/// Configuration for the HTTP record service
#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    /// Base URL of the record server (e.g., "http://localhost:3000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// REST client for the consumption routes
pub struct HttpConsumptionService {
    client: Client,
    config: HttpServiceConfig,
}

impl HttpConsumptionService {
    pub fn new(config: HttpServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(ServiceError::Request)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpServiceConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn record_url(&self, record: &ConsumptionRecord) -> Result<String, ServiceError> {
        let id = record.id.as_deref().ok_or(ServiceError::MissingId)?;
        Ok(self.url(&format!("consumption/{}", id)))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        if status.as_u16() == 404 {
            Err(ServiceError::NotFound(message))
        } else {
            Err(ServiceError::ApiError {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl ConsumptionService for HttpConsumptionService {
    async fn list(&self) -> Result<Vec<ConsumptionRecord>, ServiceError> {
        let response = self.client.get(self.url("consumptions")).send().await?;
        let records = Self::check(response).await?.json().await?;
        Ok(records)
    }

    async fn create(&self, new: &NewConsumption) -> Result<ConsumptionRecord, ServiceError> {
        let response = self
            .client
            .post(self.url("consumption"))
            .json(new)
            .send()
            .await?;
        let record = Self::check(response).await?.json().await?;
        Ok(record)
    }

    async fn update(&self, record: &ConsumptionRecord) -> Result<(), ServiceError> {
        let url = self.record_url(record)?;
        let response = self.client.put(url).json(record).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, record: &ConsumptionRecord) -> Result<(), ServiceError> {
        let url = self.record_url(record)?;
        let response = self.client.delete(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Process-local record service
///
/// Ids are sequential (`"1"`, `"2"`, ...). Call counters let callers verify
/// which operations reached the service.
#[derive(Debug, Default)]
pub struct InMemoryConsumptionService {
    records: RwLock<Vec<ConsumptionRecord>>,
    next_id: AtomicU64,
    calls: AtomicU64,
}

impl InMemoryConsumptionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with records, assigning ids to those without one
    pub fn with_records(records: Vec<ConsumptionRecord>) -> Self {
        let service = Self::new();
        let seeded: Vec<ConsumptionRecord> = records
            .into_iter()
            .map(|mut r| {
                if r.id.is_none() {
                    r.id = Some(service.allocate_id());
                }
                r
            })
            .collect();

        Self {
            records: RwLock::new(seeded),
            next_id: service.next_id,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of service calls made so far
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Vec<ConsumptionRecord> {
        self.records.read().await.clone()
    }

    fn allocate_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConsumptionService for InMemoryConsumptionService {
    async fn list(&self) -> Result<Vec<ConsumptionRecord>, ServiceError> {
        self.record_call();
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, new: &NewConsumption) -> Result<ConsumptionRecord, ServiceError> {
        self.record_call();
        let record = ConsumptionRecord::from_new(self.allocate_id(), new.clone());
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &ConsumptionRecord) -> Result<(), ServiceError> {
        self.record_call();
        let id = record.id.as_deref().ok_or(ServiceError::MissingId)?;
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.has_id(id))
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        *slot = record.clone();
        Ok(())
    }

    async fn delete(&self, record: &ConsumptionRecord) -> Result<(), ServiceError> {
        self.record_call();
        let id = record.id.as_deref().ok_or(ServiceError::MissingId)?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !r.has_id(id));
        if records.len() == before {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_consumption(name: &str) -> NewConsumption {
        NewConsumption {
            name: name.to_string(),
            kind: "expense".to_string(),
            category: "misc".to_string(),
            value: 1.0,
            source: "cash".to_string(),
            remark: None,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = HttpServiceConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_route_urls() {
        let service = HttpConsumptionService::new(HttpServiceConfig {
            base_url: "http://example.test/".to_string(),
            request_timeout_ms: 100,
        })
        .unwrap();

        assert_eq!(service.url("consumptions"), "http://example.test/api/consumptions");

        let record = ConsumptionRecord::from_new("42", new_consumption("a"));
        assert_eq!(
            service.record_url(&record).unwrap(),
            "http://example.test/api/consumption/42"
        );

        let mut unsaved = record;
        unsaved.id = None;
        assert!(matches!(service.record_url(&unsaved), Err(ServiceError::MissingId)));
    }

    #[tokio::test]
    async fn test_in_memory_crud() {
        let service = InMemoryConsumptionService::new();

        let a = service.create(&new_consumption("a")).await.unwrap();
        let b = service.create(&new_consumption("b")).await.unwrap();
        assert_eq!(a.id.as_deref(), Some("1"));
        assert_eq!(b.id.as_deref(), Some("2"));

        let mut edited = a.clone();
        edited.value = 9.0;
        service.update(&edited).await.unwrap();

        service.delete(&b).await.unwrap();
        let all = service.list().await.unwrap();
        assert_eq!(all, vec![edited]);
        assert_eq!(service.calls(), 5);

        assert!(matches!(service.delete(&b).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_seeded_records_get_ids() {
        let mut seed = ConsumptionRecord::from_new("x", new_consumption("seed"));
        seed.id = None;
        let service = InMemoryConsumptionService::with_records(vec![seed]);

        let all = service.snapshot().await;
        assert_eq!(all[0].id.as_deref(), Some("1"));
        assert_eq!(service.calls(), 0);
    }
}
