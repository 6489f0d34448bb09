//! Backend trait, configuration, and the sampling entry point.
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! [`sample`] runs the whole lifecycle for one kernel.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use ghz_ir::Kernel;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Shots taken by [`sample`] when the caller has no preference.
pub const DEFAULT_SHOTS: u32 = 1000;

/// Configuration for a backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer extra.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!("'{key}' must be a non-negative integer"))
            }),
        }
    }

    /// Read an unsigned integer extra that must fit in a `u32`.
    pub fn extra_u32(&self, key: &str) -> HalResult<Option<u32>> {
        self.extra_u64(key)?
            .map(|v| {
                u32::try_from(v).map_err(|_| {
                    HalError::Configuration(format!("'{key}' = {v} does not fit in 32 bits"))
                })
            })
            .transpose()
    }

    /// Read a string extra.
    pub fn extra_str(&self, key: &str) -> HalResult<Option<&str>> {
        match self.extra.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| HalError::Configuration(format!("'{key}' must be a string"))),
        }
    }
}

/// Trait for sampling backends.
///
/// - `capabilities()` is synchronous and infallible; implementations cache
///   it at construction.
/// - `submit()` returns a `JobId` whose first status is `Queued`.
/// - `result()` is only valid once `status()` reports `Completed`.
/// - `wait()` polls every 500ms for up to 5 minutes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check backend availability.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Validate a kernel against backend constraints.
    async fn validate(&self, kernel: &Kernel) -> HalResult<ValidationResult>;

    /// Submit a kernel for sampling.
    async fn submit(&self, kernel: &Kernel, shots: u32) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a running job.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Wait for a job to complete and return its result.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let poll_interval = Duration::from_millis(500);
        let max_polls = 600; // 5 minutes max

        for _ in 0..max_polls {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }

        Err(HalError::Timeout(job_id.0.clone()))
    }
}

/// Backend availability information.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend is currently accepting jobs.
    pub is_available: bool,
    /// Number of jobs currently in queue (if known).
    pub queue_depth: Option<u32>,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Availability of a backend that is always ready, such as a simulator.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            status_message: None,
        }
    }

    /// Create availability for an offline backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            status_message: Some(reason.into()),
        }
    }
}

/// Result of kernel validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Kernel can be submitted as-is.
    Valid,
    /// Kernel cannot run on this backend.
    Invalid {
        /// Reasons the kernel is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the kernel is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

/// Sample a kernel: validate, submit, and wait for the histogram.
#[instrument(skip(backend, kernel), fields(backend = backend.name(), kernel = kernel.name()))]
pub async fn sample(
    backend: &dyn Backend,
    kernel: &Kernel,
    shots: u32,
) -> HalResult<ExecutionResult> {
    let availability = backend.availability().await?;
    if !availability.is_available {
        return Err(HalError::BackendUnavailable(
            availability
                .status_message
                .unwrap_or_else(|| backend.name().to_string()),
        ));
    }

    if let ValidationResult::Invalid { reasons } = backend.validate(kernel).await? {
        return Err(HalError::InvalidCircuit(reasons.join("; ")));
    }

    let job_id = backend.submit(kernel, shots).await?;
    debug!("Submitted job {job_id}");
    backend.wait(&job_id).await
}
