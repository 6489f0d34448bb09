//! GHZ Hardware Abstraction Layer
//!
//! This crate defines the boundary between kernels and whatever executes
//! them:
//! - a common [`Backend`] trait for job submission and management
//! - [`Capabilities`] describing what a backend accepts
//! - [`ExecutionResult`] and [`Counts`] for sampled histograms
//! - [`sample`], the one-call entry point used by the CLI
//!
//! # Example: Sampling a Kernel
//!
//! ```ignore
//! use ghz_adapter_sim::SimulatorBackend;
//! use ghz_hal::{DEFAULT_SHOTS, sample};
//! use ghz_ir::ghz_state;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let kernel = ghz_state(34)?;
//!     let backend = SimulatorBackend::new();
//!
//!     let result = sample(&backend, &kernel, DEFAULT_SHOTS).await?;
//!     println!("{}", result.counts); // { 000…0:503 111…1:497 }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, DEFAULT_SHOTS, ValidationResult,
    sample,
};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
