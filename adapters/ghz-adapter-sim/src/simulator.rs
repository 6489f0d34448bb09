//! Simulator backend implementation.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use ghz_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use ghz_ir::Kernel;

use crate::stabilizer::Tableau;
use crate::statevector::{MAX_STATEVECTOR_QUBITS, Statevector};

/// Largest kernel the statevector engine takes by default (256 MiB of amplitudes).
pub const DEFAULT_MAX_STATEVECTOR_QUBITS: u32 = 24;

/// Largest kernel the stabilizer engine takes by default.
///
/// Preparing and sampling a 1024-qubit Clifford kernel takes well under a
/// second; the tableau grows quadratically past that.
pub const DEFAULT_MAX_QUBITS: u32 = 1024;

/// Shots accepted per job.
pub const MAX_SHOTS: u32 = 1_000_000;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Upper bound on [`SimulatorBackend::wait`].
const WAIT_TIMEOUT: Duration = Duration::from_secs(300);

/// How the simulator executes a kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMethod {
    /// Statevector when the kernel fits, stabilizer otherwise.
    #[default]
    Auto,
    /// Dense statevector, any gate, exponential memory.
    Statevector,
    /// Clifford tableau, Clifford gates only, polynomial cost.
    Stabilizer,
}

impl SimulationMethod {
    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            SimulationMethod::Auto => "auto",
            SimulationMethod::Statevector => "statevector",
            SimulationMethod::Stabilizer => "stabilizer",
        }
    }
}

impl fmt::Display for SimulationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationMethod {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SimulationMethod::Auto),
            "statevector" | "sv" => Ok(SimulationMethod::Statevector),
            "stabilizer" | "tableau" | "clifford" => Ok(SimulationMethod::Stabilizer),
            other => Err(HalError::Configuration(format!(
                "Unknown simulation method: '{other}'. Available: auto, statevector, stabilizer"
            ))),
        }
    }
}

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

type JobTable = Arc<Mutex<FxHashMap<String, SimJob>>>;

/// Local simulator backend.
///
/// Kernels run on a blocking worker thread; job state lives in memory for the
/// lifetime of the backend.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: JobTable,
    method: SimulationMethod,
    max_statevector_qubits: u32,
    max_qubits: u32,
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            SimulationMethod::Auto,
            DEFAULT_MAX_STATEVECTOR_QUBITS,
            DEFAULT_MAX_QUBITS,
            None,
        )
    }

    fn build(
        config: BackendConfig,
        method: SimulationMethod,
        max_statevector_qubits: u32,
        max_qubits: u32,
        seed: Option<u64>,
    ) -> Self {
        let capabilities =
            Self::describe(&config.name, method, max_statevector_qubits, max_qubits);
        Self {
            config,
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            method,
            max_statevector_qubits,
            max_qubits,
            seed,
        }
    }

    fn describe(
        name: &str,
        method: SimulationMethod,
        max_statevector_qubits: u32,
        max_qubits: u32,
    ) -> Capabilities {
        let caps = match method {
            SimulationMethod::Statevector => {
                Capabilities::simulator(name, max_statevector_qubits).with_feature("statevector")
            }
            SimulationMethod::Stabilizer => Capabilities::simulator(name, max_qubits)
                .with_gate_set(Capabilities::clifford_gates())
                .with_feature("stabilizer"),
            SimulationMethod::Auto => Capabilities::simulator(name, max_qubits)
                .with_feature("statevector")
                .with_feature("stabilizer"),
        };
        Capabilities {
            max_shots: MAX_SHOTS,
            ..caps
        }
    }

    fn rebuild(self) -> Self {
        Self::build(
            self.config,
            self.method,
            self.max_statevector_qubits,
            self.max_qubits,
            self.seed,
        )
    }

    /// Use a fixed simulation method.
    #[must_use]
    pub fn with_method(mut self, method: SimulationMethod) -> Self {
        self.method = method;
        self.rebuild()
    }

    /// Seed the sampler so that runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Change the statevector size limit, at most 30 qubits.
    pub fn with_max_statevector_qubits(mut self, max: u32) -> HalResult<Self> {
        self.max_statevector_qubits = check_statevector_limit(max)?;
        Ok(self.rebuild())
    }

    /// Change the overall qubit limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max: u32) -> Self {
        self.max_qubits = max;
        self.rebuild()
    }

    /// The configured simulation method.
    pub fn method(&self) -> SimulationMethod {
        self.method
    }

    /// Pick the engine for a kernel, or explain why none fits.
    pub fn resolve_method(&self, kernel: &Kernel) -> HalResult<SimulationMethod> {
        let n = kernel.num_qubits();
        let fits_statevector = n <= self.max_statevector_qubits as usize;
        let first_non_clifford = kernel
            .gates()
            .find(|(g, _)| !g.is_clifford())
            .map(|(g, _)| g.name());

        if n > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Kernel has {n} qubits but simulator supports at most {}",
                self.max_qubits
            )));
        }

        match self.method {
            SimulationMethod::Statevector if !fits_statevector => {
                Err(HalError::CircuitTooLarge(format!(
                    "Kernel has {n} qubits but the statevector engine supports at most {}",
                    self.max_statevector_qubits
                )))
            }
            SimulationMethod::Statevector => Ok(SimulationMethod::Statevector),
            SimulationMethod::Stabilizer => match first_non_clifford {
                Some(name) => Err(HalError::Unsupported(format!(
                    "gate '{name}' is not a Clifford gate and cannot run on the stabilizer engine"
                ))),
                None => Ok(SimulationMethod::Stabilizer),
            },
            SimulationMethod::Auto if fits_statevector => Ok(SimulationMethod::Statevector),
            SimulationMethod::Auto => match first_non_clifford {
                None => Ok(SimulationMethod::Stabilizer),
                Some(name) => Err(HalError::CircuitTooLarge(format!(
                    "Kernel has {n} qubits and contains non-Clifford gate '{name}'; \
                     the statevector engine supports at most {} qubits",
                    self.max_statevector_qubits
                ))),
            },
        }
    }

    fn check_shots(&self, shots: u32) -> HalResult<()> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} exceeds the maximum of {}",
                self.capabilities.max_shots
            )));
        }
        Ok(())
    }

    fn lock_jobs(jobs: &JobTable) -> std::sync::MutexGuard<'_, FxHashMap<String, SimJob>> {
        jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_status(jobs: &JobTable, job_id: &JobId, status: JobStatus) {
        let mut jobs = Self::lock_jobs(jobs);
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            sim_job.job = sim_job.job.clone().with_status(status);
        }
    }

    /// Record the outcome of a job. Ended jobs are left as they are.
    fn finish(jobs: &JobTable, job_id: &JobId, outcome: HalResult<ExecutionResult>) {
        let mut table = Self::lock_jobs(jobs);
        let Some(sim_job) = table.get_mut(&job_id.0) else {
            return;
        };
        if sim_job.job.status.is_terminal() {
            return;
        }
        match outcome {
            Ok(result) => {
                sim_job.job = sim_job.job.clone().with_status(JobStatus::Completed);
                sim_job.result = Some(result);
            }
            Err(e) => {
                warn!("Job {job_id} failed: {e}");
                sim_job.job = sim_job
                    .job
                    .clone()
                    .with_status(JobStatus::Failed(e.to_string()));
            }
        }
        if let Some(turnaround) = sim_job.job.turnaround() {
            debug!(
                "Job {job_id} {} after {} ms",
                sim_job.job.status,
                turnaround.num_milliseconds()
            );
        }
    }

    fn register_job(&self, shots: u32) -> JobId {
        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots).with_backend(self.name());
        Self::lock_jobs(&self.jobs).insert(job_id.0.clone(), SimJob { job, result: None });
        job_id
    }

    /// Run `work` on the blocking pool and record its outcome.
    ///
    /// A watcher task awaits the worker so that a panic still ends the job as
    /// `Failed` instead of leaving it `Running`.
    fn spawn_job<F>(&self, job_id: &JobId, work: F)
    where
        F: FnOnce() -> HalResult<ExecutionResult> + Send + 'static,
    {
        let worker_jobs = Arc::clone(&self.jobs);
        let worker_id = job_id.clone();
        let handle = tokio::task::spawn_blocking(move || {
            Self::update_status(&worker_jobs, &worker_id, JobStatus::Running);
            let outcome = work();
            Self::finish(&worker_jobs, &worker_id, outcome);
        });

        let jobs = Arc::clone(&self.jobs);
        let id = job_id.clone();
        tokio::spawn(async move {
            if let Err(e) = handle.await {
                Self::finish(
                    &jobs,
                    &id,
                    Err(HalError::Backend(format!("simulation worker panicked: {e}"))),
                );
            }
        });
    }
}

fn check_statevector_limit(max: u32) -> HalResult<u32> {
    if max as usize > MAX_STATEVECTOR_QUBITS {
        return Err(HalError::Configuration(format!(
            "max_statevector_qubits = {max} exceeds the limit of {MAX_STATEVECTOR_QUBITS}"
        )));
    }
    Ok(max)
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a kernel to completion with the chosen engine.
#[instrument(skip(kernel, rng), fields(kernel = kernel.name(), qubits = kernel.num_qubits()))]
pub fn run_simulation(
    kernel: &Kernel,
    shots: u32,
    method: SimulationMethod,
    rng: &mut StdRng,
) -> HalResult<ExecutionResult> {
    let start = Instant::now();
    let qubits = kernel.sampled_qubits();
    debug!(
        "Starting simulation: {} instructions, {} shots",
        kernel.num_ops(),
        shots
    );

    let (counts, engine): (Counts, SimulationMethod) = match method {
        SimulationMethod::Stabilizer => {
            let mut tableau = Tableau::new(kernel.num_qubits());
            for inst in kernel.instructions() {
                tableau.apply(inst)?;
            }
            (
                tableau.sample_counts(&qubits, shots, rng),
                SimulationMethod::Stabilizer,
            )
        }
        SimulationMethod::Statevector | SimulationMethod::Auto => {
            let mut sv = Statevector::new(kernel.num_qubits())?;
            for inst in kernel.instructions() {
                sv.apply(inst)?;
            }
            (
                sv.sample_counts(&qubits, shots, rng),
                SimulationMethod::Statevector,
            )
        }
    };

    let elapsed = start.elapsed();
    debug!("Simulation completed in {:?}", elapsed);

    #[allow(clippy::cast_possible_truncation)]
    let result = ExecutionResult::new(counts, shots)
        .with_execution_time(elapsed.as_millis() as u64)
        .with_metadata("method", serde_json::json!(engine.as_str()))
        .with_metadata("num_qubits", serde_json::json!(kernel.num_qubits()));
    Ok(result)
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, kernel: &Kernel) -> HalResult<ValidationResult> {
        match self.resolve_method(kernel) {
            Ok(_) => Ok(ValidationResult::Valid),
            Err(HalError::CircuitTooLarge(reason) | HalError::Unsupported(reason)) => {
                Ok(ValidationResult::Invalid {
                    reasons: vec![reason],
                })
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, kernel), fields(kernel = kernel.name()))]
    async fn submit(&self, kernel: &Kernel, shots: u32) -> HalResult<JobId> {
        self.check_shots(shots)?;
        let method = self.resolve_method(kernel)?;

        let job_id = self.register_job(shots);
        info!("Submitted job {job_id}: {} qubits via {method}", kernel.num_qubits());

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let kernel = kernel.clone();
        self.spawn_job(&job_id, move || run_simulation(&kernel, shots, method, &mut rng));

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        Self::lock_jobs(&self.jobs)
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = Self::lock_jobs(&self.jobs);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match &sim_job.job.status {
            JobStatus::Completed => sim_job
                .result
                .clone()
                .ok_or_else(|| HalError::Backend(format!("Job {job_id} has no result"))),
            JobStatus::Failed(msg) => Err(HalError::JobFailed(msg.clone())),
            JobStatus::Cancelled => Err(HalError::JobCancelled),
            JobStatus::Queued | JobStatus::Running => Err(HalError::Backend(format!(
                "Job {job_id} is still {}",
                sim_job.job.status
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = Self::lock_jobs(&self.jobs);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        sim_job.job = sim_job.job.clone().with_status(JobStatus::Cancelled);
        Ok(())
    }

    /// Local jobs finish without queueing, so poll far more often than the
    /// default remote-oriented interval. Gives up after five minutes.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let poll = async {
            loop {
                match self.status(job_id).await? {
                    JobStatus::Completed => return self.result(job_id).await,
                    JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                    JobStatus::Cancelled => return Err(HalError::JobCancelled),
                    JobStatus::Queued | JobStatus::Running => {
                        tokio::time::sleep(POLL_INTERVAL).await;
                    }
                }
            }
        };
        tokio::time::timeout(WAIT_TIMEOUT, poll)
            .await
            .map_err(|_| HalError::Timeout(job_id.0.clone()))?
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let method = match config.extra_str("method")? {
            Some(name) => name.parse()?,
            None => SimulationMethod::Auto,
        };
        let max_statevector_qubits = check_statevector_limit(
            config
                .extra_u32("max_statevector_qubits")?
                .unwrap_or(DEFAULT_MAX_STATEVECTOR_QUBITS),
        )?;
        let max_qubits = config
            .extra_u32("max_qubits")?
            .unwrap_or(DEFAULT_MAX_QUBITS);
        let seed = config.extra_u64("seed")?;

        Ok(Self::build(
            config,
            method,
            max_statevector_qubits,
            max_qubits,
            seed,
        ))
    }
}
