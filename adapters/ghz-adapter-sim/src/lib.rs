//! Local simulator backend for GHZ kernels.
//!
//! Two engines sit behind one [`Backend`](ghz_hal::Backend) implementation:
//!
//! - **Statevector**: dense amplitudes, every gate in the kernel IR, memory
//!   doubling with each qubit.
//! - **Stabilizer**: Aaronson–Gottesman tableau, Clifford gates only, but
//!   polynomial in the number of qubits. GHZ preparation is pure Clifford, so
//!   the 34-qubit demonstration runs here.
//!
//! [`SimulationMethod::Auto`] picks between them per kernel.
//!
//! # Example
//!
//! ```ignore
//! use ghz_adapter_sim::SimulatorBackend;
//! use ghz_hal::sample;
//! use ghz_ir::ghz_state;
//!
//! let backend = SimulatorBackend::new().with_seed(42);
//! let result = sample(&backend, &ghz_state(34)?, 1000).await?;
//! assert_eq!(result.counts.len(), 2);
//! ```

mod simulator;
pub mod stabilizer;
pub mod statevector;

pub use simulator::{
    DEFAULT_MAX_QUBITS, DEFAULT_MAX_STATEVECTOR_QUBITS, MAX_SHOTS, SimulationMethod,
    SimulatorBackend, run_simulation,
};
