//! Error types for the kernel builder.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building a kernel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit has not been allocated in this kernel.
    #[error("Qubit {qubit} not allocated in kernel{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in one instruction.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Operation on a qubit whose measurement has already been recorded.
    #[error("Qubit {qubit} was already measured{}", format_gate_context(.gate_name))]
    QubitAlreadyMeasured {
        /// The measured qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Measurement requested over no qubits.
    #[error("Measurement requires at least one qubit")]
    EmptyMeasurement,

    /// A register of zero qubits where at least one is needed.
    #[error("{0} requires at least one qubit")]
    EmptyRegister(String),

    /// Allocation would run past the last representable qubit id.
    #[error("Cannot allocate {requested} qubits after {allocated}: qubit ids are 32-bit")]
    TooManyQubits {
        /// Qubits already allocated.
        allocated: u32,
        /// Size of the rejected register.
        requested: u32,
    },
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for kernel operations.
pub type IrResult<T> = Result<T, IrError>;
