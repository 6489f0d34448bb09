//! Gate primitives.

use serde::{Deserialize, Serialize};

/// Gates a kernel can apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,

    // Non-Clifford single-qubit gates
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// Whether the gate maps Pauli operators to Pauli operators.
    ///
    /// Clifford-only kernels can be sampled on the stabilizer engine.
    pub fn is_clifford(&self) -> bool {
        !matches!(
            self,
            StandardGate::T
                | StandardGate::Tdg
                | StandardGate::Rx(_)
                | StandardGate::Ry(_)
                | StandardGate::Rz(_)
        )
    }

    /// Rotation angle, for parameterized gates.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(theta) | StandardGate::Ry(theta) | StandardGate::Rz(theta) => {
                Some(*theta)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::Rz(PI).num_qubits(), 1);
        assert_eq!(StandardGate::CX.name(), "cx");
        assert_eq!(StandardGate::I.name(), "id");
    }

    #[test]
    fn test_clifford_classification() {
        for gate in [
            StandardGate::I,
            StandardGate::X,
            StandardGate::H,
            StandardGate::Sdg,
            StandardGate::CX,
            StandardGate::Swap,
        ] {
            assert!(gate.is_clifford(), "{} should be Clifford", gate.name());
        }
        assert!(!StandardGate::T.is_clifford());
        assert!(!StandardGate::Ry(0.3).is_clifford());
    }

    #[test]
    fn test_angle() {
        assert_eq!(StandardGate::Rx(0.5).angle(), Some(0.5));
        assert_eq!(StandardGate::H.angle(), None);
    }
}
