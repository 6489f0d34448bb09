//! Backend capabilities.

use serde::{Deserialize, Serialize};

/// What a backend can execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Largest kernel, in qubits, the backend accepts.
    pub num_qubits: u32,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Supported gate names (kernel naming: `h`, `cx`, ...).
    pub gate_set: Vec<String>,
    /// Whether this is a simulator.
    pub is_simulator: bool,
    /// Feature tags, e.g. `"statevector"`, `"stabilizer"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a local simulator.
    pub fn simulator(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            max_shots: 1_000_000,
            gate_set: Self::all_gates(),
            is_simulator: true,
            features: vec![],
        }
    }

    /// Every gate name a kernel can contain.
    pub fn all_gates() -> Vec<String> {
        [
            "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "rx", "ry", "rz", "cx", "cz", "swap",
        ]
        .map(String::from)
        .to_vec()
    }

    /// Gate names of the Clifford subset.
    pub fn clifford_gates() -> Vec<String> {
        ["id", "x", "y", "z", "h", "s", "sdg", "cx", "cz", "swap"]
            .map(String::from)
            .to_vec()
    }

    /// Restrict the gate set.
    #[must_use]
    pub fn with_gate_set(mut self, gates: Vec<String>) -> Self {
        self.gate_set = gates;
        self
    }

    /// Add a feature tag.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Whether the named gate is supported.
    pub fn supports_gate(&self, name: &str) -> bool {
        self.gate_set.iter().any(|g| g == name)
    }

    /// Whether the feature tag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator("sim", 24).with_feature("statevector");
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 24);
        assert!(caps.supports_gate("cx"));
        assert!(caps.supports_gate("rz"));
        assert!(caps.has_feature("statevector"));
        assert!(!caps.has_feature("stabilizer"));
    }

    #[test]
    fn test_clifford_gate_set() {
        let caps =
            Capabilities::simulator("sim", 1000).with_gate_set(Capabilities::clifford_gates());
        assert!(caps.supports_gate("h"));
        assert!(!caps.supports_gate("t"));
    }
}
