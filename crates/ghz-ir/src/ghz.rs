//! GHZ state preparation.

use crate::error::{IrError, IrResult};
use crate::kernel::Kernel;

/// Qubit count of the demonstration run.
pub const DEFAULT_NUM_QUBITS: u32 = 34;

/// Build the kernel preparing an `n`-qubit GHZ state.
///
/// The gate sequence is fixed: one Hadamard on qubit 0, then a CX chain
/// linking qubit `i` to `i + 1` for `i` in `0..n - 1`, then one measurement
/// across the whole register. Sampling yields only `0…0` and `1…1`.
///
/// ```rust
/// use ghz_ir::ghz_state;
///
/// let kernel = ghz_state(4).unwrap();
/// assert_eq!(kernel.count_ops()["cx"], 3);
/// ```
pub fn ghz_state(n: u32) -> IrResult<Kernel> {
    if n == 0 {
        return Err(IrError::EmptyRegister("GHZ state".into()));
    }

    let mut kernel = Kernel::new(format!("ghz_{n}"));
    let q = kernel.try_qalloc(n)?;

    kernel.h(q[0])?;
    for i in 0..q.len() - 1 {
        kernel.cx(q[i], q[i + 1])?;
    }
    kernel.mz(&q)?;

    Ok(kernel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;
    use crate::qubit::QubitId;
    use proptest::prelude::*;

    fn cx_pairs(kernel: &Kernel) -> Vec<(u32, u32)> {
        kernel
            .gates()
            .filter(|(g, _)| **g == StandardGate::CX)
            .map(|(_, qs)| (qs[0].0, qs[1].0))
            .collect()
    }

    #[test]
    fn test_single_hadamard_on_qubit_zero() {
        let kernel = ghz_state(5).unwrap();
        let hadamards: Vec<_> = kernel
            .gates()
            .filter(|(g, _)| **g == StandardGate::H)
            .map(|(_, qs)| qs.to_vec())
            .collect();
        assert_eq!(hadamards, vec![vec![QubitId(0)]]);
        // The Hadamard comes first.
        assert_eq!(kernel.instructions()[0].name(), "h");
    }

    #[test]
    fn test_cx_chain_links_consecutive_qubits_in_order() {
        let kernel = ghz_state(5).unwrap();
        assert_eq!(cx_pairs(&kernel), vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_single_measurement_over_register() {
        let kernel = ghz_state(5).unwrap();
        let measures: Vec<_> = kernel
            .instructions()
            .iter()
            .filter(|i| i.is_measure())
            .collect();
        assert_eq!(measures.len(), 1);
        assert_eq!(measures[0].qubits, (0..5).map(QubitId).collect::<Vec<_>>());
        assert!(kernel.instructions().last().unwrap().is_measure());
    }

    #[test]
    fn test_default_size_has_33_entangling_gates() {
        let kernel = ghz_state(DEFAULT_NUM_QUBITS).unwrap();
        assert_eq!(kernel.num_qubits(), 34);
        assert_eq!(kernel.count_ops()["cx"], 33);
        assert_eq!(kernel.num_ops(), 35);
        assert_eq!(kernel.depth(), 35);
    }

    #[test]
    fn test_single_qubit_has_no_entangling_gates() {
        let kernel = ghz_state(1).unwrap();
        let counts = kernel.count_ops();
        assert_eq!(counts.get("cx"), None);
        assert_eq!(counts["h"], 1);
        assert_eq!(counts["mz"], 1);
        assert_eq!(kernel.measured_qubits(), &[QubitId(0)]);
    }

    #[test]
    fn test_zero_qubits_is_rejected() {
        assert!(matches!(ghz_state(0), Err(IrError::EmptyRegister(_))));
    }

    proptest! {
        #[test]
        fn prop_ghz_structure(n in 1u32..200) {
            let kernel = ghz_state(n).unwrap();
            let counts = kernel.count_ops();

            prop_assert_eq!(kernel.num_qubits(), n as usize);
            prop_assert_eq!(counts["h"], 1);
            prop_assert_eq!(counts.get("cx").copied().unwrap_or(0), (n - 1) as usize);
            prop_assert_eq!(counts["mz"], 1);
            prop_assert_eq!(kernel.measured_qubits().len(), n as usize);
            prop_assert!(kernel.is_clifford());

            let expected: Vec<_> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
            prop_assert_eq!(cx_pairs(&kernel), expected);
        }
    }
}
