//! Kernel builder API.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{QubitId, QubitRegister};

/// A quantum kernel.
///
/// Accumulates gate operations in application order. Qubits are allocated
/// with [`Kernel::qalloc`]; measurement is terminal, so a measured qubit
/// accepts no further operations.
#[derive(Debug, Clone, Serialize)]
pub struct Kernel {
    /// Name of the kernel.
    name: String,
    /// Number of allocated qubits.
    num_qubits: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
    /// Measured qubits in measurement order.
    measured: Vec<QubitId>,
    #[serde(skip)]
    measured_set: FxHashSet<QubitId>,
}

impl Kernel {
    /// Create a new empty kernel.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            instructions: vec![],
            measured: vec![],
            measured_set: FxHashSet::default(),
        }
    }

    /// Allocate a register of `size` fresh qubits.
    ///
    /// # Panics
    ///
    /// Panics if the kernel would hold more than `u32::MAX` qubits. Use
    /// [`Kernel::try_qalloc`] to handle that case.
    pub fn qalloc(&mut self, size: u32) -> QubitRegister {
        match self.try_qalloc(size) {
            Ok(reg) => reg,
            Err(e) => panic!("{e}"),
        }
    }

    /// Allocate a register of `size` fresh qubits, failing with
    /// [`IrError::TooManyQubits`] when the ids would overflow.
    pub fn try_qalloc(&mut self, size: u32) -> IrResult<QubitRegister> {
        let overflow = IrError::TooManyQubits {
            allocated: self.num_qubits,
            requested: size,
        };
        let reg = QubitRegister::contiguous(self.num_qubits, size).ok_or(overflow)?;
        self.num_qubits += size;
        Ok(reg)
    }

    /// Validate and append an instruction.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            InstructionKind::Measure => None,
        };

        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits() as usize;
                let got = instruction.qubits.len();
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected: expected as u32,
                        got: got as u32,
                    });
                }
            }
            InstructionKind::Measure => {
                if instruction.qubits.is_empty() {
                    return Err(IrError::EmptyMeasurement);
                }
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
            if self.measured_set.contains(&qubit) {
                return Err(IrError::QubitAlreadyMeasured {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        if instruction.is_measure() {
            self.measured.extend_from_slice(&instruction.qubits);
            self.measured_set.extend(instruction.qubits.iter().copied());
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, q1, q2))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure the given qubits in the Z basis.
    pub fn mz(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubits))
    }

    /// Measure every allocated qubit.
    pub fn mz_all(&mut self) -> IrResult<&mut Self> {
        self.mz((0..self.num_qubits).map(QubitId))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the kernel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of allocated qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions, measurements included.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Count instructions by name.
    pub fn count_ops(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Gate instructions only, in application order.
    pub fn gates(&self) -> impl Iterator<Item = (&StandardGate, &[QubitId])> {
        self.instructions
            .iter()
            .filter_map(|inst| inst.as_gate().map(|g| (g, inst.qubits.as_slice())))
    }

    /// Qubits that have been measured, in measurement order.
    pub fn measured_qubits(&self) -> &[QubitId] {
        &self.measured
    }

    /// Qubits that appear in sampled bitstrings.
    ///
    /// A kernel without measurements samples every allocated qubit.
    pub fn sampled_qubits(&self) -> Vec<QubitId> {
        if self.measured.is_empty() {
            (0..self.num_qubits).map(QubitId).collect()
        } else {
            self.measured.clone()
        }
    }

    /// Whether every gate in the kernel is a Clifford gate.
    pub fn is_clifford(&self) -> bool {
        self.gates().all(|(g, _)| g.is_clifford())
    }

    /// Kernel depth: the longest chain of instructions sharing qubits.
    pub fn depth(&self) -> usize {
        let mut front = vec![0usize; self.num_qubits as usize];
        let mut depth = 0;
        for inst in &self.instructions {
            let layer = inst
                .qubits
                .iter()
                .map(|q| front[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                front[q.index()] = layer;
            }
            depth = depth.max(layer);
        }
        depth
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "kernel {} ({} qubits)", self.name, self.num_qubits)?;
        for inst in &self.instructions {
            writeln!(f, "  {inst}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_kernel() {
        let kernel = Kernel::new("test");
        assert_eq!(kernel.name(), "test");
        assert_eq!(kernel.num_qubits(), 0);
        assert_eq!(kernel.num_ops(), 0);
        assert_eq!(kernel.depth(), 0);
    }

    #[test]
    fn test_qalloc_is_contiguous() {
        let mut kernel = Kernel::new("test");
        let a = kernel.qalloc(2);
        let b = kernel.qalloc(3);
        assert_eq!(kernel.num_qubits(), 5);
        assert_eq!(a[1], QubitId(1));
        assert_eq!(b[0], QubitId(2));
        assert_eq!(b[2], QubitId(4));
    }

    #[test]
    fn test_try_qalloc_rejects_id_overflow() {
        let mut kernel = Kernel::new("test");
        kernel.num_qubits = u32::MAX - 2;
        assert!(matches!(
            kernel.try_qalloc(3),
            Err(IrError::TooManyQubits { allocated, requested: 3 }) if allocated == u32::MAX - 2
        ));
        assert_eq!(kernel.num_qubits(), (u32::MAX - 2) as usize);
        assert_eq!(kernel.try_qalloc(2).unwrap().len(), 2);
    }

    #[test]
    fn test_bell_kernel() {
        let mut kernel = Kernel::new("bell");
        let q = kernel.qalloc(2);
        kernel.h(q[0]).unwrap().cx(q[0], q[1]).unwrap().mz(&q).unwrap();

        assert_eq!(kernel.num_ops(), 3);
        assert_eq!(kernel.depth(), 3);
        assert_eq!(kernel.measured_qubits(), &[QubitId(0), QubitId(1)]);
        assert!(kernel.is_clifford());
    }

    #[test]
    fn test_parallel_gates_share_layer() {
        let mut kernel = Kernel::new("par");
        let q = kernel.qalloc(3);
        kernel.h(q[0]).unwrap().h(q[1]).unwrap().h(q[2]).unwrap();
        assert_eq!(kernel.depth(), 1);
    }

    #[test]
    fn test_qubit_not_found() {
        let mut kernel = Kernel::new("test");
        kernel.qalloc(2);
        let err = kernel.cx(QubitId(1), QubitId(2)).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitNotFound {
                qubit: QubitId(2),
                gate_name: Some("cx".into()),
            }
        );
        assert_eq!(kernel.num_ops(), 0);
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut kernel = Kernel::new("test");
        let q = kernel.qalloc(2);
        let err = kernel.cx(q[0], q[0]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_arity_mismatch() {
        let mut kernel = Kernel::new("test");
        kernel.qalloc(3);
        let inst = Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1), QubitId(2)]);
        let err = kernel.apply(inst).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitCountMismatch {
                gate_name: "cx".into(),
                expected: 2,
                got: 3,
            }
        );
    }

    #[test]
    fn test_measurement_is_terminal() {
        let mut kernel = Kernel::new("test");
        let q = kernel.qalloc(2);
        kernel.mz([q[0]]).unwrap();

        assert!(matches!(
            kernel.x(q[0]),
            Err(IrError::QubitAlreadyMeasured { .. })
        ));
        assert!(matches!(
            kernel.mz([q[0]]),
            Err(IrError::QubitAlreadyMeasured { .. })
        ));
        // The unmeasured qubit is still usable.
        kernel.x(q[1]).unwrap();
        assert_eq!(kernel.num_ops(), 2);
    }

    #[test]
    fn test_empty_measurement() {
        let mut kernel = Kernel::new("test");
        kernel.qalloc(1);
        assert_eq!(
            kernel.mz(std::iter::empty()).unwrap_err(),
            IrError::EmptyMeasurement
        );
    }

    #[test]
    fn test_sampled_qubits_default_to_all() {
        let mut kernel = Kernel::new("test");
        let q = kernel.qalloc(3);
        kernel.h(q[0]).unwrap();
        assert_eq!(kernel.sampled_qubits().len(), 3);

        kernel.mz([q[2], q[0]]).unwrap();
        assert_eq!(kernel.sampled_qubits(), vec![QubitId(2), QubitId(0)]);
    }

    #[test]
    fn test_non_clifford_detection() {
        let mut kernel = Kernel::new("test");
        let q = kernel.qalloc(1);
        kernel.h(q[0]).unwrap().t(q[0]).unwrap();
        assert!(!kernel.is_clifford());
    }

    #[test]
    fn test_display() {
        let mut kernel = Kernel::new("bell");
        let q = kernel.qalloc(2);
        kernel.h(q[0]).unwrap().cx(q[0], q[1]).unwrap().mz_all().unwrap();
        assert_eq!(
            kernel.to_string(),
            "kernel bell (2 qubits)\n  h q[0]\n  cx q[0], q[1]\n  mz q[0], q[1]\n"
        );
    }
}
