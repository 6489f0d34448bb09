//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;

use ghz_hal::{Counts, HalError, HalResult};
use ghz_ir::{Instruction, InstructionKind, QubitId, StandardGate};

/// Widest statevector that can be allocated (16 GiB of amplitudes).
pub const MAX_STATEVECTOR_QUBITS: usize = 30;

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> HalResult<Self> {
        if num_qubits > MAX_STATEVECTOR_QUBITS {
            return Err(HalError::CircuitTooLarge(format!(
                "{num_qubits} qubits exceed the statevector limit of {MAX_STATEVECTOR_QUBITS}"
            )));
        }
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Apply an instruction to the statevector.
    ///
    /// Measurements are terminal in a kernel, so they leave the state alone
    /// and are realised by [`Statevector::sample_counts`].
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
        if let Some(&bad) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(HalError::InvalidCircuit(format!(
                "qubit {bad} is outside the {}-qubit statevector",
                self.num_qubits
            )));
        }
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                if qubits.len() != gate.num_qubits() as usize {
                    return Err(HalError::InvalidCircuit(format!(
                        "gate '{}' expects {} qubit(s), got {}",
                        gate.name(),
                        gate.num_qubits(),
                        qubits.len()
                    )));
                }
                self.apply_gate(gate, &qubits);
            }
            InstructionKind::Measure => {}
        }
        Ok(())
    }

    fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        match gate {
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_phase(qubits[0], Complex64::new(-1.0, 0.0)),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], Complex64::new(0.0, 1.0)),
            StandardGate::Sdg => self.apply_phase(qubits[0], Complex64::new(0.0, -1.0)),
            StandardGate::T => {
                self.apply_phase(qubits[0], Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4));
            }
            StandardGate::Tdg => {
                self.apply_phase(qubits[0], Complex64::from_polar(1.0, -std::f64::consts::FRAC_PI_4));
            }
            StandardGate::Rx(theta) => {
                let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
                let m = [
                    [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
                    [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
                ];
                self.apply_single(qubits[0], m);
            }
            StandardGate::Ry(theta) => {
                let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
                let m = [
                    [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
                    [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
                ];
                self.apply_single(qubits[0], m);
            }
            StandardGate::Rz(theta) => {
                let zero = Complex64::new(0.0, 0.0);
                let m = [
                    [Complex64::from_polar(1.0, -theta / 2.0), zero],
                    [zero, Complex64::from_polar(1.0, theta / 2.0)],
                ];
                self.apply_single(qubits[0], m);
            }
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
        }
    }

    // =========================================================================
    // Gate kernels
    // =========================================================================

    fn apply_single(&mut self, qubit: usize, m: [[Complex64; 2]; 2]) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    /// Multiply the |1⟩ component of `qubit` by `phase`.
    fn apply_phase(&mut self, qubit: usize, phase: Complex64) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, q1: usize, q2: usize) {
        let mask = (1 << q1) | (1 << q2);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let m1 = 1 << q1;
        let m2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & m1 != 0) && (i & m2 == 0) {
                let j = (i & !m1) | m2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Draw `shots` basis states and histogram them over `qubits`.
    pub fn sample_counts<R: Rng>(&self, qubits: &[QubitId], shots: u32, rng: &mut R) -> Counts {
        let mut cumulative = Vec::with_capacity(self.amplitudes.len());
        let mut total = 0.0;
        for p in self.probabilities() {
            total += p;
            cumulative.push(total);
        }

        let last = cumulative.len() - 1;
        let mut counts = Counts::new();
        for _ in 0..shots {
            let r = rng.r#gen::<f64>() * total;
            let outcome = cumulative.partition_point(|&c| c <= r).min(last);
            counts.insert(outcome_to_bitstring(outcome, qubits), 1);
        }
        counts
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}

/// Render the bits of `outcome` selected by `qubits`, first qubit leftmost.
fn outcome_to_bitstring(outcome: usize, qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| if (outcome >> q.index()) & 1 == 1 { '1' } else { '0' })
        .collect()
}
