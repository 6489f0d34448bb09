//! Stabilizer (Clifford tableau) simulation engine.
//!
//! Aaronson–Gottesman tableau: rows `0..n` are destabilizers, rows `n..2n`
//! stabilizers, row `2n` is scratch space for deterministic measurements.
//! Each row stores its X and Z bits packed into `u64` words.
//!
//! Gates cost O(n) and a measurement O(n²/64). Sampling does not re-measure
//! the tableau per shot: a Z-basis measurement of a stabilizer state is
//! uniform over an affine subspace `x₀ ⊕ span(X-parts of the stabilizers)`,
//! so the tableau is measured once for `x₀`, the span is reduced to a basis,
//! and every shot is `x₀` XOR a random subset of that basis.

use rand::Rng;

use ghz_hal::{Counts, HalError, HalResult};
use ghz_ir::{Instruction, InstructionKind, QubitId, StandardGate};

const WORD_BITS: usize = 64;

#[inline]
fn locate(qubit: usize) -> (usize, u64) {
    (qubit / WORD_BITS, 1u64 << (qubit % WORD_BITS))
}

/// Stabilizer tableau of an n-qubit state.
#[derive(Debug, Clone)]
pub struct Tableau {
    num_qubits: usize,
    /// Words per row.
    words: usize,
    /// X bits, `(2n + 1)` rows of `words` words.
    x: Vec<u64>,
    /// Z bits, same layout as `x`.
    z: Vec<u64>,
    /// Phase bit per row; `true` is a −1 sign.
    r: Vec<bool>,
}

impl Tableau {
    /// Tableau of |0...0⟩: destabilizer i = X_i, stabilizer i = Z_i.
    pub fn new(num_qubits: usize) -> Self {
        let n = num_qubits;
        let words = n.div_ceil(WORD_BITS);
        let rows = 2 * n + 1;
        let mut x = vec![0u64; rows * words];
        let mut z = vec![0u64; rows * words];
        for i in 0..n {
            let (w, mask) = locate(i);
            x[i * words + w] |= mask;
            z[(n + i) * words + w] |= mask;
        }
        Self {
            num_qubits,
            words,
            x,
            z,
            r: vec![false; rows],
        }
    }

    #[inline]
    fn row(&self, row: usize) -> std::ops::Range<usize> {
        row * self.words..(row + 1) * self.words
    }

    #[inline]
    fn x_bit(&self, row: usize, qubit: usize) -> bool {
        let (w, mask) = locate(qubit);
        self.x[row * self.words + w] & mask != 0
    }

    /// Apply an instruction. Non-Clifford gates are rejected.
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        let q: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
        if let Some(&bad) = q.iter().find(|&&i| i >= self.num_qubits) {
            return Err(HalError::InvalidCircuit(format!(
                "qubit {bad} is outside the {}-qubit tableau",
                self.num_qubits
            )));
        }
        let gate = match &instruction.kind {
            InstructionKind::Measure => return Ok(()),
            InstructionKind::Gate(gate) => gate,
        };
        if q.len() != gate.num_qubits() as usize {
            return Err(HalError::InvalidCircuit(format!(
                "gate '{}' expects {} qubit(s), got {}",
                gate.name(),
                gate.num_qubits(),
                q.len()
            )));
        }

        match gate {
            StandardGate::I => {}
            StandardGate::X => self.x_gate(q[0]),
            StandardGate::Y => self.y_gate(q[0]),
            StandardGate::Z => self.z_gate(q[0]),
            StandardGate::H => self.hadamard(q[0]),
            StandardGate::S => self.phase(q[0]),
            StandardGate::Sdg => {
                self.phase(q[0]);
                self.z_gate(q[0]);
            }
            StandardGate::CX => self.cnot(q[0], q[1]),
            StandardGate::CZ => {
                self.hadamard(q[1]);
                self.cnot(q[0], q[1]);
                self.hadamard(q[1]);
            }
            StandardGate::Swap => {
                self.cnot(q[0], q[1]);
                self.cnot(q[1], q[0]);
                self.cnot(q[0], q[1]);
            }
            StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_) => {
                return Err(HalError::Unsupported(format!(
                    "gate '{}' is not a Clifford gate and cannot run on the stabilizer engine",
                    gate.name()
                )));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Clifford gates
    // =========================================================================

    /// H: swaps X and Z, Y → −Y.
    pub fn hadamard(&mut self, a: usize) {
        let (w, mask) = locate(a);
        for row in 0..2 * self.num_qubits {
            let i = row * self.words + w;
            let (xb, zb) = (self.x[i] & mask, self.z[i] & mask);
            self.r[row] ^= xb != 0 && zb != 0;
            self.x[i] = (self.x[i] & !mask) | zb;
            self.z[i] = (self.z[i] & !mask) | xb;
        }
    }

    /// S: X → Y, Y → −X.
    pub fn phase(&mut self, a: usize) {
        let (w, mask) = locate(a);
        for row in 0..2 * self.num_qubits {
            let i = row * self.words + w;
            let xb = self.x[i] & mask;
            self.r[row] ^= xb != 0 && self.z[i] & mask != 0;
            self.z[i] ^= xb;
        }
    }

    /// CX with `control` → `target`.
    pub fn cnot(&mut self, control: usize, target: usize) {
        let (cw, cm) = locate(control);
        let (tw, tm) = locate(target);
        for row in 0..2 * self.num_qubits {
            let base = row * self.words;
            let xc = self.x[base + cw] & cm != 0;
            let zc = self.z[base + cw] & cm != 0;
            let xt = self.x[base + tw] & tm != 0;
            let zt = self.z[base + tw] & tm != 0;
            self.r[row] ^= xc && zt && (xt == zc);
            if xc {
                self.x[base + tw] ^= tm;
            }
            if zt {
                self.z[base + cw] ^= cm;
            }
        }
    }

    pub fn x_gate(&mut self, a: usize) {
        let (w, mask) = locate(a);
        for row in 0..2 * self.num_qubits {
            self.r[row] ^= self.z[row * self.words + w] & mask != 0;
        }
    }

    pub fn y_gate(&mut self, a: usize) {
        let (w, mask) = locate(a);
        for row in 0..2 * self.num_qubits {
            let i = row * self.words + w;
            self.r[row] ^= (self.x[i] ^ self.z[i]) & mask != 0;
        }
    }

    pub fn z_gate(&mut self, a: usize) {
        let (w, mask) = locate(a);
        for row in 0..2 * self.num_qubits {
            self.r[row] ^= self.x[row * self.words + w] & mask != 0;
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Left-multiply row `h` by row `i`, tracking the phase.
    fn rowsum(&mut self, h: usize, i: usize) {
        let mut sum: i64 = 2 * i64::from(self.r[h]) + 2 * i64::from(self.r[i]);
        for k in 0..self.words {
            let (hi, ii) = (h * self.words + k, i * self.words + k);
            let (x1, z1) = (self.x[ii], self.z[ii]);
            let (x2, z2) = (self.x[hi], self.z[hi]);
            sum += phase_exponent(x1, z1, x2, z2);
            self.x[hi] = x2 ^ x1;
            self.z[hi] = z2 ^ z1;
        }
        self.r[h] = sum.rem_euclid(4) == 2;
    }

    /// Measure qubit `a` in the Z basis, collapsing the tableau.
    pub fn measure<R: Rng>(&mut self, a: usize, rng: &mut R) -> bool {
        let n = self.num_qubits;

        if let Some(p) = (n..2 * n).find(|&row| self.x_bit(row, a)) {
            // Random outcome.
            for row in 0..2 * n {
                if row != p && self.x_bit(row, a) {
                    self.rowsum(row, p);
                }
            }
            let dest = p - n;
            let src = self.row(p);
            let dst_start = self.row(dest).start;
            self.x.copy_within(src.clone(), dst_start);
            self.z.copy_within(src.clone(), dst_start);
            self.r[dest] = self.r[p];

            self.x[src.clone()].fill(0);
            self.z[src].fill(0);
            let (w, mask) = locate(a);
            self.z[p * self.words + w] |= mask;
            let outcome = rng.gen_bool(0.5);
            self.r[p] = outcome;
            outcome
        } else {
            // Deterministic outcome: accumulate into the scratch row.
            let scratch = 2 * n;
            let range = self.row(scratch);
            self.x[range.clone()].fill(0);
            self.z[range].fill(0);
            self.r[scratch] = false;
            for row in 0..n {
                if self.x_bit(row, a) {
                    self.rowsum(scratch, row + n);
                }
            }
            self.r[scratch]
        }
    }

    /// Basis of the span of the stabilizers' X parts, by GF(2) elimination.
    fn x_span(&self) -> Vec<Vec<u64>> {
        let n = self.num_qubits;
        let mut rows: Vec<Vec<u64>> = (n..2 * n).map(|r| self.x[self.row(r)].to_vec()).collect();
        let mut basis = Vec::new();
        for q in 0..n {
            let (w, mask) = locate(q);
            let Some(pivot) = rows.iter().position(|row| row[w] & mask != 0) else {
                continue;
            };
            let p = rows.swap_remove(pivot);
            for row in &mut rows {
                if row[w] & mask != 0 {
                    for (a, b) in row.iter_mut().zip(&p) {
                        *a ^= b;
                    }
                }
            }
            basis.push(p);
        }
        basis
    }

    /// Sample `shots` outcomes over `qubits`.
    pub fn sample_counts<R: Rng>(&self, qubits: &[QubitId], shots: u32, rng: &mut R) -> Counts {
        let mut counts = Counts::new();
        if shots == 0 {
            return counts;
        }

        let mut reference = vec![0u64; self.words];
        let mut collapsed = self.clone();
        for q in 0..self.num_qubits {
            if collapsed.measure(q, rng) {
                let (w, mask) = locate(q);
                reference[w] |= mask;
            }
        }
        let basis = self.x_span();

        let mut outcome = vec![0u64; self.words];
        for _ in 0..shots {
            outcome.copy_from_slice(&reference);
            for v in &basis {
                if rng.gen_bool(0.5) {
                    for (o, b) in outcome.iter_mut().zip(v) {
                        *o ^= b;
                    }
                }
            }
            let bits: String = qubits
                .iter()
                .map(|q| {
                    let (w, mask) = locate(q.index());
                    if outcome[w] & mask != 0 { '1' } else { '0' }
                })
                .collect();
            counts.insert(bits, 1);
        }
        counts
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}

/// Sum over 64 qubits of the exponent of i picked up when multiplying Pauli
/// `(x1, z1)` into `(x2, z2)`.
#[inline]
fn phase_exponent(x1: u64, z1: u64, x2: u64, z2: u64) -> i64 {
    let y1 = x1 & z1;
    let xo = x1 & !z1;
    let zo = !x1 & z1;
    let plus = (y1 & z2 & !x2) | (xo & z2 & x2) | (zo & x2 & !z2);
    let minus = (y1 & x2 & !z2) | (xo & z2 & !x2) | (zo & x2 & z2);
    i64::from(plus.count_ones()) - i64::from(minus.count_ones())
}
