//! OpenQASM 3.0 emission.

use std::fmt::Write;

use crate::instruction::InstructionKind;
use crate::kernel::Kernel;

/// Emit a kernel as OpenQASM 3.0 source.
///
/// Measured qubits are written to a classical register `c` in measurement
/// order, so `c[k]` holds the k-th character of a sampled bitstring.
pub fn emit(kernel: &Kernel) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n\n");

    let num_qubits = kernel.num_qubits();
    let num_clbits = kernel.measured_qubits().len();
    if num_qubits > 0 {
        let _ = writeln!(out, "qubit[{num_qubits}] q;");
    }
    if num_clbits > 0 {
        let _ = writeln!(out, "bit[{num_clbits}] c;");
    }
    if num_qubits > 0 || num_clbits > 0 {
        out.push('\n');
    }

    let mut next_clbit = 0usize;
    for inst in kernel.instructions() {
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                let qubits = inst
                    .qubits
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                match gate.angle() {
                    Some(theta) => {
                        let _ = writeln!(out, "{}({theta}) {qubits};", gate.name());
                    }
                    None => {
                        let _ = writeln!(out, "{} {qubits};", gate.name());
                    }
                }
            }
            InstructionKind::Measure => {
                for q in &inst.qubits {
                    let _ = writeln!(out, "c[{next_clbit}] = measure {q};");
                    next_clbit += 1;
                }
            }
        }
    }

    out
}

impl Kernel {
    /// Emit this kernel as OpenQASM 3.0 source.
    pub fn to_qasm(&self) -> String {
        emit(self)
    }
}
