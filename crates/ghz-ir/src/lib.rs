//! GHZ Kernel Representation
//!
//! This crate provides the kernel builder used to express GHZ state
//! preparation and other small circuits. A [`Kernel`] accumulates gate
//! operations in the order they are applied; backends in `ghz-hal` sample it.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] and [`QubitRegister`], returned by [`Kernel::qalloc`]
//! - **Gates**: [`StandardGate`] (H, X, CX, ...)
//! - **Instructions**: [`Instruction`] combining a gate or measurement with operands
//! - **Kernel**: [`Kernel`], the builder
//! - **GHZ**: [`ghz_state`], the fixed H + CX-chain + measurement sequence
//!
//! # Example: Building a GHZ State by Hand
//!
//! ```rust
//! use ghz_ir::Kernel;
//!
//! let mut kernel = Kernel::new("ghz");
//! let q = kernel.qalloc(3);
//!
//! kernel.h(q[0]).unwrap();
//! kernel.cx(q[0], q[1]).unwrap();
//! kernel.cx(q[1], q[2]).unwrap();
//! kernel.mz(&q).unwrap();
//!
//! assert_eq!(kernel.num_qubits(), 3);
//! assert_eq!(kernel.depth(), 4);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Clifford |
//! |------|--------|----------|
//! | `id`, `x`, `y`, `z` | 1 | yes |
//! | `h`, `s`, `sdg` | 1 | yes |
//! | `t`, `tdg` | 1 | no |
//! | `rx`, `ry`, `rz` | 1 | no |
//! | `cx`, `cz`, `swap` | 2 | yes |

pub mod error;
pub mod gate;
pub mod ghz;
pub mod instruction;
pub mod kernel;
pub mod qasm;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use ghz::{DEFAULT_NUM_QUBITS, ghz_state};
pub use instruction::{Instruction, InstructionKind};
pub use kernel::Kernel;
pub use qubit::{QubitId, QubitRegister};
