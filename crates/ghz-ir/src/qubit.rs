//! Qubit identifiers and registers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Index of a qubit within a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The qubit index as a `usize`, for addressing simulator state.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}]", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// A contiguous block of qubits returned by [`Kernel::qalloc`].
///
/// [`Kernel::qalloc`]: crate::Kernel::qalloc
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitRegister {
    qubits: Vec<QubitId>,
}

impl QubitRegister {
    /// `size` ids from `start`, or `None` if they run past `u32::MAX`.
    pub(crate) fn contiguous(start: u32, size: u32) -> Option<Self> {
        let end = start.checked_add(size)?;
        Some(Self {
            qubits: (start..end).map(QubitId).collect(),
        })
    }

    /// Number of qubits in the register.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the register holds no qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Get a qubit by position, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<QubitId> {
        self.qubits.get(index).copied()
    }

    /// First qubit of the register.
    pub fn first(&self) -> Option<QubitId> {
        self.qubits.first().copied()
    }

    /// Iterate over the qubits in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// The qubits as a slice.
    pub fn as_slice(&self) -> &[QubitId] {
        &self.qubits
    }
}

impl Index<usize> for QubitRegister {
    type Output = QubitId;

    fn index(&self, index: usize) -> &QubitId {
        &self.qubits[index]
    }
}

impl<'a> IntoIterator for &'a QubitRegister {
    type Item = QubitId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, QubitId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.qubits.iter().copied()
    }
}
