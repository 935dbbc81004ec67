// Gate vocabulary: Hadamard and Pauli-X on a single qubit.
//
// The emotion presets never need more than these two, so `GateOp` is a
// closed enum rather than a matrix-carrying trait object. The amplitude
// arithmetic for each variant lives in `state.rs`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One gate application, tagged with the qubit it acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateOp {
    Hadamard(usize),
    PauliX(usize),
}

impl GateOp {
    pub fn qubit(self) -> usize {
        match self {
            GateOp::Hadamard(q) | GateOp::PauliX(q) => q,
        }
    }

    /// Short circuit-diagram symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            GateOp::Hadamard(_) => "H",
            GateOp::PauliX(_) => "X",
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.symbol(), self.qubit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_symbol_and_qubit() {
        assert_eq!(GateOp::Hadamard(2).to_string(), "H(2)");
        assert_eq!(GateOp::PauliX(0).to_string(), "X(0)");
    }

    #[test]
    fn serde_shape_is_externally_tagged() {
        let json = serde_json::to_string(&GateOp::PauliX(1)).unwrap();
        assert_eq!(json, r#"{"PauliX":1}"#);
    }
}
