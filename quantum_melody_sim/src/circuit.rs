// Emotion presets and the circuits they build.
//
// Every preset runs on a 3-qubit register:
//
// | emotion | gates              |
// |---------|--------------------|
// | happy   | H(0), H(1), H(2)   |
// | sad     | X(0)               |
// | calm    | H(1)               |
// | other   | H(0), X(2)         |
//
// Label matching is exact and case-sensitive. Anything that is not one of
// the three named labels becomes `Emotion::Mixed` and gets the default
// circuit. That fallback is not an error.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::gate::GateOp;
use crate::state::StateVector;

/// Register width shared by all presets.
pub const NUM_QUBITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Sad,
    Calm,
    /// Fallback for any unrecognized label.
    Mixed,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [Emotion::Happy, Emotion::Sad, Emotion::Calm, Emotion::Mixed];

    /// Total mapping from a request label. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label {
            "happy" => Emotion::Happy,
            "sad" => Emotion::Sad,
            "calm" => Emotion::Calm,
            _ => Emotion::Mixed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Calm => "calm",
            Emotion::Mixed => "mixed",
        }
    }

    pub fn gates(self) -> Vec<GateOp> {
        match self {
            Emotion::Happy => (0..NUM_QUBITS).map(GateOp::Hadamard).collect(),
            Emotion::Sad => vec![GateOp::PauliX(0)],
            Emotion::Calm => vec![GateOp::Hadamard(1)],
            Emotion::Mixed => vec![GateOp::Hadamard(0), GateOp::PauliX(2)],
        }
    }

    pub fn circuit(self) -> Circuit {
        Circuit {
            num_qubits: NUM_QUBITS,
            gates: self.gates(),
        }
    }
}

impl FromStr for Emotion {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Emotion::from_label(s))
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An ordered gate list over a fixed-width register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    pub num_qubits: usize,
    pub gates: Vec<GateOp>,
}

impl Circuit {
    /// Fresh |0...0> register with every gate applied in order.
    pub fn prepare(&self) -> Result<StateVector> {
        let mut state = StateVector::new(self.num_qubits)?;
        state.apply_all(&self.gates)?;
        Ok(state)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} qubits:", self.num_qubits)?;
        for gate in &self.gates {
            write!(f, " {gate}")?;
        }
        Ok(())
    }
}

/// Circuit for a raw request label.
pub fn build_circuit(label: &str) -> Circuit {
    let emotion = Emotion::from_label(label);
    let circuit = emotion.circuit();
    debug!(label, %emotion, %circuit, "built circuit");
    circuit
}
