// quantum_melody_sim: the quantum half of the melody pipeline.
//
// A deliberately small state-vector simulator: two single-qubit gates, a
// fixed table of emotion presets, and independent-shot sampling into an
// ordered outcome histogram. No I/O, no global state; every call works on
// values the caller owns.
//
// Module overview:
// - `state.rs`:     `StateVector`: amplitude storage, Hadamard / Pauli-X,
//                   Born-rule shot sampling.
// - `gate.rs`:      `GateOp`: the two-variant gate vocabulary.
// - `circuit.rs`:   `Emotion` presets, `Circuit`, `build_circuit`.
// - `histogram.rs`: `Histogram` and `Bitstring`: outcome counts in
//                   ascending bitstring order.
// - `error.rs`:     `SimError` (`InvalidConfig`, `InvalidQubitIndex`).
// - `prng`:         Re-exported from `quantum_melody_prng`.
//
// Bit order: qubit 0 is the most significant bit of a basis index, so
// X(0) on |000> yields |100>.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod histogram;
pub use quantum_melody_prng as prng;
pub mod state;

pub use circuit::{Circuit, Emotion, NUM_QUBITS, build_circuit};
pub use error::{Result, SimError};
pub use gate::GateOp;
pub use histogram::{Bitstring, Histogram};
pub use state::{MAX_QUBITS, NORM_EPSILON, StateVector};
