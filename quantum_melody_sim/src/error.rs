// Error taxonomy for register construction, gate application, and sampling.
//
// Both variants are local to a single request: callers abort that request's
// pipeline and move on. Unknown emotion labels are deliberately absent here,
// since `circuit.rs` routes them to the default preset instead of failing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Non-positive qubit or shot count, an oversized register, or an
    /// amplitude slice whose length does not match the register.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A gate addressed a qubit outside `[0, num_qubits)`.
    #[error("invalid qubit index {index} for {num_qubits}-qubit register")]
    InvalidQubitIndex { index: usize, num_qubits: usize },
}

impl SimError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
