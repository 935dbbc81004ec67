// Dense state-vector register and Born-rule shot sampling.
//
// The register is a `Vec<Complex64>` of length 2^N. Basis index bits are
// ordered most-significant-qubit-first: qubit 0 is the highest bit, qubit
// N-1 the lowest. A gate on qubit `q` therefore pairs indices that differ by
// `stride = 1 << (N - 1 - q)`. Both gates walk the vector in blocks of
// `2 * stride` and touch each pair exactly once:
//
// - Hadamard: `(a, b) -> ((a + b) / sqrt2, (a - b) / sqrt2)`
// - Pauli-X:  `(a, b) -> (b, a)`
//
// Both are unitary, so the total probability mass stays 1 up to rounding.
//
// Sampling draws `shots` independent outcomes from the same pre-measurement
// distribution. The register is never collapsed; `sample_shots` borrows it
// immutably. Each draw consumes exactly one `next_f64()` from the caller's
// `ShotRng`, so a seed fixes the histogram.
//
// The register size is capped at `MAX_QUBITS` so a bad qubit count cannot
// allocate an unbounded vector.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;
use quantum_melody_prng::ShotRng;
use tracing::debug;

use crate::error::{Result, SimError};
use crate::gate::GateOp;
use crate::histogram::Histogram;

/// Largest register `StateVector::new` will allocate (2^16 amplitudes).
pub const MAX_QUBITS: usize = 16;

/// Tolerance used by `is_normalized` callers in this workspace.
pub const NORM_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// The all-zero basis state |0...0> on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Wrap caller-supplied amplitudes. The slice length must be
    /// 2^`num_qubits`; normalization is not checked.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let expected = 1usize << num_qubits;
        if amplitudes.len() != expected {
            return Err(SimError::invalid_config(format!(
                "expected {expected} amplitudes for {num_qubits} qubits, got {}",
                amplitudes.len()
            )));
        }
        Ok(Self {
            num_qubits,
            amplitudes: amplitudes.to_vec(),
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Sum of squared magnitudes. 1.0 for a valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm_sqr() - 1.0).abs() < epsilon
    }

    /// Born-rule probability of each basis state, indexed like `amplitudes`.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Index distance between the two halves of a pair for `qubit`.
    fn stride(&self, qubit: usize) -> Result<usize> {
        if qubit >= self.num_qubits {
            return Err(SimError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(1 << (self.num_qubits - 1 - qubit))
    }

    pub fn apply_hadamard(&mut self, qubit: usize) -> Result<()> {
        let stride = self.stride(qubit)?;
        let factor = Complex64::new(FRAC_1_SQRT_2, 0.0);
        for block in self.amplitudes.chunks_exact_mut(stride * 2) {
            let (low, high) = block.split_at_mut(stride);
            for (a, b) in low.iter_mut().zip(high.iter_mut()) {
                let (x, y) = (*a, *b);
                *a = (x + y) * factor;
                *b = (x - y) * factor;
            }
        }
        Ok(())
    }

    pub fn apply_pauli_x(&mut self, qubit: usize) -> Result<()> {
        let stride = self.stride(qubit)?;
        for block in self.amplitudes.chunks_exact_mut(stride * 2) {
            let (low, high) = block.split_at_mut(stride);
            low.swap_with_slice(high);
        }
        Ok(())
    }

    pub fn apply(&mut self, gate: GateOp) -> Result<()> {
        match gate {
            GateOp::Hadamard(q) => self.apply_hadamard(q),
            GateOp::PauliX(q) => self.apply_pauli_x(q),
        }
    }

    /// Apply gates in order, stopping at the first invalid one.
    pub fn apply_all(&mut self, gates: &[GateOp]) -> Result<()> {
        for &gate in gates {
            self.apply(gate)?;
        }
        Ok(())
    }

    /// Draw `shots` independent measurements and count the outcomes.
    pub fn sample_shots(&self, shots: u32, rng: &mut ShotRng) -> Result<Histogram> {
        if shots == 0 {
            return Err(SimError::invalid_config("shot count must be positive"));
        }

        let probabilities = self.probabilities();
        let fallback = probabilities
            .iter()
            .rposition(|&p| p > 0.0)
            .ok_or_else(|| SimError::invalid_config("state has zero probability mass"))?;

        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for _ in 0..shots {
            let outcome = draw_outcome(&probabilities, rng.next_f64()).unwrap_or(fallback);
            *counts.entry(outcome).or_insert(0) += 1;
        }

        let histogram = Histogram::from_counts(self.num_qubits, counts);
        debug!(shots, outcomes = histogram.len(), %histogram, "sampled register");
        Ok(histogram)
    }
}

fn check_qubit_count(num_qubits: usize) -> Result<()> {
    if num_qubits == 0 {
        return Err(SimError::invalid_config("qubit count must be positive"));
    }
    if num_qubits > MAX_QUBITS {
        return Err(SimError::invalid_config(format!(
            "qubit count {num_qubits} exceeds the limit of {MAX_QUBITS}"
        )));
    }
    Ok(())
}

/// First index whose cumulative probability exceeds `r`. `None` when
/// rounding leaves `r` past the accumulated total.
fn draw_outcome(probabilities: &[f64], r: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    for (index, &p) in probabilities.iter().enumerate() {
        cumulative += p;
        if p > 0.0 && r < cumulative {
            return Some(index);
        }
    }
    None
}
