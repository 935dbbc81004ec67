// Outcome histogram produced by shot sampling.
//
// Keys are basis-state indices, rendered as fixed-width bitstrings with
// qubit 0 as the most significant bit. Storage is a `BTreeMap`, so iteration
// is always in ascending bitstring order. The melody mapper expands outcomes
// in exactly this order before truncating, which makes the order part of the
// observable output, not an incidental detail.
//
// A histogram is built once by `StateVector::sample_shots` and is read-only
// afterwards; there is no public way to add counts to an existing one.
// Deserialized histograms go through `TryFrom<RawHistogram>`, which rejects
// outcomes wider than the register and a `shots` that disagrees with the
// counts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::state::MAX_QUBITS;

/// One measurement outcome: `width` bits, most significant qubit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bitstring {
    pub value: usize,
    pub width: usize,
}

impl Bitstring {
    pub fn new(value: usize, width: usize) -> Self {
        Self { value, width }
    }

    /// The lowest `n` bits as an integer code (the trailing `n` characters
    /// of the rendered string).
    pub fn last_bits(self, n: usize) -> usize {
        if n >= usize::BITS as usize {
            self.value
        } else {
            self.value & ((1usize << n) - 1)
        }
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.value, width = self.width)
    }
}

/// Outcome counts for one sampling run. Counts sum to `shots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHistogram")]
pub struct Histogram {
    num_qubits: usize,
    shots: u32,
    counts: BTreeMap<usize, u32>,
}

/// Wire shape of a `Histogram` before its invariants are checked.
#[derive(Deserialize)]
struct RawHistogram {
    num_qubits: usize,
    shots: u32,
    counts: BTreeMap<usize, u32>,
}

impl TryFrom<RawHistogram> for Histogram {
    type Error = SimError;

    fn try_from(raw: RawHistogram) -> Result<Self, SimError> {
        if raw.num_qubits == 0 || raw.num_qubits > MAX_QUBITS {
            return Err(SimError::invalid_config(format!(
                "histogram register must have 1..={MAX_QUBITS} qubits, got {}",
                raw.num_qubits
            )));
        }
        if let Some(&outcome) = raw.counts.keys().find(|&&k| k >> raw.num_qubits != 0) {
            return Err(SimError::invalid_config(format!(
                "outcome {outcome} does not fit in {} qubits",
                raw.num_qubits
            )));
        }
        let total = raw
            .counts
            .values()
            .try_fold(0u32, |acc, &c| acc.checked_add(c))
            .ok_or_else(|| SimError::invalid_config("histogram counts overflow"))?;
        if total != raw.shots {
            return Err(SimError::invalid_config(format!(
                "histogram counts sum to {total}, but shots is {}",
                raw.shots
            )));
        }
        Ok(Self::from_counts(raw.num_qubits, raw.counts))
    }
}

impl Histogram {
    /// Build from per-outcome counts. Zero counts are dropped so that only
    /// observed outcomes are enumerated.
    pub fn from_counts(num_qubits: usize, counts: BTreeMap<usize, u32>) -> Self {
        let counts: BTreeMap<usize, u32> = counts.into_iter().filter(|&(_, c)| c > 0).collect();
        let shots = counts.values().sum();
        Self {
            num_qubits,
            shots,
            counts,
        }
    }

    /// A histogram in which one outcome was observed `count` times.
    pub fn single(num_qubits: usize, outcome: usize, count: u32) -> Self {
        Self::from_counts(num_qubits, BTreeMap::from([(outcome, count)]))
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, outcome: usize) -> u32 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Observed outcomes in ascending bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (Bitstring, u32)> + '_ {
        let width = self.num_qubits;
        self.counts
            .iter()
            .map(move |(&value, &count)| (Bitstring::new(value, width), count))
    }

    /// Counts keyed by rendered bitstring, e.g. `{"100": 16}`.
    pub fn to_bitstring_counts(&self) -> BTreeMap<String, u32> {
        self.iter().map(|(b, c)| (b.to_string(), c)).collect()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (bits, count) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{bits}: {count}")?;
            first = false;
        }
        Ok(())
    }
}
