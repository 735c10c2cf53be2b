//! Born-rule measurement of a register
//!
//! [`MeasurementSampler`] reads outcome probabilities off a register and
//! draws outcomes from a caller-supplied random source. A draw collapses the
//! register and moves it to [`RegisterPhase::Measured`]; after that only
//! read-only queries succeed.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array1;
use num_complex::Complex64;
use rand::Rng;
use tracing::trace;

use crate::error::{QuantumError, Result};
use crate::quantum::gate::validate_targets;
use crate::quantum::register::{Register, RegisterPhase};

/// Probability of every basis index of some set of qubits
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    qubit_count: usize,
    probabilities: Vec<f64>,
}

impl Distribution {
    /// Number of qubits the distribution ranges over
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of `index`; zero outside the basis range
    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities.get(index).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Sum of all probabilities (1 within tolerance for a physical state)
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// The most probable index; ties go to the lowest index
    pub fn most_likely(&self) -> Option<(usize, f64)> {
        self.probabilities
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((i, p)),
            })
    }

    /// Iterate `(index, probability)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.probabilities.iter().copied().enumerate()
    }

    /// Non-zero entries as a map from basis index to probability
    pub fn to_map(&self) -> BTreeMap<usize, f64> {
        self.iter().filter(|&(_, p)| p > 0.0).collect()
    }

    /// Marginal over `qubits`, packed in the order they are listed
    pub fn marginal(&self, qubits: &[usize]) -> Result<Distribution> {
        validate_targets(qubits, self.qubit_count)?;

        let mut probabilities = vec![0.0; 1 << qubits.len()];
        for (i, p) in self.iter() {
            probabilities[extract_bits(i, qubits, self.qubit_count)] += p;
        }

        Ok(Distribution {
            qubit_count: qubits.len(),
            probabilities,
        })
    }
}

/// The result of one draw
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Measured qubits, in the order their bits are packed into `outcome`
    pub qubits: Vec<usize>,
    /// Observed value over `qubits`, qubits[0] most significant
    pub outcome: usize,
    /// Probability the outcome had before the draw
    pub probability: f64,
}

impl Measurement {
    /// The outcome as a bit string, one character per measured qubit
    pub fn bits(&self) -> String {
        format!("{:0width$b}", self.outcome, width = self.qubits.len())
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}⟩ (p={})", self.bits(), self.probability)
    }
}

/// Samples measurement outcomes from a register
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementSampler;

impl MeasurementSampler {
    pub fn new() -> Self {
        MeasurementSampler
    }

    /// Squared magnitude of every amplitude
    ///
    /// Allowed on `Ready` and `Measured` registers; after a measurement the
    /// distribution is concentrated on the collapsed state.
    pub fn distribution(&self, register: &Register) -> Result<Distribution> {
        if register.phase() == RegisterPhase::Uninitialized {
            return Err(QuantumError::InvalidStateTransition {
                phase: register.phase(),
                operation: "read the distribution of",
            });
        }

        Ok(Distribution {
            qubit_count: register.qubit_count(),
            probabilities: register.amplitudes().iter().map(|a| a.norm_sqr()).collect(),
        })
    }

    /// Measure every qubit and collapse the register onto the outcome
    pub fn sample<R: Rng>(&self, register: &mut Register, rng: &mut R) -> Result<Measurement> {
        let qubits: Vec<usize> = (0..register.qubit_count()).collect();
        self.sample_qubits(register, &qubits, rng)
    }

    /// Measure `qubits` and project the register onto the observed value
    ///
    /// The unmeasured part of the state is renormalized and kept.
    pub fn sample_qubits<R: Rng>(
        &self,
        register: &mut Register,
        qubits: &[usize],
        rng: &mut R,
    ) -> Result<Measurement> {
        register.require(RegisterPhase::Ready, "sample")?;
        let qubit_count = register.qubit_count();
        validate_targets(qubits, qubit_count)?;

        let marginal = self.checked_distribution(register)?.marginal(qubits)?;
        let outcome = draw(marginal.probabilities(), rng)
            .ok_or(QuantumError::NotNormalized { norm_squared: marginal.total() })?;
        let probability = marginal.probability(outcome);

        let scale = Complex64::new(1.0 / probability.sqrt(), 0.0);
        let mut collapsed = Array1::zeros(register.dimension());
        for (i, amp) in register.amplitudes().iter().enumerate() {
            if extract_bits(i, qubits, qubit_count) == outcome {
                collapsed[i] = amp * scale;
            }
        }

        let mut support = collapsed
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm_sqr() > 0.0)
            .map(|(i, _)| i);
        let basis_index = match (support.next(), support.next()) {
            (Some(i), None) => Some(i),
            _ => None,
        };

        trace!(?qubits, outcome, probability, "sampled register");
        register.collapse(collapsed, basis_index);

        Ok(Measurement {
            qubits: qubits.to_vec(),
            outcome,
            probability,
        })
    }

    /// Distribution of a register about to be sampled
    ///
    /// With `verify_norm` set, a total outside the register's tolerance is
    /// an error rather than being renormalized away.
    fn checked_distribution(&self, register: &Register) -> Result<Distribution> {
        let distribution = self.distribution(register)?;
        let config = register.config();
        let total = distribution.total();
        let within = (total - 1.0).abs() <= config.tolerance;
        if config.verify_norm && !within {
            return Err(QuantumError::NotNormalized { norm_squared: total });
        }
        Ok(distribution)
    }

    /// Draw `shots` full-register outcomes without touching the register
    pub fn sample_counts<R: Rng>(
        &self,
        register: &Register,
        shots: usize,
        rng: &mut R,
    ) -> Result<BTreeMap<usize, usize>> {
        register.require(RegisterPhase::Ready, "sample")?;
        let distribution = self.checked_distribution(register)?;

        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            let outcome = draw(distribution.probabilities(), rng)
                .ok_or(QuantumError::NotNormalized { norm_squared: distribution.total() })?;
            *counts.entry(outcome).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

/// Pack the bits of `index` at `qubits` into a smaller index
fn extract_bits(index: usize, qubits: &[usize], qubit_count: usize) -> usize {
    qubits.iter().fold(0, |acc, &q| {
        (acc << 1) | ((index >> (qubit_count - 1 - q)) & 1)
    })
}

/// Inverse-CDF draw that never lands on a zero-probability index
fn draw<R: Rng>(probabilities: &[f64], rng: &mut R) -> Option<usize> {
    let total: f64 = probabilities.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let r = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, &p) in probabilities.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = Some(i);
        if r < cumulative {
            return Some(i);
        }
    }
    last_positive
}
