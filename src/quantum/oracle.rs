// src/quantum/oracle.rs
//! Oracles and the Grover diffusion operator
//!
//! An oracle encodes a classical function as a unitary so it can be queried
//! on a superposition. Two families are supported:
//!
//! - bit-flip oracles `Uf|x⟩|y⟩ = |x⟩|y ⊕ f(x)⟩` built from a [`TruthTable`],
//!   with the ancilla `y` as the last qubit;
//! - phase oracles `I − 2|t⟩⟨t|` marking a single basis index `t`.
//!
//! Each construction has several interchangeable strategies. They produce
//! the same matrix; the gate-level ones show how the operator decomposes into
//! X masks and multi-controlled gates.

use std::fmt::{self, Display};
use std::str::FromStr;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SimulatorConfig;
use crate::error::{QuantumError, Result};
use super::gate::{layer, Operator, QuantumGate, StandardGate};
use super::linalg;

/// Classification of a boolean function under the Deutsch-Jozsa promise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionClass {
    /// Same output on every input
    Constant,
    /// Outputs 1 on exactly half the inputs
    Balanced,
}

/// A total boolean function on `k` input bits
///
/// Entry `x` is `f(x)`, where `x` reads input qubit 0 as its most
/// significant bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TruthTable {
    values: Vec<bool>,
    input_bits: usize,
}

impl TruthTable {
    /// Wrap `2^k` outputs (k >= 1)
    pub fn new(values: Vec<bool>) -> Result<Self> {
        let len = values.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QuantumError::invalid_truth_table(format!(
                "expected 2^k entries with k >= 1, got {}",
                len
            )));
        }
        Ok(TruthTable {
            input_bits: len.trailing_zeros() as usize,
            values,
        })
    }

    /// Parse a string of `0`/`1` characters, one per input
    pub fn from_bit_string(bits: &str) -> Result<Self> {
        let values = bits
            .chars()
            .enumerate()
            .map(|(i, ch)| match ch {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(QuantumError::invalid_truth_table(format!(
                    "unexpected character {:?} at position {}",
                    other, i
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(values)
    }

    /// The table that is 1 only at `target`
    pub fn one_hot(target: usize, input_bits: usize) -> Result<Self> {
        let dimension = linalg::dimension_for(input_bits)?;
        if target >= dimension {
            return Err(QuantumError::OutOfRange { index: target, dimension });
        }
        let values = (0..dimension).map(|x| x == target).collect();
        Self::new(values)
    }

    /// Number of input bits `k`
    pub fn input_bits(&self) -> usize {
        self.input_bits
    }

    /// Number of entries, `2^k`
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// `f(x)`
    pub fn evaluate(&self, x: usize) -> Result<bool> {
        self.values.get(x).copied().ok_or(QuantumError::OutOfRange {
            index: x,
            dimension: self.values.len(),
        })
    }

    pub fn is_constant(&self) -> bool {
        self.values.iter().all(|&v| v == self.values[0])
    }

    pub fn is_balanced(&self) -> bool {
        self.values.iter().filter(|&&v| v).count() * 2 == self.values.len()
    }

    /// `None` when the function is neither constant nor balanced
    pub fn classify(&self) -> Option<FunctionClass> {
        if self.is_constant() {
            Some(FunctionClass::Constant)
        } else if self.is_balanced() {
            Some(FunctionClass::Balanced)
        } else {
            None
        }
    }
}

impl FromStr for TruthTable {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bit_string(s)
    }
}

impl TryFrom<String> for TruthTable {
    type Error = QuantumError;

    fn try_from(bits: String) -> Result<Self> {
        Self::from_bit_string(&bits)
    }
}

impl From<TruthTable> for String {
    fn from(table: TruthTable) -> Self {
        table.to_string()
    }
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &v in &self.values {
            write!(f, "{}", if v { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// How a bit-flip oracle is assembled from a truth table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TruthTableStrategy {
    /// Write the permutation matrix directly
    #[default]
    Permutation,
    /// For every `x` with `f(x) = 1`: X mask, multi-controlled X onto the
    /// ancilla, X mask
    GateDecomposition,
}

/// How a phase oracle `I − 2|t⟩⟨t|` is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhaseOracleStrategy {
    /// Write the diagonal directly
    #[default]
    Diagonal,
    /// X mask, multi-controlled Z, X mask
    GateDecomposition,
}

/// How the diffusion operator `2|s⟩⟨s| − I` is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiffusionStrategy {
    /// `2A − I` with `A` the all-`1/N` averaging matrix
    #[default]
    Reflection,
    /// H, X, multi-controlled Z, X, H on every search qubit
    GateDecomposition,
}

/// Builds oracles and diffusion operators
///
/// Stateless apart from the numerical settings used for the unitarity check.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleBuilder {
    config: SimulatorConfig,
}

impl OracleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with explicit numerical settings; rejects an invalid config
    pub fn with_config(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(OracleBuilder { config })
    }

    /// Bit-flip oracle for `f` on `k + 1` qubits, ancilla last
    pub fn from_truth_table(&self, f: &TruthTable) -> Result<Operator> {
        self.from_truth_table_with(f, TruthTableStrategy::default())
    }

    /// Bit-flip oracle for `f` using the given strategy
    pub fn from_truth_table_with(
        &self,
        f: &TruthTable,
        strategy: TruthTableStrategy,
    ) -> Result<Operator> {
        let k = f.input_bits();
        let dim = linalg::dimension_for(k + 1)?;
        let name = format!("Uf[{}]", f);

        let matrix = match strategy {
            TruthTableStrategy::Permutation => {
                let mut matrix = Array2::zeros((dim, dim));
                for (x, &fx) in f.values().iter().enumerate() {
                    for y in 0..2 {
                        let input = (x << 1) | y;
                        let output = (x << 1) | (y ^ fx as usize);
                        matrix[[output, input]] = Complex64::new(1.0, 0.0);
                    }
                }
                matrix
            },
            TruthTableStrategy::GateDecomposition => {
                let flip = Operator::from_parts(
                    "flip",
                    k + 1,
                    StandardGate::MultiControlledX(k + 1).matrix(),
                );
                let mut result = Operator::identity(k + 1)?;
                for (x, _) in f.values().iter().enumerate().filter(|&(_, &fx)| fx) {
                    let mask = x_mask(x, k, k + 1)?;
                    result = result.then(&mask)?.then(&flip)?.then(&mask)?;
                }
                result.into_matrix()
            },
        };

        let oracle = self.finish(name, matrix)?;
        debug!(table = %f, ?strategy, "built truth-table oracle");
        Ok(oracle)
    }

    /// Phase oracle `I − 2|target⟩⟨target|` on `total_qubits` qubits
    pub fn from_target(&self, target: usize, total_qubits: usize) -> Result<Operator> {
        self.from_target_with(target, total_qubits, PhaseOracleStrategy::default())
    }

    /// Phase oracle using the given strategy
    pub fn from_target_with(
        &self,
        target: usize,
        total_qubits: usize,
        strategy: PhaseOracleStrategy,
    ) -> Result<Operator> {
        let dim = register_dimension(total_qubits, "phase oracle")?;
        if target >= dim {
            return Err(QuantumError::OutOfRange { index: target, dimension: dim });
        }

        let name = format!("Uf[{}]", target);
        let matrix = match strategy {
            PhaseOracleStrategy::Diagonal => {
                let mut matrix = linalg::identity(dim);
                matrix[[target, target]] = Complex64::new(-1.0, 0.0);
                matrix
            },
            PhaseOracleStrategy::GateDecomposition => {
                let mask = x_mask(target, total_qubits, total_qubits)?;
                let phase = Operator::from_parts(
                    "phase",
                    total_qubits,
                    StandardGate::MultiControlledZ(total_qubits).matrix(),
                );
                mask.then(&phase)?.then(&mask)?.into_matrix()
            },
        };

        let oracle = self.finish(name, matrix)?;
        debug!(target, total_qubits, ?strategy, "built phase oracle");
        Ok(oracle)
    }

    /// Bit-flip oracle on `search_qubits + 1` qubits that marks `target`
    ///
    /// With the ancilla prepared in |−⟩ this acts as the phase oracle on the
    /// search qubits.
    pub fn marking_oracle(
        &self,
        target: usize,
        search_qubits: usize,
        strategy: TruthTableStrategy,
    ) -> Result<Operator> {
        register_dimension(search_qubits, "marking oracle")?;
        let table = TruthTable::one_hot(target, search_qubits)?;
        self.from_truth_table_with(&table, strategy)
    }

    /// Inversion about the mean on `search_qubits` qubits
    pub fn diffusion(&self, search_qubits: usize, strategy: DiffusionStrategy) -> Result<Operator> {
        let dim = register_dimension(search_qubits, "diffusion operator")?;
        let all: Vec<usize> = (0..search_qubits).collect();

        let matrix = match strategy {
            DiffusionStrategy::Reflection => {
                let average = Complex64::new(2.0 / dim as f64, 0.0);
                let mut matrix = Array2::from_elem((dim, dim), average);
                for i in 0..dim {
                    matrix[[i, i]] -= Complex64::new(1.0, 0.0);
                }
                matrix
            },
            DiffusionStrategy::GateDecomposition => {
                let h = layer(&StandardGate::H, &all, search_qubits)?;
                let x = layer(&StandardGate::X, &all, search_qubits)?;
                let cz = Operator::from_parts(
                    "phase",
                    search_qubits,
                    StandardGate::MultiControlledZ(search_qubits).matrix(),
                );
                let circuit = h.then(&x)?.then(&cz)?.then(&x)?.then(&h)?;
                // H X CZ X H = I − 2|s⟩⟨s|; drop the global -1 so both
                // strategies agree entrywise
                circuit.into_matrix().mapv(|c| -c)
            },
        };

        let op = self.finish(format!("D({})", search_qubits), matrix)?;
        debug!(search_qubits, ?strategy, "built diffusion operator");
        Ok(op)
    }

    fn finish(&self, name: String, matrix: Array2<Complex64>) -> Result<Operator> {
        if self.config.verify_unitarity {
            Operator::with_tolerance(name, matrix, self.config.tolerance)
        } else {
            let qubits = linalg::qubits_for_dimension(matrix.nrows())
                .ok_or_else(|| QuantumError::dimension_mismatch(matrix.nrows().next_power_of_two(), matrix.nrows()))?;
            Ok(Operator::from_parts(name, qubits, matrix))
        }
    }
}

/// `2^qubits` for a construction that needs at least one qubit
fn register_dimension(qubits: usize, what: &str) -> Result<usize> {
    if qubits == 0 {
        return Err(QuantumError::InvalidQubitIndex {
            index: 0,
            reason: format!("a {} needs at least one qubit", what),
        });
    }
    linalg::dimension_for(qubits)
}

/// X on every one of the first `width` qubits whose bit in `value` is 0
fn x_mask(value: usize, width: usize, total_qubits: usize) -> Result<Operator> {
    let zeros: Vec<usize> = (0..width)
        .filter(|&q| (value >> (width - 1 - q)) & 1 == 0)
        .collect();
    layer(&StandardGate::X, &zeros, total_qubits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_mask_targets_zero_bits() {
        // 0b01 over two search qubits plus an ancilla: X on qubit 0 only
        let mask = x_mask(0b01, 2, 3).unwrap();
        let expected = layer(&StandardGate::X, &[0], 3).unwrap();
        assert!(mask.equals(&expected));
    }

    #[test]
    fn test_truth_table_display_round_trip() {
        let table: TruthTable = "0110".parse().unwrap();
        assert_eq!(table.to_string(), "0110");
        assert_eq!(table.input_bits(), 2);
    }
}
