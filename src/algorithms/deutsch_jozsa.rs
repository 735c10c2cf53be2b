//! Deutsch and Deutsch-Jozsa
//!
//! ```text
//! |0> H --+----+-- H -- M
//! |0> H --| Uf |-- H -- M
//! |1> H --+----+---------
//! ```
//!
//! The input qubits read all-zero with probability 1 iff `f` is constant.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DeutschJozsaConfig;
use crate::error::{QuantumError, Result};
use crate::quantum::gate::{layer, StandardGate};
use crate::quantum::oracle::{FunctionClass, OracleBuilder, TruthTable};
use crate::quantum::register::Register;
use crate::simulators::{Distribution, MeasurementSampler};

/// Outcome of one Deutsch-Jozsa run
#[derive(Debug, Clone, PartialEq)]
pub struct DeutschJozsaReport {
    pub table: TruthTable,
    /// Distribution over the input qubits only
    pub distribution: Distribution,
    /// Probability of reading all input qubits as 0
    pub zero_probability: f64,
    /// `None` when the probability is neither ~1 nor ~0 (promise broken)
    pub verdict: Option<FunctionClass>,
}

impl DeutschJozsaReport {
    /// The verdict agrees with a classical check of the table
    pub fn is_confirmed(&self) -> bool {
        self.verdict.is_some() && self.verdict == self.table.classify()
    }
}

/// Summary of a batch, one entry per input table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub constant: usize,
    pub balanced: usize,
    pub inconclusive: usize,
    pub failed: usize,
}

/// Build the register after `H^(k+1)`, `Uf`, `H^k ⊗ I`, before measurement
pub fn prepare_circuit(table: &TruthTable, config: &DeutschJozsaConfig) -> Result<Register> {
    config.validate()?;
    let k = table.input_bits();
    let total = k + 1;
    let inputs: Vec<usize> = (0..k).collect();
    let all: Vec<usize> = (0..total).collect();

    let builder = OracleBuilder::with_config(config.simulator)?;
    let oracle = builder.from_truth_table_with(table, config.oracle_strategy)?;
    let h_all = layer(&StandardGate::H, &all, total)?;
    let h_inputs = layer(&StandardGate::H, &inputs, total)?;

    // Inputs |0..0⟩, ancilla |1⟩
    let mut register = Register::create_with_config(total, 1, config.simulator)?;
    register.apply_operator(&h_all)?;
    register.apply_operator(&oracle)?;
    register.apply_operator(&h_inputs)?;
    Ok(register)
}

/// Run Deutsch-Jozsa and read the verdict off the exact distribution
pub fn run(table: &TruthTable, config: &DeutschJozsaConfig) -> Result<DeutschJozsaReport> {
    let register = prepare_circuit(table, config)?;
    let inputs: Vec<usize> = (0..table.input_bits()).collect();

    let distribution = MeasurementSampler::new()
        .distribution(&register)?
        .marginal(&inputs)?;
    let zero_probability = distribution.probability(0);

    let tol = config.simulator.tolerance;
    let verdict = if zero_probability >= 1.0 - tol {
        Some(FunctionClass::Constant)
    } else if zero_probability <= tol {
        Some(FunctionClass::Balanced)
    } else {
        warn!(table = %table, zero_probability, "function is neither constant nor balanced");
        None
    };

    debug!(table = %table, zero_probability, ?verdict, "deutsch-jozsa finished");
    Ok(DeutschJozsaReport {
        table: table.clone(),
        distribution,
        zero_probability,
        verdict,
    })
}

/// Deutsch's algorithm: Deutsch-Jozsa restricted to one input bit
pub fn deutsch(table: &TruthTable, config: &DeutschJozsaConfig) -> Result<DeutschJozsaReport> {
    if table.input_bits() != 1 {
        return Err(QuantumError::invalid_truth_table(format!(
            "Deutsch's algorithm takes a 1-bit function, got {} input bits",
            table.input_bits()
        )));
    }
    run(table, config)
}

/// Run the circuit and decide from a single sampled measurement
///
/// All-zero input qubits mean constant; anything else means balanced.
pub fn classify_by_measurement<R: Rng>(
    table: &TruthTable,
    config: &DeutschJozsaConfig,
    rng: &mut R,
) -> Result<FunctionClass> {
    let mut register = prepare_circuit(table, config)?;
    let inputs: Vec<usize> = (0..table.input_bits()).collect();
    let measurement = MeasurementSampler::new().sample_qubits(&mut register, &inputs, rng)?;

    Ok(if measurement.outcome == 0 {
        FunctionClass::Constant
    } else {
        FunctionClass::Balanced
    })
}

/// Run many tables in parallel; results keep the input order
pub fn classify_batch(
    tables: &[TruthTable],
    config: &DeutschJozsaConfig,
) -> Vec<Result<DeutschJozsaReport>> {
    tables.par_iter().map(|table| run(table, config)).collect()
}

/// Sampled classification of many tables in parallel
///
/// Run `i` draws from `StdRng::seed_from_u64(seed + i)`, so the results do
/// not depend on scheduling.
pub fn classify_batch_sampled(
    tables: &[TruthTable],
    config: &DeutschJozsaConfig,
    seed: u64,
) -> Vec<Result<FunctionClass>> {
    tables
        .par_iter()
        .enumerate()
        .map(|(i, table)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            classify_by_measurement(table, config, &mut rng)
        })
        .collect()
}

/// Tally batch results
pub fn summarize(results: &[Result<DeutschJozsaReport>]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for result in results {
        match result {
            Ok(report) => match report.verdict {
                Some(FunctionClass::Constant) => summary.constant += 1,
                Some(FunctionClass::Balanced) => summary.balanced += 1,
                None => summary.inconclusive += 1,
            },
            Err(_) => summary.failed += 1,
        }
    }
    summary
}
