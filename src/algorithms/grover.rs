//! Grover search for a single marked index
//!
//! Phase mode, on the search qubits only:
//!
//! ```text
//! |0> H --+----+--+-----+-- ... -- M
//! |0> H --| Uf |--| Dif |-- ... -- M
//!         +----+  +-----+
//! ```
//!
//! Ancilla mode adds a last qubit prepared in |1⟩. After the Hadamards it
//! sits in |−⟩, so the bit-flip oracle kicks back a phase; a final H and X
//! return it to |0⟩ before measurement.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::config::GroverConfig;
use crate::error::Result;
use crate::quantum::gate::{embed, layer, Operator, StandardGate};
use crate::quantum::linalg;
use crate::quantum::oracle::{OracleBuilder, PhaseOracleStrategy, TruthTableStrategy};
use crate::quantum::register::Register;
use crate::simulators::{Distribution, MeasurementSampler};

/// `floor(pi/4 * sqrt(2^search_qubits))`
///
/// Rounded down: N=4 takes exactly one iteration.
pub fn grover_iterations(search_qubits: usize) -> Result<usize> {
    let n = linalg::dimension_for(search_qubits)? as f64;
    Ok(((PI / 4.0) * n.sqrt()).floor() as usize)
}

/// Outcome of one Grover run
#[derive(Debug, Clone, PartialEq)]
pub struct GroverReport {
    pub target: usize,
    pub search_qubits: usize,
    /// Number of oracle + diffusion rounds applied
    pub iterations: usize,
    /// Distribution over the search qubits just before measurement
    pub distribution: Distribution,
    /// Probability of the marked index before measurement
    pub success_probability: f64,
    /// Index read from the search qubits
    pub measured: usize,
}

impl GroverReport {
    pub fn found_target(&self) -> bool {
        self.measured == self.target
    }
}

struct GroverCircuit {
    total_qubits: usize,
    initial_index: usize,
    prologue: Operator,
    oracle: Operator,
    diffusion: Operator,
    epilogue: Option<Operator>,
}

impl GroverCircuit {
    fn build(target: usize, search_qubits: usize, config: &GroverConfig) -> Result<Self> {
        let builder = OracleBuilder::with_config(config.simulator)?;
        let search: Vec<usize> = (0..search_qubits).collect();
        let diffusion = builder.diffusion(search_qubits, config.diffusion_strategy)?;

        if !config.ancilla {
            return Ok(GroverCircuit {
                total_qubits: search_qubits,
                initial_index: 0,
                prologue: layer(&StandardGate::H, &search, search_qubits)?,
                oracle: builder.from_target_with(target, search_qubits, config.oracle_strategy)?,
                diffusion,
                epilogue: None,
            });
        }

        let total = search_qubits + 1;
        let ancilla = search_qubits;
        let all: Vec<usize> = (0..total).collect();
        let marking_strategy = match config.oracle_strategy {
            PhaseOracleStrategy::Diagonal => TruthTableStrategy::Permutation,
            PhaseOracleStrategy::GateDecomposition => TruthTableStrategy::GateDecomposition,
        };

        let h_ancilla = embed(&StandardGate::H, &[ancilla], total)?;
        let x_ancilla = embed(&StandardGate::X, &[ancilla], total)?;

        Ok(GroverCircuit {
            total_qubits: total,
            initial_index: 1,
            prologue: layer(&StandardGate::H, &all, total)?,
            oracle: builder.marking_oracle(target, search_qubits, marking_strategy)?,
            diffusion: embed(&diffusion, &search, total)?,
            epilogue: Some(h_ancilla.then(&x_ancilla)?),
        })
    }
}

/// Build and evolve the register up to, but not including, measurement
///
/// Returns the register and the number of iterations applied.
pub fn prepare_circuit(
    target: usize,
    search_qubits: usize,
    config: &GroverConfig,
) -> Result<(Register, usize)> {
    config.validate()?;
    let circuit = GroverCircuit::build(target, search_qubits, config)?;
    let iterations = match config.iterations_override {
        Some(iterations) => iterations,
        None => grover_iterations(search_qubits)?,
    };

    let mut register =
        Register::create_with_config(circuit.total_qubits, circuit.initial_index, config.simulator)?;
    register.apply_operator(&circuit.prologue)?;
    for _ in 0..iterations {
        register.apply_operator(&circuit.oracle)?;
        register.apply_operator(&circuit.diffusion)?;
    }
    if let Some(epilogue) = &circuit.epilogue {
        register.apply_operator(epilogue)?;
    }

    Ok((register, iterations))
}

/// Search for `target` among `2^search_qubits` indices and measure once
pub fn run<R: Rng>(
    target: usize,
    search_qubits: usize,
    config: &GroverConfig,
    rng: &mut R,
) -> Result<GroverReport> {
    let (mut register, iterations) = prepare_circuit(target, search_qubits, config)?;
    let search: Vec<usize> = (0..search_qubits).collect();

    let sampler = MeasurementSampler::new();
    let distribution = sampler.distribution(&register)?.marginal(&search)?;
    let success_probability = distribution.probability(target);
    let measurement = sampler.sample_qubits(&mut register, &search, rng)?;

    debug!(
        target,
        search_qubits,
        iterations,
        success_probability,
        measured = measurement.outcome,
        "grover finished"
    );

    Ok(GroverReport {
        target,
        search_qubits,
        iterations,
        distribution,
        success_probability,
        measured: measurement.outcome,
    })
}

/// Run every target placement for `search_qubits` in parallel
///
/// Run for target `t` draws from `StdRng::seed_from_u64(seed + t)`.
pub fn sweep_targets(
    search_qubits: usize,
    config: &GroverConfig,
    seed: u64,
) -> Vec<Result<GroverReport>> {
    let dim = match linalg::dimension_for(search_qubits) {
        Ok(dim) => dim,
        Err(e) => return vec![Err(e)],
    };

    (0..dim)
        .into_par_iter()
        .map(|target| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(target as u64));
            run(target, search_qubits, config, &mut rng)
        })
        .collect()
}
