//! Configuration for the simulator and the algorithm circuits.

use serde::{Deserialize, Serialize};

use crate::error::{QuantumError, Result};
use crate::quantum::linalg::{self, DEFAULT_TOLERANCE};
use crate::quantum::oracle::{DiffusionStrategy, PhaseOracleStrategy, TruthTableStrategy};

/// Numerical settings shared by registers, operators and the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Tolerance for normalization and unitarity checks.
    pub tolerance: f64,
    /// Re-check the unit norm after every operator application.
    pub verify_norm: bool,
    /// Check unitarity of operators assembled from raw matrices.
    pub verify_unitarity: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            verify_norm: true,
            verify_unitarity: true,
        }
    }
}

impl SimulatorConfig {
    /// Reject tolerances that would make every check vacuous or impossible.
    pub fn validate(&self) -> Result<()> {
        linalg::check_tolerance(self.tolerance)?;
        if self.tolerance >= 1.0 {
            return Err(QuantumError::invalid_config(
                "tolerance",
                "must be below 1.0",
            ));
        }
        Ok(())
    }
}

/// Settings for the Deutsch and Deutsch-Jozsa circuits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeutschJozsaConfig {
    /// How `Uf` is assembled from the truth table.
    pub oracle_strategy: TruthTableStrategy,
    /// Numerical settings.
    pub simulator: SimulatorConfig,
}

impl DeutschJozsaConfig {
    pub fn validate(&self) -> Result<()> {
        self.simulator.validate()
    }
}

/// Settings for Grover search.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroverConfig {
    /// How the phase oracle is assembled.
    pub oracle_strategy: PhaseOracleStrategy,
    /// How the diffusion operator is assembled.
    pub diffusion_strategy: DiffusionStrategy,
    /// Run the phase-kickback circuit with an extra ancilla qubit instead of
    /// a bare phase oracle.
    pub ancilla: bool,
    /// Fixed iteration count; `None` uses `floor(pi/4 * sqrt(N))`.
    pub iterations_override: Option<usize>,
    /// Numerical settings.
    pub simulator: SimulatorConfig,
}

impl GroverConfig {
    pub fn validate(&self) -> Result<()> {
        self.simulator.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulatorConfig::default().validate().is_ok());
        assert!(GroverConfig::default().validate().is_ok());
        assert!(DeutschJozsaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_tolerance_rejected() {
        for tolerance in [0.0, -1e-9, f64::NAN, f64::INFINITY, 2.0] {
            let config = SimulatorConfig {
                tolerance,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(QuantumError::InvalidConfig { .. })
            ));
        }
    }
}
