// src/quantum/register.rs
//! Qubit register
//!
//! A [`Register`] owns the amplitude vector of one circuit run and tracks its
//! lifecycle: `Uninitialized → Ready → Measured`. Only a `Ready` register can
//! be evolved; measurement is terminal.

use std::fmt::{self, Display};

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::SimulatorConfig;
use crate::error::{QuantumError, Result};
use super::gate::{embed, Operator, QuantumGate};
use super::linalg;

/// Lifecycle phase of a register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterPhase {
    /// Allocated, no state prepared yet
    Uninitialized,
    /// Holds a normalized state and accepts operators
    Ready,
    /// Collapsed by a measurement; read-only from here on
    Measured,
}

impl Display for RegisterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegisterPhase::Uninitialized => "Uninitialized",
            RegisterPhase::Ready => "Ready",
            RegisterPhase::Measured => "Measured",
        };
        write!(f, "{}", name)
    }
}

/// The state of `n` qubits as a vector of `2^n` complex amplitudes
///
/// Basis index `i` reads qubit 0 as its most significant bit.
#[derive(Debug, Clone)]
pub struct Register {
    qubit_count: usize,
    amplitudes: Array1<Complex64>,
    phase: RegisterPhase,
    outcome: Option<usize>,
    config: SimulatorConfig,
}

impl Register {
    /// Allocate an uninitialized register
    pub fn new(qubit_count: usize) -> Result<Self> {
        Self::with_config(qubit_count, SimulatorConfig::default())
    }

    /// Allocate an uninitialized register with explicit numerical settings
    ///
    /// Fails on an invalid config or a register wider than
    /// [`linalg::MAX_QUBITS`].
    pub fn with_config(qubit_count: usize, config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        let dim = linalg::dimension_for(qubit_count)?;
        Ok(Register {
            qubit_count,
            amplitudes: Array1::zeros(dim),
            phase: RegisterPhase::Uninitialized,
            outcome: None,
            config,
        })
    }

    /// A ready register in the computational basis state |initial_basis_index⟩
    pub fn create(qubit_count: usize, initial_basis_index: usize) -> Result<Self> {
        Self::create_with_config(qubit_count, initial_basis_index, SimulatorConfig::default())
    }

    /// Like [`Register::create`], with explicit numerical settings
    pub fn create_with_config(
        qubit_count: usize,
        initial_basis_index: usize,
        config: SimulatorConfig,
    ) -> Result<Self> {
        let mut register = Self::with_config(qubit_count, config)?;
        register.prepare(initial_basis_index)?;
        Ok(register)
    }

    /// A ready register holding the given amplitudes
    pub fn from_amplitudes(qubit_count: usize, amplitudes: Array1<Complex64>) -> Result<Self> {
        Self::from_amplitudes_with_config(qubit_count, amplitudes, SimulatorConfig::default())
    }

    /// Like [`Register::from_amplitudes`], with explicit numerical settings
    ///
    /// The unit-norm check always runs here, whatever `verify_norm` says.
    pub fn from_amplitudes_with_config(
        qubit_count: usize,
        amplitudes: Array1<Complex64>,
        config: SimulatorConfig,
    ) -> Result<Self> {
        let mut register = Self::with_config(qubit_count, config)?;
        let expected_dim = register.dimension();

        if amplitudes.len() != expected_dim {
            return Err(QuantumError::dimension_mismatch(expected_dim, amplitudes.len()));
        }

        if !linalg::is_normalized(&amplitudes, config.tolerance) {
            let norm_squared = linalg::norm_squared(&amplitudes);
            return Err(QuantumError::NotNormalized { norm_squared });
        }

        register.amplitudes = amplitudes;
        register.phase = RegisterPhase::Ready;
        Ok(register)
    }

    /// Prepare the basis state |index⟩ on an uninitialized register
    pub fn prepare(&mut self, index: usize) -> Result<()> {
        self.require(RegisterPhase::Uninitialized, "prepare")?;

        let dim = self.dimension();
        if index >= dim {
            return Err(QuantumError::OutOfRange { index, dimension: dim });
        }

        self.amplitudes = Array1::zeros(dim);
        self.amplitudes[index] = Complex64::new(1.0, 0.0);
        self.phase = RegisterPhase::Ready;
        Ok(())
    }

    /// Multiply the state by `op` in place
    ///
    /// The new vector is only committed once its norm has been re-checked.
    pub fn apply_operator(&mut self, op: &Operator) -> Result<()> {
        self.require(RegisterPhase::Ready, "apply an operator to")?;

        let dim = self.dimension();
        if op.dimension() != dim {
            return Err(QuantumError::dimension_mismatch(dim, op.dimension()));
        }

        let next = linalg::apply(op.as_matrix(), &self.amplitudes)?;

        if self.config.verify_norm && !linalg::is_normalized(&next, self.config.tolerance) {
            let norm_squared = linalg::norm_squared(&next);
            return Err(QuantumError::NotNormalized { norm_squared });
        }

        trace!(operator = %op.name(), qubits = self.qubit_count, "applied operator");
        self.amplitudes = next;
        Ok(())
    }

    /// Embed `gate` on `targets` and apply it
    pub fn apply_gate(&mut self, gate: &dyn QuantumGate, targets: &[usize]) -> Result<()> {
        let op = embed(gate, targets, self.qubit_count)?;
        self.apply_operator(&op)
    }

    /// Returns the number of qubits
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Returns the dimension of the state space (2^n)
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get a reference to the amplitudes
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> RegisterPhase {
        self.phase
    }

    /// The collapsed basis index after a full measurement
    pub fn outcome(&self) -> Option<usize> {
        self.outcome
    }

    /// Numerical settings
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub(crate) fn require(&self, phase: RegisterPhase, operation: &'static str) -> Result<()> {
        if self.phase != phase {
            return Err(QuantumError::InvalidStateTransition {
                phase: self.phase,
                operation,
            });
        }
        Ok(())
    }

    /// Replace the state with a post-measurement vector and freeze it
    pub(crate) fn collapse(&mut self, amplitudes: Array1<Complex64>, outcome: Option<usize>) {
        self.amplitudes = amplitudes;
        self.outcome = outcome;
        self.phase = RegisterPhase::Measured;
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-qubit register [{}]:", self.qubit_count, self.phase)?;

        let threshold = 1e-10;
        let mut has_entries = false;

        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob > threshold {
                has_entries = true;
                let bit_string = format!("{:0width$b}", i, width = self.qubit_count);
                writeln!(
                    f,
                    "  ({:.6}{:+.6}i) |{}⟩ [{:.1}%]",
                    amp.re, amp.im, bit_string, prob * 100.0
                )?;
            }
        }

        if !has_entries {
            writeln!(f, "  (zero state)")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_phase() {
        let register = Register::new(2).unwrap();
        assert!(register.require(RegisterPhase::Uninitialized, "prepare").is_ok());
        assert!(matches!(
            register.require(RegisterPhase::Ready, "apply an operator to"),
            Err(QuantumError::InvalidStateTransition {
                phase: RegisterPhase::Uninitialized,
                ..
            })
        ));
    }

    #[test]
    fn test_display_lists_basis_states() {
        let register = Register::create(2, 2).unwrap();
        let text = register.to_string();
        assert!(text.contains("|10⟩"));
        assert!(text.contains("Ready"));
    }
}
