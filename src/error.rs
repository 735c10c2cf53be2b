//! Error types for the simulator.
//!
//! Every failure is a local contract violation raised at the call that caused
//! it. Nothing here is retryable: the computations are deterministic.

use thiserror::Error;

use crate::quantum::register::RegisterPhase;

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, QuantumError>;

/// Errors that can occur while building operators, evolving a register or
/// measuring it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantumError {
    /// Operator, vector or matrix sizes disagree.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension encountered.
        actual: usize,
    },

    /// A target qubit is out of range or listed twice.
    #[error("Invalid qubit index {index}: {reason}")]
    InvalidQubitIndex {
        /// Offending qubit index.
        index: usize,
        /// Why it was rejected.
        reason: String,
    },

    /// A gate was given a different number of targets than it acts on.
    #[error("Gate {gate} acts on {expected} qubits, but {actual} targets were given")]
    ArityMismatch {
        /// Gate name.
        gate: String,
        /// Qubits the gate acts on.
        expected: usize,
        /// Targets supplied.
        actual: usize,
    },

    /// The truth table is not a total function on `2^k` inputs.
    #[error("Invalid truth table: {0}")]
    InvalidTruthTable(String),

    /// A basis index lies outside the register's basis range.
    #[error("Index {index} out of range for dimension {dimension}")]
    OutOfRange {
        /// Offending index.
        index: usize,
        /// Size of the basis.
        dimension: usize,
    },

    /// The register is in the wrong phase for the requested operation.
    #[error("Cannot {operation} a register in phase {phase}")]
    InvalidStateTransition {
        /// Phase the register was in.
        phase: RegisterPhase,
        /// The rejected operation.
        operation: &'static str,
    },

    /// A matrix failed the `U†U ≈ I` check.
    #[error("Operator {name} is not unitary (max deviation {deviation:e})")]
    NonUnitaryOperator {
        /// Operator name.
        name: String,
        /// Largest elementwise deviation of `U†U` from the identity.
        deviation: f64,
    },

    /// A state vector left the unit sphere.
    #[error("State is not normalized: |psi|^2 = {norm_squared}")]
    NotNormalized {
        /// Observed squared norm.
        norm_squared: f64,
    },

    /// A configuration value is unusable.
    #[error("Invalid config '{name}': {reason}")]
    InvalidConfig {
        /// Field name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl QuantumError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an error for a qubit index beyond the register.
    pub fn qubit_out_of_range(index: usize, qubit_count: usize) -> Self {
        Self::InvalidQubitIndex {
            index,
            reason: format!("out of range for {}-qubit register", qubit_count),
        }
    }

    /// Create an error for a register wider than the dense representation allows.
    pub fn too_many_qubits(qubit_count: usize, max: usize) -> Self {
        Self::InvalidQubitIndex {
            index: qubit_count,
            reason: format!("at most {} qubits are supported", max),
        }
    }

    /// Create an error for a tolerance that cannot be compared against.
    pub fn invalid_tolerance(tolerance: f64) -> Self {
        Self::invalid_config(
            "tolerance",
            format!("must be finite and positive, got {}", tolerance),
        )
    }

    /// Create an error for a qubit listed more than once.
    pub fn duplicate_qubit(index: usize) -> Self {
        Self::InvalidQubitIndex {
            index,
            reason: "duplicated target".to_string(),
        }
    }

    /// Create an invalid truth table error.
    pub fn invalid_truth_table(reason: impl Into<String>) -> Self {
        Self::InvalidTruthTable(reason.into())
    }

    /// Create an invalid config error.
    pub fn invalid_config(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
