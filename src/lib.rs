//! Dense state-vector quantum simulator for oracle algorithms
//!
//! This crate represents a small register of qubits as a vector of complex
//! amplitudes, evolves it with unitary operators built by tensor products,
//! and measures it by Born-rule sampling. On top of that engine it provides
//! the oracle constructions and circuits for Deutsch, Deutsch-Jozsa and
//! Grover search.
//!
//! Basis indices are big-endian: qubit 0 is the most significant bit, so
//! `|q0 q1 q2⟩` is index `4*q0 + 2*q1 + q2`.

pub mod error;
pub mod config;
pub mod quantum;
pub mod simulators;
pub mod algorithms;

pub use error::{QuantumError, Result};

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{DeutschJozsaConfig, GroverConfig, SimulatorConfig};
    pub use crate::error::{QuantumError, Result};
    pub use crate::quantum::prelude::*;
    pub use crate::quantum::{embed, layer, DiffusionStrategy, FunctionClass, PhaseOracleStrategy, TruthTableStrategy};
    pub use crate::simulators::{Distribution, Measurement, MeasurementSampler};
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
