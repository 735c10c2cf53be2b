// src/quantum/mod.rs
//! State-vector building blocks
//!
//! Linear algebra, gates, oracles and the qubit register. Every component
//! indexes basis states the same way: qubit 0 is the most significant bit.

pub mod linalg;
pub mod gate;
pub mod oracle;
pub mod register;

pub use gate::{embed, layer, sequence, Operator, QuantumGate, StandardGate};
pub use oracle::{
    DiffusionStrategy, FunctionClass, OracleBuilder, PhaseOracleStrategy, TruthTable,
    TruthTableStrategy,
};
pub use register::{Register, RegisterPhase};

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{Operator, QuantumGate, StandardGate};
    pub use super::{OracleBuilder, TruthTable};
    pub use super::{Register, RegisterPhase};
}
