//! Oracle algorithms built on the simulator
//!
//! Each algorithm is a pure function from its problem instance (a truth
//! table or a marked index) to a typed report. Reading input and printing
//! results is left to the caller.

pub mod deutsch_jozsa;
pub mod grover;

pub use deutsch_jozsa::{deutsch, BatchSummary, DeutschJozsaReport};
pub use grover::{grover_iterations, GroverReport};
