//! Measurement of simulated registers
//!
//! This module turns amplitudes into outcome probabilities and draws
//! outcomes from an injected random source.

pub mod sampler;

pub use sampler::{
    Distribution,
    Measurement,
    MeasurementSampler,
};
