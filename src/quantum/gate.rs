// src/quantum/gate.rs
//! Quantum gates and n-qubit operators
//!
//! Gates are described by the [`QuantumGate`] trait. The fixed textbook gates
//! live in [`StandardGate`]; anything assembled at runtime (embedded gates,
//! oracles, diffusion operators) is an [`Operator`]. [`embed`] lifts a gate
//! acting on a few qubits to the full register by tensoring with identities.
//!
//! Qubit 0 is the most significant bit of a basis index throughout.

use std::fmt::Debug;

use ndarray::{array, Array2};
use num_complex::Complex64;
use tracing::trace;

use crate::error::{QuantumError, Result};
use super::linalg::{self, DEFAULT_TOLERANCE};

/// Common complex numbers used in gate matrices
pub mod constants {
    use num_complex::Complex64;

    pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);

    pub const ONE: Complex64 = Complex64::new(1.0, 0.0);

    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

/// Trait for quantum gates
pub trait QuantumGate: Debug + Send + Sync {
    /// Returns the number of qubits this gate acts on
    fn qubit_count(&self) -> usize;

    /// Returns the matrix representation of this gate
    fn matrix(&self) -> Array2<Complex64>;

    /// Returns a display name for this gate
    fn name(&self) -> String;

    /// Dimension of the space the gate acts on (2^n)
    fn dimension(&self) -> usize {
        1 << self.qubit_count()
    }

    /// Returns the adjoint (Hermitian conjugate) of this gate
    fn adjoint(&self) -> Operator {
        Operator {
            name: format!("{}†", self.name()),
            qubits: self.qubit_count(),
            matrix: linalg::adjoint(&self.matrix()),
        }
    }

    /// Compares this gate with another gate by matrix, within tolerance
    fn equals(&self, other: &dyn QuantumGate) -> bool {
        linalg::approx_eq(&self.matrix(), &other.matrix(), DEFAULT_TOLERANCE)
    }
}

/// Standard quantum gates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardGate {
    /// Identity gate on the given number of qubits
    I(usize),

    /// Pauli-X gate (NOT gate)
    X,

    /// Pauli-Z gate
    Z,

    /// Hadamard gate
    H,

    /// CNOT gate, control on the first qubit
    CNOT,

    /// Controlled-Z gate
    CZ,

    /// Toffoli gate (CCNOT)
    Toffoli,

    /// X on the last of n qubits, controlled by all the others
    MultiControlledX(usize),

    /// Z on the last of n qubits, controlled by all the others
    MultiControlledZ(usize),
}

impl StandardGate {
    /// Permutation matrix that flips the last qubit when all others are 1
    fn controlled_x_matrix(n: usize) -> Array2<Complex64> {
        let dim = 1 << n;
        let mut matrix = linalg::identity(dim);
        if n == 0 {
            return matrix;
        }

        // Only the |1..10⟩ and |1..11⟩ rows are touched
        let (a, b) = (dim - 2, dim - 1);
        matrix[[a, a]] = constants::ZERO;
        matrix[[b, b]] = constants::ZERO;
        matrix[[a, b]] = constants::ONE;
        matrix[[b, a]] = constants::ONE;
        matrix
    }

    /// Diagonal matrix with -1 on |1..1⟩
    fn controlled_z_matrix(n: usize) -> Array2<Complex64> {
        let dim = 1 << n;
        let mut matrix = linalg::identity(dim);
        if n > 0 {
            matrix[[dim - 1, dim - 1]] = -constants::ONE;
        }
        matrix
    }
}

impl QuantumGate for StandardGate {
    fn qubit_count(&self) -> usize {
        match self {
            StandardGate::I(n) => *n,
            StandardGate::X | StandardGate::Z | StandardGate::H => 1,
            StandardGate::CNOT | StandardGate::CZ => 2,
            StandardGate::Toffoli => 3,
            StandardGate::MultiControlledX(n) | StandardGate::MultiControlledZ(n) => *n,
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        use constants::*;
        match self {
            StandardGate::I(n) => linalg::identity(1 << n),
            StandardGate::X => {
                array![
                    [ZERO, ONE],
                    [ONE, ZERO]
                ]
            },
            StandardGate::Z => {
                array![
                    [ONE, ZERO],
                    [ZERO, -ONE]
                ]
            },
            StandardGate::H => {
                let factor = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![
                    [factor, factor],
                    [factor, -factor]
                ]
            },
            StandardGate::CNOT => {
                array![
                    [ONE, ZERO, ZERO, ZERO],
                    [ZERO, ONE, ZERO, ZERO],
                    [ZERO, ZERO, ZERO, ONE],
                    [ZERO, ZERO, ONE, ZERO]
                ]
            },
            StandardGate::CZ => {
                array![
                    [ONE, ZERO, ZERO, ZERO],
                    [ZERO, ONE, ZERO, ZERO],
                    [ZERO, ZERO, ONE, ZERO],
                    [ZERO, ZERO, ZERO, -ONE]
                ]
            },
            StandardGate::Toffoli => {
                let mut matrix = Array2::zeros((8, 8));
                for i in 0..8 {
                    let q0 = (i >> 2) & 1;
                    let q1 = (i >> 1) & 1;
                    let q2 = i & 1;

                    // Flip q2 only if q0=1 and q1=1
                    let new_q2 = if q0 == 1 && q1 == 1 { q2 ^ 1 } else { q2 };
                    let j = (q0 << 2) | (q1 << 1) | new_q2;

                    matrix[[i, j]] = ONE;
                }
                matrix
            },
            StandardGate::MultiControlledX(n) => Self::controlled_x_matrix(*n),
            StandardGate::MultiControlledZ(n) => Self::controlled_z_matrix(*n),
        }
    }

    fn name(&self) -> String {
        match self {
            StandardGate::I(n) => format!("I({})", n),
            StandardGate::X => "X".to_string(),
            StandardGate::Z => "Z".to_string(),
            StandardGate::H => "H".to_string(),
            StandardGate::CNOT => "CNOT".to_string(),
            StandardGate::CZ => "CZ".to_string(),
            StandardGate::Toffoli => "Toffoli".to_string(),
            StandardGate::MultiControlledX(n) => format!("C^{}X", n.saturating_sub(1)),
            StandardGate::MultiControlledZ(n) => format!("C^{}Z", n.saturating_sub(1)),
        }
    }

    fn adjoint(&self) -> Operator {
        // Every standard gate here is Hermitian
        Operator {
            name: self.name(),
            qubits: self.qubit_count(),
            matrix: self.matrix(),
        }
    }
}

/// An n-qubit unitary defined by its matrix
///
/// Produced by [`embed`], the oracle builders and composition. Construction
/// from an arbitrary matrix goes through [`Operator::new`], which rejects
/// non-unitary input.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    name: String,
    qubits: usize,
    matrix: Array2<Complex64>,
}

impl Operator {
    /// Validate a raw matrix and wrap it, using the default tolerance
    pub fn new(name: impl Into<String>, matrix: Array2<Complex64>) -> Result<Self> {
        Self::with_tolerance(name, matrix, DEFAULT_TOLERANCE)
    }

    /// Validate a raw matrix and wrap it
    ///
    /// The matrix must be square with a power-of-two side and satisfy
    /// `U†U ≈ I` within `tol`. `tol` must be finite and positive.
    pub fn with_tolerance(
        name: impl Into<String>,
        matrix: Array2<Complex64>,
        tol: f64,
    ) -> Result<Self> {
        linalg::check_tolerance(tol)?;
        let name = name.into();
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(QuantumError::dimension_mismatch(rows, cols));
        }
        let qubits = linalg::qubits_for_dimension(rows)
            .ok_or_else(|| QuantumError::dimension_mismatch(rows.next_power_of_two(), rows))?;

        let deviation = linalg::unitarity_deviation(&matrix);
        if deviation > tol {
            return Err(QuantumError::NonUnitaryOperator { name, deviation });
        }

        Ok(Operator { name, qubits, matrix })
    }

    /// Wrap a matrix that is unitary by construction
    pub(crate) fn from_parts(name: impl Into<String>, qubits: usize, matrix: Array2<Complex64>) -> Self {
        debug_assert_eq!(matrix.dim(), (1 << qubits, 1 << qubits));
        Operator {
            name: name.into(),
            qubits,
            matrix,
        }
    }

    /// The identity on `qubits` qubits
    pub fn identity(qubits: usize) -> Result<Self> {
        let dim = linalg::dimension_for(qubits)?;
        Ok(Operator::from_parts(format!("I({})", qubits), qubits, linalg::identity(dim)))
    }

    /// Borrow the matrix
    pub fn as_matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Consume the operator, returning its matrix
    pub fn into_matrix(self) -> Array2<Complex64> {
        self.matrix
    }

    /// Check `U†U ≈ I` within `tol`
    pub fn is_unitary(&self, tol: f64) -> bool {
        linalg::is_unitary(&self.matrix, tol)
    }

    /// Apply `self` first, then `next`: returns `next · self`
    pub fn then(&self, next: &Operator) -> Result<Operator> {
        if self.qubits != next.qubits {
            return Err(QuantumError::dimension_mismatch(self.dimension(), next.dimension()));
        }
        let matrix = linalg::multiply(&next.matrix, &self.matrix)?;
        Ok(Operator::from_parts(
            format!("{}·{}", next.name, self.name),
            self.qubits,
            matrix,
        ))
    }

    /// Tensor product `self ⊗ other`; `self` takes the leading qubits
    pub fn tensor(&self, other: &Operator) -> Operator {
        Operator::from_parts(
            format!("{}⊗{}", self.name, other.name),
            self.qubits + other.qubits,
            linalg::tensor(&self.matrix, &other.matrix),
        )
    }
}

impl QuantumGate for Operator {
    fn qubit_count(&self) -> usize {
        self.qubits
    }

    fn matrix(&self) -> Array2<Complex64> {
        self.matrix.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Compose a sequence of operators, applied first to last
///
/// An empty sequence is the identity on `qubits` qubits.
pub fn sequence(qubits: usize, operators: &[Operator]) -> Result<Operator> {
    let mut result = Operator::identity(qubits)?;
    for (i, op) in operators.iter().enumerate() {
        if op.qubit_count() != qubits {
            return Err(QuantumError::dimension_mismatch(result.dimension(), op.dimension()));
        }
        result = if i == 0 { op.clone() } else { result.then(op)? };
    }
    Ok(result)
}

pub(crate) fn validate_targets(targets: &[usize], total_qubits: usize) -> Result<()> {
    for (k, &q) in targets.iter().enumerate() {
        if q >= total_qubits {
            return Err(QuantumError::qubit_out_of_range(q, total_qubits));
        }
        if targets[..k].contains(&q) {
            return Err(QuantumError::duplicate_qubit(q));
        }
    }
    Ok(())
}

/// Lift `gate` to an operator on `total_qubits` qubits
///
/// Gate qubit `k` acts on register qubit `targets[k]`; every other qubit gets
/// the identity. For ascending contiguous targets this is `I ⊗ G ⊗ I`.
pub fn embed(gate: &dyn QuantumGate, targets: &[usize], total_qubits: usize) -> Result<Operator> {
    let dim = linalg::dimension_for(total_qubits)?;
    if targets.len() != gate.qubit_count() {
        return Err(QuantumError::ArityMismatch {
            gate: gate.name(),
            expected: gate.qubit_count(),
            actual: targets.len(),
        });
    }
    validate_targets(targets, total_qubits)?;

    let gate_matrix = gate.matrix();
    let name = format!("{}{:?}", gate.name(), targets);

    if targets.len() == total_qubits && targets.iter().enumerate().all(|(k, &q)| k == q) {
        return Ok(Operator::from_parts(name, total_qubits, gate_matrix));
    }

    let num_target = targets.len();
    let target_mask = targets
        .iter()
        .fold(0usize, |mask, &q| mask | 1 << (total_qubits - 1 - q));

    let mut result = Array2::zeros((dim, dim));

    for i in 0..dim {
        for j in 0..dim {
            // Non-target bits must match
            if (i ^ j) & !target_mask != 0 {
                continue;
            }

            // Extract the target qubits into a smaller index, in gate order
            let mut sub_i = 0;
            let mut sub_j = 0;
            for (k, &q) in targets.iter().enumerate() {
                let shift_full = total_qubits - 1 - q;
                let shift_sub = num_target - 1 - k;
                sub_i |= ((i >> shift_full) & 1) << shift_sub;
                sub_j |= ((j >> shift_full) & 1) << shift_sub;
            }

            result[[i, j]] = gate_matrix[[sub_i, sub_j]];
        }
    }

    trace!(gate = %gate.name(), ?targets, total_qubits, "embedded gate");
    Ok(Operator::from_parts(name, total_qubits, result))
}

/// One copy of a single-qubit `gate` on each listed qubit, identity elsewhere
pub fn layer(gate: &dyn QuantumGate, targets: &[usize], total_qubits: usize) -> Result<Operator> {
    if gate.qubit_count() != 1 {
        return Err(QuantumError::ArityMismatch {
            gate: gate.name(),
            expected: 1,
            actual: gate.qubit_count(),
        });
    }
    linalg::dimension_for(total_qubits)?;
    validate_targets(targets, total_qubits)?;

    let gate_matrix = gate.matrix();
    let wire = linalg::identity(2);

    let mut result = linalg::identity(1);
    for q in 0..total_qubits {
        let factor = if targets.contains(&q) { &gate_matrix } else { &wire };
        result = linalg::tensor(&result, factor);
    }

    Ok(Operator::from_parts(
        format!("{}{:?}", gate.name(), targets),
        total_qubits,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_targets() {
        assert!(validate_targets(&[0, 2], 3).is_ok());
        assert_eq!(
            validate_targets(&[0, 3], 3),
            Err(QuantumError::qubit_out_of_range(3, 3))
        );
        assert_eq!(
            validate_targets(&[1, 1], 3),
            Err(QuantumError::duplicate_qubit(1))
        );
    }

    #[test]
    fn test_controlled_gate_names() {
        assert_eq!(StandardGate::MultiControlledX(3).name(), "C^2X");
        assert_eq!(StandardGate::MultiControlledZ(1).name(), "C^0Z");
    }
}
