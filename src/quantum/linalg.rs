// src/quantum/linalg.rs
//! Dense complex vector and matrix primitives
//!
//! Everything the simulator does reduces to these few operations on
//! `Array1<Complex64>` / `Array2<Complex64>`. Sizes are tiny (a handful of
//! qubits), so plain dense loops are used throughout.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{QuantumError, Result};

/// Default tolerance for normalization and unitarity checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Widest register the dense representation accepts.
pub const MAX_QUBITS: usize = 30;

/// `2^qubits`, or `InvalidQubitIndex` above [`MAX_QUBITS`]
pub fn dimension_for(qubits: usize) -> Result<usize> {
    if qubits > MAX_QUBITS {
        return Err(QuantumError::too_many_qubits(qubits, MAX_QUBITS));
    }
    Ok(1 << qubits)
}

/// Reject tolerances that make every comparison pass or fail.
pub fn check_tolerance(tol: f64) -> Result<()> {
    if !tol.is_finite() || tol <= 0.0 {
        return Err(QuantumError::invalid_tolerance(tol));
    }
    Ok(())
}

/// Identity matrix of the given dimension
pub fn identity(dim: usize) -> Array2<Complex64> {
    Array2::from_diag(&Array1::from_elem(dim, Complex64::new(1.0, 0.0)))
}

/// Kronecker product `A ⊗ B`
///
/// The indices of `a` vary slower than those of `b`, so `a` acts on the more
/// significant qubits of the result.
pub fn tensor(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (a_rows, a_cols) = a.dim();
    let (b_rows, b_cols) = b.dim();

    let mut result = Array2::zeros((a_rows * b_rows, a_cols * b_cols));

    for i in 0..a_rows {
        for j in 0..a_cols {
            let factor = a[[i, j]];
            if factor == Complex64::new(0.0, 0.0) {
                continue;
            }
            for k in 0..b_rows {
                for l in 0..b_cols {
                    result[[i * b_rows + k, j * b_cols + l]] = factor * b[[k, l]];
                }
            }
        }
    }

    result
}

/// Kronecker product of two vectors, same ordering as [`tensor`]
pub fn tensor_vectors(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array1<Complex64> {
    let b_dim = b.len();
    let mut result = Array1::zeros(a.len() * b_dim);

    for i in 0..a.len() {
        for j in 0..b_dim {
            result[i * b_dim + j] = a[i] * b[j];
        }
    }

    result
}

/// Matrix-vector product `U·v`
pub fn apply(u: &Array2<Complex64>, v: &Array1<Complex64>) -> Result<Array1<Complex64>> {
    if u.ncols() != v.len() {
        return Err(QuantumError::dimension_mismatch(u.ncols(), v.len()));
    }
    Ok(u.dot(v))
}

/// Matrix product `A·B`
pub fn multiply(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    if a.ncols() != b.nrows() {
        return Err(QuantumError::dimension_mismatch(a.ncols(), b.nrows()));
    }
    Ok(a.dot(b))
}

/// Sum of squared magnitudes
pub fn norm_squared(v: &Array1<Complex64>) -> f64 {
    v.iter().map(|amp| amp.norm_sqr()).sum()
}

/// `|norm_squared(v) - 1| <= tol`
pub fn is_normalized(v: &Array1<Complex64>, tol: f64) -> bool {
    (norm_squared(v) - 1.0).abs() <= tol
}

/// Inner product `⟨a|b⟩` (conjugate-linear in `a`)
pub fn inner_product(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Result<Complex64> {
    if a.len() != b.len() {
        return Err(QuantumError::dimension_mismatch(a.len(), b.len()));
    }

    let mut result = Complex64::new(0.0, 0.0);
    for (x, y) in a.iter().zip(b.iter()) {
        result += x.conj() * y;
    }
    Ok(result)
}

/// Conjugate transpose
pub fn adjoint(u: &Array2<Complex64>) -> Array2<Complex64> {
    u.t().mapv(|c| c.conj())
}

/// Largest elementwise deviation of `U†U` from the identity.
///
/// Returns infinity for non-square input or non-finite entries.
pub fn unitarity_deviation(u: &Array2<Complex64>) -> f64 {
    let (rows, cols) = u.dim();
    if rows != cols {
        return f64::INFINITY;
    }

    let product = adjoint(u).dot(u);
    let mut deviation: f64 = 0.0;
    for ((i, j), value) in product.indexed_iter() {
        let expected = if i == j {
            Complex64::new(1.0, 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        };
        let entry = (value - expected).norm();
        if !entry.is_finite() {
            return f64::INFINITY;
        }
        deviation = deviation.max(entry);
    }
    deviation
}

/// `U†U ≈ I` elementwise within `tol`
pub fn is_unitary(u: &Array2<Complex64>, tol: f64) -> bool {
    unitarity_deviation(u) <= tol
}

/// Elementwise comparison of two matrices
pub fn approx_eq(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= tol)
}

/// Number of qubits for a dimension, if it is a power of two
pub fn qubits_for_dimension(dim: usize) -> Option<usize> {
    if dim.is_power_of_two() {
        Some(dim.trailing_zeros() as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_qubits_for_dimension() {
        assert_eq!(qubits_for_dimension(1), Some(0));
        assert_eq!(qubits_for_dimension(8), Some(3));
        assert_eq!(qubits_for_dimension(6), None);
        assert_eq!(qubits_for_dimension(0), None);
    }

    #[test]
    fn test_tensor_factor_order() {
        // |1⟩ ⊗ |0⟩ = |10⟩ = index 2
        let one = array![c(0.0), c(1.0)];
        let zero = array![c(1.0), c(0.0)];
        let v = tensor_vectors(&one, &zero);
        assert_eq!(v, array![c(0.0), c(0.0), c(1.0), c(0.0)]);
    }

    #[test]
    fn test_dimension_for_caps_width() {
        assert_eq!(dimension_for(0), Ok(1));
        assert_eq!(dimension_for(MAX_QUBITS), Ok(1 << MAX_QUBITS));
        assert!(matches!(
            dimension_for(64),
            Err(QuantumError::InvalidQubitIndex { index: 64, .. })
        ));
    }

    #[test]
    fn test_nan_matrix_is_not_unitary() {
        let m = array![[c(f64::NAN), c(0.0)], [c(0.0), c(1.0)]];
        assert!(unitarity_deviation(&m).is_infinite());
        assert!(!is_unitary(&m, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_non_square_is_not_unitary() {
        let m = Array2::<Complex64>::zeros((2, 4));
        assert!(!is_unitary(&m, DEFAULT_TOLERANCE));
    }
}
