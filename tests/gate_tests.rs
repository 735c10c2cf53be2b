use ndarray::{array, Array1, Array2};
use num_complex::Complex64;

use qoracle::quantum::gate::constants::{FRAC_1_SQRT_2, ONE, ZERO};
use qoracle::quantum::gate::{embed, layer, sequence, Operator, QuantumGate, StandardGate};
use qoracle::quantum::linalg;
use qoracle::QuantumError;

const EPS: f64 = 1e-10;

/// Helper function for comparing complex numbers with tolerance
fn complex_approx_eq(a: Complex64, b: Complex64, epsilon: f64) -> bool {
    (a - b).norm() < epsilon
}

fn zero_state(qubits: usize) -> Array1<Complex64> {
    let mut state = Array1::zeros(1 << qubits);
    state[0] = ONE;
    state
}

fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

#[test]
fn test_standard_gates_are_unitary() {
    let gates = [
        StandardGate::I(2),
        StandardGate::X,
        StandardGate::Z,
        StandardGate::H,
        StandardGate::CNOT,
        StandardGate::CZ,
        StandardGate::Toffoli,
        StandardGate::MultiControlledX(4),
        StandardGate::MultiControlledZ(4),
    ];
    for gate in gates {
        let matrix = gate.matrix();
        assert_eq!(matrix.nrows(), gate.dimension(), "{}", gate.name());
        assert!(linalg::is_unitary(&matrix, EPS), "{} is not unitary", gate.name());
    }
}

#[test]
fn test_multi_controlled_gates_match_named_gates() {
    assert!(StandardGate::MultiControlledX(1).equals(&StandardGate::X));
    assert!(StandardGate::MultiControlledX(2).equals(&StandardGate::CNOT));
    assert!(StandardGate::MultiControlledX(3).equals(&StandardGate::Toffoli));
    assert!(StandardGate::MultiControlledZ(1).equals(&StandardGate::Z));
    assert!(StandardGate::MultiControlledZ(2).equals(&StandardGate::CZ));

    assert_eq!(StandardGate::MultiControlledX(3).name(), "C^2X");
    assert_eq!(StandardGate::MultiControlledZ(0).matrix().dim(), (1, 1));
}

#[test]
fn test_hadamard_on_first_qubit() {
    for n in 1..=4 {
        let op = embed(&StandardGate::H, &[0], n).unwrap();
        let state = linalg::apply(op.as_matrix(), &zero_state(n)).unwrap();

        let high = 1 << (n - 1);
        for (i, amp) in state.iter().enumerate() {
            let expected = if i == 0 || i == high { c(FRAC_1_SQRT_2) } else { ZERO };
            assert!(
                complex_approx_eq(*amp, expected, EPS),
                "n={} index {}: {}",
                n,
                i,
                amp
            );
        }
    }
}

#[test]
fn test_embed_empty_identity() {
    for n in 0..=4 {
        let op = embed(&StandardGate::I(0), &[], n).unwrap();
        assert!(linalg::approx_eq(op.as_matrix(), &linalg::identity(1 << n), EPS));
    }
}

#[test]
fn test_embed_contiguous_targets_is_kronecker_product() {
    let op = embed(&StandardGate::CNOT, &[1, 2], 3).unwrap();
    let expected = linalg::tensor(&linalg::identity(2), &StandardGate::CNOT.matrix());
    assert!(linalg::approx_eq(op.as_matrix(), &expected, EPS));

    let op = embed(&StandardGate::H, &[0], 2).unwrap();
    let expected = linalg::tensor(&StandardGate::H.matrix(), &linalg::identity(2));
    assert!(linalg::approx_eq(op.as_matrix(), &expected, EPS));
}

#[test]
fn test_embed_follows_target_order() {
    // Control on qubit 1, target qubit 0: |01⟩ -> |11⟩
    let op = embed(&StandardGate::CNOT, &[1, 0], 2).unwrap();
    let matrix = op.as_matrix();

    assert!(complex_approx_eq(matrix[[3, 1]], ONE, EPS));
    assert!(complex_approx_eq(matrix[[1, 3]], ONE, EPS));
    assert!(complex_approx_eq(matrix[[0, 0]], ONE, EPS));
    assert!(complex_approx_eq(matrix[[2, 2]], ONE, EPS));
    assert!(complex_approx_eq(matrix[[1, 1]], ZERO, EPS));
}

#[test]
fn test_embed_non_adjacent_targets() {
    // CNOT from qubit 0 onto qubit 2 of three: |100⟩ -> |101⟩
    let op = embed(&StandardGate::CNOT, &[0, 2], 3).unwrap();
    let mut state = Array1::zeros(8);
    state[0b100] = ONE;
    let out = linalg::apply(op.as_matrix(), &state).unwrap();
    assert!(complex_approx_eq(out[0b101], ONE, EPS));
    assert!(op.is_unitary(EPS));
}

#[test]
fn test_embed_rejects_bad_targets() {
    let result = embed(&StandardGate::H, &[3], 3);
    assert!(matches!(result, Err(QuantumError::InvalidQubitIndex { index: 3, .. })));

    let result = embed(&StandardGate::CNOT, &[1, 1], 3);
    assert!(matches!(result, Err(QuantumError::InvalidQubitIndex { index: 1, .. })));

    let result = embed(&StandardGate::CNOT, &[0], 3);
    assert!(matches!(
        result,
        Err(QuantumError::ArityMismatch { expected: 2, actual: 1, .. })
    ));
}

#[test]
fn test_layer_matches_tensor_of_gates() {
    let hh = layer(&StandardGate::H, &[0, 1], 2).unwrap();
    let expected = linalg::tensor(&StandardGate::H.matrix(), &StandardGate::H.matrix());
    assert!(linalg::approx_eq(hh.as_matrix(), &expected, EPS));

    // Same result as embedding each copy and composing
    let h0 = embed(&StandardGate::H, &[0], 2).unwrap();
    let h1 = embed(&StandardGate::H, &[1], 2).unwrap();
    assert!(hh.equals(&h0.then(&h1).unwrap()));

    let err = layer(&StandardGate::CNOT, &[0], 2).unwrap_err();
    assert!(matches!(err, QuantumError::ArityMismatch { .. }));
}

#[test]
fn test_operator_rejects_non_unitary_matrix() {
    let shear = array![[ONE, ONE], [ZERO, ONE]];
    let err = Operator::new("shear", shear).unwrap_err();
    assert!(matches!(err, QuantumError::NonUnitaryOperator { .. }));

    let rectangular: Array2<Complex64> = Array2::zeros((2, 4));
    assert!(matches!(
        Operator::new("rect", rectangular),
        Err(QuantumError::DimensionMismatch { .. })
    ));

    let odd = linalg::identity(3);
    assert!(matches!(
        Operator::new("odd", odd),
        Err(QuantumError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_operator_rejects_unusable_tolerance() {
    let shear = array![[ONE, ONE], [ZERO, ONE]];
    for tol in [f64::NAN, f64::INFINITY, 0.0, -1e-9] {
        let result = Operator::with_tolerance("shear", shear.clone(), tol);
        assert!(matches!(result, Err(QuantumError::InvalidConfig { .. })), "tol = {}", tol);
    }

    // A NaN entry never passes the unitarity check
    let poisoned = array![[ONE, ZERO], [ZERO, Complex64::new(f64::NAN, 0.0)]];
    assert!(matches!(
        Operator::new("poisoned", poisoned),
        Err(QuantumError::NonUnitaryOperator { .. })
    ));
}

#[test]
fn test_embed_rejects_oversized_register() {
    let err = embed(&StandardGate::H, &[0], 64).unwrap_err();
    assert!(matches!(err, QuantumError::InvalidQubitIndex { index: 64, .. }));

    let too_wide = linalg::MAX_QUBITS + 1;
    assert!(embed(&StandardGate::X, &[0], too_wide).is_err());
    assert!(layer(&StandardGate::X, &[0], too_wide).is_err());
    assert!(Operator::identity(too_wide).is_err());
}

#[test]
fn test_operator_composition_order() {
    let x = embed(&StandardGate::X, &[0], 1).unwrap();
    let z = embed(&StandardGate::Z, &[0], 1).unwrap();

    // X first, then Z: Z·X
    let zx = sequence(1, &[x.clone(), z.clone()]).unwrap();
    assert!(complex_approx_eq(zx.as_matrix()[[0, 1]], ONE, EPS));
    assert!(complex_approx_eq(zx.as_matrix()[[1, 0]], -ONE, EPS));
    assert!(zx.equals(&x.then(&z).unwrap()));

    let empty = sequence(2, &[]).unwrap();
    assert!(empty.equals(&Operator::identity(2).unwrap()));

    let two = Operator::identity(2).unwrap();
    assert!(matches!(x.then(&two), Err(QuantumError::DimensionMismatch { .. })));
}

#[test]
fn test_hadamard_conjugates_toffoli_into_ccz() {
    let h = embed(&StandardGate::H, &[2], 3).unwrap();
    let toffoli = embed(&StandardGate::Toffoli, &[0, 1, 2], 3).unwrap();
    let ccz = h.then(&toffoli).unwrap().then(&h).unwrap();
    assert!(ccz.equals(&StandardGate::MultiControlledZ(3)));
}

#[test]
fn test_operator_adjoint_inverts() {
    let op = embed(&StandardGate::H, &[1], 2)
        .unwrap()
        .then(&embed(&StandardGate::CNOT, &[1, 0], 2).unwrap())
        .unwrap();
    let round_trip = op.then(&op.adjoint()).unwrap();
    assert!(round_trip.equals(&Operator::identity(2).unwrap()));
    assert!(op.adjoint().name().ends_with('†'));
}

#[test]
fn test_tensor_gives_leading_qubits_to_self() {
    let x = embed(&StandardGate::X, &[0], 1).unwrap();
    let id = Operator::identity(1).unwrap();
    let op = x.tensor(&id);
    assert_eq!(op.qubit_count(), 2);
    assert!(op.equals(&embed(&StandardGate::X, &[0], 2).unwrap()));
}
