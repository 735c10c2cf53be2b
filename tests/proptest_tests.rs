//! Property-based tests for qoracle using proptest
//!
//! Oracle construction, gate embedding and sampling properties that must
//! hold for any truth table, target or state.

use ndarray::Array1;
use num_complex::Complex64;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use qoracle::prelude::*;
use qoracle::quantum::linalg;

/// A truth table on 1 to 3 input bits
fn truth_table() -> impl Strategy<Value = TruthTable> {
    (1usize..=3)
        .prop_flat_map(|k| prop::collection::vec(any::<bool>(), 1 << k))
        .prop_map(|values| TruthTable::new(values).unwrap())
}

/// A normalized state on `qubits` qubits
fn state(qubits: usize) -> impl Strategy<Value = Array1<Complex64>> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1 << qubits)
        .prop_filter("state needs a non-negligible norm", |entries| {
            entries.iter().map(|(re, im)| re * re + im * im).sum::<f64>() > 1e-3
        })
        .prop_map(|entries| {
            let v: Array1<Complex64> = entries
                .into_iter()
                .map(|(re, im)| Complex64::new(re, im))
                .collect();
            let norm = linalg::norm_squared(&v).sqrt();
            v.mapv(|a| a / norm)
        })
}

// ============================================================================
// Oracle Properties
// ============================================================================

proptest! {
    /// Property: every truth table yields a unitary permutation oracle
    #[test]
    fn oracle_is_unitary(table in truth_table()) {
        let oracle = OracleBuilder::new().from_truth_table(&table).unwrap();
        prop_assert_eq!(oracle.qubit_count(), table.input_bits() + 1);
        prop_assert!(oracle.is_unitary(1e-10), "oracle for {} not unitary", table);
    }

    /// Property: Uf is its own inverse
    #[test]
    fn oracle_is_involution(table in truth_table()) {
        let oracle = OracleBuilder::new().from_truth_table(&table).unwrap();
        let twice = oracle.then(&oracle).unwrap();
        prop_assert!(twice.equals(&Operator::identity(oracle.qubit_count()).unwrap()));
    }

    /// Property: both construction strategies give the same matrix
    #[test]
    fn oracle_strategies_agree(table in truth_table()) {
        let builder = OracleBuilder::new();
        let permutation = builder
            .from_truth_table_with(&table, TruthTableStrategy::Permutation)
            .unwrap();
        let gates = builder
            .from_truth_table_with(&table, TruthTableStrategy::GateDecomposition)
            .unwrap();
        prop_assert!(permutation.equals(&gates), "strategies disagree on {}", table);
    }

    /// Property: applying an oracle keeps the state normalized
    #[test]
    fn oracle_preserves_norm(
        values in prop::collection::vec(any::<bool>(), 8),
        amplitudes in state(4)
    ) {
        let table = TruthTable::new(values).unwrap();
        let oracle = OracleBuilder::new().from_truth_table(&table).unwrap();
        let mut register = Register::from_amplitudes(4, amplitudes).unwrap();
        register.apply_operator(&oracle).unwrap();
        prop_assert!((linalg::norm_squared(register.amplitudes()) - 1.0).abs() < 1e-9);
    }

    /// Property: phase oracle strategies agree for any in-range target
    #[test]
    fn phase_oracle_strategies_agree(
        (n, target) in (1usize..=4).prop_flat_map(|n| (Just(n), 0..1usize << n))
    ) {
        let builder = OracleBuilder::new();
        let diagonal = builder
            .from_target_with(target, n, PhaseOracleStrategy::Diagonal)
            .unwrap();
        let gates = builder
            .from_target_with(target, n, PhaseOracleStrategy::GateDecomposition)
            .unwrap();
        prop_assert!(diagonal.equals(&gates));
    }
}

// ============================================================================
// Embedding Properties
// ============================================================================

proptest! {
    /// Property: H on qubit q of |0..0⟩ splits the weight between index 0
    /// and the index with only bit q set
    #[test]
    fn embedded_hadamard_splits_zero_state(
        (n, q) in (1usize..=4).prop_flat_map(|n| (Just(n), 0..n))
    ) {
        let mut register = Register::create(n, 0).unwrap();
        register.apply_gate(&StandardGate::H, &[q]).unwrap();

        let partner = 1 << (n - 1 - q);
        for (i, amp) in register.amplitudes().iter().enumerate() {
            let expected = if i == 0 || i == partner { std::f64::consts::FRAC_1_SQRT_2 } else { 0.0 };
            prop_assert!((amp.re - expected).abs() < 1e-10 && amp.im.abs() < 1e-10);
        }
    }

    /// Property: embedded gates stay unitary for any target placement
    #[test]
    fn embedded_cnot_is_unitary(
        (n, control, target) in (2usize..=4)
            .prop_flat_map(|n| (Just(n), 0..n, 0..n))
            .prop_filter("distinct qubits", |(_, c, t)| c != t)
    ) {
        let op = embed(&StandardGate::CNOT, &[control, target], n).unwrap();
        prop_assert!(op.is_unitary(1e-10));
    }
}

// ============================================================================
// Sampling Properties
// ============================================================================

proptest! {
    /// Property: the distribution of a normalized state sums to 1
    #[test]
    fn distribution_sums_to_one(amplitudes in state(3)) {
        let register = Register::from_amplitudes(3, amplitudes).unwrap();
        let distribution = MeasurementSampler::new().distribution(&register).unwrap();
        prop_assert!((distribution.total() - 1.0).abs() < 1e-9);
        prop_assert!(distribution.probabilities().iter().all(|&p| p >= 0.0));
    }

    /// Property: a sampled outcome always had positive probability, and the
    /// register ends collapsed onto it
    #[test]
    fn sampled_outcome_is_possible(amplitudes in state(3), seed in any::<u64>()) {
        let mut register = Register::from_amplitudes(3, amplitudes).unwrap();
        let sampler = MeasurementSampler::new();
        let before = sampler.distribution(&register).unwrap();

        let measurement = sampler
            .sample(&mut register, &mut StdRng::seed_from_u64(seed))
            .unwrap();

        prop_assert!(before.probability(measurement.outcome) > 0.0);
        prop_assert_eq!(register.phase(), RegisterPhase::Measured);
        prop_assert_eq!(register.outcome(), Some(measurement.outcome));
    }
}
