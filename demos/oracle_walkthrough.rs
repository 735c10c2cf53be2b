//! Walk through Deutsch, Deutsch-Jozsa and Grover on small registers
//!
//! Debug events show each oracle and circuit as it is built.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use qoracle::algorithms::{deutsch, deutsch_jozsa, grover};
use qoracle::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Deutsch");
    println!("=======");
    let config = DeutschJozsaConfig::default();
    for bits in ["00", "01", "10", "11"] {
        let table = TruthTable::from_bit_string(bits)?;
        let report = deutsch(&table, &config)?;
        println!(
            "  f = {}  P(|0⟩) = {:.3}  verdict = {:?}",
            bits, report.zero_probability, report.verdict
        );
    }

    // The full register for f = 11 before measurement
    let register = deutsch_jozsa::prepare_circuit(&TruthTable::from_bit_string("11")?, &config)?;
    println!("\n{}", register);

    println!("Deutsch-Jozsa");
    println!("=============");
    let tables = ["00000000", "01010101", "11110000", "00000001"]
        .into_iter()
        .map(TruthTable::from_bit_string)
        .collect::<Result<Vec<_>>>()?;
    let results = deutsch_jozsa::classify_batch(&tables, &config);
    for result in &results {
        match result {
            Ok(report) => println!(
                "  f = {}  P(|000⟩) = {:.3}  verdict = {:?}",
                report.table, report.zero_probability, report.verdict
            ),
            Err(e) => println!("  failed: {}", e),
        }
    }
    info!(summary = ?deutsch_jozsa::summarize(&results), "deutsch-jozsa batch done");

    println!("\nGrover");
    println!("======");
    let mut rng = StdRng::seed_from_u64(2024);
    for search_qubits in 2..=4 {
        let target = rng.gen_range(0..1usize << search_qubits);
        for ancilla in [false, true] {
            let config = GroverConfig { ancilla, ..Default::default() };
            let report = grover::run(target, search_qubits, &config, &mut rng)?;
            println!(
                "  n = {}  ancilla = {:5}  target = {:0width$b}  iterations = {}  P = {:.4}  measured = {:0width$b}",
                search_qubits,
                ancilla,
                report.target,
                report.iterations,
                report.success_probability,
                report.measured,
                width = search_qubits
            );
        }
    }

    Ok(())
}
