//! `fieldseal bench`: time repeated encrypt and decrypt calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cli::{load_settings, output};
use crate::errors::{FieldSealError, Result};
use crate::registry::{InMemoryKeyRegistry, KeyRegistry};
use crate::service::EnvelopeCipher;

const BENCH_KEY: &str = "bench_key";
const BENCH_PLAINTEXT: &str = "123-45-6789";

/// Execute the `bench` command.
pub fn execute(iterations: Option<u32>) -> Result<()> {
    let iterations = match iterations {
        Some(n) => n,
        None => load_settings()?.bench_iterations,
    };
    if iterations == 0 {
        return Err(FieldSealError::CommandFailed(
            "iterations must be at least 1".into(),
        ));
    }

    let registry = Arc::new(InMemoryKeyRegistry::new());
    registry.create(BENCH_KEY);
    let cipher = EnvelopeCipher::new(registry);

    output::info(&format!(
        "Running {iterations} iteration(s) per direction on '{BENCH_PLAINTEXT}'"
    ));

    let start = Instant::now();
    for _ in 0..iterations {
        cipher.encrypt(BENCH_PLAINTEXT, BENCH_KEY)?;
    }
    let encrypt_time = start.elapsed();

    let envelope = cipher.encrypt(BENCH_PLAINTEXT, BENCH_KEY)?;
    let start = Instant::now();
    for _ in 0..iterations {
        cipher.decrypt(&envelope, BENCH_KEY)?;
    }
    let decrypt_time = start.elapsed();

    output::print_table(
        &["Operation", "Iterations", "Total", "Average"],
        vec![
            row("encrypt", iterations, encrypt_time),
            row("decrypt", iterations, decrypt_time),
        ],
    );

    Ok(())
}

fn row(op: &str, iterations: u32, total: Duration) -> Vec<String> {
    let average = total / iterations;
    vec![
        op.to_string(),
        iterations.to_string(),
        format!("{:.3} s", total.as_secs_f64()),
        format!("{:.2} µs/op", average.as_secs_f64() * 1e6),
    ]
}
