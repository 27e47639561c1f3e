//! aligned-ring - Single-thread latency benchmark
//!
//! Mengukur biaya murni push/pop tanpa kontensi antar core:
//! - push ke buffer yang belum penuh
//! - pop dari buffer yang berisi
//! - push pada buffer penuh (jalur overwrite-oldest)
//!
//! Usage:
//!   cargo run --release -- [--iterations N]

use std::hint::black_box;
use std::time::{Duration, Instant};

use aligned_ring::{AlignedRingBuffer, Frame};
use anyhow::{ensure, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

const RING_SIZE: usize = 65536;

/// Benchmark configuration
#[derive(Debug, Parser)]
#[command(name = "aligned_ring", about = "Single-thread ring buffer latency benchmark")]
struct BenchConfig {
    /// Jumlah operasi per skenario
    #[arg(short, long, default_value_t = 1_000_000)]
    iterations: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = BenchConfig::parse();
    ensure!(config.iterations > 0, "--iterations must be > 0");

    info!(
        capacity = RING_SIZE,
        iterations = config.iterations,
        "aligned-ring latency benchmark"
    );

    benchmark_u64(config.iterations);
    benchmark_overwrite(config.iterations);
    benchmark_frame(config.iterations);

    info!("all benchmarks complete");
    Ok(())
}

fn report(name: &str, iterations: usize, duration: Duration) {
    let ns = duration.as_nanos() as f64 / iterations as f64;
    let mops = iterations as f64 / duration.as_secs_f64() / 1_000_000.0;
    info!(
        scenario = name,
        ns_per_op = %format!("{:.2}", ns),
        mops_per_sec = %format!("{:.2}", mops),
        "benchmark result"
    );
}

fn benchmark_u64(iterations: usize) {
    let mut rb: AlignedRingBuffer<u64, RING_SIZE> = AlignedRingBuffer::new();

    // Warm up
    for i in 0..1000 {
        rb.push(i);
    }
    rb.clear();

    // Push tanpa overflow: drain setiap kali hampir penuh
    let mut elapsed = Duration::ZERO;
    let mut done = 0;
    while done < iterations {
        let batch = (iterations - done).min(RING_SIZE);
        let start = Instant::now();
        for i in 0..batch {
            rb.push(black_box(i as u64));
        }
        elapsed += start.elapsed();
        rb.clear();
        done += batch;
    }
    report("push_u64", iterations, elapsed);

    // Pop
    let mut elapsed = Duration::ZERO;
    let mut done = 0;
    while done < iterations {
        let batch = (iterations - done).min(RING_SIZE);
        for i in 0..batch {
            rb.push(i as u64);
        }
        let start = Instant::now();
        for _ in 0..batch {
            let _ = black_box(rb.pop());
        }
        elapsed += start.elapsed();
        done += batch;
    }
    report("pop_u64", iterations, elapsed);

    // Push + pop cycle
    let start = Instant::now();
    for i in 0..iterations {
        rb.push(black_box(i as u64));
        let _ = black_box(rb.pop());
    }
    report("push_pop_cycle_u64", iterations, start.elapsed());
}

fn benchmark_overwrite(iterations: usize) {
    let mut rb: AlignedRingBuffer<u64, RING_SIZE> = AlignedRingBuffer::new();
    for i in 0..RING_SIZE {
        rb.push(i as u64);
    }

    // Setiap push membuang elemen tertua
    let start = Instant::now();
    for i in 0..iterations {
        rb.push(black_box(i as u64));
    }
    report("push_overwrite_u64", iterations, start.elapsed());

    info!(evicted = rb.evicted(), size = rb.size(), "overwrite scenario done");
}

fn benchmark_frame(iterations: usize) {
    let mut rb: AlignedRingBuffer<Frame, RING_SIZE> = AlignedRingBuffer::new();
    let frame = Frame::new(0);

    let start = Instant::now();
    for _ in 0..iterations {
        rb.push(black_box(frame));
        let _ = black_box(rb.pop());
    }
    report("push_pop_cycle_frame", iterations, start.elapsed());
}
