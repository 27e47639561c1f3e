//! Ring Stress - Producer/Consumer di dua core terpisah
//!
//! Producer push `Frame` secepat mungkin, consumer pop (opsional diperlambat
//! supaya jalur overwrite-oldest ikut teruji). Di akhir diverifikasi:
//! - Tidak ada frame robek (checksum)
//! - Sequence selalu naik (FIFO, boleh ada gap karena eviction)
//! - received + evicted == sent
//!
//! Usage:
//!   cargo run --release --bin ring_stress -- [OPTIONS]

use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use aligned_ring::{AlignedRingBuffer, Consumer, Frame, Producer, RingError};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RING_SIZE: usize = 1024;

/// Stress test configuration
#[derive(Debug, Parser)]
#[command(name = "ring_stress", about = "Two-thread SPSC ring buffer stress test")]
struct StressConfig {
    /// Jumlah frame yang di-push producer
    #[arg(short, long, default_value_t = 10_000_000)]
    frames: u64,

    /// Spin iterations setelah setiap pop (memperlambat consumer, memaksa overwrite)
    #[arg(long, default_value_t = 0)]
    consumer_spin: u32,

    /// Pin producer ke core ini
    #[arg(long)]
    producer_core: Option<usize>,

    /// Pin consumer ke core ini
    #[arg(long)]
    consumer_core: Option<usize>,
}

/// Statistik sisi consumer
#[derive(Debug, Default)]
struct ConsumerStats {
    received: u64,
    corrupt: u64,
    misordered: u64,
    total_latency_ns: u64,
    min_latency_ns: u64,
    max_latency_ns: u64,
}

impl ConsumerStats {
    fn record(&mut self, latency_ns: u64) {
        self.received += 1;
        self.total_latency_ns = self.total_latency_ns.wrapping_add(latency_ns);
        if self.received == 1 || latency_ns < self.min_latency_ns {
            self.min_latency_ns = latency_ns;
        }
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    fn avg_latency_ns(&self) -> u64 {
        if self.received > 0 {
            self.total_latency_ns / self.received
        } else {
            0
        }
    }
}

#[cfg(target_os = "linux")]
fn pin_to_core(core: usize) -> Result<()> {
    // SAFETY: cpu_set_t adalah plain bitmask, zeroed valid
    let rc = unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set)
    };

    if rc != 0 {
        return Err(std::io::Error::last_os_error())
            .with_context(|| format!("sched_setaffinity to core {} failed", core));
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn pin_to_core(core: usize) -> Result<()> {
    warn!(core, "CPU pinning not supported on this platform, ignoring");
    Ok(())
}

fn run_producer(
    mut tx: Producer<'_, Frame, RING_SIZE>,
    frames: u64,
    core: Option<usize>,
    done: &AtomicBool,
) -> Result<u64> {
    if let Some(core) = core {
        pin_to_core(core)?;
    }

    for sequence in 0..frames {
        tx.push(Frame::new(sequence));
    }

    // Release: semua push di atas visible sebelum consumer melihat `done`
    done.store(true, Ordering::Release);
    Ok(tx.evicted())
}

fn run_consumer(
    mut rx: Consumer<'_, Frame, RING_SIZE>,
    spin: u32,
    core: Option<usize>,
    done: &AtomicBool,
) -> Result<ConsumerStats> {
    if let Some(core) = core {
        pin_to_core(core)?;
    }

    let mut stats = ConsumerStats::default();
    let mut last_sequence: Option<u64> = None;
    let mut finished = false;

    loop {
        match rx.pop() {
            Ok(frame) => {
                if !frame.is_intact() {
                    stats.corrupt += 1;
                    continue;
                }
                if last_sequence.is_some_and(|last| frame.sequence <= last) {
                    stats.misordered += 1;
                }
                last_sequence = Some(frame.sequence);
                stats.record(frame.age_ns());

                for _ in 0..spin {
                    hint::spin_loop();
                }
            }
            Err(RingError::Empty) => {
                // Satu putaran pop lagi setelah `done` terlihat, lalu berhenti
                if finished {
                    break;
                }
                finished = done.load(Ordering::Acquire);
                hint::spin_loop();
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(stats)
}

fn print_report(config: &StressConfig, stats: &ConsumerStats, evicted: u64, duration: Duration) {
    let rate = config.frames as f64 / duration.as_secs_f64();

    info!(
        duration_s = %format!("{:.2}", duration.as_secs_f64()),
        sent = config.frames,
        received = stats.received,
        evicted,
        rate_mfps = %format!("{:.2}", rate / 1_000_000.0),
        "stress test results"
    );
    info!(
        min_us = %format!("{:.2}", stats.min_latency_ns as f64 / 1000.0),
        max_us = %format!("{:.2}", stats.max_latency_ns as f64 / 1000.0),
        avg_us = %format!("{:.2}", stats.avg_latency_ns() as f64 / 1000.0),
        "end-to-end latency"
    );

    if evicted > 0 {
        warn!(
            evicted,
            "consumer fell behind, oldest frames were overwritten"
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = StressConfig::parse();
    info!(?config, capacity = RING_SIZE, "starting ring stress test");

    let mut ring: AlignedRingBuffer<Frame, RING_SIZE> = AlignedRingBuffer::new();
    let (tx, rx) = ring.split();
    let done = AtomicBool::new(false);
    let start = Instant::now();

    let (evicted, stats) = thread::scope(|s| -> Result<(u64, ConsumerStats)> {
        let done = &done;

        let producer = thread::Builder::new()
            .name("ring-producer".into())
            .spawn_scoped(s, move || {
                run_producer(tx, config.frames, config.producer_core, done)
            })
            .context("failed to spawn producer thread")?;

        let consumer = thread::Builder::new()
            .name("ring-consumer".into())
            .spawn_scoped(s, move || {
                run_consumer(rx, config.consumer_spin, config.consumer_core, done)
            })
            .context("failed to spawn consumer thread")?;

        let evicted = producer
            .join()
            .map_err(|_| anyhow!("producer thread panicked"))??;
        let stats = consumer
            .join()
            .map_err(|_| anyhow!("consumer thread panicked"))??;

        Ok((evicted, stats))
    })?;

    let duration = start.elapsed();
    print_report(&config, &stats, evicted, duration);

    if stats.corrupt > 0 {
        bail!("{} torn frames delivered", stats.corrupt);
    }
    if stats.misordered > 0 {
        bail!("{} frames delivered out of order", stats.misordered);
    }
    if stats.received + evicted != config.frames {
        bail!(
            "accounting mismatch: received {} + evicted {} != sent {}",
            stats.received,
            evicted,
            config.frames
        );
    }

    info!("stress test passed");
    Ok(())
}
