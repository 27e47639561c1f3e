//! Criterion benchmark untuk Ring Buffer
//!
//! Run dengan: cargo bench

use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use aligned_ring::{AlignedRingBuffer, Frame};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer");
    group.throughput(Throughput::Elements(1));

    // Push pada buffer penuh: selalu jalur overwrite
    group.bench_function("push_overwrite", |b| {
        let mut rb: AlignedRingBuffer<u64, 65536> = AlignedRingBuffer::new();
        let mut i = 0u64;
        b.iter(|| {
            rb.push(black_box(i));
            i = i.wrapping_add(1);
        });
    });

    // Pop
    group.bench_function("pop", |b| {
        let mut rb: AlignedRingBuffer<u64, 65536> = AlignedRingBuffer::new();
        // Pre-fill
        for i in 0..32768 {
            rb.push(i);
        }
        b.iter(|| {
            if let Ok(v) = rb.pop() {
                rb.push(black_box(v));
            }
        });
    });

    // Push+pop cycle
    group.bench_function("push_pop_cycle", |b| {
        let mut rb: AlignedRingBuffer<u64, 65536> = AlignedRingBuffer::new();
        let mut i = 0u64;
        b.iter(|| {
            rb.push(black_box(i));
            let _ = black_box(rb.pop());
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("push_pop_cycle_frame", |b| {
        let mut rb: AlignedRingBuffer<Frame, 1024> = AlignedRingBuffer::new();
        let frame = Frame::new(1);
        b.iter(|| {
            rb.push(black_box(frame));
            let _ = black_box(rb.pop());
        });
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    // Batch operations
    for batch_size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_function(format!("batch_{}", batch_size), |b| {
            let mut rb: AlignedRingBuffer<u64, 65536> = AlignedRingBuffer::new();
            b.iter(|| {
                for i in 0..*batch_size {
                    rb.push(black_box(i as u64));
                }
                for _ in 0..*batch_size {
                    let _ = black_box(rb.pop());
                }
            });
        });
    }

    group.finish();
}

fn bench_cross_thread(c: &mut Criterion) {
    const BATCH: u64 = 100_000;

    let mut group = c.benchmark_group("cross_thread");
    group.throughput(Throughput::Elements(BATCH));
    group.sample_size(20);

    group.bench_function("spsc_frames", |b| {
        b.iter(|| {
            let mut rb: AlignedRingBuffer<Frame, 4096> = AlignedRingBuffer::new();
            let (mut tx, mut rx) = rb.split();
            let done = AtomicBool::new(false);

            thread::scope(|s| {
                let done = &done;
                s.spawn(move || {
                    for seq in 0..BATCH {
                        tx.push(Frame::new(seq));
                    }
                    done.store(true, Ordering::Release);
                });

                let mut finished = false;
                loop {
                    match rx.pop() {
                        Ok(frame) => {
                            black_box(frame);
                        }
                        Err(_) if finished => break,
                        Err(_) => {
                            finished = done.load(Ordering::Acquire);
                            hint::spin_loop();
                        }
                    }
                }
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_throughput, bench_cross_thread);
criterion_main!(benches);
