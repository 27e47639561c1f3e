//! Model test: ring buffer vs `VecDeque` dengan semantik overwrite-oldest

use std::collections::VecDeque;

use aligned_ring::{AlignedRingBuffer, Push, RingError};
use proptest::prelude::*;

const CAPACITY: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    Pop,
    Clear,
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        6 => any::<u32>().prop_map(Op::Push),
        4 => Just(Op::Pop),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..512)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        rng_algorithm: proptest::test_runner::RngAlgorithm::ChaCha,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0x5EED_2018),
        .. ProptestConfig::default()
    })]

    #[test]
    fn ring_matches_overwrite_model(ops in ops()) {
        let mut rb: AlignedRingBuffer<u32, CAPACITY> = AlignedRingBuffer::new();
        let mut model: VecDeque<u32> = VecDeque::with_capacity(CAPACITY);
        let mut evicted = 0u64;

        for op in ops {
            match op {
                Op::Push(v) => {
                    let expected = if model.len() == CAPACITY {
                        model.pop_front();
                        evicted += 1;
                        Push::Overwrote
                    } else {
                        Push::Stored
                    };
                    model.push_back(v);
                    prop_assert_eq!(rb.push(v), expected);
                }
                Op::Pop => {
                    let expected = model.pop_front().ok_or(RingError::Empty);
                    prop_assert_eq!(rb.pop(), expected);
                }
                Op::Clear => {
                    model.clear();
                    evicted = 0;
                    rb.clear();
                }
            }

            prop_assert_eq!(rb.size(), model.len());
            prop_assert_eq!(rb.empty(), model.is_empty());
            prop_assert_eq!(rb.full(), model.len() == CAPACITY);
            prop_assert_eq!(rb.capacity(), CAPACITY);
            prop_assert_eq!(rb.evicted(), evicted);
        }
    }

    #[test]
    fn fifo_without_overflow(values in prop::collection::vec(any::<u64>(), 0..=64)) {
        let mut rb: AlignedRingBuffer<u64, 64> = AlignedRingBuffer::new();

        for &v in &values {
            prop_assert_eq!(rb.push(v), Push::Stored);
        }
        prop_assert_eq!(rb.full(), values.len() == 64);

        for &v in &values {
            prop_assert_eq!(rb.pop(), Ok(v));
        }
        prop_assert_eq!(rb.pop(), Err(RingError::Empty));
    }
}
