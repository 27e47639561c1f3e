//! Fixed-size telemetry frame, 64 byte (satu cache line)
//!
//! Layout:
//! ┌──────────────────────────────────────────────┐
//! │ sequence      (8 bytes)                      │
//! │ timestamp_ns  (8 bytes)                      │
//! │ payload       (5 x 8 bytes)                  │
//! │ checksum      (8 bytes)                      │
//! └──────────────────────────────────────────────┘
//!
//! Checksum mencakup semua field lain, jadi frame yang robek (sebagian dari
//! penulisan lama, sebagian dari penulisan baru) langsung ketahuan.

use std::mem;
use std::time::{SystemTime, UNIX_EPOCH};

pub const FRAME_SIZE: usize = mem::size_of::<Frame>();
pub const PAYLOAD_WORDS: usize = 5;

#[repr(C, align(64))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    /// Sequence number untuk ordering
    pub sequence: u64,
    /// Timestamp dalam nanoseconds (epoch)
    pub timestamp_ns: u64,
    pub payload: [u64; PAYLOAD_WORDS],
    pub checksum: u64,
}

impl Frame {
    /// Membuat frame dengan payload deterministik dari `sequence`
    #[inline(always)]
    pub fn new(sequence: u64) -> Self {
        let mut payload = [0u64; PAYLOAD_WORDS];
        let mut hash = sequence;
        for word in payload.iter_mut() {
            hash = hash.wrapping_mul(6364136223846793005).wrapping_add(1);
            *word = hash;
        }

        Self::with_payload(sequence, payload)
    }

    #[inline(always)]
    pub fn with_payload(sequence: u64, payload: [u64; PAYLOAD_WORDS]) -> Self {
        let mut frame = Self {
            sequence,
            timestamp_ns: now_ns(),
            payload,
            checksum: 0,
        };
        frame.checksum = frame.compute_checksum();
        frame
    }

    /// Validasi checksum. Frame default (semua nol) dianggap tidak valid.
    #[inline(always)]
    pub fn is_intact(&self) -> bool {
        self.checksum != 0 && self.checksum == self.compute_checksum()
    }

    /// Umur frame dalam nanoseconds sejak dibuat
    #[inline(always)]
    pub fn age_ns(&self) -> u64 {
        now_ns().saturating_sub(self.timestamp_ns)
    }

    /// Adler-style checksum di atas word 64-bit
    #[inline(always)]
    fn compute_checksum(&self) -> u64 {
        let mut a: u64 = 1;
        let mut b: u64 = 0;

        let words = [self.sequence, self.timestamp_ns]
            .into_iter()
            .chain(self.payload);
        for word in words {
            a = a.wrapping_add(word);
            b = b.wrapping_add(a);
        }

        (b << 32) ^ a
    }
}

#[inline(always)]
fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
