//! Error type untuk ring buffer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RingError>;

/// Semua kegagalan yang bisa dilaporkan oleh [`AlignedRingBuffer`](super::AlignedRingBuffer).
///
/// Overflow saat push BUKAN error: elemen tertua dibuang (lihat `Push::Overwrote`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// Kapasitas harus power of 2 dan > 0
    #[error("capacity {capacity} is not a non-zero power of two")]
    InvalidCapacity { capacity: usize },

    /// Pop dari buffer kosong
    #[error("ring buffer is empty")]
    Empty,
}
