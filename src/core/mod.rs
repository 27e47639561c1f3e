//! Core module: Lock-Free SPSC Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free: Hanya atomic operations, tidak ada Mutex/RwLock
//! - No-Allocation: Semua slot pre-allocated dan default-filled saat init
//! - Overwrite-Oldest: Producer tidak pernah block, elemen tertua dibuang saat penuh

mod error;
mod handle;
mod ring_buffer;

pub use error::{Result, RingError};
pub use handle::{Consumer, Drain, Producer};
pub use ring_buffer::{AlignedRingBuffer, Push};
