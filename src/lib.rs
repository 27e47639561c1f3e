//! aligned-ring - Cache-Line Aligned SPSC Ring Buffer
//!
//! Arsitektur:
//! - Fixed capacity: N power of 2, masking `counter & (N - 1)` tanpa modulo
//! - Lock-Free: Atomic-only counter, write/read di cache line terpisah
//! - Overwrite-Oldest: Cocok untuk telemetry/broadcast best-effort

pub mod core;
pub mod frame;

pub use crate::core::{AlignedRingBuffer, Consumer, Producer, Push, RingError};
pub use crate::frame::Frame;
