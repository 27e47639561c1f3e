//! Producer / Consumer handle
//!
//! Disiplin SPSC dijaga oleh type system: `split` hanya bisa dipanggil dengan
//! `&mut AlignedRingBuffer`, hasilnya tepat satu `Producer` dan satu `Consumer`,
//! dan keduanya tidak bisa di-clone. Push/pop butuh `&mut self` pada handle.

use super::error::Result;
use super::ring_buffer::{AlignedRingBuffer, Push};

/// Sisi penulis. Bisa dikirim ke thread lain (`Send` jika `T: Send`).
pub struct Producer<'a, T, const N: usize> {
    ring: &'a AlignedRingBuffer<T, N>,
}

impl<'a, T: Copy + Default, const N: usize> Producer<'a, T, N> {
    pub(crate) fn new(ring: &'a AlignedRingBuffer<T, N>) -> Self {
        Self { ring }
    }

    /// Push data, menimpa elemen tertua kalau penuh. Tidak pernah block.
    #[inline(always)]
    pub fn push(&mut self, value: T) -> Push {
        // SAFETY: hanya ada satu Producer per split, dan push butuh &mut self
        unsafe { self.ring.push_shared(value) }
    }
}

impl<'a, T, const N: usize> Producer<'a, T, N> {
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.ring.size()
    }

    #[inline(always)]
    pub fn empty(&self) -> bool {
        self.ring.empty()
    }

    #[inline(always)]
    pub fn full(&self) -> bool {
        self.ring.full()
    }

    /// Total elemen yang sudah dibuang karena consumer tertinggal
    #[inline(always)]
    pub fn evicted(&self) -> u64 {
        self.ring.evicted()
    }
}

/// Sisi pembaca. Bisa dikirim ke thread lain (`Send` jika `T: Send`).
pub struct Consumer<'a, T, const N: usize> {
    ring: &'a AlignedRingBuffer<T, N>,
}

impl<'a, T: Copy + Default, const N: usize> Consumer<'a, T, N> {
    pub(crate) fn new(ring: &'a AlignedRingBuffer<T, N>) -> Self {
        Self { ring }
    }

    /// Pop data berikutnya dalam urutan FIFO.
    ///
    /// Returns `Err(RingError::Empty)` jika kosong.
    #[inline(always)]
    pub fn pop(&mut self) -> Result<T> {
        // SAFETY: hanya ada satu Consumer per split, dan pop butuh &mut self
        unsafe { self.ring.pop_shared() }
    }

    /// Iterator yang pop sampai buffer kosong.
    pub fn drain(&mut self) -> Drain<'_, 'a, T, N> {
        Drain { consumer: self }
    }
}

impl<'a, T, const N: usize> Consumer<'a, T, N> {
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.ring.size()
    }

    #[inline(always)]
    pub fn empty(&self) -> bool {
        self.ring.empty()
    }

    #[inline(always)]
    pub fn full(&self) -> bool {
        self.ring.full()
    }
}

/// Iterator dari [`Consumer::drain`]
pub struct Drain<'c, 'a, T, const N: usize> {
    consumer: &'c mut Consumer<'a, T, N>,
}

impl<'c, 'a, T: Copy + Default, const N: usize> Iterator for Drain<'c, 'a, T, N> {
    type Item = T;

    #[inline(always)]
    fn next(&mut self) -> Option<T> {
        self.consumer.pop().ok()
    }
}
