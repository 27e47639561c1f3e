//! Lock-Free Single-Producer Single-Consumer (SPSC) Ring Buffer, overwrite-oldest
//!
//! Counter `write` dan `read` hanya naik (monotonic, 64-bit), tidak pernah di-wrap.
//! Masking `counter & (N - 1)` hanya dipakai saat akses slot fisik, jadi
//! `size = write - read` selalu benar tanpa koreksi wraparound.
//!
//! Saat penuh, producer membuang elemen tertua (tidak pernah block, tidak pernah gagal).
//! Karena itu `read` bisa dimajukan oleh DUA pihak:
//! - consumer, saat pop
//! - producer, saat overflow
//!
//! Keduanya memajukan `read` lewat compare-and-swap, sehingga setiap elemen
//! diterima consumer tepat sekali ATAU dihitung sebagai `evicted` tepat sekali.
//!
//! Tidak ada Mutex, tidak ada alokasi setelah inisialisasi.

use std::cell::UnsafeCell;
use std::fmt;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;
use tracing::{debug, trace};

use super::error::{Result, RingError};
use super::handle::{Consumer, Producer};

/// Slot dalam ring buffer - satu elemen per cache line
#[repr(C, align(64))]
struct Slot<T> {
    data: UnsafeCell<T>,
}

impl<T: Copy> Slot<T> {
    fn new(value: T) -> Self {
        Self {
            data: UnsafeCell::new(value),
        }
    }

    /// # Safety
    /// Hanya producer yang boleh menulis, dan hanya setelah `read` sudah melewati slot ini.
    #[inline(always)]
    unsafe fn store(&self, value: T) {
        ptr::write(self.data.get(), value);
    }

    /// Salinan spekulatif (seqlock-style). Hasilnya hanya valid kalau CAS pada `read`
    /// sesudahnya berhasil; kalau gagal, salinan bisa saja robek dan harus dibuang.
    ///
    /// # Safety
    /// Hanya consumer yang boleh memanggil ini.
    #[inline(always)]
    unsafe fn load(&self) -> T {
        ptr::read_volatile(self.data.get())
    }
}

/// Hasil push. Push tidak pernah gagal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    /// Elemen disimpan, tidak ada yang dibuang
    Stored,
    /// Buffer penuh: elemen tertua yang belum dibaca dibuang
    Overwrote,
}

impl Push {
    #[inline(always)]
    pub fn is_overwrite(self) -> bool {
        self == Push::Overwrote
    }
}

/// Cache-line aligned SPSC ring buffer dengan kapasitas tetap `N` (power of 2).
///
/// Semua `N` slot di-isi `T::default()` saat konstruksi. Pop tidak menghapus elemen,
/// hanya menyalin dan memajukan `read`; slot ditimpa di tempat oleh push berikutnya.
///
/// Untuk pemakaian lintas thread, panggil [`split`](Self::split) untuk mendapatkan
/// tepat satu [`Producer`] dan satu [`Consumer`]. Borrow dari kedua handle mencegah
/// buffer dipindah, di-clone, atau di-clear selama masih dipakai.
///
/// # Example
///
/// ```
/// use aligned_ring::core::{AlignedRingBuffer, Push};
///
/// let mut rb: AlignedRingBuffer<u32, 4> = AlignedRingBuffer::new();
/// for i in 1..=4 {
///     assert_eq!(rb.push(i), Push::Stored);
/// }
/// assert!(rb.full());
///
/// // Penuh: 1 dibuang untuk memberi tempat ke 5
/// assert_eq!(rb.push(5), Push::Overwrote);
/// assert_eq!(rb.pop(), Ok(2));
/// ```
#[repr(C)]
pub struct AlignedRingBuffer<T, const N: usize> {
    // Producer side
    write: CachePadded<AtomicU64>,
    // Consumer side, di-CAS juga oleh producer saat overflow
    read: CachePadded<AtomicU64>,
    // Hanya ditulis producer
    evicted: CachePadded<AtomicU64>,
    // Pre-allocated di heap, alamat slot stabil selama buffer hidup
    buffer: Box<[Slot<T>]>,
    mask: u64,
}

// SAFETY: RingBuffer aman untuk Send/Sync karena:
// - Akses slot via &self hanya lewat Producer/Consumer (masing-masing tunggal, &mut self)
// - `read` hanya dimajukan lewat CAS, `write` hanya oleh producer
// - Release/Acquire pada counter mempublikasikan isi slot
unsafe impl<T: Send, const N: usize> Send for AlignedRingBuffer<T, N> {}
unsafe impl<T: Send, const N: usize> Sync for AlignedRingBuffer<T, N> {}

impl<T: Copy + Default, const N: usize> Default for AlignedRingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> AlignedRingBuffer<T, N> {
    /// Membuat ring buffer baru. N HARUS power of 2.
    ///
    /// # Panics
    /// Panic jika N bukan power of 2 atau N == 0
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(rb) => rb,
            Err(e) => panic!("{}", e),
        }
    }

    /// Seperti [`new`](Self::new), tapi mengembalikan error alih-alih panic.
    ///
    /// Kapasitas dicek sebelum alokasi apa pun.
    pub fn try_new() -> Result<Self> {
        if N == 0 || !N.is_power_of_two() {
            return Err(RingError::InvalidCapacity { capacity: N });
        }

        // Semua slot di-default-construct sekarang, tidak ada alokasi lagi setelah ini
        let buffer: Box<[Slot<T>]> = (0..N).map(|_| Slot::new(T::default())).collect();

        debug!(
            capacity = N,
            slot_size = mem::size_of::<Slot<T>>(),
            bytes = N * mem::size_of::<Slot<T>>(),
            "ring buffer allocated"
        );

        Ok(Self {
            write: CachePadded::new(AtomicU64::new(0)),
            read: CachePadded::new(AtomicU64::new(0)),
            evicted: CachePadded::new(AtomicU64::new(0)),
            buffer,
            mask: N.wrapping_sub(1) as u64,
        })
    }

    /// Push data ke buffer (single-threaded).
    ///
    /// Kalau penuh, elemen tertua dibuang dan `Push::Overwrote` dikembalikan.
    #[inline(always)]
    pub fn push(&mut self, value: T) -> Push {
        // SAFETY: &mut self, tidak ada producer atau consumer lain
        unsafe { self.push_shared(value) }
    }

    /// Pop data dari buffer (single-threaded).
    ///
    /// Returns `Err(RingError::Empty)` jika kosong; counter tidak disentuh.
    #[inline(always)]
    pub fn pop(&mut self) -> Result<T> {
        // SAFETY: &mut self, tidak ada producer atau consumer lain
        unsafe { self.pop_shared() }
    }

    /// Membagi buffer menjadi satu producer dan satu consumer.
    pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        trace!(capacity = N, "ring buffer split");
        let ring: &Self = self;
        (Producer::new(ring), Consumer::new(ring))
    }

    /// # Safety
    /// Pada satu waktu hanya boleh ada SATU pemanggil (producer tunggal).
    #[inline(always)]
    pub(crate) unsafe fn push_shared(&self, value: T) -> Push {
        let write = self.write.load(Ordering::Relaxed);
        let read = self.read.load(Ordering::Acquire);

        let mut outcome = Push::Stored;

        if write.wrapping_sub(read) >= N as u64 {
            // Penuh: buang elemen tertua. CAS gagal artinya consumer baru saja pop
            // elemen itu, jadi slot sudah bebas tanpa perlu dibuang.
            if self
                .read
                .compare_exchange(
                    read,
                    read.wrapping_add(1),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                self.evicted.fetch_add(1, Ordering::Relaxed);
                outcome = Push::Overwrote;
            }
        }

        // `read` sudah melewati slot ini (lewat CAS kita atau pop consumer)
        self.buffer[self.slot_for(write)].store(value);

        // Release: isi slot visible sebelum write di-update
        self.write.store(write.wrapping_add(1), Ordering::Release);

        outcome
    }

    /// # Safety
    /// Pada satu waktu hanya boleh ada SATU pemanggil (consumer tunggal).
    #[inline(always)]
    pub(crate) unsafe fn pop_shared(&self) -> Result<T> {
        let mut read = self.read.load(Ordering::Acquire);

        loop {
            let write = self.write.load(Ordering::Acquire);
            if read == write {
                return Err(RingError::Empty);
            }

            let value = self.buffer[self.slot_for(read)].load();

            // Release: salinan selesai sebelum producer boleh menimpa slot ini
            match self.read.compare_exchange(
                read,
                read.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(value),
                // Producer membuang elemen ini selagi disalin, coba elemen berikutnya
                Err(current) => read = current,
            }
        }
    }
}

impl<T, const N: usize> AlignedRingBuffer<T, N> {
    #[inline(always)]
    fn slot_for(&self, counter: u64) -> usize {
        (counter & self.mask) as usize
    }

    /// Kapasitas buffer
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Jumlah elemen dalam buffer (snapshot)
    #[inline(always)]
    pub fn size(&self) -> usize {
        // `read` dibaca duluan: write tidak pernah mundur, jadi write >= read
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        (write.wrapping_sub(read) as usize).min(N)
    }

    /// Cek apakah buffer kosong
    #[inline(always)]
    pub fn empty(&self) -> bool {
        self.size() == 0
    }

    /// Cek apakah buffer penuh
    #[inline(always)]
    pub fn full(&self) -> bool {
        self.size() == N
    }

    /// Total elemen yang dibuang karena overflow sejak konstruksi atau `clear` terakhir
    #[inline(always)]
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    /// Reset counter ke nol. Elemen di storage tidak dihancurkan atau dibuat ulang.
    ///
    /// `&mut self` menjamin tidak ada push/pop yang sedang berjalan.
    pub fn clear(&mut self) {
        let dropped = self.size();
        *self.write.get_mut() = 0;
        *self.read.get_mut() = 0;
        *self.evicted.get_mut() = 0;
        debug!(capacity = N, dropped, "ring buffer cleared");
    }
}

impl<T, const N: usize> fmt::Debug for AlignedRingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedRingBuffer")
            .field("capacity", &N)
            .field("size", &self.size())
            .field("evicted", &self.evicted())
            .finish()
    }
}
