//! Core module: Bump Arena di atas buffer milik caller
//!
//! Prinsip desain:
//! - No-Heap: Semua memori dinamis datang dari satu buffer tetap milik caller
//! - Monotonic: Offset alokasi hanya maju, tidak ada free per-objek
//! - One-Shot: Seluruh arena di-reclaim sekaligus oleh pemilik buffer

mod arena;

pub use arena::Arena;
