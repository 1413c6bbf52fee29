//! Caduceus - Zero-Heap Protobuf Wire Runtime
//!
//! Arsitektur:
//! - Zero-Heap: Semua memori dinamis dari bump arena di atas buffer
//!   milik caller
//! - Single-Pass: Encoder mengisi buffer dari belakang, panjang nested
//!   message tanpa pre-pass
//! - Abort-Latch: Error pertama mengunci encoder/decoder, hasil dibaca
//!   sekali lewat `finish()`
//! - Borrow-Only: Message hasil decode meminjam dari arena, dijamin
//!   borrow checker
//!
//! Crate ini adalah runtime untuk generated code: per file `.proto`,
//! generator menghasilkan struct yang mengimplementasi [`Message`] di
//! atas primitive [`Encoder`] / [`Decoder`] di sini. Lihat
//! `demos/address_book.rs` untuk bentuk generated code yang diharapkan.

mod core;
mod error;
mod message;
mod protocol;

pub use crate::core::Arena;
pub use crate::error::Error;
pub use crate::message::{Message, Oneof, Repeated};
pub use crate::protocol::{Decoder, Encoder, WireType};
