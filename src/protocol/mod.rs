//! Protocol Layer: Protobuf Wire Format
//!
//! Prinsip desain:
//! - Single-Pass: Encoder mengisi buffer dari belakang supaya panjang
//!   nested message tidak perlu pre-pass
//! - Abort-Latch: Error pertama mengunci instance; operasi berikutnya
//!   jadi no-op murah, hasil akhir dibaca sekali lewat `finish()`
//! - No-Allocation: Decode menarik memori hanya dari [`crate::Arena`]

mod decoder;
mod encoder;
mod wire;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use wire::WireType;
