//! Message Layer: kontrak untuk generated code
//!
//! Prinsip desain:
//! - Borrow-Only: message hasil decode hanya meminjam dari arena;
//!   tidak ada owned String/Vec di mana pun
//! - Two-Phase Repeated: chain saat decode, array contiguous setelah
//!   `finalize` - jumlah item tidak perlu diketahui di muka
//! - Explicit-Presence Oneof: member aktif selalu di-encode, juga
//!   ketika nilainya default

mod oneof;
pub(crate) mod repeated;

pub use oneof::Oneof;
pub use repeated::Repeated;

use crate::core::Arena;
use crate::error::Error;
use crate::protocol::{Decoder, Encoder};

/// Kontrak message: generated code mengimplementasi `encode_inner` /
/// `decode_inner` per field, entry point `encode` / `decode` datang
/// gratis dari default method.
///
/// Lifetime `'a` adalah pinjaman arena: semua field string, bytes, dan
/// repeated di dalam message hidup selama arena itu.
pub trait Message<'a>: Default {
    /// Tulis semua field ke encoder. Dipanggil juga oleh
    /// `Encoder::write_message` untuk nested message.
    fn encode_inner(&self, encoder: &mut Encoder<'_>);

    /// Baca field dari decoder sampai input habis atau abort. Pola
    /// standar: loop `while decoder.available()`, match hasil
    /// `read_tag()`, default arm `skip_field`, lalu `finalize_repeated`
    /// per repeated field setelah loop.
    fn decode_inner(&mut self, decoder: &mut Decoder<'_, 'a>);

    /// Encode ke `out`. Hasil: panjang encoded data di awal `out`.
    fn encode(&self, out: &mut [u8]) -> Result<usize, Error> {
        let mut encoder = Encoder::new(out);
        self.encode_inner(&mut encoder);
        encoder.finish()
    }

    /// Decode dari `data`, alokasi dari `arena`. Hasil: jumlah byte
    /// terkonsumsi.
    fn decode(&mut self, data: &[u8], arena: &'a Arena<'a>) -> Result<usize, Error> {
        let mut decoder = Decoder::new(data, arena);
        self.decode_inner(&mut decoder);
        decoder.finish()
    }
}
