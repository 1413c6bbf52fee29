//! Oneof: satu field aktif dari beberapa kandidat.
//!
//! Direpresentasikan sebagai Rust enum dengan variant not-set sebagai
//! `Default`. Menulis member baru otomatis menggantikan yang lama -
//! properti "last writer wins" datang gratis dari assignment enum.
//!
//! Member oneof punya explicit presence: saat encode, member aktif
//! SELALU ditulis lewat varian `_always` milik [`Encoder`], juga ketika
//! nilainya 0 / kosong. Kalau tidak, `Oneof::Port(0)` dan not-set jadi
//! tidak terbedakan di wire.
//!
//! Saat decode, tag member mana pun yang muncul di stream menimpa
//! variant aktif; yang terakhir di stream yang menang, konsisten dengan
//! aturan duplicate field biasa.

use crate::protocol::Encoder;

/// Kontrak oneof untuk generated code.
///
/// Hanya sisi encode yang butuh dispatch lewat trait; sisi decode
/// ditangani match arm per member di `Message::decode_inner` message
/// pemiliknya (tag member dibaca seperti field biasa, hasilnya
/// di-assign ke enum).
pub trait Oneof<'a>: Default {
    /// Tulis member aktif (pakai writer `_always`); variant not-set
    /// tidak menulis apa pun.
    fn encode_inner(&self, encoder: &mut Encoder<'_>);
}
