//! Backward-Filling Encoder
//!
//! Buffer diisi dari belakang ke depan. Dengan begitu panjang sebuah
//! nested message adalah selisih posisi sebelum/sesudah encode-nya -
//! tidak perlu pre-pass menghitung ukuran. Di akhir, `finish()` memindah
//! hasil ke depan buffer satu kali.
//!
//! Semua writer implicit-presence melewatkan nilai default (0, false,
//! string kosong). Varian `_always` tidak pernah melewatkan - dipakai
//! untuk member oneof (explicit presence).

use super::wire::{zigzag32_encode, zigzag64_encode, WireType};
use crate::error::Error;
use crate::message::{Message, Repeated};

/// Encoder dengan abort latch.
///
/// Error pertama (buffer penuh) mengunci instance; semua write
/// berikutnya jadi no-op. Hasil akhir dibaca sekali lewat `finish()`.
pub struct Encoder<'e> {
    buf: &'e mut [u8],
    /// Bytes pada `buf[pos..]` sudah terisi; write berikutnya turun.
    pos: usize,
    err: Option<Error>,
}

impl<'e> Encoder<'e> {
    /// Membuat encoder; cursor mulai di ujung buffer.
    #[inline(always)]
    pub fn new(buf: &'e mut [u8]) -> Self {
        let pos = buf.len();

        Self {
            buf,
            pos,
            err: None,
        }
    }

    #[inline(always)]
    fn abort(&mut self, error: Error) {
        if self.err.is_none() {
            self.err = Some(error);
        }
    }

    /// Posisi cursor saat ini. Selisih dua posisi = panjang yang baru
    /// ditulis; inilah panjang length-delimited header nested message.
    #[inline(always)]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Tulis raw bytes, mundur. Latch `EncodeBufferFull` jika tidak muat.
    #[inline(always)]
    pub fn write(&mut self, bytes: &[u8]) {
        if self.err.is_some() {
            return;
        }

        if self.pos >= bytes.len() {
            self.pos -= bytes.len();
            self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        } else {
            self.abort(Error::EncodeBufferFull);
        }
    }

    /// Tulis satu varint (base-128, continuation bit di semua group
    /// kecuali yang terakhir). Group di-emit urut nilai, ditempatkan
    /// mundur, jadi buffer akhir terbaca benar ke depan.
    pub fn write_varint(&mut self, mut value: u64) {
        let mut buf = [0u8; 10];
        let mut pos = 0;

        loop {
            buf[pos] = (value as u8) | 0x80;
            pos += 1;
            value >>= 7;

            if value == 0 {
                break;
            }
        }

        buf[pos - 1] &= 0x7f;
        self.write(&buf[..pos]);
    }

    /// Tulis tag `(field_number << 3) | wire_type`.
    #[inline(always)]
    pub fn write_tag(&mut self, field_number: u32, wire_type: WireType) {
        self.write_varint(((field_number << 3) | wire_type as u32) as u64);
    }

    /// Value lalu tag (karena backward fill), dilewatkan jika value 0.
    /// Inilah aturan implicit-presence.
    #[inline(always)]
    pub fn write_tagged_varint(&mut self, field_number: u32, wire_type: WireType, value: u64) {
        if value > 0 {
            self.write_varint(value);
            self.write_tag(field_number, wire_type);
        }
    }

    /// Seperti `write_tagged_varint` tapi tidak pernah dilewatkan.
    #[inline(always)]
    pub fn write_tagged_varint_always(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        value: u64,
    ) {
        self.write_varint(value);
        self.write_tag(field_number, wire_type);
    }

    /// Length-delimited header (selalu ditulis, juga untuk panjang 0).
    #[inline(always)]
    pub fn write_length_delimited(&mut self, field_number: u32, length: u64) {
        self.write_varint(length);
        self.write_tag(field_number, WireType::LengthDelimited);
    }

    // ---- Scalar writers (implicit presence: default dilewatkan) ----

    /// int32 negatif di-sign-extend ke 64 bit (10 byte varint), sesuai
    /// wire format standar.
    #[inline(always)]
    pub fn write_int32(&mut self, field_number: u32, value: i32) {
        self.write_tagged_varint(field_number, WireType::Varint, value as i64 as u64);
    }

    #[inline(always)]
    pub fn write_int64(&mut self, field_number: u32, value: i64) {
        self.write_tagged_varint(field_number, WireType::Varint, value as u64);
    }

    #[inline(always)]
    pub fn write_uint32(&mut self, field_number: u32, value: u32) {
        self.write_tagged_varint(field_number, WireType::Varint, value as u64);
    }

    #[inline(always)]
    pub fn write_uint64(&mut self, field_number: u32, value: u64) {
        self.write_tagged_varint(field_number, WireType::Varint, value);
    }

    #[inline(always)]
    pub fn write_sint32(&mut self, field_number: u32, value: i32) {
        self.write_tagged_varint(
            field_number,
            WireType::Varint,
            zigzag32_encode(value) as u64,
        );
    }

    #[inline(always)]
    pub fn write_sint64(&mut self, field_number: u32, value: i64) {
        self.write_tagged_varint(field_number, WireType::Varint, zigzag64_encode(value));
    }

    #[inline(always)]
    fn write_fixed32_value(&mut self, value: u32) {
        self.write(&value.to_le_bytes());
    }

    #[inline(always)]
    fn write_fixed64_value(&mut self, value: u64) {
        self.write(&value.to_le_bytes());
    }

    #[inline(always)]
    pub fn write_fixed32(&mut self, field_number: u32, value: u32) {
        if value != 0 {
            self.write_fixed32_value(value);
            self.write_tag(field_number, WireType::Bits32);
        }
    }

    #[inline(always)]
    pub fn write_fixed64(&mut self, field_number: u32, value: u64) {
        if value != 0 {
            self.write_fixed64_value(value);
            self.write_tag(field_number, WireType::Bits64);
        }
    }

    #[inline(always)]
    pub fn write_sfixed32(&mut self, field_number: u32, value: i32) {
        self.write_fixed32(field_number, value as u32);
    }

    #[inline(always)]
    pub fn write_sfixed64(&mut self, field_number: u32, value: i64) {
        self.write_fixed64(field_number, value as u64);
    }

    /// Skip berdasarkan bit pattern: +0.0 dilewatkan, -0.0 ditulis.
    #[inline(always)]
    pub fn write_float(&mut self, field_number: u32, value: f32) {
        self.write_fixed32(field_number, value.to_bits());
    }

    #[inline(always)]
    pub fn write_double(&mut self, field_number: u32, value: f64) {
        self.write_fixed64(field_number, value.to_bits());
    }

    #[inline(always)]
    pub fn write_bool(&mut self, field_number: u32, value: bool) {
        if value {
            self.write_int32(field_number, 1);
        }
    }

    #[inline(always)]
    pub fn write_enum(&mut self, field_number: u32, value: i32) {
        self.write_int32(field_number, value);
    }

    /// String kosong dilewatkan; selain itu raw bytes lalu header.
    pub fn write_string(&mut self, field_number: u32, value: &str) {
        if !value.is_empty() {
            self.write(value.as_bytes());
            self.write_tagged_varint(
                field_number,
                WireType::LengthDelimited,
                value.len() as u64,
            );
        }
    }

    pub fn write_bytes(&mut self, field_number: u32, value: &[u8]) {
        if !value.is_empty() {
            self.write(value);
            self.write_tagged_varint(
                field_number,
                WireType::LengthDelimited,
                value.len() as u64,
            );
        }
    }

    // ---- Varian _always (explicit presence: member oneof) ----

    #[inline(always)]
    pub fn write_int32_always(&mut self, field_number: u32, value: i32) {
        self.write_tagged_varint_always(field_number, WireType::Varint, value as i64 as u64);
    }

    #[inline(always)]
    pub fn write_int64_always(&mut self, field_number: u32, value: i64) {
        self.write_tagged_varint_always(field_number, WireType::Varint, value as u64);
    }

    #[inline(always)]
    pub fn write_uint32_always(&mut self, field_number: u32, value: u32) {
        self.write_tagged_varint_always(field_number, WireType::Varint, value as u64);
    }

    #[inline(always)]
    pub fn write_uint64_always(&mut self, field_number: u32, value: u64) {
        self.write_tagged_varint_always(field_number, WireType::Varint, value);
    }

    #[inline(always)]
    pub fn write_sint32_always(&mut self, field_number: u32, value: i32) {
        self.write_tagged_varint_always(
            field_number,
            WireType::Varint,
            zigzag32_encode(value) as u64,
        );
    }

    #[inline(always)]
    pub fn write_sint64_always(&mut self, field_number: u32, value: i64) {
        self.write_tagged_varint_always(field_number, WireType::Varint, zigzag64_encode(value));
    }

    #[inline(always)]
    pub fn write_fixed32_always(&mut self, field_number: u32, value: u32) {
        self.write_fixed32_value(value);
        self.write_tag(field_number, WireType::Bits32);
    }

    #[inline(always)]
    pub fn write_fixed64_always(&mut self, field_number: u32, value: u64) {
        self.write_fixed64_value(value);
        self.write_tag(field_number, WireType::Bits64);
    }

    #[inline(always)]
    pub fn write_sfixed32_always(&mut self, field_number: u32, value: i32) {
        self.write_fixed32_always(field_number, value as u32);
    }

    #[inline(always)]
    pub fn write_sfixed64_always(&mut self, field_number: u32, value: i64) {
        self.write_fixed64_always(field_number, value as u64);
    }

    #[inline(always)]
    pub fn write_float_always(&mut self, field_number: u32, value: f32) {
        self.write_fixed32_always(field_number, value.to_bits());
    }

    #[inline(always)]
    pub fn write_double_always(&mut self, field_number: u32, value: f64) {
        self.write_fixed64_always(field_number, value.to_bits());
    }

    #[inline(always)]
    pub fn write_bool_always(&mut self, field_number: u32, value: bool) {
        self.write_tagged_varint_always(field_number, WireType::Varint, value as u64);
    }

    #[inline(always)]
    pub fn write_enum_always(&mut self, field_number: u32, value: i32) {
        self.write_int32_always(field_number, value);
    }

    pub fn write_string_always(&mut self, field_number: u32, value: &str) {
        self.write(value.as_bytes());
        self.write_length_delimited(field_number, value.len() as u64);
    }

    pub fn write_bytes_always(&mut self, field_number: u32, value: &[u8]) {
        self.write(value);
        self.write_length_delimited(field_number, value.len() as u64);
    }

    // ---- Sub-message ----

    /// Encode sub-message lalu satu header dengan panjang = selisih
    /// posisi. Sub-message kosong tidak menghasilkan byte apa pun.
    pub fn write_message<'a, M: Message<'a>>(&mut self, field_number: u32, message: &M) {
        let pos = self.pos;
        message.encode_inner(self);
        self.write_tagged_varint(
            field_number,
            WireType::LengthDelimited,
            (pos - self.pos) as u64,
        );
    }

    /// Repeated message: satu entry length-delimited penuh per item,
    /// iterasi mundur supaya output terbaca maju. Entry kosong tetap
    /// di-frame.
    pub fn write_repeated_message<'a, M: Message<'a>>(
        &mut self,
        field_number: u32,
        repeated: &Repeated<'a, M>,
    ) {
        for item in repeated.iter().rev() {
            let pos = self.pos;
            item.encode_inner(self);
            self.write_length_delimited(field_number, (pos - self.pos) as u64);
        }
    }

    // ---- Packed repeated scalars ----

    /// Inti packed writer: raw values mundur (tanpa tag per item), lalu
    /// satu header untuk seluruh run. Koleksi kosong tidak menghasilkan
    /// byte apa pun.
    fn write_packed_varint<T: Copy>(
        &mut self,
        field_number: u32,
        repeated: &Repeated<'_, T>,
        to_varint: fn(T) -> u64,
    ) {
        if repeated.is_empty() {
            return;
        }

        let pos = self.pos;

        for item in repeated.iter().rev() {
            self.write_varint(to_varint(*item));
        }

        self.write_tagged_varint(
            field_number,
            WireType::LengthDelimited,
            (pos - self.pos) as u64,
        );
    }

    fn write_packed_fixed32<T: Copy>(
        &mut self,
        field_number: u32,
        repeated: &Repeated<'_, T>,
        to_bits: fn(T) -> u32,
    ) {
        if repeated.is_empty() {
            return;
        }

        let pos = self.pos;

        for item in repeated.iter().rev() {
            self.write_fixed32_value(to_bits(*item));
        }

        self.write_tagged_varint(
            field_number,
            WireType::LengthDelimited,
            (pos - self.pos) as u64,
        );
    }

    fn write_packed_fixed64<T: Copy>(
        &mut self,
        field_number: u32,
        repeated: &Repeated<'_, T>,
        to_bits: fn(T) -> u64,
    ) {
        if repeated.is_empty() {
            return;
        }

        let pos = self.pos;

        for item in repeated.iter().rev() {
            self.write_fixed64_value(to_bits(*item));
        }

        self.write_tagged_varint(
            field_number,
            WireType::LengthDelimited,
            (pos - self.pos) as u64,
        );
    }

    #[inline(always)]
    pub fn write_repeated_int32(&mut self, field_number: u32, repeated: &Repeated<'_, i32>) {
        self.write_packed_varint(field_number, repeated, |v| v as i64 as u64);
    }

    #[inline(always)]
    pub fn write_repeated_int64(&mut self, field_number: u32, repeated: &Repeated<'_, i64>) {
        self.write_packed_varint(field_number, repeated, |v| v as u64);
    }

    #[inline(always)]
    pub fn write_repeated_uint32(&mut self, field_number: u32, repeated: &Repeated<'_, u32>) {
        self.write_packed_varint(field_number, repeated, |v| v as u64);
    }

    #[inline(always)]
    pub fn write_repeated_uint64(&mut self, field_number: u32, repeated: &Repeated<'_, u64>) {
        self.write_packed_varint(field_number, repeated, |v| v);
    }

    #[inline(always)]
    pub fn write_repeated_sint32(&mut self, field_number: u32, repeated: &Repeated<'_, i32>) {
        self.write_packed_varint(field_number, repeated, |v| zigzag32_encode(v) as u64);
    }

    #[inline(always)]
    pub fn write_repeated_sint64(&mut self, field_number: u32, repeated: &Repeated<'_, i64>) {
        self.write_packed_varint(field_number, repeated, zigzag64_encode);
    }

    #[inline(always)]
    pub fn write_repeated_bool(&mut self, field_number: u32, repeated: &Repeated<'_, bool>) {
        self.write_packed_varint(field_number, repeated, |v| v as u64);
    }

    #[inline(always)]
    pub fn write_repeated_fixed32(&mut self, field_number: u32, repeated: &Repeated<'_, u32>) {
        self.write_packed_fixed32(field_number, repeated, |v| v);
    }

    #[inline(always)]
    pub fn write_repeated_fixed64(&mut self, field_number: u32, repeated: &Repeated<'_, u64>) {
        self.write_packed_fixed64(field_number, repeated, |v| v);
    }

    #[inline(always)]
    pub fn write_repeated_sfixed32(&mut self, field_number: u32, repeated: &Repeated<'_, i32>) {
        self.write_packed_fixed32(field_number, repeated, |v| v as u32);
    }

    #[inline(always)]
    pub fn write_repeated_sfixed64(&mut self, field_number: u32, repeated: &Repeated<'_, i64>) {
        self.write_packed_fixed64(field_number, repeated, |v| v as u64);
    }

    #[inline(always)]
    pub fn write_repeated_float(&mut self, field_number: u32, repeated: &Repeated<'_, f32>) {
        self.write_packed_fixed32(field_number, repeated, f32::to_bits);
    }

    #[inline(always)]
    pub fn write_repeated_double(&mut self, field_number: u32, repeated: &Repeated<'_, f64>) {
        self.write_packed_fixed64(field_number, repeated, f64::to_bits);
    }

    /// Repeated string tidak di-pack: satu entry ber-tag per item.
    pub fn write_repeated_string(&mut self, field_number: u32, repeated: &Repeated<'_, &str>) {
        for item in repeated.iter().rev() {
            self.write(item.as_bytes());
            self.write_length_delimited(field_number, item.len() as u64);
        }
    }

    pub fn write_repeated_bytes(&mut self, field_number: u32, repeated: &Repeated<'_, &[u8]>) {
        for item in repeated.iter().rev() {
            self.write(item);
            self.write_length_delimited(field_number, item.len() as u64);
        }
    }

    /// Hasil akhir: panjang encoded data (sudah dipindah ke depan
    /// buffer) atau error yang mengunci encoder.
    pub fn finish(self) -> Result<usize, Error> {
        match self.err {
            Some(error) => Err(error),
            None => {
                let length = self.buf.len() - self.pos;
                self.buf.copy_within(self.pos.., 0);
                Ok(length)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_with(f: impl FnOnce(&mut Encoder)) -> Vec<u8> {
        let mut buf = [0u8; 128];
        let mut encoder = Encoder::new(&mut buf);
        f(&mut encoder);
        let size = encoder.finish().unwrap();
        buf[..size].to_vec()
    }

    #[test]
    fn test_varint_boundary_table() {
        assert_eq!(encode_with(|e| e.write_int32(1, 0)), b"");
        assert_eq!(encode_with(|e| e.write_int32(1, 1)), b"\x08\x01");
        assert_eq!(encode_with(|e| e.write_int32(1, 127)), b"\x08\x7f");
        assert_eq!(encode_with(|e| e.write_int32(1, 128)), b"\x08\x80\x01");
        assert_eq!(
            encode_with(|e| e.write_int32(1, i32::MAX)),
            b"\x08\xff\xff\xff\xff\x07"
        );
        // Negatif di-sign-extend ke 64 bit: 10 byte varint
        assert_eq!(
            encode_with(|e| e.write_int32(1, -1)),
            b"\x08\xff\xff\xff\xff\xff\xff\xff\xff\xff\x01"
        );
    }

    #[test]
    fn test_sint_zigzag() {
        assert_eq!(encode_with(|e| e.write_sint32(1, -5)), b"\x08\x09");
        assert_eq!(encode_with(|e| e.write_sint32(1, 5)), b"\x08\x0a");
        assert_eq!(encode_with(|e| e.write_sint64(1, -1)), b"\x08\x01");
    }

    #[test]
    fn test_default_values_are_skipped() {
        let encoded = encode_with(|e| {
            e.write_int32(1, 0);
            e.write_uint64(2, 0);
            e.write_bool(3, false);
            e.write_string(4, "");
            e.write_bytes(5, b"");
            e.write_fixed32(6, 0);
            e.write_float(7, 0.0);
        });
        assert!(encoded.is_empty());
    }

    #[test]
    fn test_always_variants_never_skip() {
        assert_eq!(encode_with(|e| e.write_int32_always(1, 0)), b"\x08\x00");
        assert_eq!(encode_with(|e| e.write_bool_always(1, false)), b"\x08\x00");
        assert_eq!(encode_with(|e| e.write_string_always(1, "")), b"\x0a\x00");
        assert_eq!(
            encode_with(|e| e.write_fixed32_always(1, 0)),
            b"\x0d\x00\x00\x00\x00"
        );
    }

    #[test]
    fn test_negative_zero_float_is_written() {
        assert_eq!(encode_with(|e| e.write_float(1, 0.0)), b"");
        assert_eq!(
            encode_with(|e| e.write_float(1, -0.0)),
            b"\x0d\x00\x00\x00\x80"
        );
    }

    #[test]
    fn test_fixed_little_endian() {
        assert_eq!(
            encode_with(|e| e.write_fixed32(1, 0x12345678)),
            b"\x0d\x78\x56\x34\x12"
        );
        assert_eq!(
            encode_with(|e| e.write_sfixed64(1, -2)),
            b"\x09\xfe\xff\xff\xff\xff\xff\xff\xff"
        );
    }

    #[test]
    fn test_fields_serialize_in_reverse_declaration_order() {
        // Pilihan implementasi karena backward fill, bukan syarat protokol:
        // field yang ditulis lebih dulu muncul paling belakang.
        let encoded = encode_with(|e| {
            e.write_int32(1, 1);
            e.write_int32(2, 2);
        });
        assert_eq!(encoded, b"\x10\x02\x08\x01");
    }

    #[test]
    fn test_buffer_full_latches() {
        let mut buf = [0u8; 4];
        let mut encoder = Encoder::new(&mut buf);
        encoder.write_string(1, "too large for the buffer");
        // Latch permanen: write kecil berikutnya tetap no-op
        encoder.write_int32(2, 1);
        assert_eq!(encoder.finish(), Err(Error::EncodeBufferFull));
    }

    #[test]
    fn test_exact_fit() {
        let mut buf = [0u8; 2];
        let mut encoder = Encoder::new(&mut buf);
        encoder.write_int32(1, 1);
        assert_eq!(encoder.finish(), Ok(2));
        assert_eq!(&buf, b"\x08\x01");
    }
}
