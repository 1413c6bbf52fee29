//! Forward-Scanning Decoder
//!
//! Membaca input maju dengan bounds checking; semua memori dinamis
//! (string, bytes, repeated item, sub-message) ditarik dari [`Arena`]
//! yang di-share ke seluruh pohon decoder.
//!
//! Error pertama mengunci instance (abort latch): read berikutnya
//! mengembalikan nilai netral tanpa mengkonsumsi input, jadi generated
//! code tidak perlu cek hasil per field - cukup `finish()` di akhir.
//! Sub-message memakai decoder anak ber-bound sendiri; kegagalannya
//! dipropagasi ke parent lewat mekanisme seek.

use super::wire::{zigzag64_decode, WireType};
use crate::core::Arena;
use crate::error::Error;
use crate::message::repeated::Node;
use crate::message::{Message, Repeated};

/// Decoder dengan abort latch, satu instance per (sub-)message.
pub struct Decoder<'d, 'a> {
    buf: &'d [u8],
    pos: usize,
    arena: &'a Arena<'a>,
    err: Option<Error>,
}

impl<'d, 'a> Decoder<'d, 'a> {
    /// Membuat decoder di atas input `buf`, alokasi dari `arena`.
    #[inline(always)]
    pub fn new(buf: &'d [u8], arena: &'a Arena<'a>) -> Self {
        Self {
            buf,
            pos: 0,
            arena,
            err: None,
        }
    }

    #[inline(always)]
    fn abort(&mut self, error: Error) {
        if self.err.is_none() {
            self.err = Some(error);
        }
    }

    #[inline(always)]
    fn arena(&self) -> &'a Arena<'a> {
        self.arena
    }

    /// Masih ada byte tersisa dan belum aborted? Kondisi loop decode
    /// per message di generated code.
    #[inline(always)]
    pub fn available(&self) -> bool {
        self.err.is_none() && self.pos < self.buf.len()
    }

    /// Satu byte; `OutOfData` kalau input habis.
    #[inline(always)]
    fn get(&mut self) -> u8 {
        if self.available() {
            let value = self.buf[self.pos];
            self.pos += 1;
            value
        } else {
            self.abort(Error::OutOfData);
            0
        }
    }

    /// Ambil `size` bytes dari input tanpa copy.
    fn take(&mut self, size: usize) -> Option<&'d [u8]> {
        if self.err.is_some() {
            return None;
        }

        if self.buf.len() - self.pos >= size {
            let slice = &self.buf[self.pos..self.pos + size];
            self.pos += size;
            Some(slice)
        } else {
            self.abort(Error::OutOfData);
            None
        }
    }

    /// Baca tepat `out.len()` bytes; kalau gagal, `out` di-zero supaya
    /// caller tetap dapat nilai netral.
    fn read_into(&mut self, out: &mut [u8]) {
        match self.take(out.len()) {
            Some(src) => out.copy_from_slice(src),
            None => out.fill(0),
        }
    }

    /// Varint base-128, group little-endian, maksimal 10 group (64 bit).
    /// Group ke-10 yang masih ber-continuation bit = `VarintOverflow`.
    pub fn read_varint(&mut self) -> u64 {
        let mut value = 0u64;
        let mut offset = 0;
        let mut byte;

        loop {
            byte = self.get();
            value |= ((byte & 0x7f) as u64) << offset;
            offset += 7;

            if offset >= 64 || byte & 0x80 == 0 {
                break;
            }
        }

        if byte & 0x80 != 0 {
            self.abort(Error::VarintOverflow);
            return 0;
        }

        value
    }

    /// Baca satu tag. Field number 0 = `BadFieldNumber`; wire type 3/4
    /// (group, deprecated) = `BadWireType`. Return netral `(0, Varint)`
    /// setelah abort - loop decode berhenti karena `available()` false.
    pub fn read_tag(&mut self) -> (u32, WireType) {
        let value = self.read_varint() as u32;
        let field_number = value >> 3;

        if field_number == 0 {
            self.abort(Error::BadFieldNumber);
            return (0, WireType::Varint);
        }

        match WireType::from_u32(value & 0x7) {
            Some(wire_type) => (field_number, wire_type),
            None => {
                self.abort(Error::BadWireType);
                (0, WireType::Varint)
            }
        }
    }

    #[inline(always)]
    fn read_varint_checked(&mut self, wire_type: WireType) -> u64 {
        if wire_type != WireType::Varint {
            self.abort(Error::BadWireType);
            return 0;
        }

        self.read_varint()
    }

    /// Panjang length-delimited header. `LengthDelimitedOverflow` kalau
    /// melewati batas platform.
    fn read_length_delimited(&mut self, wire_type: WireType) -> usize {
        if wire_type != WireType::LengthDelimited {
            self.abort(Error::BadWireType);
            return 0;
        }

        let length = self.read_varint();

        if length >= usize::MAX as u64 {
            self.abort(Error::LengthDelimitedOverflow);
            return 0;
        }

        length as usize
    }

    // ---- Typed readers (wire type divalidasi per field) ----

    #[inline(always)]
    pub fn read_int32(&mut self, wire_type: WireType) -> i32 {
        self.read_int64(wire_type) as i32
    }

    #[inline(always)]
    pub fn read_int64(&mut self, wire_type: WireType) -> i64 {
        self.read_varint_checked(wire_type) as i64
    }

    #[inline(always)]
    pub fn read_uint32(&mut self, wire_type: WireType) -> u32 {
        self.read_uint64(wire_type) as u32
    }

    #[inline(always)]
    pub fn read_uint64(&mut self, wire_type: WireType) -> u64 {
        self.read_varint_checked(wire_type)
    }

    #[inline(always)]
    pub fn read_sint32(&mut self, wire_type: WireType) -> i32 {
        self.read_sint64(wire_type) as i32
    }

    #[inline(always)]
    pub fn read_sint64(&mut self, wire_type: WireType) -> i64 {
        zigzag64_decode(self.read_varint_checked(wire_type))
    }

    #[inline(always)]
    fn read_fixed32_value(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.read_into(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    #[inline(always)]
    fn read_fixed64_value(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.read_into(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    #[inline(always)]
    pub fn read_fixed32(&mut self, wire_type: WireType) -> u32 {
        if wire_type != WireType::Bits32 {
            self.abort(Error::BadWireType);
            return 0;
        }

        self.read_fixed32_value()
    }

    #[inline(always)]
    pub fn read_fixed64(&mut self, wire_type: WireType) -> u64 {
        if wire_type != WireType::Bits64 {
            self.abort(Error::BadWireType);
            return 0;
        }

        self.read_fixed64_value()
    }

    #[inline(always)]
    pub fn read_sfixed32(&mut self, wire_type: WireType) -> i32 {
        self.read_fixed32(wire_type) as i32
    }

    #[inline(always)]
    pub fn read_sfixed64(&mut self, wire_type: WireType) -> i64 {
        self.read_fixed64(wire_type) as i64
    }

    #[inline(always)]
    pub fn read_float(&mut self, wire_type: WireType) -> f32 {
        f32::from_bits(self.read_fixed32(wire_type))
    }

    #[inline(always)]
    pub fn read_double(&mut self, wire_type: WireType) -> f64 {
        f64::from_bits(self.read_fixed64(wire_type))
    }

    #[inline(always)]
    pub fn read_bool(&mut self, wire_type: WireType) -> bool {
        self.read_int32(wire_type) != 0
    }

    #[inline(always)]
    pub fn read_enum(&mut self, wire_type: WireType) -> i32 {
        self.read_int32(wire_type)
    }

    /// String: copy ke arena, divalidasi UTF-8. Hasil hidup selama
    /// arena, bukan selama input.
    pub fn read_string(&mut self, wire_type: WireType) -> &'a str {
        if wire_type != WireType::LengthDelimited {
            self.abort(Error::BadWireType);
            return "";
        }

        let length = self.read_varint();

        if length >= usize::MAX as u64 {
            self.abort(Error::StringTooLong);
            return "";
        }

        let src = match self.take(length as usize) {
            Some(src) => src,
            None => return "",
        };
        let src = match std::str::from_utf8(src) {
            Ok(src) => src,
            Err(_) => {
                self.abort(Error::InvalidUtf8);
                return "";
            }
        };

        match self.arena().alloc_str(src) {
            Ok(value) => value,
            Err(error) => {
                self.abort(error);
                ""
            }
        }
    }

    /// Bytes: copy ke arena.
    pub fn read_bytes(&mut self, wire_type: WireType) -> &'a [u8] {
        if wire_type != WireType::LengthDelimited {
            self.abort(Error::BadWireType);
            return b"";
        }

        let length = self.read_varint();

        if length >= usize::MAX as u64 {
            self.abort(Error::BytesTooLong);
            return b"";
        }

        let src = match self.take(length as usize) {
            Some(src) => src,
            None => return b"",
        };

        match self.arena().alloc_copy(src) {
            Ok(value) => value,
            Err(error) => {
                self.abort(error);
                b""
            }
        }
    }

    /// Geser cursor maju `offset` bytes (skip length-delimited payload).
    fn seek(&mut self, offset: usize) {
        if self.err.is_some() {
            return;
        }

        match self.pos.checked_add(offset) {
            None => self.abort(Error::SeekOverflow),
            Some(pos) if pos > self.buf.len() => self.abort(Error::OutOfData),
            Some(pos) => self.pos = pos,
        }
    }

    /// Skip field yang tidak dikenali sesuai wire type-nya. Unknown
    /// field bukan error; decode lanjut setelahnya.
    pub fn skip_field(&mut self, wire_type: WireType) {
        match wire_type {
            WireType::Varint => {
                self.read_varint();
            }
            WireType::Bits64 => {
                self.read_fixed64(WireType::Bits64);
            }
            WireType::LengthDelimited => {
                let length = self.read_length_delimited(wire_type);
                self.seek(length);
            }
            WireType::Bits32 => {
                self.read_fixed32(WireType::Bits32);
            }
        }
    }

    /// Decoder anak di atas tepat `size` bytes input berikutnya,
    /// share arena. Kalau `size` melewati sisa input, anak langsung
    /// lahir aborted `OutOfData` (decode-nya jadi no-op).
    fn slice(&self, size: usize) -> Decoder<'d, 'a> {
        let window = self
            .pos
            .checked_add(size)
            .and_then(|end| self.buf.get(self.pos..end));

        match window {
            Some(buf) => Decoder {
                buf,
                pos: 0,
                arena: self.arena,
                err: None,
            },
            None => Decoder {
                buf: b"",
                pos: 0,
                arena: self.arena,
                err: Some(Error::OutOfData),
            },
        }
    }

    /// Konsumsi hasil decoder anak: maju sebanyak yang ANAK baca
    /// (bukan panjang yang diumumkan); error anak me-reabort parent
    /// dengan kode yang sama. Inilah propagasi nested failure.
    fn consume_child(&mut self, child: Decoder<'d, 'a>) {
        match child.result() {
            Ok(consumed) => self.seek(consumed),
            Err(error) => self.abort(error),
        }
    }

    /// Decode sub-message ber-bound ke `message`.
    pub fn read_message<M: Message<'a>>(&mut self, wire_type: WireType, message: &mut M) {
        let size = self.read_length_delimited(wire_type);
        let mut child = self.slice(size);
        message.decode_inner(&mut child);
        self.consume_child(child);
    }

    // ---- Repeated fields ----

    fn alloc_node<T>(&mut self, value: T) -> Option<&'a mut Node<T>> {
        match self.arena().alloc(Node::new(value)) {
            Ok(node) => Some(node),
            Err(error) => {
                self.abort(error);
                None
            }
        }
    }

    /// Inti repeated scalar reader: menerima packed maupun unpacked.
    /// Length-delimited berarti satu run packed; wire type item scalar
    /// itu sendiri berarti satu occurrence = satu item. Wire type lain
    /// adalah mismatch dan memicu `BadWireType`.
    fn read_repeated_scalar<T>(
        &mut self,
        wire_type: WireType,
        item_wire_type: WireType,
        repeated: &mut Repeated<'a, T>,
        read_item: fn(&mut Self) -> T,
    ) {
        let size = if wire_type == WireType::LengthDelimited {
            self.read_length_delimited(wire_type)
        } else if wire_type == item_wire_type {
            1
        } else {
            self.abort(Error::BadWireType);
            return;
        };
        let end = self.pos.saturating_add(size);

        while self.err.is_none() && self.pos < end {
            let value = read_item(self);

            if self.err.is_some() {
                break;
            }

            match self.alloc_node(value) {
                Some(node) => repeated.push_node(node),
                None => break,
            }
        }
    }

    #[inline(always)]
    pub fn read_repeated_int32(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, i32>) {
        self.read_repeated_scalar(wire_type, WireType::Varint, repeated, |d| d.read_varint() as i32);
    }

    #[inline(always)]
    pub fn read_repeated_int64(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, i64>) {
        self.read_repeated_scalar(wire_type, WireType::Varint, repeated, |d| d.read_varint() as i64);
    }

    #[inline(always)]
    pub fn read_repeated_uint32(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, u32>) {
        self.read_repeated_scalar(wire_type, WireType::Varint, repeated, |d| d.read_varint() as u32);
    }

    #[inline(always)]
    pub fn read_repeated_uint64(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, u64>) {
        self.read_repeated_scalar(wire_type, WireType::Varint, repeated, |d| d.read_varint());
    }

    #[inline(always)]
    pub fn read_repeated_sint32(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, i32>) {
        self.read_repeated_scalar(wire_type, WireType::Varint, repeated, |d| {
            zigzag64_decode(d.read_varint()) as i32
        });
    }

    #[inline(always)]
    pub fn read_repeated_sint64(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, i64>) {
        self.read_repeated_scalar(wire_type, WireType::Varint, repeated, |d| zigzag64_decode(d.read_varint()));
    }

    #[inline(always)]
    pub fn read_repeated_bool(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, bool>) {
        self.read_repeated_scalar(wire_type, WireType::Varint, repeated, |d| d.read_varint() != 0);
    }

    #[inline(always)]
    pub fn read_repeated_fixed32(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, u32>) {
        self.read_repeated_scalar(wire_type, WireType::Bits32, repeated, |d| d.read_fixed32_value());
    }

    #[inline(always)]
    pub fn read_repeated_fixed64(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, u64>) {
        self.read_repeated_scalar(wire_type, WireType::Bits64, repeated, |d| d.read_fixed64_value());
    }

    #[inline(always)]
    pub fn read_repeated_sfixed32(
        &mut self,
        wire_type: WireType,
        repeated: &mut Repeated<'a, i32>,
    ) {
        self.read_repeated_scalar(wire_type, WireType::Bits32, repeated, |d| d.read_fixed32_value() as i32);
    }

    #[inline(always)]
    pub fn read_repeated_sfixed64(
        &mut self,
        wire_type: WireType,
        repeated: &mut Repeated<'a, i64>,
    ) {
        self.read_repeated_scalar(wire_type, WireType::Bits64, repeated, |d| d.read_fixed64_value() as i64);
    }

    #[inline(always)]
    pub fn read_repeated_float(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, f32>) {
        self.read_repeated_scalar(wire_type, WireType::Bits32, repeated, |d| {
            f32::from_bits(d.read_fixed32_value())
        });
    }

    #[inline(always)]
    pub fn read_repeated_double(&mut self, wire_type: WireType, repeated: &mut Repeated<'a, f64>) {
        self.read_repeated_scalar(wire_type, WireType::Bits64, repeated, |d| {
            f64::from_bits(d.read_fixed64_value())
        });
    }

    /// Repeated string: satu occurrence = satu item, urutan stream
    /// dipertahankan walau occurrence terselip di antara field lain.
    pub fn read_repeated_string(
        &mut self,
        wire_type: WireType,
        repeated: &mut Repeated<'a, &'a str>,
    ) {
        let value = self.read_string(wire_type);

        if self.err.is_some() {
            return;
        }

        if let Some(node) = self.alloc_node(value) {
            repeated.push_node(node);
        }
    }

    pub fn read_repeated_bytes(
        &mut self,
        wire_type: WireType,
        repeated: &mut Repeated<'a, &'a [u8]>,
    ) {
        let value = self.read_bytes(wire_type);

        if self.err.is_some() {
            return;
        }

        if let Some(node) = self.alloc_node(value) {
            repeated.push_node(node);
        }
    }

    /// Repeated message: satu entry length-delimited per occurrence,
    /// decode lewat decoder anak yang share arena.
    pub fn read_repeated_message<M: Message<'a>>(
        &mut self,
        wire_type: WireType,
        repeated: &mut Repeated<'a, M>,
    ) {
        let size = self.read_length_delimited(wire_type);

        if self.err.is_some() {
            return;
        }

        let mut item = M::default();
        let mut child = self.slice(size);
        item.decode_inner(&mut child);
        self.consume_child(child);

        if self.err.is_some() {
            return;
        }

        if let Some(node) = self.alloc_node(item) {
            repeated.push_node(node);
        }
    }

    /// Bekukan chain jadi array. Dipanggil generated code setelah loop
    /// decode message pemilik selesai.
    pub fn finalize_repeated<T>(&mut self, repeated: &mut Repeated<'a, T>) {
        if self.err.is_some() {
            return;
        }

        if let Err(error) = repeated.finalize(self.arena()) {
            self.abort(error);
        }
    }

    /// Hasil tanpa mengkonsumsi decoder (untuk decoder anak).
    fn result(&self) -> Result<usize, Error> {
        match self.err {
            Some(error) => Err(error),
            None => Ok(self.pos),
        }
    }

    /// Hasil akhir: jumlah byte terkonsumsi, atau error yang mengunci
    /// decoder.
    pub fn finish(self) -> Result<usize, Error> {
        self.result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_decoder<R>(data: &[u8], f: impl FnOnce(&mut Decoder) -> R) -> (R, Result<usize, Error>) {
        let mut workspace = [0u8; 256];
        let arena = Arena::new(&mut workspace);
        let mut decoder = Decoder::new(data, &arena);
        let out = f(&mut decoder);
        let result = decoder.finish();
        (out, result)
    }

    #[test]
    fn test_read_varint() {
        let (v, r) = with_decoder(b"\x01", |d| d.read_varint());
        assert_eq!(v, 1);
        assert_eq!(r, Ok(1));

        let (v, _) = with_decoder(b"\x80\x01", |d| d.read_varint());
        assert_eq!(v, 128);

        let (v, _) = with_decoder(b"\xff\xff\xff\xff\xff\xff\xff\xff\xff\x01", |d| {
            d.read_varint()
        });
        assert_eq!(v, u64::MAX);
    }

    #[test]
    fn test_varint_overflow() {
        // 10 group semua ber-continuation bit + 1 byte lagi
        let (v, r) = with_decoder(b"\x80\x80\x80\x80\x80\x80\x80\x80\x80\x80\x01", |d| {
            d.read_varint()
        });
        assert_eq!(v, 0);
        assert_eq!(r, Err(Error::VarintOverflow));
    }

    #[test]
    fn test_varint_out_of_data() {
        let (_, r) = with_decoder(b"\x80", |d| d.read_varint());
        assert_eq!(r, Err(Error::OutOfData));
    }

    #[test]
    fn test_read_tag() {
        let ((field, wire_type), _) = with_decoder(b"\x08", |d| d.read_tag());
        assert_eq!(field, 1);
        assert_eq!(wire_type, WireType::Varint);

        let ((field, wire_type), _) = with_decoder(b"\x1a", |d| d.read_tag());
        assert_eq!(field, 3);
        assert_eq!(wire_type, WireType::LengthDelimited);
    }

    #[test]
    fn test_field_number_zero() {
        let (_, r) = with_decoder(b"\x00", |d| d.read_tag());
        assert_eq!(r, Err(Error::BadFieldNumber));
        // Field 0 dicek lebih dulu dari wire type
        let (_, r) = with_decoder(b"\x03", |d| d.read_tag());
        assert_eq!(r, Err(Error::BadFieldNumber));
    }

    #[test]
    fn test_deprecated_group_wire_type() {
        let (_, r) = with_decoder(b"\x0b", |d| d.read_tag());
        assert_eq!(r, Err(Error::BadWireType));
    }

    #[test]
    fn test_wire_type_mismatch() {
        let (v, r) = with_decoder(b"\x00\x00\x00\x00", |d| d.read_int32(WireType::Bits32));
        assert_eq!(v, 0);
        assert_eq!(r, Err(Error::BadWireType));
    }

    #[test]
    fn test_sint_decode() {
        let (v, _) = with_decoder(b"\x09", |d| d.read_sint32(WireType::Varint));
        assert_eq!(v, -5);
        let (v, _) = with_decoder(b"\x0a", |d| d.read_sint32(WireType::Varint));
        assert_eq!(v, 5);
        let (v, _) = with_decoder(b"\x01", |d| d.read_sint64(WireType::Varint));
        assert_eq!(v, -1);
    }

    #[test]
    fn test_fixed_readers() {
        let (v, _) = with_decoder(b"\x78\x56\x34\x12", |d| d.read_fixed32(WireType::Bits32));
        assert_eq!(v, 0x12345678);
        let (v, r) = with_decoder(b"\x78\x56", |d| d.read_fixed32(WireType::Bits32));
        assert_eq!(v, 0);
        assert_eq!(r, Err(Error::OutOfData));
    }

    #[test]
    fn test_read_string_copies_into_arena() {
        let mut workspace = [0u8; 64];
        let arena = Arena::new(&mut workspace);
        let data = b"\x05hello".to_vec();
        let value;
        {
            let mut decoder = Decoder::new(&data, &arena);
            value = decoder.read_string(WireType::LengthDelimited);
            assert_eq!(decoder.finish(), Ok(6));
        }
        drop(data);
        // Hasil hidup dari arena, bukan dari buffer input
        assert_eq!(value, "hello");
    }

    #[test]
    fn test_read_string_invalid_utf8() {
        let mut workspace = [0u8; 64];
        let arena = Arena::new(&mut workspace);
        let mut decoder = Decoder::new(b"\x02\xff\xfe", &arena);
        assert_eq!(decoder.read_string(WireType::LengthDelimited), "");
        assert_eq!(decoder.finish(), Err(Error::InvalidUtf8));
    }

    #[test]
    fn test_string_out_of_memory() {
        let mut workspace = [0u8; 2];
        let arena = Arena::new(&mut workspace);
        let mut decoder = Decoder::new(b"\x05hello", &arena);
        decoder.read_string(WireType::LengthDelimited);
        assert_eq!(decoder.finish(), Err(Error::OutOfMemory));
    }

    #[test]
    fn test_skip_length_delimited_truncated() {
        // Header mengumumkan 5 byte, hanya 2 tersedia
        let (_, r) = with_decoder(b"\x05\x01\x02", |d| {
            d.skip_field(WireType::LengthDelimited)
        });
        assert_eq!(r, Err(Error::OutOfData));
    }

    #[test]
    fn test_skip_length_delimited_seek_overflow() {
        // Panjang u64::MAX - 1 masih lolos cek representable, lalu
        // overflow di aritmetika cursor
        let (_, r) = with_decoder(b"\xfe\xff\xff\xff\xff\xff\xff\xff\xff\x01", |d| {
            d.skip_field(WireType::LengthDelimited)
        });
        assert_eq!(r, Err(Error::SeekOverflow));
    }

    #[test]
    fn test_latch_is_permanent_and_neutral() {
        let mut workspace = [0u8; 64];
        let arena = Arena::new(&mut workspace);
        let mut decoder = Decoder::new(b"\x80", &arena);

        assert_eq!(decoder.read_varint(), 0); // aborts OutOfData
        assert!(!decoder.available());
        // Operasi berikutnya netral: tidak mengkonsumsi, tidak mengubah error
        assert_eq!(decoder.read_varint(), 0);
        assert_eq!(decoder.read_fixed32(WireType::Bits32), 0);
        assert_eq!(decoder.read_string(WireType::LengthDelimited), "");
        assert_eq!(decoder.finish(), Err(Error::OutOfData));
    }

    #[test]
    fn test_repeated_scalar_packed() {
        let mut workspace = [0u8; 256];
        let arena = Arena::new(&mut workspace);
        let mut decoder = Decoder::new(b"\x03\x01\xe8\x07", &arena);
        let mut repeated = Repeated::default();

        decoder.read_repeated_int32(WireType::LengthDelimited, &mut repeated);
        assert_eq!(repeated.len(), 2);
        // Belum indexable sebelum finalize
        assert!(repeated.as_slice().is_empty());

        decoder.finalize_repeated(&mut repeated);
        assert_eq!(decoder.finish(), Ok(4));
        assert_eq!(repeated.as_slice(), &[1, 1000]);
    }

    #[test]
    fn test_repeated_scalar_wire_type_mismatch() {
        let mut workspace = [0u8; 256];
        let arena = Arena::new(&mut workspace);

        // Repeated int32 dikirim sebagai fixed32: ditolak, payload
        // tidak dikonsumsi sebagai varint
        let mut decoder = Decoder::new(b"\x01\x00\x00\x00", &arena);
        let mut repeated: Repeated<i32> = Repeated::default();
        decoder.read_repeated_int32(WireType::Bits32, &mut repeated);
        assert_eq!(repeated.len(), 0);
        assert_eq!(decoder.finish(), Err(Error::BadWireType));

        // Arah sebaliknya: repeated fixed32 dikirim sebagai varint
        let mut decoder = Decoder::new(b"\x01\x02\x03\x04", &arena);
        let mut repeated: Repeated<u32> = Repeated::default();
        decoder.read_repeated_fixed32(WireType::Varint, &mut repeated);
        assert_eq!(repeated.len(), 0);
        assert_eq!(decoder.finish(), Err(Error::BadWireType));
    }

    #[test]
    fn test_repeated_scalar_unpacked_occurrence() {
        let mut workspace = [0u8; 256];
        let arena = Arena::new(&mut workspace);
        let mut decoder = Decoder::new(b"\xe8\x07", &arena);
        let mut repeated = Repeated::default();

        // Wire type varint = tepat satu item per occurrence
        decoder.read_repeated_int32(WireType::Varint, &mut repeated);
        decoder.finalize_repeated(&mut repeated);
        assert_eq!(decoder.finish(), Ok(2));
        assert_eq!(repeated.as_slice(), &[1000]);
    }
}
