//! Error codes untuk encode/decode.
//!
//! Satu enum untuk semua kegagalan runtime. Kode integer-nya stabil
//! (dipakai oleh binding layer lewat `code()`/`from_code()`), jadi jangan
//! diubah urutannya.

use std::fmt;

/// Kegagalan encode/decode. Kode 1..=11, stabil.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Wire type pada tag tidak cocok dengan tipe field yang dideklarasikan
    BadWireType = 1,
    /// Input habis sebelum value selesai dibaca
    OutOfData = 2,
    /// Arena penuh - caller harus retry dengan buffer lebih besar
    OutOfMemory = 3,
    /// Buffer tujuan encode terlalu kecil
    EncodeBufferFull = 4,
    /// Field number 0 tidak pernah valid
    BadFieldNumber = 5,
    /// Varint lebih dari 10 group (64 bit)
    VarintOverflow = 6,
    /// Cursor arithmetic overflow saat skip/seek
    SeekOverflow = 7,
    /// Length-delimited header mengumumkan panjang di luar batas platform
    LengthDelimitedOverflow = 8,
    /// String length tidak representable (size + terminator overflow)
    StringTooLong = 9,
    /// Bytes length tidak representable
    BytesTooLong = 10,
    /// Payload string bukan UTF-8 valid
    InvalidUtf8 = 11,
}

impl Error {
    /// Kode integer stabil (positif). Return value top-level pada binding
    /// C-style adalah negasinya.
    #[inline(always)]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Kebalikan dari `code()`. Menerima kode positif maupun negatif.
    #[inline(always)]
    pub fn from_code(code: i32) -> Option<Self> {
        match code.unsigned_abs() {
            1 => Some(Self::BadWireType),
            2 => Some(Self::OutOfData),
            3 => Some(Self::OutOfMemory),
            4 => Some(Self::EncodeBufferFull),
            5 => Some(Self::BadFieldNumber),
            6 => Some(Self::VarintOverflow),
            7 => Some(Self::SeekOverflow),
            8 => Some(Self::LengthDelimitedOverflow),
            9 => Some(Self::StringTooLong),
            10 => Some(Self::BytesTooLong),
            11 => Some(Self::InvalidUtf8),
            _ => None,
        }
    }

    /// Deskripsi singkat, satu baris.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadWireType => "Bad wire type",
            Self::OutOfData => "Out of data",
            Self::OutOfMemory => "Out of memory",
            Self::EncodeBufferFull => "Encode buffer full",
            Self::BadFieldNumber => "Bad field number",
            Self::VarintOverflow => "Varint overflow",
            Self::SeekOverflow => "Seek overflow",
            Self::LengthDelimitedOverflow => "Length delimited overflow",
            Self::StringTooLong => "String too long",
            Self::BytesTooLong => "Bytes too long",
            Self::InvalidUtf8 => "Invalid UTF-8",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Error::BadWireType.code(), 1);
        assert_eq!(Error::OutOfData.code(), 2);
        assert_eq!(Error::OutOfMemory.code(), 3);
        assert_eq!(Error::EncodeBufferFull.code(), 4);
        assert_eq!(Error::BadFieldNumber.code(), 5);
        assert_eq!(Error::VarintOverflow.code(), 6);
        assert_eq!(Error::SeekOverflow.code(), 7);
        assert_eq!(Error::LengthDelimitedOverflow.code(), 8);
        assert_eq!(Error::StringTooLong.code(), 9);
        assert_eq!(Error::BytesTooLong.code(), 10);
        assert_eq!(Error::InvalidUtf8.code(), 11);
    }

    #[test]
    fn test_from_code_roundtrip() {
        for code in 1..=11 {
            let err = Error::from_code(code).unwrap();
            assert_eq!(err.code(), code);
            // Negative form (C-style return value) juga diterima
            assert_eq!(Error::from_code(-code), Some(err));
        }
        assert_eq!(Error::from_code(0), None);
        assert_eq!(Error::from_code(12), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::OutOfMemory.to_string(), "Out of memory");
        assert_eq!(Error::EncodeBufferFull.to_string(), "Encode buffer full");
    }
}
