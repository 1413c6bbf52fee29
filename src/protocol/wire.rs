//! Wire format primitives: wire type dan zigzag mapping.
//!
//! Tag = `(field_number << 3) | wire_type`, di-encode sebagai varint.
//! Field number 0 selalu invalid.

/// Wire type pada 3 bit terendah sebuah tag.
///
/// Kode 3 dan 4 (group start/end, sudah deprecated di protobuf) tidak
/// didukung dan memicu `BadWireType` saat tag dibaca.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Base-128 varint
    Varint = 0,
    /// 8 byte little-endian
    Bits64 = 1,
    /// `<varint length><payload>`
    LengthDelimited = 2,
    /// 4 byte little-endian
    Bits32 = 5,
}

impl WireType {
    #[inline(always)]
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Varint),
            1 => Some(Self::Bits64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Bits32),
            _ => None,
        }
    }
}

/// Zigzag encode untuk sint32: magnitude kecil tetap pendek di varint.
#[inline(always)]
pub fn zigzag32_encode(value: i32) -> u32 {
    if value < 0 {
        !((value as u32) << 1)
    } else {
        (value as u32) << 1
    }
}

/// Zigzag encode untuk sint64.
#[inline(always)]
pub fn zigzag64_encode(value: i64) -> u64 {
    if value < 0 {
        !((value as u64) << 1)
    } else {
        (value as u64) << 1
    }
}

/// Kebalikan zigzag, di domain varint (64 bit).
#[inline(always)]
pub fn zigzag64_decode(value: u64) -> i64 {
    if value & 0x1 != 0 {
        !(value >> 1) as i64
    } else {
        (value >> 1) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_codes() {
        assert_eq!(WireType::from_u32(0), Some(WireType::Varint));
        assert_eq!(WireType::from_u32(1), Some(WireType::Bits64));
        assert_eq!(WireType::from_u32(2), Some(WireType::LengthDelimited));
        assert_eq!(WireType::from_u32(5), Some(WireType::Bits32));
        assert_eq!(WireType::from_u32(3), None);
        assert_eq!(WireType::from_u32(4), None);
        assert_eq!(WireType::from_u32(6), None);
    }

    #[test]
    fn test_zigzag_table() {
        assert_eq!(zigzag32_encode(0), 0);
        assert_eq!(zigzag32_encode(-1), 1);
        assert_eq!(zigzag32_encode(1), 2);
        assert_eq!(zigzag32_encode(5), 10);
        assert_eq!(zigzag32_encode(-5), 9);
        assert_eq!(zigzag32_encode(i32::MIN), u32::MAX);
        assert_eq!(zigzag64_encode(-1), 1);
        assert_eq!(zigzag64_encode(i64::MIN), u64::MAX);
    }

    #[test]
    fn test_zigzag_roundtrip() {
        for v in [0i64, 1, -1, 5, -5, i64::MIN, i64::MAX, 123456789, -987654321] {
            assert_eq!(zigzag64_decode(zigzag64_encode(v)), v);
        }
        for v in [0i32, 5, -5, i32::MIN, i32::MAX] {
            assert_eq!(zigzag64_decode(zigzag64_encode(v as i64)) as i32, v);
        }
    }
}
