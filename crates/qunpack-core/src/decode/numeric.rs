use super::cursor::ByteCursor;
use crate::value::Number;

/// Byte order of a multi-byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Fixed-width numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    I8,
    U8,
    I16(Endian),
    U16(Endian),
    I32(Endian),
    U32(Endian),
    I64(Endian),
    U64(Endian),
    F32(Endian),
    F64(Endian),
}

impl NumberKind {
    /// Same kind with its byte order replaced; single bytes have none.
    pub fn with_endian(self, endian: Endian) -> Self {
        match self {
            NumberKind::I8 | NumberKind::U8 => self,
            NumberKind::I16(_) => NumberKind::I16(endian),
            NumberKind::U16(_) => NumberKind::U16(endian),
            NumberKind::I32(_) => NumberKind::I32(endian),
            NumberKind::U32(_) => NumberKind::U32(endian),
            NumberKind::I64(_) => NumberKind::I64(endian),
            NumberKind::U64(_) => NumberKind::U64(endian),
            NumberKind::F32(_) => NumberKind::F32(endian),
            NumberKind::F64(_) => NumberKind::F64(endian),
        }
    }

    /// Decodes one field and advances the cursor by its width, returning
    /// [`Number::OVERRUN`] when any byte is out of range.
    pub fn decode(self, cursor: &mut ByteCursor<'_>) -> Number {
        match self {
            NumberKind::U8 => cursor
                .read_byte()
                .map_or(Number::OVERRUN, |b| Number::Unsigned(b.into())),
            NumberKind::I8 => cursor
                .read_byte()
                .map_or(Number::OVERRUN, |b| Number::Signed((b as i8).into())),
            NumberKind::U16(endian) => unsigned(cursor.read_array::<2>(), endian),
            NumberKind::I16(endian) => signed(cursor.read_array::<2>(), endian),
            NumberKind::U32(endian) => unsigned(cursor.read_array::<4>(), endian),
            NumberKind::I32(endian) => signed(cursor.read_array::<4>(), endian),
            NumberKind::U64(endian) => unsigned(cursor.read_array::<8>(), endian),
            NumberKind::I64(endian) => signed(cursor.read_array::<8>(), endian),
            NumberKind::F32(endian) => match cursor.read_array::<4>() {
                Some(bytes) => {
                    let bits = assemble(&bytes, endian) as u32;
                    Number::Float(f32::from_bits(bits).into())
                }
                None => Number::OVERRUN,
            },
            NumberKind::F64(endian) => match cursor.read_array::<8>() {
                Some(bytes) => Number::Float(f64::from_bits(assemble(&bytes, endian))),
                None => Number::OVERRUN,
            },
        }
    }
}

/// Base-256 value of `bytes`, most significant first for big-endian.
fn assemble(bytes: &[u8], endian: Endian) -> u64 {
    let fold = |acc: u64, &b: &u8| (acc << 8) | u64::from(b);
    match endian {
        Endian::Big => bytes.iter().fold(0, fold),
        Endian::Little => bytes.iter().rev().fold(0, fold),
    }
}

fn unsigned<const N: usize>(bytes: Option<[u8; N]>, endian: Endian) -> Number {
    match bytes {
        Some(bytes) => Number::Unsigned(assemble(&bytes, endian)),
        None => Number::OVERRUN,
    }
}

fn signed<const N: usize>(bytes: Option<[u8; N]>, endian: Endian) -> Number {
    match bytes {
        Some(bytes) => Number::Signed(to_signed(assemble(&bytes, endian), N)),
        None => Number::OVERRUN,
    }
}

/// Two's-complement reinterpretation of a `width`-byte unsigned value.
fn to_signed(value: u64, width: usize) -> i64 {
    let shift = 64 - 8 * width as u32;
    ((value << shift) as i64) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(kind: NumberKind, bytes: &[u8], offset: i64) -> Number {
        kind.decode(&mut ByteCursor::new(bytes, offset))
    }

    #[test]
    fn unsigned_8_bit() {
        let buf = [128, 0, 1, 255];
        assert_eq!(decode(NumberKind::U8, &buf, 0), Number::Unsigned(128));
        assert_eq!(decode(NumberKind::U8, &buf, 3), Number::Unsigned(255));
        assert!(decode(NumberKind::U8, &buf, 4).is_nan());
    }

    #[test]
    fn signed_8_bit() {
        let buf = [128, 0, 1, 255];
        assert_eq!(decode(NumberKind::I8, &buf, 0), Number::Signed(-128));
        assert_eq!(decode(NumberKind::I8, &buf, 2), Number::Signed(1));
        assert_eq!(decode(NumberKind::I8, &buf, 3), Number::Signed(-1));
    }

    #[test]
    fn shorts_big_and_little() {
        let buf = [255, 255, 1, 2];
        let be = NumberKind::U16(Endian::Big);
        assert_eq!(decode(be, &buf, 0), Number::Unsigned(0xffff));
        assert_eq!(decode(be, &buf, 1), Number::Unsigned(0xff01));
        assert!(decode(be, &buf, 3).is_nan());
        assert_eq!(decode(NumberKind::I16(Endian::Big), &buf, 1), Number::Signed(-255));
        assert_eq!(decode(NumberKind::U16(Endian::Little), &buf, 2), Number::Unsigned(0x0201));
        assert_eq!(decode(NumberKind::I16(Endian::Little), &buf, 1), Number::Signed(0x01ff));
    }

    #[test]
    fn longs() {
        let buf = [255, 255, 255, 255, 1, 2, 3, 4];
        let be = NumberKind::U32(Endian::Big);
        assert_eq!(decode(be, &buf, 0), Number::Unsigned(0xffff_ffff));
        assert_eq!(decode(be, &buf, 3), Number::Unsigned(0xff01_0203));
        assert!(decode(be, &buf, 5).is_nan());
        let signed = NumberKind::I32(Endian::Big);
        assert_eq!(decode(signed, &buf, 0), Number::Signed(-1));
        assert_eq!(decode(signed, &buf, 2), Number::Signed(-256 * 256 + 0x0102));
        assert_eq!(decode(signed, &buf, 4), Number::Signed(0x0102_0304));
    }

    #[test]
    fn quads_are_exact() {
        let buf = [255, 255, 255, 255, 255, 255, 255, 255, 1, 2, 3, 4, 5, 6, 7, 8];
        let be = NumberKind::U64(Endian::Big);
        assert_eq!(decode(be, &buf, 0), Number::Unsigned(u64::MAX));
        assert_eq!(decode(be, &buf, 1), Number::Unsigned(0xffff_ffff_ffff_ff01));
        assert_eq!(decode(be, &buf, 8), Number::Unsigned(0x0102_0304_0506_0708));
        assert!(decode(be, &buf, 9).is_nan());
        let signed = NumberKind::I64(Endian::Big);
        assert_eq!(decode(signed, &buf, 0), Number::Signed(-1));
        assert_eq!(
            decode(signed, &buf, 6),
            Number::Signed(-0x1_0000_0000_0000 + 0x0102_0304_0506)
        );
        assert_eq!(
            decode(NumberKind::U64(Endian::Little), &buf, 8),
            Number::Unsigned(0x0807_0605_0403_0201)
        );
        assert_eq!(
            decode(signed, &[128, 0, 0, 0, 0, 0, 0, 0], 0),
            Number::Signed(i64::MIN)
        );
    }

    #[test]
    fn floats() {
        let mut buf = [0u8; 12];
        buf[2..6].copy_from_slice(&1234.5f32.to_be_bytes());
        assert_eq!(decode(NumberKind::F32(Endian::Big), &buf, 2), Number::Float(1234.5));
        buf[2..6].copy_from_slice(&(-0.25f32).to_le_bytes());
        assert_eq!(decode(NumberKind::F32(Endian::Little), &buf, 2), Number::Float(-0.25));

        buf[4..12].copy_from_slice(&1e200f64.to_be_bytes());
        assert_eq!(decode(NumberKind::F64(Endian::Big), &buf, 4), Number::Float(1e200));
        buf[4..12].copy_from_slice(&f64::NEG_INFINITY.to_le_bytes());
        assert_eq!(
            decode(NumberKind::F64(Endian::Little), &buf, 4),
            Number::Float(f64::NEG_INFINITY)
        );
        assert!(decode(NumberKind::F64(Endian::Big), &buf, 5).is_nan());
    }

    #[test]
    fn overrun_still_advances_nominal_width() {
        let mut cursor = ByteCursor::new(&[1, 2, 3], 0);
        assert!(NumberKind::U32(Endian::Big).decode(&mut cursor).is_nan());
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn with_endian_keeps_width() {
        assert_eq!(
            NumberKind::I16(Endian::Big).with_endian(Endian::Little),
            NumberKind::I16(Endian::Little)
        );
        assert_eq!(NumberKind::U8.with_endian(Endian::Little), NumberKind::U8);
    }
}
