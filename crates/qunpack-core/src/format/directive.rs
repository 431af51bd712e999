use std::fmt;

use crate::decode::{Endian, NumberKind, TextKind};

/// Bracketed group kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `[...]`, decoded into a sequence.
    Array,
    /// `{...}`, decoded into a mapping of named fields.
    Record,
}

impl GroupKind {
    pub fn opener(self) -> char {
        match self {
            GroupKind::Array => '[',
            GroupKind::Record => '{',
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Array => f.write_str("array"),
            GroupKind::Record => f.write_str("record"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekKind {
    /// `x`
    Forward,
    /// `X`
    Backward,
    /// `@`
    Absolute,
}

/// What a single directive character (plus its suffix) asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Number(NumberKind),
    Text(TextKind),
    /// `Z+`
    NulTerminated,
    Seek(SeekKind),
    Open(GroupKind),
    Close,
    /// Anything outside the table; compiles to nothing.
    Unknown,
}

impl Directive {
    /// Looks up a directive code.
    pub fn from_code(code: u8) -> Self {
        use Endian::{Big, Little};

        match code {
            b'c' => Directive::Number(NumberKind::I8),
            b'C' => Directive::Number(NumberKind::U8),
            b's' => Directive::Number(NumberKind::I16(Big)),
            b'S' | b'n' => Directive::Number(NumberKind::U16(Big)),
            b'v' => Directive::Number(NumberKind::U16(Little)),
            b'l' => Directive::Number(NumberKind::I32(Big)),
            b'L' | b'N' => Directive::Number(NumberKind::U32(Big)),
            b'V' => Directive::Number(NumberKind::U32(Little)),
            b'q' => Directive::Number(NumberKind::I64(Big)),
            b'Q' | b'J' => Directive::Number(NumberKind::U64(Big)),
            b'P' => Directive::Number(NumberKind::U64(Little)),
            b'f' | b'G' => Directive::Number(NumberKind::F32(Big)),
            b'g' => Directive::Number(NumberKind::F32(Little)),
            b'd' | b'E' => Directive::Number(NumberKind::F64(Big)),
            b'e' => Directive::Number(NumberKind::F64(Little)),
            b'a' => Directive::Text(TextKind::Raw),
            b'A' => Directive::Text(TextKind::SpacePadded),
            b'Z' => Directive::Text(TextKind::NulPadded),
            b'H' => Directive::Text(TextKind::Hex),
            b'h' => Directive::Text(TextKind::HexSwapped),
            b'x' => Directive::Seek(SeekKind::Forward),
            b'X' => Directive::Seek(SeekKind::Backward),
            b'@' => Directive::Seek(SeekKind::Absolute),
            b'[' => Directive::Open(GroupKind::Array),
            b'{' => Directive::Open(GroupKind::Record),
            b']' | b'}' => Directive::Close,
            _ => Directive::Unknown,
        }
    }

    /// Applies the two-character forms: `Z+`, and a `<`/`>` byte-order
    /// suffix on `s S l L q Q f d`. Returns the refined directive when
    /// `next` is consumed.
    pub fn with_suffix(code: u8, next: u8) -> Option<Self> {
        let endian = match next {
            b'<' => Endian::Little,
            b'>' => Endian::Big,
            b'+' if code == b'Z' => return Some(Directive::NulTerminated),
            _ => return None,
        };
        match (code, Directive::from_code(code)) {
            (b's' | b'S' | b'l' | b'L' | b'q' | b'Q' | b'f' | b'd', Directive::Number(kind)) => {
                Some(Directive::Number(kind.with_endian(endian)))
            }
            _ => None,
        }
    }
}
