use super::cursor::ByteCursor;

/// Characters stripped from the right of space-padded fields.
const PADDING: [char; 5] = [' ', '\t', '\n', '\r', '\0'];

/// Fixed-width string field. The directive count is the field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// `a`: bytes as-is.
    Raw,
    /// `A`: trailing whitespace and NULs stripped.
    SpacePadded,
    /// `Z`: trailing NULs stripped.
    NulPadded,
    /// `H`: hex digits, high nibble first.
    Hex,
    /// `h`: hex digits, low nibble first.
    HexSwapped,
}

impl TextKind {
    /// Bytes consumed for a field of `count` units.
    pub fn consumed(self, count: usize) -> usize {
        match self {
            TextKind::Hex | TextKind::HexSwapped => count.div_ceil(2),
            _ => count,
        }
    }

    pub fn decode(self, cursor: &mut ByteCursor<'_>, count: usize) -> String {
        let bytes = cursor.read_span(self.consumed(count));
        match self {
            TextKind::Raw => String::from_utf8_lossy(bytes).into_owned(),
            TextKind::SpacePadded => String::from_utf8_lossy(bytes)
                .trim_end_matches(&PADDING[..])
                .to_string(),
            TextKind::NulPadded => String::from_utf8_lossy(bytes)
                .trim_end_matches('\0')
                .to_string(),
            TextKind::Hex => hex(bytes, count, false),
            TextKind::HexSwapped => hex(bytes, count, true),
        }
    }
}

/// `Z+`: NUL-terminated string of any length.
pub fn decode_nul_terminated(cursor: &mut ByteCursor<'_>) -> String {
    String::from_utf8_lossy(cursor.read_until_nul()).into_owned()
}

/// Lowercase hex digits of `bytes`, cut to `digits`. Swapped mode puts the
/// low nibble of each byte first.
fn hex(bytes: &[u8], digits: usize, swapped: bool) -> String {
    let mut out = hex::encode(bytes);
    if swapped {
        out = out
            .as_bytes()
            .chunks(2)
            .flat_map(|pair| pair.iter().rev())
            .map(|&b| char::from(b))
            .collect();
    }
    out.truncate(digits);
    out
}
