//! Field decoders.
//!
//! - `cursor`: the byte view and position; out-of-range reads come back absent
//! - `numeric`: fixed-width integers and floats, NaN on overrun
//! - `text`: padded, NUL-terminated and hex strings, truncated on overrun
//!
//! Decoders never fail: every read advances the cursor by the field's nominal
//! width whether or not the bytes were there.

pub mod cursor;
pub mod numeric;
pub mod text;

pub use cursor::ByteCursor;
pub use numeric::{Endian, NumberKind};
pub use text::TextKind;
