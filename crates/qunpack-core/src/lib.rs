//! qunpack core library: decode binary layouts with an `unpack`-style format
//! language.
//!
//! A format string is a sequence of directive codes (integer widths and
//! signedness, byte order, floats, padded or NUL-terminated strings, hex
//! dumps, cursor seeks) plus `[...]` array groups and `{name:...}` record
//! groups that nest arbitrarily. Decoding walks the format and a byte cursor
//! together and builds a tree of [`Value`]s.
//!
//! Layering:
//! - `decode`: byte cursor and field decoders (never fail; NaN or truncated
//!   text on overrun)
//! - `format`: directive table, scanner, compiler and executor
//! - `value`: the output tree
//! - `unpacker`: compiled-format cache for repeated formats
//!
//! Invariants:
//! - Decoding is a pure function of (format, bytes, offset).
//! - Every format error is reported before any byte is read; no partial
//!   results are returned.
//! - 64-bit integers are exact.
//! - The values a run can produce are bounded when the format compiles
//!   (`Options::max_values`).
//!
//! # Examples
//! ```
//! use qunpack_core::{Value, unpack};
//!
//! let values = unpack("C[3 C2]C", &[1, 2, 3, 4, 5, 6, 7, 8], 0)?;
//! assert_eq!(values.len(), 5);
//! assert_eq!(values[0], Value::from(1u64));
//! assert_eq!(
//!     values[1],
//!     Value::Sequence(vec![Value::from(2u64), Value::from(3u64)])
//! );
//! # Ok::<(), qunpack_core::UnpackError>(())
//! ```
//!
//! Directive codes:
//!
//! | code | field |
//! |------|-------|
//! | `c` `C` | signed / unsigned byte |
//! | `s` `S` `n` `v` | 16-bit: signed BE, unsigned BE, unsigned BE, unsigned LE |
//! | `l` `L` `N` `V` | 32-bit, same pattern |
//! | `q` `Q` `J` `P` | 64-bit, same pattern |
//! | `f` `G` / `g` | 32-bit float BE / LE |
//! | `d` `E` / `e` | 64-bit float BE / LE |
//! | `a` `A` `Z` | raw, space-padded, NUL-padded string of N bytes |
//! | `Z+` | NUL-terminated string |
//! | `H` `h` | N hex digits, high / low nibble first |
//! | `x` `X` `@` | skip forward, skip back, jump to absolute offset |
//! | `[N ... ]` | array group repeated N times |
//! | `{N name:... }` | record group repeated N times |
//!
//! `s S l L q Q f d` take a `<` (little-endian) or `>` (big-endian) suffix.
//! Any other character is ignored, so separators like `,` and spaces are free.

mod decode;
mod error;
mod format;
mod options;
mod unpacker;
mod value;

pub use error::{NAME_PREVIEW_LEN, UnpackError};
pub use format::{Format, GroupKind};
pub use options::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_VALUES, Options};
pub use unpacker::{DEFAULT_CACHE_CAPACITY, Unpacker};
pub use value::{Mapping, Number, Value};

/// Decodes `bytes` according to `format`, starting at `offset`.
///
/// Non-positive offsets start at 0. Numeric reads past the input yield NaN
/// and string reads are truncated; only malformed formats fail.
///
/// # Examples
/// ```
/// use qunpack_core::{UnpackError, Value, unpack};
///
/// let values = unpack("{a\\:b:C}", &[9, 9], 0)?;
/// let record = values[0].as_mapping().expect("record");
/// assert_eq!(record.get("a:b"), Some(&Value::from(9u64)));
///
/// let err = unpack("{0 a:C}", &[], 0).unwrap_err();
/// assert!(matches!(err, UnpackError::ZeroGroupRepeat { .. }));
/// # Ok::<(), UnpackError>(())
/// ```
pub fn unpack(format: &str, bytes: &[u8], offset: i64) -> Result<Vec<Value>, UnpackError> {
    Ok(Format::compile(format)?.unpack(bytes, offset))
}

/// Encoding counterpart of [`unpack`]. Not implemented: always fails with
/// [`UnpackError::NotImplemented`].
pub fn pack(format: &str, values: &[Value]) -> Result<Vec<u8>, UnpackError> {
    tracing::debug!(format, values = values.len(), "pack requested");
    Err(UnpackError::NotImplemented { operation: "pack" })
}
