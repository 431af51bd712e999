use thiserror::Error;

use crate::format::GroupKind;

/// Longest field-name preview carried by [`UnpackError::UnterminatedFieldName`].
pub const NAME_PREVIEW_LEN: usize = 20;

/// Errors returned while compiling or running a format.
///
/// All variants abort the whole call; no partial output is returned.
///
/// # Examples
/// ```
/// use qunpack_core::{UnpackError, unpack};
///
/// let err = unpack("C[C", &[1, 2], 0).unwrap_err();
/// assert!(matches!(err, UnpackError::UnterminatedGroup { .. }));
/// assert!(err.to_string().contains("unterminated array group"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnpackError {
    #[error("unterminated {kind} group: missing closing bracket for '{}'", .kind.opener())]
    UnterminatedGroup { kind: GroupKind },
    #[error("zero repeat count for {kind} group '{}'", .kind.opener())]
    ZeroGroupRepeat { kind: GroupKind },
    #[error("unterminated field name: no ':' after \"{preview}\"")]
    UnterminatedFieldName { preview: String },
    #[error("groups nested deeper than the limit of {limit}")]
    NestingTooDeep { limit: usize },
    #[error("format can produce more than {limit} values")]
    TooManyValues { limit: usize },
    #[error("{operation}: not implemented")]
    NotImplemented { operation: &'static str },
}

/// Bounded preview of `text` for error messages.
pub(crate) fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(NAME_PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
