use serde::{Deserialize, Serialize};

/// Default limit on simultaneously open `[`/`{` groups.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on values one run of a format may produce.
pub const DEFAULT_MAX_VALUES: usize = 1 << 24;

/// Compilation settings.
///
/// Loadable from JSON (or any serde format); missing fields take their
/// defaults.
///
/// # Examples
/// ```
/// use qunpack_core::{Format, Options, UnpackError};
///
/// let options = Options { max_depth: 1, ..Options::default() };
/// assert!(Format::compile_with("[C]", &options).is_ok());
/// let err = Format::compile_with("[[C]]", &options).unwrap_err();
/// assert_eq!(err, UnpackError::NestingTooDeep { limit: 1 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Maximum number of groups open at once; deeper formats fail to compile.
    pub max_depth: usize,
    /// Upper bound on values (including group containers) a single run can
    /// produce, counting every repeat; larger formats fail to compile.
    pub max_values: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_values: DEFAULT_MAX_VALUES,
        }
    }
}
