//! Format strings.
//!
//! - `directive`: the code table (source of truth for what each character means)
//! - `scanner`: splits a format string into directives and record field names
//! - `compile`: builds the directive tree and reports every format error
//! - `exec`: runs a compiled tree over a byte cursor
//!
//! Compilation is the only fallible step; running a compiled format cannot
//! fail, whatever the input bytes.

mod compile;
mod directive;
mod exec;
mod scanner;

pub use compile::Format;
pub use directive::GroupKind;
