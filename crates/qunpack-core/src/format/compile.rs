use super::directive::{Directive, GroupKind, SeekKind};
use super::scanner::Scanner;
use crate::decode::{NumberKind, TextKind};
use crate::error::UnpackError;
use crate::options::Options;

/// One compiled directive, named when it sits directly inside a record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Instruction {
    pub name: Option<String>,
    pub op: Op,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Number {
        kind: NumberKind,
        repeat: usize,
    },
    Text {
        kind: TextKind,
        width: usize,
    },
    NulTerminated {
        repeat: usize,
    },
    Seek {
        kind: SeekKind,
        amount: usize,
    },
    Group {
        kind: GroupKind,
        repeat: usize,
        body: Vec<Instruction>,
    },
}

/// A format string compiled into a directive tree.
///
/// Compiling validates the whole format up front, so running a `Format`
/// never fails. A compiled format is immutable and can be shared between
/// threads and reused for any number of inputs.
///
/// # Examples
/// ```
/// use qunpack_core::{Format, Value};
///
/// let header = Format::compile("a4 n")?;
/// let values = header.unpack(b"RIFF\x00\x10", 0);
/// assert_eq!(values, [Value::from("RIFF"), Value::from(16u64)]);
/// # Ok::<(), qunpack_core::UnpackError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    source: String,
    pub(crate) body: Vec<Instruction>,
}

impl Format {
    /// Compiles `text` with default [`Options`].
    pub fn compile(text: &str) -> Result<Self, UnpackError> {
        Self::compile_with(text, &Options::default())
    }

    pub fn compile_with(text: &str, options: &Options) -> Result<Self, UnpackError> {
        let mut compiler = Compiler {
            scanner: Scanner::new(text),
            max_depth: options.max_depth,
        };
        let body = compiler.body(None, 0, false)?;
        let produced = values_produced(&body);
        if produced > options.max_values {
            return Err(UnpackError::TooManyValues {
                limit: options.max_values,
            });
        }
        tracing::debug!(
            format = text,
            instructions = body.len(),
            produced,
            "compiled format"
        );
        Ok(Self {
            source: text.to_string(),
            body,
        })
    }

    /// The format string this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Values one run of `body` pushes, counting group containers and every
/// repeat. Saturates instead of overflowing.
fn values_produced(body: &[Instruction]) -> usize {
    body.iter().fold(0usize, |total, instruction| {
        let own = match &instruction.op {
            Op::Number { repeat, .. } | Op::NulTerminated { repeat } => *repeat,
            Op::Text { .. } => 1,
            Op::Seek { .. } => 0,
            Op::Group { repeat, body, .. } => {
                repeat.saturating_mul(values_produced(body).saturating_add(1))
            }
        };
        total.saturating_add(own)
    })
}

struct Compiler<'a> {
    scanner: Scanner<'a>,
    max_depth: usize,
}

impl Compiler<'_> {
    /// Compiles directives until the closer of `open`, or end of input at
    /// top level. Closers at top level are ignored.
    fn body(
        &mut self,
        open: Option<GroupKind>,
        depth: usize,
        record: bool,
    ) -> Result<Vec<Instruction>, UnpackError> {
        let mut body = Vec::new();
        loop {
            let Some(token) = self.scanner.next_token(record)? else {
                return match open {
                    Some(kind) => Err(UnpackError::UnterminatedGroup { kind }),
                    None => Ok(body),
                };
            };
            let count = token.count.unwrap_or(1);
            let op = match token.directive {
                Directive::Number(kind) => Op::Number {
                    kind,
                    repeat: count,
                },
                Directive::Text(kind) => Op::Text { kind, width: count },
                Directive::NulTerminated => Op::NulTerminated { repeat: count },
                Directive::Seek(kind) => Op::Seek {
                    kind,
                    amount: count,
                },
                Directive::Open(kind) => {
                    if count == 0 {
                        return Err(UnpackError::ZeroGroupRepeat { kind });
                    }
                    if depth >= self.max_depth {
                        return Err(UnpackError::NestingTooDeep {
                            limit: self.max_depth,
                        });
                    }
                    // array bodies never carry field names, even inside a record
                    let inner = self.body(Some(kind), depth + 1, kind == GroupKind::Record)?;
                    Op::Group {
                        kind,
                        repeat: count,
                        body: inner,
                    }
                }
                Directive::Close if open.is_some() => return Ok(body),
                Directive::Close | Directive::Unknown => continue,
            };
            body.push(Instruction {
                name: token.name,
                op,
            });
        }
    }
}
