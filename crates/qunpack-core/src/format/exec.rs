use super::compile::{Format, Instruction, Op};
use super::directive::{GroupKind, SeekKind};
use crate::decode::ByteCursor;
use crate::decode::text::decode_nul_terminated;
use crate::value::{Mapping, Value};

impl Format {
    /// Runs the format over `bytes`, starting at `offset` (non-positive
    /// offsets start at 0), and returns the top-level sequence.
    ///
    /// # Examples
    /// ```
    /// use qunpack_core::Format;
    ///
    /// let record = Format::compile("{id:C, name:Z+}")?;
    /// let values = record.unpack(b"\x07ab\0", 0);
    /// let fields = values[0].as_mapping().expect("record");
    /// assert_eq!(fields.get("name").and_then(|v| v.as_str()), Some("ab"));
    /// # Ok::<(), qunpack_core::UnpackError>(())
    /// ```
    pub fn unpack(&self, bytes: &[u8], offset: i64) -> Vec<Value> {
        let mut cursor = ByteCursor::new(bytes, offset);
        let mut out = Vec::new();
        run_sequence(&self.body, &mut cursor, &mut out);
        tracing::trace!(
            format = self.source(),
            values = out.len(),
            end = cursor.position(),
            "unpacked"
        );
        out
    }
}

fn run_sequence(body: &[Instruction], cursor: &mut ByteCursor<'_>, out: &mut Vec<Value>) {
    for instruction in body {
        instruction.op.execute(cursor, out);
    }
}

/// One pass over a record body. A field with one value stores it directly,
/// several values are stored as a sequence, and no values drops the name.
fn run_record(body: &[Instruction], cursor: &mut ByteCursor<'_>) -> Mapping {
    let mut record = Mapping::new();
    let mut produced = Vec::new();
    for instruction in body {
        instruction.op.execute(cursor, &mut produced);
        let Some(name) = instruction.name.as_deref() else {
            produced.clear();
            continue;
        };
        match produced.len() {
            0 => {}
            1 => {
                if let Some(value) = produced.pop() {
                    record.insert(name, value);
                }
            }
            _ => record.insert(name, Value::Sequence(std::mem::take(&mut produced))),
        }
    }
    record
}

impl Op {
    fn execute(&self, cursor: &mut ByteCursor<'_>, out: &mut Vec<Value>) {
        match self {
            Op::Number { kind, repeat } => {
                for _ in 0..*repeat {
                    out.push(Value::Number(kind.decode(cursor)));
                }
            }
            Op::Text { kind, width } => out.push(Value::Text(kind.decode(cursor, *width))),
            Op::NulTerminated { repeat } => {
                for _ in 0..*repeat {
                    out.push(Value::Text(decode_nul_terminated(cursor)));
                }
            }
            Op::Seek { kind, amount } => match kind {
                SeekKind::Forward => cursor.seek_forward(*amount),
                SeekKind::Backward => cursor.seek_backward(*amount),
                SeekKind::Absolute => cursor.seek_absolute(*amount),
            },
            Op::Group { kind, repeat, body } => {
                for _ in 0..*repeat {
                    let value = match kind {
                        GroupKind::Array => {
                            let mut items = Vec::new();
                            run_sequence(body, cursor, &mut items);
                            Value::Sequence(items)
                        }
                        GroupKind::Record => Value::Mapping(run_record(body, cursor)),
                    };
                    out.push(value);
                }
            }
        }
    }
}
