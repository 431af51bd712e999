use super::directive::Directive;
use crate::error::{UnpackError, preview};

/// One scanned directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Field name, present only in record context.
    pub name: Option<String>,
    pub directive: Directive,
    /// Digits following the code; `None` when there were none.
    pub count: Option<usize>,
}

/// Walks a format string one directive at a time.
pub struct Scanner<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            src: text.as_bytes(),
            pos: 0,
        }
    }

    /// Scans the next directive, or `None` at end of input.
    ///
    /// With `record` set, a `name:` prefix is scanned first.
    pub fn next_token(&mut self, record: bool) -> Result<Option<Token>, UnpackError> {
        let name = if record {
            match self.scan_name()? {
                Some(name) => {
                    self.skip_whitespace();
                    Some(name)
                }
                None => return Ok(None),
            }
        } else {
            None
        };

        let Some(&code) = self.src.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;

        let suffixed = self
            .src
            .get(self.pos)
            .and_then(|&next| Directive::with_suffix(code, next));
        let directive = match suffixed {
            Some(directive) => {
                self.pos += 1;
                directive
            }
            None => Directive::from_code(code),
        };

        let count = self.scan_count();
        Ok(Some(Token {
            name,
            directive,
            count,
        }))
    }

    fn scan_count(&mut self) -> Option<usize> {
        let start = self.pos;
        let mut count = 0usize;
        while let Some(&b) = self.src.get(self.pos).filter(|b| b.is_ascii_digit()) {
            count = count.saturating_mul(10).saturating_add(usize::from(b - b'0'));
            self.pos += 1;
        }
        (self.pos > start).then_some(count)
    }

    fn skip_whitespace(&mut self) {
        while self.src.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    /// Finds the next `name:`. Stops in front of a `}` with an empty name,
    /// and returns `None` when the input ends before any name starts.
    fn scan_name(&mut self) -> Result<Option<String>, UnpackError> {
        loop {
            match self.src.get(self.pos) {
                None => return Ok(None),
                Some(b'}') => return Ok(Some(String::new())),
                Some(&b) if is_name_start(b) => break,
                Some(b'\\') => self.pos += 2,
                Some(_) => self.pos += 1,
            }
        }

        let start = self.pos;
        let mut name = Vec::new();
        loop {
            match self.src.get(self.pos) {
                Some(b':') => {
                    self.pos += 1;
                    return Ok(Some(String::from_utf8_lossy(&name).into_owned()));
                }
                Some(b'\\') => {
                    match self.src.get(self.pos + 1) {
                        Some(&escaped @ (b':' | b'\\')) => name.push(escaped),
                        Some(&other) => name.extend_from_slice(&[b'\\', other]),
                        None => name.push(b'\\'),
                    }
                    self.pos += 2;
                }
                Some(b'}') | None => {
                    let rest = self.text.get(start..).unwrap_or_default();
                    return Err(UnpackError::UnterminatedFieldName {
                        preview: preview(rest),
                    });
                }
                Some(&b) => {
                    name.push(b);
                    self.pos += 1;
                }
            }
        }
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}
