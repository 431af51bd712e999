/// Read-only view over the input with a movable position.
///
/// The position is signed and never clamped: seeks may move it before the
/// start or past the end, and reads at such positions come back absent
/// instead of failing.
pub struct ByteCursor<'a> {
    payload: &'a [u8],
    position: i64,
}

impl<'a> ByteCursor<'a> {
    /// Start at `offset`, or at 0 when `offset` is not positive.
    pub fn new(payload: &'a [u8], offset: i64) -> Self {
        Self {
            payload,
            position: offset.max(0),
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    fn byte_at(&self, position: i64) -> Option<u8> {
        let index = usize::try_from(position).ok()?;
        self.payload.get(index).copied()
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = self.byte_at(self.position);
        self.advance(1);
        byte
    }

    /// Reads `N` bytes and advances by `N`, even when some are out of range.
    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let start = self.position;
        self.advance(N);
        let mut out = [0u8; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.byte_at(start.saturating_add(i as i64))?;
        }
        Some(out)
    }

    /// Returns the in-range part of the next `len` bytes and advances by `len`.
    pub fn read_span(&mut self, len: usize) -> &'a [u8] {
        let start = self.position;
        self.advance(len);
        let end = start.saturating_add(to_offset(len));
        let payload = self.payload;
        let clamp = |pos: i64| pos.clamp(0, payload.len() as i64) as usize;
        &payload[clamp(start)..clamp(end)]
    }

    /// Returns the bytes up to the next NUL (or end of input) and moves past
    /// the NUL when one was found.
    pub fn read_until_nul(&mut self) -> &'a [u8] {
        let payload = self.payload;
        let Some(rest) = usize::try_from(self.position)
            .ok()
            .and_then(|start| payload.get(start..))
        else {
            return &[];
        };
        match rest.iter().position(|&b| b == 0) {
            Some(end) => {
                self.advance(end + 1);
                &rest[..end]
            }
            None => {
                self.advance(rest.len());
                rest
            }
        }
    }

    pub fn seek_forward(&mut self, amount: usize) {
        self.advance(amount);
    }

    pub fn seek_backward(&mut self, amount: usize) {
        self.position = self.position.saturating_sub(to_offset(amount));
    }

    pub fn seek_absolute(&mut self, position: usize) {
        self.position = to_offset(position);
    }

    fn advance(&mut self, amount: usize) {
        self.position = self.position.saturating_add(to_offset(amount));
    }
}

fn to_offset(amount: usize) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}
