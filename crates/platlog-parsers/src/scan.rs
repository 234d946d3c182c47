use crate::error::{MatchError, MatchResult};

/// Left-to-right cursor over a single log line
///
/// Every method either consumes input and returns the captured text, or
/// returns [`MatchError::Mismatch`] and leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    /// Unconsumed input
    pub fn remaining(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Byte offset of the cursor
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume an exact, case-sensitive literal
    pub fn literal(&mut self, lit: &str) -> MatchResult<()> {
        if self.remaining().starts_with(lit) {
            self.pos += lit.len();
            Ok(())
        } else {
            Err(MatchError::Mismatch)
        }
    }

    /// Capture up to the first occurrence of `stop`, consuming `stop` too
    pub fn until(&mut self, stop: &str) -> MatchResult<&'a str> {
        let rest = self.remaining();
        let idx = rest.find(stop).ok_or(MatchError::Mismatch)?;
        self.capture(rest, idx, stop.len())
    }

    /// Capture up to the last occurrence of `stop`, consuming `stop` too
    pub fn until_last(&mut self, stop: &str) -> MatchResult<&'a str> {
        let rest = self.remaining();
        let idx = rest.rfind(stop).ok_or(MatchError::Mismatch)?;
        self.capture(rest, idx, stop.len())
    }

    fn capture(&mut self, rest: &'a str, idx: usize, skip: usize) -> MatchResult<&'a str> {
        if idx == 0 {
            return Err(MatchError::Mismatch);
        }
        self.pos += idx + skip;
        Ok(&rest[..idx])
    }

    /// Capture a non-empty run of characters up to the next space or end of
    /// line. The space itself is left for the template to consume.
    pub fn word(&mut self) -> MatchResult<&'a str> {
        let rest = self.remaining();
        let end = rest.find(' ').unwrap_or(rest.len());
        if end == 0 {
            return Err(MatchError::Mismatch);
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    /// Capture everything left, which must not be empty
    pub fn tail(&mut self) -> MatchResult<&'a str> {
        if self.remaining().is_empty() {
            return Err(MatchError::Mismatch);
        }
        Ok(self.rest())
    }

    /// Capture everything left, possibly nothing
    pub fn rest(&mut self) -> &'a str {
        let rest = self.remaining();
        self.pos = self.line.len();
        rest
    }

    /// Consume one or more tab characters
    pub fn tabs(&mut self) -> MatchResult<()> {
        let rest = self.remaining();
        let n = rest.len() - rest.trim_start_matches('\t').len();
        if n == 0 {
            return Err(MatchError::Mismatch);
        }
        self.pos += n;
        Ok(())
    }

    /// Require that only whitespace is left
    pub fn finish(&mut self) -> MatchResult<()> {
        if self.remaining().trim().is_empty() {
            self.pos = self.line.len();
            Ok(())
        } else {
            Err(MatchError::Mismatch)
        }
    }
}
