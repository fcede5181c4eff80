//! Source positions in the `start:length:file` form the compiler emits.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Byte range of a node in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSpan {
    pub start: usize,
    pub length: usize,
    /// Index into the compiler's source list; `-1` marks generated code.
    pub file: i64,
}

impl SourceSpan {
    #[must_use]
    pub const fn new(start: usize, length: usize, file: i64) -> Self {
        Self {
            start,
            length,
            file,
        }
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Maps the span to 1-based `(first, last)` line numbers of `text`.
    #[must_use]
    pub fn line_range(&self, text: &str) -> (usize, usize) {
        let line_at = |offset: usize| {
            let clamped = offset.min(text.len());
            text.as_bytes()[..clamped]
                .iter()
                .filter(|b| **b == b'\n')
                .count()
                + 1
        };
        (line_at(self.start), line_at(self.end()))
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.length, self.file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanParseError(String);

impl fmt::Display for SpanParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed source span '{}'", self.0)
    }
}

impl std::error::Error for SpanParseError {}

impl FromStr for SourceSpan {
    type Err = SpanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SpanParseError(s.to_string());
        let mut parts = s.split(':');
        let start = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        let length = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        let file = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Self::new(start, length, file))
    }
}

impl Serialize for SourceSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SourceSpan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
