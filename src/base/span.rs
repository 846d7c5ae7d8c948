//! Line/column positions and byte-offset ranges.

use std::fmt;

pub use text_size::{TextRange, TextSize};

/// A zero-based line/column position.
///
/// Ordering is lexicographic (line first), which is what "declared before"
/// comparisons between a directive and a use rely on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// From 1-based coordinates, as most front-ends report them.
    pub const fn from_one_based(line: u32, col: u32) -> Self {
        Self::new(line.saturating_sub(1), col.saturating_sub(1))
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}
