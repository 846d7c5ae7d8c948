//! Source locations attached to model nodes.
//!
//! Front-ends report positions either as line/column pairs or as byte
//! offsets, so [`SourceRange`] carries whichever scheme the input used.

use super::file_id::FileId;
use super::span::{LineCol, TextRange, TextSize};

/// A range in source text, in one of the two supported positional schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRange {
    /// 0-indexed line/column start and end (inclusive end column).
    LineCol { start: LineCol, end: LineCol },
    /// Byte offsets into the file text.
    Offsets(TextRange),
}

impl SourceRange {
    /// Create a line/column range from 0-indexed coordinates.
    pub fn from_coords(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        SourceRange::LineCol {
            start: LineCol::new(start_line, start_col),
            end: LineCol::new(end_line, end_col),
        }
    }

    /// Create an offset range.
    pub fn from_offsets(start: u32, end: u32) -> Self {
        SourceRange::Offsets(TextRange::new(TextSize::from(start), TextSize::from(end)))
    }

    /// Check whether `other` lies completely within this range.
    ///
    /// Ranges in different schemes are never comparable and return `false`.
    pub fn contains_range(&self, other: &SourceRange) -> bool {
        match (self, other) {
            (
                SourceRange::LineCol { start, end },
                SourceRange::LineCol {
                    start: o_start,
                    end: o_end,
                },
            ) => start <= o_start && o_end <= end,
            (SourceRange::Offsets(range), SourceRange::Offsets(o_range)) => {
                range.contains_range(*o_range)
            }
            _ => false,
        }
    }

    /// Whether this range starts strictly before `other` starts.
    ///
    /// Returns `None` when the two ranges use different schemes.
    pub fn starts_before(&self, other: &SourceRange) -> Option<bool> {
        match (self, other) {
            (SourceRange::LineCol { start, .. }, SourceRange::LineCol { start: o_start, .. }) => {
                Some(start < o_start)
            }
            (SourceRange::Offsets(range), SourceRange::Offsets(o_range)) => {
                Some(range.start() < o_range.start())
            }
            _ => None,
        }
    }
}

/// Where a node was declared or defined.
///
/// A declaration merged from several files keeps one location per site.
/// `is_reference` marks declaration-only sites such as prototypes and forward
/// declarations, as opposed to the defining occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: FileId,
    pub range: Option<SourceRange>,
    pub is_reference: bool,
}

impl SourceLocation {
    pub fn new(file: FileId, range: Option<SourceRange>) -> Self {
        Self {
            file,
            range,
            is_reference: false,
        }
    }

    /// A declaration-only location.
    pub fn reference(file: FileId, range: Option<SourceRange>) -> Self {
        Self {
            file,
            range,
            is_reference: true,
        }
    }
}
