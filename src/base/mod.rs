//! Foundation types for the srcgraph toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`], [`FileTable`] - Interned source file identifiers
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`] - Line/column positions as front-ends report them
//! - [`SourceRange`], [`SourceLocation`] - Where a node came from
//!
//! This module has NO dependencies on other srcgraph modules.

mod file_id;
mod location;
mod span;

pub use file_id::{FileId, FileTable};
pub use location::{SourceLocation, SourceRange};
pub use span::{LineCol, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
