//! The capability every language front-end implements.

use super::language::Language;
use super::unit::FileUnit;
use crate::error::Result;

/// Translates one language's annotated source representation into a [`FileUnit`].
///
/// The model never branches on the source language; each front-end owns
/// its syntax-directed translation and only has to produce statement
/// trees of the shape described in [`crate::syntax`].
pub trait FrontEnd {
    /// The front-end's input, e.g. an annotated XML tree or a token stream.
    type Source: ?Sized;

    fn language(&self) -> Language;

    /// Translate the source of the file at `path`.
    fn translate(&self, path: &str, source: &Self::Source) -> Result<FileUnit>;
}
