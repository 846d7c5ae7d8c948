//! File identifiers for tracking source files.

use std::fmt;

use indexmap::IndexSet;
use smol_str::SmolStr;

/// An interned identifier for a source file.
///
/// `FileId` is a lightweight handle (just a u32) that uniquely identifies
/// a file within a [`CodeModel`](crate::model::CodeModel). The path itself
/// lives in the model's [`FileTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    /// Create a new FileId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Interning table mapping file paths to [`FileId`]s.
///
/// Paths are compared verbatim; `A.cpp` and `./A.cpp` are different files.
#[derive(Clone, Debug, Default)]
pub struct FileTable {
    paths: IndexSet<SmolStr>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a path, returning the existing id if it was seen before.
    pub fn intern(&mut self, path: &str) -> FileId {
        if let Some(index) = self.paths.get_index_of(path) {
            return FileId::new(index as u32);
        }
        let (index, _) = self.paths.insert_full(SmolStr::new(path));
        FileId::new(index as u32)
    }

    /// Look up the id of an already interned path.
    pub fn get(&self, path: &str) -> Option<FileId> {
        self.paths
            .get_index_of(path)
            .map(|index| FileId::new(index as u32))
    }

    /// The path a file id was interned from.
    pub fn path(&self, file: FileId) -> Option<&str> {
        self.paths.get_index(file.index() as usize).map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
