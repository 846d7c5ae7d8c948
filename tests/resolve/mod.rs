//! Resolution tests
//!
//! Tests for binding uses to declarations over merged models:
//! - Lexical, member and inherited lookup
//! - Overloads, constructors and constructor initializers
//! - Imports, aliases and their visibility
//! - Expression types
//! - Batch reference indexing

mod tests_imports;
mod tests_reference_index;
