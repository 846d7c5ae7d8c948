//! Merge engine tests
//!
//! Tests for combining per-file trees into one program model:
//! - Namespace and type unions
//! - Declaration/definition pairing across files
//! - Out-of-line definitions and placeholder namespaces
//! - Merge preconditions

mod tests_merge;
