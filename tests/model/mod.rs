//! Model layer tests
//!
//! Tests for lowering file units into the arena and querying the tree:
//! - Full names and tree navigation
//! - Lowering contract and input validation
//! - Built-in types

mod tests_lowering;
