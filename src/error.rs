//! Error types for model construction and merging.
//!
//! Resolution never fails: an unresolvable name is an empty match list.
//! The errors here are precondition violations of the input contract.

use thiserror::Error;

use crate::model::StatementId;

/// Errors raised while building or merging a [`CodeModel`](crate::model::CodeModel).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A named declaration arrived without a name.
    #[error("{kind} without a name in {file}")]
    MissingName { kind: &'static str, file: String },

    /// An alias or import target has no name segments.
    #[error("empty {kind} target in {file}")]
    EmptyChain { kind: &'static str, file: String },

    /// A merge operand is not a namespace.
    #[error("cannot merge {0:?}: not a namespace")]
    NotANamespace(StatementId),

    /// A merge request that can never be satisfied.
    #[error("invalid merge: {0}")]
    InvalidMerge(String),

    /// A language front-end failed to translate its input.
    #[error("front-end error: {0}")]
    FrontEnd(String),
}

impl ModelError {
    /// Create a missing-name error.
    pub fn missing_name(kind: &'static str, file: impl Into<String>) -> Self {
        Self::MissingName {
            kind,
            file: file.into(),
        }
    }

    /// Create an empty-chain error.
    pub fn empty_chain(kind: &'static str, file: impl Into<String>) -> Self {
        Self::EmptyChain {
            kind,
            file: file.into(),
        }
    }

    /// Create an invalid-merge error.
    pub fn invalid_merge(message: impl Into<String>) -> Self {
        Self::InvalidMerge(message.into())
    }

    /// Create a front-end error.
    pub fn front_end(message: impl Into<String>) -> Self {
        Self::FrontEnd(message.into())
    }
}

/// Result type for model construction.
pub type Result<T> = std::result::Result<T, ModelError>;
