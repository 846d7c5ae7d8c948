//! Shared test helpers
//!
//! - `model_helpers` - file unit builders and node lookups
//! - `resolve_assertions` - assertions over resolver answers

#![allow(dead_code)]

pub mod model_helpers;
pub mod resolve_assertions;
