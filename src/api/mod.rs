//! High-level pipeline API
//!
//! [`PatternQuantizer`] wraps the quantize -> usage -> prune refinement
//! pipeline behind a fluent builder; [`Error`] unifies the crate's error
//! types for `?` propagation in application code.

mod builder;
mod error;

pub use builder::{Pattern, PatternQuantizer};
pub use error::Error;
