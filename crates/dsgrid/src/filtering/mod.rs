//! Column filters
//!
//! - [`operators`] classifies the platform condition operators
//! - [`codec`] encodes conditions into committed expressions and back
//! - [`Condition`] is one column's in-progress filter
//! - [`Filtering`] holds the open conditions and commits them

pub mod codec;
mod condition;
mod model;
pub mod operators;

pub use condition::*;
pub use model::*;
