//! dsgrid core - domain vocabulary and collaborator contracts
//!
//! This crate provides the types and traits that the grid core builds on.
//! It defines:
//!
//! - `DataProvider` - Trait for the dataset/data-provider collaborator
//! - `Record` - Trait for a single record owned by the provider
//! - `HostServices` - Trait for host surfaces (error dialogs)
//! - Common types like `Value`, `DataType`, `RawColumn`, filter/sort expressions

mod data_type;
mod error;
mod expression;
mod host;
mod metadata;
mod provider;
mod types;

pub use data_type::*;
pub use error::*;
pub use expression::*;
pub use host::*;
pub use metadata::*;
pub use provider::*;
pub use types::*;
