//! Pending edits

mod ledger;
mod tracker;

pub use ledger::*;
pub use tracker::*;
