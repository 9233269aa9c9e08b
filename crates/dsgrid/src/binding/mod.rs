//! Cell binding
//!
//! Resolves what a cell shows and how, from its record, its column and the
//! ambient mode, into a [`CellSnapshot`]. Snapshots compare with
//! [`cell_snapshots_equal`] so the widget can skip re-mounting nested controls.

mod controls;
mod formatting;
mod notifications;
mod resolver;
mod snapshot;

pub use controls::*;
pub use formatting::*;
pub use notifications::*;
pub use resolver::*;
pub use snapshot::*;
