//! dsgrid - grid state and reconciliation for dataset-bound grids
//!
//! This crate sits between a rendering widget and the hosting platform's
//! dataset. It derives the display columns, resolves what each cell shows,
//! and tracks the user's pending edits until they are saved or discarded.
//!
//! # Architecture
//!
//! ```text
//! Rendering widget
//!     ↓  callbacks / GridEvent subscriptions
//! DatasetGrid (this crate)
//!     ↓  DataProvider / Record / HostServices
//! Hosting platform dataset (dsgrid-core traits)
//! ```
//!
//! # Models
//!
//! - [`columns`] - Column derivation and asynchronous metadata refresh
//! - [`changes`] - Edit ledger and [`ChangeTracker`]
//! - [`filtering`] - Per-column filter conditions
//! - [`SortingModel`], [`AggregationModel`], [`GroupingModel`] - Query expressions
//! - [`binding`] - Cell snapshots and the render-skip comparator
//! - [`SelectionModel`], [`EditColumnsModel`], [`ViewSwitcherModel`]
//! - [`GridState`] - Persisted state
//!
//! All of them are owned by [`DatasetGrid`].

pub mod aggregation;
pub mod binding;
pub mod changes;
pub mod columns;
pub mod config;
pub mod edit_columns;
pub mod events;
pub mod filtering;
mod grid;
pub mod loading;
pub mod logging;
pub mod selection;
pub mod sorting;
pub mod state;
pub mod view_switcher;

pub use aggregation::{AggregationModel, GroupingModel, SummaryContext};
pub use binding::{CellBindingResolver, CellMode, CellSnapshot, cell_snapshots_equal};
pub use changes::{ChangeTracker, RecordChanges, SaveSummary};
pub use columns::{ColumnSet, GridColumn, RefreshOutcome};
pub use config::{GridConfig, SelectionMode};
pub use edit_columns::EditColumnsModel;
pub use events::{EventEmitter, GridEvent, SubscriptionId};
pub use filtering::{Condition, ConditionState, Filtering};
pub use grid::*;
pub use selection::{CheckState, SelectionModel};
pub use sorting::SortingModel;
pub use state::GridState;
pub use view_switcher::ViewSwitcherModel;

pub use dsgrid_core;
