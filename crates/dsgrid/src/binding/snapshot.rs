use dsgrid_core::{Alignment, RecordId, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use super::controls::CellMode;
use super::formatting::CellFormatting;
use super::notifications::CellNotification;
use crate::config::ControlDescriptor;

/// Callback handed to a nested control
pub type CellCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// One parameter passed to the cell's control
#[derive(Clone)]
pub enum CellParameter {
    Value(Value),
    /// Reference to the dataset the grid is bound to
    Dataset,
    Record(RecordId),
    Column(String),
    Callback(CellCallback),
}

impl CellParameter {
    /// Plain data, as opposed to references and callbacks
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Debug for CellParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Dataset => f.write_str("Dataset"),
            Self::Record(id) => f.debug_tuple("Record").field(id).finish(),
            Self::Column(name) => f.debug_tuple("Column").field(name).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// The mounted control and the mode it runs in
#[derive(Debug, Clone, PartialEq)]
pub struct CellControl {
    pub descriptor: ControlDescriptor,
    pub mode: CellMode,
}

/// Everything the widget needs to render one cell
#[derive(Debug, Clone)]
pub struct CellSnapshot {
    pub record_id: RecordId,
    pub column: String,
    pub value: Value,
    pub formatted_value: Option<String>,
    /// Aggregate shown on group header and total rows
    pub aggregated_value: Option<Value>,
    pub height: u32,
    pub alignment: Alignment,
    pub parameters: IndexMap<String, CellParameter>,
    pub notifications: Vec<CellNotification>,
    pub is_saving: bool,
    pub formatting: CellFormatting,
    /// `None` on the reduced summary-row path
    pub control: Option<CellControl>,
    pub has_error: bool,
    pub error_message: Option<String>,
    pub is_editable: bool,
    pub is_loading: bool,
}

impl CellSnapshot {
    pub fn is_editing(&self) -> bool {
        self.control
            .as_ref()
            .is_some_and(|control| control.mode == CellMode::Editing)
    }

    pub fn notification_ids(&self) -> impl Iterator<Item = &str> {
        self.notifications.iter().map(|n| n.id.as_str())
    }

    fn data_parameters(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.parameters.iter().filter_map(|(key, parameter)| match parameter {
            CellParameter::Value(value) => Some((key, value)),
            _ => None,
        })
    }
}

/// Whether a cell can skip re-mounting its control
///
/// Compares what the control renders from. Dataset, record and column
/// references and callbacks are rebuilt on every resolve and are skipped, as
/// are the nested component overrides of the theme.
pub fn cell_snapshots_equal(a: &CellSnapshot, b: &CellSnapshot) -> bool {
    a.value == b.value
        && a.formatted_value == b.formatted_value
        && a.aggregated_value == b.aggregated_value
        && a.height == b.height
        && a.alignment == b.alignment
        && a.data_parameters().eq(b.data_parameters())
        && a.notification_ids().eq(b.notification_ids())
        && a.is_saving == b.is_saving
        && a.formatting.same_appearance(&b.formatting)
        && a.control == b.control
        && a.has_error == b.has_error
        && a.error_message == b.error_message
        && a.is_editable == b.is_editable
        && a.is_loading == b.is_loading
}

impl PartialEq for CellSnapshot {
    fn eq(&self, other: &Self) -> bool {
        cell_snapshots_equal(self, other)
    }
}
