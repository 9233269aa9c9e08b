//! Display columns
//!
//! [`derive_columns`] turns the dataset's raw columns and their platform
//! metadata into the grid's [`ColumnSet`]. [`ColumnController`] drives the
//! asynchronous metadata fetches and keeps the latest derivation.

mod controller;
mod deriver;

pub use controller::*;
pub use deriver::*;

use dsgrid_core::{
    AggregationFunction, Alignment, ColumnMetadata, DataType, SummarizationType,
};
use serde::Serialize;

/// Name of the synthetic selection checkbox column
pub const CHECKBOX_COLUMN: &str = "__checkbox";

/// Fixed width of the checkbox column
pub const CHECKBOX_COLUMN_WIDTH: f32 = 40.0;

/// A column as the grid presents it
///
/// Capability flags are computed by [`derive_columns`] and never edited in
/// place; a new derivation replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub name: String,
    pub display_name: String,
    pub data_type: DataType,
    pub alignment: Alignment,
    pub visual_size_factor: f32,
    pub order: i32,
    pub is_editable: bool,
    pub is_required: bool,
    pub is_filterable: bool,
    pub is_sortable: bool,
    pub is_resizable: bool,
    pub can_be_aggregated: bool,
    pub is_hidden: bool,
    pub is_virtual: bool,
    pub is_linked: bool,
    pub supported_aggregations: Vec<AggregationFunction>,
    #[serde(skip)]
    pub metadata: ColumnMetadata,
}

impl GridColumn {
    pub fn is_checkbox(&self) -> bool {
        self.name == CHECKBOX_COLUMN
    }

    /// The ribbon/record-commands column
    pub fn is_action(&self) -> bool {
        self.data_type == DataType::Action
    }

    /// Editability of this column on a record of the given kind
    ///
    /// Group header and total rows are never editable.
    pub fn editable_for(&self, summarization: SummarizationType) -> bool {
        self.is_editable && !summarization.is_summary()
    }

    /// Entity alias of a linked column
    pub fn entity_alias(&self) -> Option<&str> {
        dsgrid_core::entity_alias_of(&self.name)
    }

    /// Attribute name without the entity alias
    pub fn attribute_name(&self) -> &str {
        dsgrid_core::attribute_name_of(&self.name)
    }
}

/// An ordered, immutable set of derived columns
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ColumnSet {
    columns: Vec<GridColumn>,
}

impl ColumnSet {
    pub fn new(columns: Vec<GridColumn>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&GridColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridColumn> {
        self.columns.iter()
    }

    /// Columns the widget renders
    pub fn visible(&self) -> impl Iterator<Item = &GridColumn> {
        self.columns.iter().filter(|c| !c.is_hidden)
    }

    /// Data columns, without the synthetic checkbox
    pub fn data_columns(&self) -> impl Iterator<Item = &GridColumn> {
        self.columns.iter().filter(|c| !c.is_checkbox())
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
