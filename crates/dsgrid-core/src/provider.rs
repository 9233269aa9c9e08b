//! Dataset and record contracts
//!
//! The grid never owns records or query state. Everything it reads or mutates
//! goes through these traits, implemented by the hosting platform's dataset.

use crate::{
    AggregationExpression, ColumnMetadata, FieldChange, FilterExpression, LinkedEntity,
    RawColumn, RecordId, Result, SortStatus, SummarizationType, ValidationInfo, Value,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A single record, owned and mutated by the data provider
///
/// Implementations use interior mutability; the grid only ever holds an
/// `Arc<dyn Record>` for the duration of a synchronous step and re-fetches it
/// from the provider after every await.
#[async_trait]
pub trait Record: Send + Sync {
    fn id(&self) -> RecordId;

    /// Raw value of a column
    fn value(&self, column: &str) -> Value;

    /// Display string of a column, if the provider formats it
    fn formatted_value(&self, column: &str) -> Option<String>;

    /// Write a value. The provider updates its own diff list.
    fn set_value(&self, column: &str, value: Value) -> Result<()>;

    /// Validation and field-security state of a column
    fn validation(&self, column: &str) -> ValidationInfo;

    /// Columns whose current value differs from the loaded one.
    ///
    /// The provider cannot tell user edits from programmatic ones.
    fn changes(&self, column: Option<&str>) -> Vec<FieldChange>;

    /// Revert to the loaded value, for one column or the whole record
    fn clear_changes(&self, column: Option<&str>);

    /// Persist the record's pending diffs
    async fn save(&self) -> Result<()>;

    fn summarization_type(&self) -> SummarizationType {
        SummarizationType::None
    }

    /// Whether the value of a column is still being fetched or formatted
    fn is_loading(&self, _column: &str) -> bool {
        false
    }
}

/// Paging state of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub page_size: u32,
    pub page_number: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_size: 25,
            page_number: 1,
        }
    }
}

/// A saved view the dataset can switch to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuery {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

impl SavedQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// A record-level command shown in the action column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCommand {
    pub command_name: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RecordCommand {
    pub fn new(command_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            label: label.into(),
            icon: None,
            is_enabled: true,
        }
    }
}

/// The dataset/data-provider collaborator
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Columns currently listed by the dataset
    fn columns(&self) -> Vec<RawColumn>;

    /// Replace the column set (edit-columns commit)
    fn set_columns(&self, columns: Vec<RawColumn>);

    /// Fetch platform metadata for one column
    async fn column_metadata(&self, column_name: &str) -> Result<ColumnMetadata>;

    /// Ids of the records on the current page, in display order
    fn record_ids(&self) -> Vec<RecordId>;

    fn record(&self, id: &RecordId) -> Option<Arc<dyn Record>>;

    fn filtering(&self) -> FilterExpression;
    fn set_filtering(&self, filter: FilterExpression);

    fn sorting(&self) -> Vec<SortStatus>;
    fn set_sorting(&self, sorting: Vec<SortStatus>);

    fn aggregations(&self) -> Vec<AggregationExpression>;
    fn set_aggregations(&self, aggregations: Vec<AggregationExpression>);

    /// Group-by column names
    fn grouping(&self) -> Vec<String>;
    fn set_grouping(&self, columns: Vec<String>);

    fn linking(&self) -> Vec<LinkedEntity>;
    fn add_linked_entity(&self, entity: LinkedEntity);

    fn paging(&self) -> Paging {
        Paging::default()
    }

    fn set_paging(&self, _paging: Paging) {}

    fn search_query(&self) -> Option<String> {
        None
    }

    fn set_search_query(&self, _query: Option<String>) {}

    /// Re-fetch the current page with the committed query expressions
    fn refresh(&self);

    /// Whether a page load is in flight
    fn is_loading(&self) -> bool {
        false
    }

    /// Set or clear the dataset-level error banner
    fn set_error(&self, message: Option<String>);

    fn selected_record_ids(&self) -> Vec<RecordId>;
    fn set_selected_record_ids(&self, ids: Vec<RecordId>);

    async fn saved_queries(&self) -> Result<Vec<SavedQuery>>;
    fn current_view_id(&self) -> Option<Uuid>;
    fn set_view(&self, view_id: Uuid);

    /// Commands available for a record in the action column
    async fn record_commands(&self, _id: &RecordId) -> Result<Vec<RecordCommand>> {
        Ok(Vec::new())
    }
}
