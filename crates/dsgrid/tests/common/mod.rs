//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use dsgrid::GridConfig;
use dsgrid::config::SelectionMode;
use dsgrid_core::{
    AggregationExpression, ColumnMetadata, DataProvider, FieldChange, FilterExpression,
    GridError, HostServices, LinkedEntity, Paging, RawColumn, Record, RecordCommand, RecordId,
    Result, SavedQuery, SortStatus, SummarizationType, ValidationInfo, Value,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Mock record with a loaded and a current value per column.
///
/// Diffs are every column whose current value differs from the loaded one,
/// whoever changed it, like a real dataset record.
pub struct MockRecord {
    pub id: RecordId,
    pub summarization: SummarizationType,
    loaded: Mutex<IndexMap<String, Value>>,
    current: Mutex<IndexMap<String, Value>>,
    /// Columns that report a validation error while their value equals the key
    pub invalid_values: Mutex<HashMap<String, (Value, String)>>,
    pub read_only_columns: HashSet<String>,
    pub save_error: Mutex<Option<String>>,
    pub save_count: Arc<Mutex<usize>>,
}

impl MockRecord {
    pub fn new(id: &str) -> Self {
        Self {
            id: RecordId::from(id),
            summarization: SummarizationType::None,
            loaded: Mutex::new(IndexMap::new()),
            current: Mutex::new(IndexMap::new()),
            invalid_values: Mutex::new(HashMap::new()),
            read_only_columns: HashSet::new(),
            save_error: Mutex::new(None),
            save_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_value(self, column: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.loaded.lock().insert(column.to_string(), value.clone());
        self.current.lock().insert(column.to_string(), value);
        self
    }

    pub fn with_summarization(mut self, summarization: SummarizationType) -> Self {
        self.summarization = summarization;
        self
    }

    /// Report a validation error whenever `column` holds `value`
    pub fn with_invalid_value(self, column: &str, value: impl Into<Value>, message: &str) -> Self {
        self.invalid_values
            .lock()
            .insert(column.to_string(), (value.into(), message.to_string()));
        self
    }

    pub fn with_read_only(mut self, column: &str) -> Self {
        self.read_only_columns.insert(column.to_string());
        self
    }

    pub fn fail_saves(&self, message: Option<&str>) {
        *self.save_error.lock() = message.map(str::to_string);
    }

    /// Change a value without going through the grid, like a form script would
    pub fn set_programmatic(&self, column: &str, value: impl Into<Value>) {
        self.current.lock().insert(column.to_string(), value.into());
    }

    pub fn loaded_value(&self, column: &str) -> Value {
        self.loaded.lock().get(column).cloned().unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        *self.save_count.lock()
    }
}

#[async_trait]
impl Record for MockRecord {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn value(&self, column: &str) -> Value {
        self.current.lock().get(column).cloned().unwrap_or_default()
    }

    fn formatted_value(&self, column: &str) -> Option<String> {
        self.current.lock().get(column).map(|v| v.to_string())
    }

    fn set_value(&self, column: &str, value: Value) -> Result<()> {
        self.current.lock().insert(column.to_string(), value);
        Ok(())
    }

    fn validation(&self, column: &str) -> ValidationInfo {
        let mut info = match self.invalid_values.lock().get(column) {
            Some((value, message)) if *value == self.value(column) => {
                ValidationInfo::invalid(message.clone())
            }
            _ => ValidationInfo::valid(),
        };
        if self.read_only_columns.contains(column) {
            info.security_editable = Some(false);
        }
        info
    }

    fn changes(&self, column: Option<&str>) -> Vec<FieldChange> {
        let loaded = self.loaded.lock();
        self.current
            .lock()
            .iter()
            .filter(|(name, _)| column.is_none_or(|wanted| wanted == name.as_str()))
            .filter_map(|(name, value)| {
                let old = loaded.get(name).cloned().unwrap_or_default();
                (old != *value).then(|| FieldChange::new(name.as_str(), old, value.clone()))
            })
            .collect()
    }

    fn clear_changes(&self, column: Option<&str>) {
        let loaded = self.loaded.lock().clone();
        let mut current = self.current.lock();
        match column {
            Some(column) => {
                let value = loaded.get(column).cloned().unwrap_or_default();
                current.insert(column.to_string(), value);
            }
            None => *current = loaded,
        }
    }

    async fn save(&self) -> Result<()> {
        *self.save_count.lock() += 1;
        if let Some(message) = self.save_error.lock().clone() {
            return Err(GridError::Provider(message));
        }
        *self.loaded.lock() = self.current.lock().clone();
        Ok(())
    }

    fn summarization_type(&self) -> SummarizationType {
        self.summarization
    }
}

/// Mock dataset for testing grid logic without a host platform.
///
/// Query state is stored as-is; call logs record every commit so tests can
/// assert one `set_filtering` and one `refresh` per user action.
pub struct MockProvider {
    pub columns: Mutex<Vec<RawColumn>>,
    pub metadata: Mutex<HashMap<String, ColumnMetadata>>,
    pub metadata_failures: Mutex<HashSet<String>>,
    pub records: Mutex<IndexMap<RecordId, Arc<MockRecord>>>,
    pub filtering: Mutex<FilterExpression>,
    pub sorting: Mutex<Vec<SortStatus>>,
    pub aggregations: Mutex<Vec<AggregationExpression>>,
    pub grouping: Mutex<Vec<String>>,
    pub linking: Mutex<Vec<LinkedEntity>>,
    pub paging: Mutex<Paging>,
    pub search_query: Mutex<Option<String>>,
    pub selected: Mutex<Vec<RecordId>>,
    pub views: Vec<SavedQuery>,
    pub current_view: Mutex<Option<Uuid>>,
    pub commands: HashMap<RecordId, Vec<RecordCommand>>,
    pub commands_fail: bool,
    pub loading: Mutex<bool>,
    /// Every value passed to `set_error`, in order
    pub error_log: Arc<Mutex<Vec<Option<String>>>>,
    pub refresh_count: Arc<Mutex<usize>>,
    pub set_filtering_count: Arc<Mutex<usize>>,
    pub set_columns_count: Arc<Mutex<usize>>,
    pub metadata_log: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            columns: Mutex::new(Vec::new()),
            metadata: Mutex::new(HashMap::new()),
            metadata_failures: Mutex::new(HashSet::new()),
            records: Mutex::new(IndexMap::new()),
            filtering: Mutex::new(FilterExpression::default()),
            sorting: Mutex::new(Vec::new()),
            aggregations: Mutex::new(Vec::new()),
            grouping: Mutex::new(Vec::new()),
            linking: Mutex::new(Vec::new()),
            paging: Mutex::new(Paging::default()),
            search_query: Mutex::new(None),
            selected: Mutex::new(Vec::new()),
            views: Vec::new(),
            current_view: Mutex::new(None),
            commands: HashMap::new(),
            commands_fail: false,
            loading: Mutex::new(false),
            error_log: Arc::new(Mutex::new(Vec::new())),
            refresh_count: Arc::new(Mutex::new(0)),
            set_filtering_count: Arc::new(Mutex::new(0)),
            set_columns_count: Arc::new(Mutex::new(0)),
            metadata_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a column whose metadata allows updates
    pub fn with_column(self, column: RawColumn) -> Self {
        let metadata = ColumnMetadata {
            is_valid_for_update: Some(true),
            ..Default::default()
        };
        self.with_column_metadata(column, metadata)
    }

    pub fn with_column_metadata(self, column: RawColumn, metadata: ColumnMetadata) -> Self {
        self.metadata.lock().insert(column.name.clone(), metadata);
        self.columns.lock().push(column);
        self
    }

    pub fn with_metadata_failure(self, column: &str) -> Self {
        self.metadata_failures.lock().insert(column.to_string());
        self
    }

    pub fn with_record(self, record: MockRecord) -> Self {
        self.records.lock().insert(record.id.clone(), Arc::new(record));
        self
    }

    pub fn with_filter(self, filter: FilterExpression) -> Self {
        *self.filtering.lock() = filter;
        self
    }

    pub fn with_view(mut self, view: SavedQuery) -> Self {
        self.views.push(view);
        self
    }

    pub fn with_current_view(self, id: Uuid) -> Self {
        *self.current_view.lock() = Some(id);
        self
    }

    pub fn with_commands(mut self, id: &str, commands: Vec<RecordCommand>) -> Self {
        self.commands.insert(RecordId::from(id), commands);
        self
    }

    pub fn with_linked_entity(self, entity: LinkedEntity) -> Self {
        self.linking.lock().push(entity);
        self
    }

    pub fn with_grouping(self, columns: &[&str]) -> Self {
        *self.grouping.lock() = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn mock_record(&self, id: &str) -> Arc<MockRecord> {
        self.records.lock()[&RecordId::from(id)].clone()
    }

    pub fn set_loading(&self, loading: bool) {
        *self.loading.lock() = loading;
    }

    pub fn refresh_count(&self) -> usize {
        *self.refresh_count.lock()
    }

    pub fn set_filtering_count(&self) -> usize {
        *self.set_filtering_count.lock()
    }

    pub fn set_columns_count(&self) -> usize {
        *self.set_columns_count.lock()
    }

    pub fn error_log(&self) -> Vec<Option<String>> {
        self.error_log.lock().clone()
    }

    pub fn metadata_log(&self) -> Vec<String> {
        self.metadata_log.lock().clone()
    }
}

#[async_trait]
impl DataProvider for MockProvider {
    fn columns(&self) -> Vec<RawColumn> {
        self.columns.lock().clone()
    }

    fn set_columns(&self, columns: Vec<RawColumn>) {
        *self.set_columns_count.lock() += 1;
        *self.columns.lock() = columns;
    }

    async fn column_metadata(&self, column_name: &str) -> Result<ColumnMetadata> {
        self.metadata_log.lock().push(column_name.to_string());
        if self.metadata_failures.lock().contains(column_name) {
            return Err(GridError::Metadata {
                column: column_name.to_string(),
                message: "attribute not found".to_string(),
            });
        }
        Ok(self
            .metadata
            .lock()
            .get(column_name)
            .cloned()
            .unwrap_or_default())
    }

    fn record_ids(&self) -> Vec<RecordId> {
        self.records.lock().keys().cloned().collect()
    }

    fn record(&self, id: &RecordId) -> Option<Arc<dyn Record>> {
        self.records
            .lock()
            .get(id)
            .map(|record| record.clone() as Arc<dyn Record>)
    }

    fn filtering(&self) -> FilterExpression {
        self.filtering.lock().clone()
    }

    fn set_filtering(&self, filter: FilterExpression) {
        *self.set_filtering_count.lock() += 1;
        *self.filtering.lock() = filter;
    }

    fn sorting(&self) -> Vec<SortStatus> {
        self.sorting.lock().clone()
    }

    fn set_sorting(&self, sorting: Vec<SortStatus>) {
        *self.sorting.lock() = sorting;
    }

    fn aggregations(&self) -> Vec<AggregationExpression> {
        self.aggregations.lock().clone()
    }

    fn set_aggregations(&self, aggregations: Vec<AggregationExpression>) {
        *self.aggregations.lock() = aggregations;
    }

    fn grouping(&self) -> Vec<String> {
        self.grouping.lock().clone()
    }

    fn set_grouping(&self, columns: Vec<String>) {
        *self.grouping.lock() = columns;
    }

    fn linking(&self) -> Vec<LinkedEntity> {
        self.linking.lock().clone()
    }

    fn add_linked_entity(&self, entity: LinkedEntity) {
        self.linking.lock().push(entity);
    }

    fn paging(&self) -> Paging {
        *self.paging.lock()
    }

    fn set_paging(&self, paging: Paging) {
        *self.paging.lock() = paging;
    }

    fn search_query(&self) -> Option<String> {
        self.search_query.lock().clone()
    }

    fn set_search_query(&self, query: Option<String>) {
        *self.search_query.lock() = query;
    }

    fn refresh(&self) {
        *self.refresh_count.lock() += 1;
    }

    fn set_error(&self, message: Option<String>) {
        self.error_log.lock().push(message);
    }

    fn is_loading(&self) -> bool {
        *self.loading.lock()
    }

    fn selected_record_ids(&self) -> Vec<RecordId> {
        self.selected.lock().clone()
    }

    fn set_selected_record_ids(&self, ids: Vec<RecordId>) {
        *self.selected.lock() = ids;
    }

    async fn saved_queries(&self) -> Result<Vec<SavedQuery>> {
        Ok(self.views.clone())
    }

    fn current_view_id(&self) -> Option<Uuid> {
        *self.current_view.lock()
    }

    fn set_view(&self, view_id: Uuid) {
        *self.current_view.lock() = Some(view_id);
    }

    async fn record_commands(&self, id: &RecordId) -> Result<Vec<RecordCommand>> {
        if self.commands_fail {
            return Err(GridError::Provider("commands unavailable".to_string()));
        }
        Ok(self.commands.get(id).cloned().unwrap_or_default())
    }
}

/// Host that records every error dialog it is asked to open
#[derive(Default)]
pub struct MockHost {
    pub dialogs: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn dialogs(&self) -> Vec<(String, Vec<String>)> {
        self.dialogs.lock().clone()
    }
}

impl HostServices for MockHost {
    fn open_error_dialog(&self, title: &str, messages: &[String]) {
        self.dialogs
            .lock()
            .push((title.to_string(), messages.to_vec()));
    }
}

/// Config without the checkbox column, so column indices match the dataset
pub fn plain_config() -> GridConfig {
    GridConfig {
        selection_type: SelectionMode::None,
        ..Default::default()
    }
}

/// The three-column dataset used across scenarios
pub fn invoice_provider() -> MockProvider {
    use dsgrid_core::DataType;

    MockProvider::new()
        .with_column(RawColumn::new("name", DataType::Text))
        .with_column(RawColumn::new("amount", DataType::Currency))
        .with_column(RawColumn::new("status", DataType::OptionSet))
        .with_record(
            MockRecord::new("r1")
                .with_value("name", "Contoso")
                .with_value("amount", Value::Int(100))
                .with_value("status", Value::Int(1)),
        )
        .with_record(
            MockRecord::new("r2")
                .with_value("name", "Fabrikam")
                .with_value("amount", Value::Int(250))
                .with_value("status", Value::Int(2)),
        )
}

/// Collects every event the grid emits
pub fn record_events(grid: &dsgrid::DatasetGrid) -> Arc<Mutex<Vec<dsgrid::GridEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    grid.subscribe(move |event| sink.lock().push(event.clone()));
    events
}
