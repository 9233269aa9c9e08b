//! The grid facade
//!
//! [`DatasetGrid`] owns every model for one mounted grid and routes widget
//! callbacks to them. It never renders; the widget reads columns and cell
//! snapshots and subscribes to [`GridEvent`]s to know when to read again.

use dsgrid_core::{
    DataProvider, GridError, HostServices, RecordCommand, RecordId, Result, Value,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::aggregation::{AggregationModel, GroupingModel, SummaryContext};
use crate::binding::{CellBindingResolver, CellContext, CellMode, CellParameter, CellSnapshot};
use crate::changes::{ChangeTracker, RecordChanges, SaveSummary};
use crate::columns::{ColumnController, ColumnSet, GridColumn, RefreshOutcome};
use crate::config::GridConfig;
use crate::edit_columns::EditColumnsModel;
use crate::events::{EventEmitter, GridEvent, SubscriptionId};
use crate::filtering::Filtering;
use crate::loading::LoadingFlags;
use crate::selection::SelectionModel;
use crate::sorting::SortingModel;
use crate::state::GridState;
use crate::view_switcher::ViewSwitcherModel;

/// Parameter key of the value-change callback handed to editing controls
pub const ON_CHANGE_PARAMETER: &str = "onChange";

pub struct DatasetGrid {
    provider: Arc<dyn DataProvider>,
    config: RwLock<Arc<GridConfig>>,
    mounted: Arc<AtomicBool>,
    loading: Arc<LoadingFlags>,
    events: Arc<EventEmitter<GridEvent>>,
    columns: ColumnController,
    tracker: Arc<ChangeTracker>,
    filtering: Filtering,
    selection: RwLock<Arc<SelectionModel>>,
    resolver: RwLock<CellBindingResolver>,
    commands: Mutex<HashMap<RecordId, Vec<RecordCommand>>>,
}

impl DatasetGrid {
    pub fn new(
        provider: Arc<dyn DataProvider>,
        host: Arc<dyn HostServices>,
        config: GridConfig,
    ) -> Self {
        let config = Arc::new(config);
        let mounted = Arc::new(AtomicBool::new(true));
        let loading = LoadingFlags::new();
        let events = Arc::new(EventEmitter::new());
        let tracker = Arc::new(ChangeTracker::new(
            provider.clone(),
            host,
            loading.clone(),
            events.clone(),
        ));
        let selection = SelectionModel::new(provider.clone(), config.selection_type, events.clone());

        Self {
            columns: ColumnController::new(mounted.clone()),
            filtering: Filtering::new(provider.clone(), events.clone()),
            selection: RwLock::new(Arc::new(selection)),
            resolver: RwLock::new(CellBindingResolver::new(config.clone())),
            commands: Mutex::new(HashMap::new()),
            config: RwLock::new(config),
            provider,
            mounted,
            loading,
            events,
            tracker,
        }
    }

    /// Customize cell resolution: control registry, theme, notification and
    /// formatting providers
    pub fn with_resolver(
        self,
        configure: impl FnOnce(CellBindingResolver) -> CellBindingResolver,
    ) -> Self {
        let config = self.config();
        let resolver = configure(CellBindingResolver::new(config));
        *self.resolver.write() = resolver;
        self
    }

    pub fn provider(&self) -> &Arc<dyn DataProvider> {
        &self.provider
    }

    pub fn config(&self) -> Arc<GridConfig> {
        self.config.read().clone()
    }

    /// Replace the configuration and re-derive columns from cached metadata
    pub fn set_config(&self, config: GridConfig) {
        let config = Arc::new(config);
        let selection_changed = self.config.read().selection_type != config.selection_type;
        *self.config.write() = config.clone();
        self.resolver.write().set_config(config.clone());
        if selection_changed {
            let selection =
                SelectionModel::new(self.provider.clone(), config.selection_type, self.events.clone());
            *self.selection.write() = Arc::new(selection);
        }
        if self.columns.derive(&config) {
            self.events.emit(&GridEvent::ColumnsChanged);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Stop applying asynchronous results
    ///
    /// In-flight metadata and command fetches complete but their results are
    /// dropped.
    pub fn unmount(&self) {
        if self.mounted.swap(false, Ordering::SeqCst) {
            tracing::debug!("Grid unmounted");
        }
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(GridError::Unmounted)
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&GridEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Re-read the dataset's columns and their metadata
    #[tracing::instrument(skip(self))]
    pub async fn refresh_columns(&self) -> Result<RefreshOutcome> {
        self.ensure_mounted()?;
        let config = self.config();
        let outcome = self.columns.refresh(self.provider.as_ref(), &config).await;
        if outcome == (RefreshOutcome::Applied { changed: true }) {
            self.events.emit(&GridEvent::ColumnsChanged);
        }
        Ok(outcome)
    }

    pub fn columns(&self) -> ColumnSet {
        self.columns.columns()
    }

    pub fn column(&self, name: &str) -> Result<GridColumn> {
        self.columns
            .columns()
            .get(name)
            .cloned()
            .ok_or_else(|| GridError::NotFound(format!("column '{}'", name)))
    }

    /// Compute the render state of one cell
    pub fn resolve_cell(
        &self,
        record_id: &RecordId,
        column: &str,
        mode: CellMode,
        row_index: usize,
    ) -> Result<CellSnapshot> {
        let column = self.column(column)?;
        let record = self
            .provider
            .record(record_id)
            .ok_or_else(|| GridError::NotFound(format!("record {}", record_id)))?;
        let summary = SummaryContext::from_provider(self.provider.as_ref());

        let commands = self.commands.lock();
        let context = CellContext {
            summary: &summary,
            row_index,
            is_saving: self.loading.is_record_locked(record_id),
            is_page_loading: self.provider.is_loading(),
            commands: commands.get(record_id).map(Vec::as_slice),
        };
        let mut snapshot = self
            .resolver
            .read()
            .resolve(record.as_ref(), &column, mode, &context);
        drop(commands);

        if snapshot.is_editable && snapshot.control.is_some() {
            let tracker = self.tracker.clone();
            let record_id = record_id.clone();
            let column = column.name.clone();
            snapshot.parameters.insert(
                ON_CHANGE_PARAMETER.to_string(),
                CellParameter::Callback(Arc::new(move |value: &Value| {
                    if let Err(e) = tracker.set_value(&record_id, &column, value.clone()) {
                        tracing::warn!(record_id = %record_id, column = %column, error = %e, "Edit rejected");
                    }
                })),
            );
        }
        Ok(snapshot)
    }

    /// Apply a user edit
    pub fn set_value(&self, record_id: &RecordId, column: &str, value: Value) -> Result<()> {
        self.ensure_mounted()?;
        let grid_column = self.column(column)?;
        let record = self
            .provider
            .record(record_id)
            .ok_or_else(|| GridError::NotFound(format!("record {}", record_id)))?;
        if !grid_column.editable_for(record.summarization_type()) {
            return Err(GridError::NotSupported(format!(
                "column '{}' is not editable",
                column
            )));
        }
        if record.validation(column).security_editable == Some(false) {
            return Err(GridError::NotSupported(format!(
                "no permission to edit column '{}' of record {}",
                column, record_id
            )));
        }
        drop(record);
        self.tracker.set_value(record_id, column, value)
    }

    pub fn changes(&self) -> Vec<RecordChanges> {
        self.tracker.get_changes()
    }

    pub fn tracker(&self) -> &Arc<ChangeTracker> {
        &self.tracker
    }

    pub async fn save(&self, record_id: &RecordId) -> Result<()> {
        self.ensure_mounted()?;
        self.tracker.save(record_id).await
    }

    pub async fn save_all(&self) -> Result<SaveSummary> {
        self.ensure_mounted()?;
        self.tracker.save_all().await
    }

    /// Discard pending edits for every record, one record or one cell
    pub fn discard(&self, record_id: Option<&RecordId>, column: Option<&str>) {
        self.tracker.clear_changes(record_id, column);
    }

    pub fn filtering(&self) -> &Filtering {
        &self.filtering
    }

    pub fn sorting(&self, column: &str) -> Result<SortingModel> {
        Ok(SortingModel::new(self.provider.clone(), self.column(column)?))
    }

    pub fn aggregation(&self, column: &str) -> Result<AggregationModel> {
        Ok(AggregationModel::new(self.provider.clone(), self.column(column)?))
    }

    pub fn grouping(&self, column: &str) -> Result<GroupingModel> {
        let enabled = self.config().grouping_enabled();
        Ok(GroupingModel::new(
            self.provider.clone(),
            self.column(column)?,
            enabled,
        ))
    }

    pub fn selection(&self) -> Arc<SelectionModel> {
        self.selection.read().clone()
    }

    pub fn edit_columns(&self) -> EditColumnsModel {
        EditColumnsModel::new(self.provider.clone())
    }

    pub fn view_switcher(&self) -> ViewSwitcherModel {
        ViewSwitcherModel::new(
            self.provider.clone(),
            self.tracker.clone(),
            self.events.clone(),
        )
    }

    /// Cached commands of a record, `None` until [`Self::load_commands`] finished
    pub fn commands(&self, record_id: &RecordId) -> Option<Vec<RecordCommand>> {
        self.commands.lock().get(record_id).cloned()
    }

    /// Fetch the action-column commands of a record
    #[tracing::instrument(skip(self, record_id), fields(record_id = %record_id))]
    pub async fn load_commands(&self, record_id: &RecordId) -> Result<Vec<RecordCommand>> {
        self.ensure_mounted()?;
        let commands = self.provider.record_commands(record_id).await?;
        if !self.is_mounted() {
            tracing::debug!("Grid unmounted, discarding record commands");
            return Err(GridError::Unmounted);
        }

        self.commands
            .lock()
            .insert(record_id.clone(), commands.clone());
        let action_columns: Vec<String> = self
            .columns()
            .iter()
            .filter(|c| c.is_action())
            .map(|c| c.name.clone())
            .collect();
        for column in action_columns {
            self.events.emit(&GridEvent::CellChanged {
                record_id: record_id.clone(),
                column,
            });
        }
        Ok(commands)
    }

    /// The dataset re-fetched its page
    ///
    /// Pending edits and cached commands belong to the old page and are dropped.
    pub fn on_dataset_refreshed(&self) {
        self.tracker.reset();
        self.commands.lock().clear();
        self.selection().sync();
        tracing::debug!("Dataset refreshed");
        self.events.emit(&GridEvent::Refreshed);
    }

    /// Current state for the host to persist
    pub fn state(&self) -> GridState {
        GridState::capture(self.provider.as_ref())
    }

    /// Restore a persisted dictionary; malformed entries are skipped
    pub fn restore_state(&self, stored: Option<&serde_json::Value>) -> bool {
        let applied = GridState::restore(stored).apply(self.provider.as_ref());
        if applied {
            self.selection().sync();
        }
        applied
    }
}
