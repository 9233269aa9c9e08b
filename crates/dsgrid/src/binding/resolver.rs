use dsgrid_core::{Record, RecordCommand, Value};
use indexmap::IndexMap;
use std::sync::Arc;

use super::controls::{CellMode, ControlRegistry};
use super::formatting::{FormattingProvider, RowTheme, resolve_formatting};
use super::notifications::{NotificationProvider, collect_notifications};
use super::snapshot::{CellControl, CellParameter, CellSnapshot};
use crate::aggregation::SummaryContext;
use crate::columns::GridColumn;
use crate::config::GridConfig;

/// Per-render inputs that do not come from the record or the column
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub summary: &'a SummaryContext,
    /// Position on the page, for zebra striping
    pub row_index: usize,
    /// The record or the whole grid is being saved
    pub is_saving: bool,
    /// The dataset is re-fetching its page
    pub is_page_loading: bool,
    /// Resolved record commands, `None` while still loading
    pub commands: Option<&'a [RecordCommand]>,
}

/// Computes cell snapshots
pub struct CellBindingResolver {
    config: Arc<GridConfig>,
    controls: ControlRegistry,
    theme: RowTheme,
    notifications: Option<Arc<dyn NotificationProvider>>,
    formatting: Option<Arc<dyn FormattingProvider>>,
}

impl CellBindingResolver {
    pub fn new(config: Arc<GridConfig>) -> Self {
        Self {
            config,
            controls: ControlRegistry::default(),
            theme: RowTheme::default(),
            notifications: None,
            formatting: None,
        }
    }

    pub fn with_controls(mut self, controls: ControlRegistry) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_theme(mut self, theme: RowTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_notification_provider(mut self, provider: Arc<dyn NotificationProvider>) -> Self {
        self.notifications = Some(provider);
        self
    }

    pub fn with_formatting_provider(mut self, provider: Arc<dyn FormattingProvider>) -> Self {
        self.formatting = Some(provider);
        self
    }

    pub fn set_config(&mut self, config: Arc<GridConfig>) {
        self.config = config;
    }

    pub fn resolve(
        &self,
        record: &dyn Record,
        column: &GridColumn,
        requested: CellMode,
        context: &CellContext<'_>,
    ) -> CellSnapshot {
        let record_id = record.id();
        let summarization = record.summarization_type();
        let summary_row = summarization.is_summary();
        let reduced = summary_row && !context.summary.renders_on_summary(&column.name);
        let validation = if summary_row {
            Default::default()
        } else {
            record.validation(&column.name)
        };
        let is_editable = column.editable_for(summarization)
            && validation.security_editable != Some(false)
            && !context.is_saving
            && !context.is_page_loading;

        let mode = if !is_editable {
            CellMode::Display
        } else if self.config.is_one_click_edit(&column.name) {
            CellMode::Editing
        } else {
            requested
        };

        let value = record.value(&column.name);
        let aggregated_value = (summary_row && context.summary.aggregated.contains(&column.name))
            .then(|| value.clone());

        let control = (!reduced).then(|| {
            let overrides = self
                .config
                .column_override(&column.name)
                .map(|o| &o.controls);
            CellControl {
                descriptor: self.controls.resolve(column, mode, overrides),
                mode,
            }
        });

        let custom_formatting = self
            .formatting
            .as_ref()
            .and_then(|provider| provider.formatting(record, column));
        let formatting = resolve_formatting(
            &self.theme,
            context.row_index,
            self.config.enable_zebra,
            custom_formatting,
        );

        let custom_notifications = self
            .notifications
            .as_ref()
            .map(|provider| provider.notifications(record, column))
            .unwrap_or_default();
        let notifications =
            collect_notifications(column, &validation, summarization, custom_notifications);

        let is_loading = record.is_loading(&column.name)
            || (column.is_action() && context.commands.is_none());

        let mut parameters = IndexMap::new();
        if let Some(control) = &control {
            for (key, value) in &control.descriptor.parameters {
                parameters.insert(key.clone(), CellParameter::Value(value.clone()));
            }
            parameters.insert("dataset".to_string(), CellParameter::Dataset);
            parameters.insert("record".to_string(), CellParameter::Record(record_id.clone()));
            parameters.insert("column".to_string(), CellParameter::Column(column.name.clone()));
        }
        if column.is_action() {
            if let Some(commands) = context.commands {
                let commands = serde_json::to_value(commands).unwrap_or_default();
                parameters.insert("commands".to_string(), CellParameter::Value(Value::Json(commands)));
            }
        }

        CellSnapshot {
            formatted_value: record.formatted_value(&column.name),
            value,
            aggregated_value,
            height: self.config.default_row_height,
            alignment: column.alignment,
            parameters,
            notifications,
            is_saving: context.is_saving,
            formatting,
            control,
            has_error: validation.error,
            error_message: validation.error_message,
            is_editable,
            is_loading,
            record_id,
            column: column.name.clone(),
        }
    }
}
