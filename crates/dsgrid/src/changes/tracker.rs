use dsgrid_core::{
    DataProvider, FieldChange, GridError, HostServices, RecordId, Result, Value,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use super::EditLedger;
use crate::events::{EventEmitter, GridEvent};
use crate::loading::LoadingFlags;
use crate::logging::TimingGuard;

/// Net pending changes of one record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordChanges {
    pub record_id: RecordId,
    pub changes: Vec<FieldChange>,
}

/// Result of [`ChangeTracker::save_all`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveSummary {
    pub saved: Vec<RecordId>,
    /// Failed records with the provider's error message
    pub failed: Vec<(RecordId, String)>,
}

impl SaveSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Tracks edits the user made, on top of the provider's own diffs
///
/// The provider reports every column whose value differs from the loaded one,
/// whatever changed it. The ledger remembers which columns the user touched;
/// pending changes are the intersection of the two, recomputed on every read.
pub struct ChangeTracker {
    provider: Arc<dyn DataProvider>,
    host: Arc<dyn HostServices>,
    ledger: Mutex<EditLedger>,
    loading: Arc<LoadingFlags>,
    events: Arc<EventEmitter<GridEvent>>,
}

impl ChangeTracker {
    pub fn new(
        provider: Arc<dyn DataProvider>,
        host: Arc<dyn HostServices>,
        loading: Arc<LoadingFlags>,
        events: Arc<EventEmitter<GridEvent>>,
    ) -> Self {
        Self {
            provider,
            host,
            ledger: Mutex::new(EditLedger::default()),
            loading,
            events,
        }
    }

    /// Write a user edit through the provider and ledger it
    pub fn set_value(&self, record_id: &RecordId, column: &str, value: Value) -> Result<()> {
        if self.loading.is_record_locked(record_id) {
            return Err(GridError::NotSupported(format!(
                "record {} is being saved",
                record_id
            )));
        }
        if self.provider.is_loading() {
            return Err(GridError::NotSupported(
                "the dataset is loading its page".to_string(),
            ));
        }
        let record = self
            .provider
            .record(record_id)
            .ok_or_else(|| GridError::NotFound(format!("record {}", record_id)))?;

        record.set_value(column, value)?;

        let observed = record
            .changes(Some(column))
            .into_iter()
            .find(|change| change.column_name == column);
        self.ledger.lock().touch(record_id, column, observed);

        tracing::debug!(record_id = %record_id, column, "Cell edited");
        self.events.emit(&GridEvent::CellChanged {
            record_id: record_id.clone(),
            column: column.to_string(),
        });
        Ok(())
    }

    /// Whether the user touched this cell since the last save or discard
    pub fn is_touched(&self, record_id: &RecordId, column: &str) -> bool {
        self.ledger.lock().is_touched(record_id, column)
    }

    pub fn has_pending(&self) -> bool {
        !self.ledger.lock().is_empty()
    }

    /// No ledgered column reports a validation error
    ///
    /// `None` checks every tracked record.
    pub fn is_valid(&self, record_id: Option<&RecordId>) -> bool {
        let ledger = self.ledger.lock();
        let mut entries = ledger
            .iter()
            .filter(|(id, _)| record_id.is_none_or(|wanted| *id == wanted));

        entries.all(|(id, entry)| {
            let Some(record) = self.provider.record(id) else {
                return true;
            };
            entry
                .columns()
                .all(|column| !record.validation(column).error)
        })
    }

    /// Pending changes, recomputed against the provider's current diffs
    ///
    /// Records whose touched columns all reverted to their loaded value are omitted.
    pub fn get_changes(&self) -> Vec<RecordChanges> {
        let ledger = self.ledger.lock();
        ledger
            .iter()
            .filter_map(|(id, entry)| {
                let record = self.provider.record(id)?;
                let changes: Vec<FieldChange> = record
                    .changes(None)
                    .into_iter()
                    .filter(|change| entry.contains(&change.column_name))
                    .collect();
                (!changes.is_empty()).then(|| RecordChanges {
                    record_id: id.clone(),
                    changes,
                })
            })
            .collect()
    }

    pub fn change_count(&self) -> usize {
        self.get_changes().iter().map(|r| r.changes.len()).sum()
    }

    /// Discard pending edits
    ///
    /// With no record, every tracked record is reverted and the ledger emptied.
    /// With a record and no column, that record is reverted. With both, only
    /// that column is reverted and the record's other edits stay.
    pub fn clear_changes(&self, record_id: Option<&RecordId>, column: Option<&str>) {
        let mut ledger = self.ledger.lock();
        match (record_id, column) {
            (None, None) => {
                for id in ledger.record_ids() {
                    if let Some(record) = self.provider.record(&id) {
                        record.clear_changes(None);
                    }
                }
                ledger.clear();
                tracing::info!("Discarded all pending changes");
            }
            (None, Some(column)) => {
                for id in ledger.record_ids() {
                    if ledger.remove_column(&id, column) {
                        if let Some(record) = self.provider.record(&id) {
                            record.clear_changes(Some(column));
                        }
                    }
                }
                tracing::info!(column, "Discarded pending changes for column");
            }
            (Some(id), None) => {
                if let Some(record) = self.provider.record(id) {
                    record.clear_changes(None);
                }
                ledger.remove_record(id);
                tracing::info!(record_id = %id, "Discarded pending changes for record");
            }
            (Some(id), Some(column)) => {
                if let Some(record) = self.provider.record(id) {
                    record.clear_changes(Some(column));
                }
                ledger.remove_column(id, column);
                tracing::info!(record_id = %id, column, "Discarded pending change");
            }
        }
        drop(ledger);

        let event = match (record_id, column) {
            (Some(id), Some(column)) => GridEvent::CellChanged {
                record_id: id.clone(),
                column: column.to_string(),
            },
            (record_id, _) => GridEvent::ChangesDiscarded {
                record_id: record_id.cloned(),
            },
        };
        self.events.emit(&event);
    }

    /// Save one record
    ///
    /// On failure the pending edit is kept for retry or discard and the error
    /// is shown through the host's error dialog.
    #[tracing::instrument(skip(self, record_id), fields(record_id = %record_id))]
    pub async fn save(&self, record_id: &RecordId) -> Result<()> {
        if !self.is_valid(Some(record_id)) {
            return Err(GridError::Validation(format!(
                "record {} has invalid values",
                record_id
            )));
        }
        match self.save_record(record_id).await {
            Ok(()) => Ok(()),
            Err(message) => {
                self.host
                    .open_error_dialog("Save failed", std::slice::from_ref(&message));
                Err(GridError::Save {
                    record_id: record_id.to_string(),
                    message,
                })
            }
        }
    }

    /// Save every tracked record independently
    ///
    /// Refused while any pending edit is invalid. One record failing does not
    /// stop or roll back the others; failures are reported in one dialog and
    /// keep their pending edits.
    #[tracing::instrument(skip(self))]
    pub async fn save_all(&self) -> Result<SaveSummary> {
        if !self.is_valid(None) {
            return Err(GridError::Validation(
                "pending changes have invalid values".to_string(),
            ));
        }

        let _timing = TimingGuard::new("save_all");
        let ids = self.ledger.lock().record_ids();
        let guard = self.loading.grid_saving();
        self.events.emit(&GridEvent::LoadingChanged { loading: true });

        let mut summary = SaveSummary::default();
        for id in ids {
            match self.save_record(&id).await {
                Ok(()) => summary.saved.push(id),
                Err(message) => summary.failed.push((id, message)),
            }
        }

        drop(guard);
        self.events.emit(&GridEvent::LoadingChanged { loading: false });

        if !summary.failed.is_empty() {
            let title = format!(
                "{} succeeded, {} failed",
                summary.saved.len(),
                summary.failed.len()
            );
            let messages: Vec<String> = summary
                .failed
                .iter()
                .map(|(id, message)| format!("{}: {}", id, message))
                .collect();
            tracing::warn!(
                saved = summary.saved.len(),
                failed = summary.failed.len(),
                "Some records failed to save"
            );
            self.host.open_error_dialog(&title, &messages);
        } else {
            tracing::info!(saved = summary.saved.len(), "All pending changes saved");
        }

        Ok(summary)
    }

    /// Forget every pending edit; the dataset re-fetched its records
    pub fn reset(&self) {
        let mut ledger = self.ledger.lock();
        if !ledger.is_empty() {
            tracing::debug!(records = ledger.len(), "Dropping edit ledger on dataset refresh");
        }
        ledger.clear();
    }

    /// Save without surfacing the error; the caller decides how to report it
    async fn save_record(&self, record_id: &RecordId) -> std::result::Result<(), String> {
        let Some(record) = self.provider.record(record_id) else {
            // Not on the current page any more, nothing left to persist
            self.ledger.lock().remove_record(record_id);
            return Ok(());
        };

        let result = {
            let _saving = self.loading.record_saving(record_id);
            record.save().await
        };
        drop(record);

        match result {
            Ok(()) => {
                self.ledger.lock().remove_record(record_id);
                tracing::info!(record_id = %record_id, "Record saved");
                self.events.emit(&GridEvent::RecordSaved {
                    record_id: record_id.clone(),
                });
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(record_id = %record_id, error = %message, "Record save failed");
                self.events.emit(&GridEvent::SaveFailed {
                    record_id: record_id.clone(),
                    message: message.clone(),
                });
                Err(message)
            }
        }
    }
}
