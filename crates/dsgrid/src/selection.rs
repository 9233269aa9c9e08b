//! Record selection
//!
//! The provider owns the selected ids. The model keeps a local mirror so the
//! header checkbox and row checkboxes can be computed without a round-trip,
//! and pushes every change back to the provider.

use dsgrid_core::{DataProvider, RecordId};
use indexmap::IndexSet;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use crate::config::SelectionMode;
use crate::events::{EventEmitter, GridEvent};

/// State of the header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    /// Some, but not all, visible records are selected
    Indeterminate,
}

pub struct SelectionModel {
    provider: Arc<dyn DataProvider>,
    mode: SelectionMode,
    selected: Mutex<IndexSet<RecordId>>,
    events: Arc<EventEmitter<GridEvent>>,
}

impl SelectionModel {
    pub fn new(
        provider: Arc<dyn DataProvider>,
        mode: SelectionMode,
        events: Arc<EventEmitter<GridEvent>>,
    ) -> Self {
        let selected = provider.selected_record_ids().into_iter().collect();
        Self {
            provider,
            mode,
            selected: Mutex::new(selected),
            events,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selected(&self) -> Vec<RecordId> {
        self.selected.lock().iter().cloned().collect()
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.lock().contains(id)
    }

    /// Re-read the provider's selection after it changed on its own
    pub fn sync(&self) {
        let ids: IndexSet<RecordId> = self.provider.selected_record_ids().into_iter().collect();
        *self.selected.lock() = ids;
    }

    /// Toggle one record; returns whether it is selected afterwards
    ///
    /// In single mode selecting a record replaces the previous selection.
    pub fn toggle(&self, id: &RecordId) -> bool {
        let selected = {
            let mut selection = self.selected.lock();
            match self.mode {
                SelectionMode::None => return false,
                SelectionMode::Single => {
                    if selection.contains(id) {
                        selection.clear();
                        false
                    } else {
                        selection.clear();
                        selection.insert(id.clone());
                        true
                    }
                }
                SelectionMode::Multiple => {
                    if selection.shift_remove(id) {
                        false
                    } else {
                        selection.insert(id.clone());
                        true
                    }
                }
            }
        };
        tracing::debug!(record_id = %id, selected, "Selection toggled");
        self.commit();
        selected
    }

    /// Select every visible record, keeping records selected off-page
    pub fn select_all(&self, visible: &[RecordId]) {
        if self.mode != SelectionMode::Multiple {
            return;
        }
        {
            let mut selection = self.selected.lock();
            selection.extend(visible.iter().cloned());
        }
        self.commit();
    }

    /// Header checkbox click: clear the visible records when all are
    /// selected, select them all otherwise
    pub fn toggle_all(&self, visible: &[RecordId]) {
        match self.header_state(visible) {
            CheckState::Checked => {
                {
                    let mut selection = self.selected.lock();
                    selection.retain(|id| !visible.contains(id));
                }
                self.commit();
            }
            CheckState::Unchecked | CheckState::Indeterminate => self.select_all(visible),
        }
    }

    pub fn clear(&self) {
        {
            let mut selection = self.selected.lock();
            if selection.is_empty() {
                return;
            }
            selection.clear();
        }
        self.commit();
    }

    pub fn header_state(&self, visible: &[RecordId]) -> CheckState {
        if visible.is_empty() {
            return CheckState::Unchecked;
        }
        let selection = self.selected.lock();
        let count = visible.iter().filter(|id| selection.contains(*id)).count();
        if count == 0 {
            CheckState::Unchecked
        } else if count == visible.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    fn commit(&self) {
        let ids = self.selected();
        self.provider.set_selected_record_ids(ids);
        self.events.emit(&GridEvent::SelectionChanged);
    }
}
