use dsgrid_core::{FieldChange, RecordId};
use indexmap::IndexMap;

/// Columns the user touched on one record, with the provider diff last seen for each
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingEdit {
    columns: IndexMap<String, Option<FieldChange>>,
}

impl PendingEdit {
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Diff observed right after the user's last edit of the column
    pub fn observed(&self, column: &str) -> Option<&FieldChange> {
        self.columns.get(column).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// User-intent edit ledger, keyed by record
///
/// An entry for (record, column) exists iff the user edited that cell since the
/// record was last saved or discarded.
#[derive(Debug, Clone, Default)]
pub struct EditLedger {
    entries: IndexMap<RecordId, PendingEdit>,
}

impl EditLedger {
    /// Record a user edit, replacing any stale diff for the column
    pub fn touch(&mut self, record_id: &RecordId, column: &str, observed: Option<FieldChange>) {
        self.entries
            .entry(record_id.clone())
            .or_default()
            .columns
            .insert(column.to_string(), observed);
    }

    pub fn get(&self, record_id: &RecordId) -> Option<&PendingEdit> {
        self.entries.get(record_id)
    }

    pub fn is_touched(&self, record_id: &RecordId, column: &str) -> bool {
        self.entries
            .get(record_id)
            .is_some_and(|entry| entry.contains(column))
    }

    pub fn record_ids(&self) -> Vec<RecordId> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, &PendingEdit)> {
        self.entries.iter()
    }

    pub fn remove_record(&mut self, record_id: &RecordId) -> Option<PendingEdit> {
        self.entries.shift_remove(record_id)
    }

    /// Forget one column; the record's entry goes away with its last column
    pub fn remove_column(&mut self, record_id: &RecordId, column: &str) -> bool {
        let Some(entry) = self.entries.get_mut(record_id) else {
            return false;
        };
        let removed = entry.columns.shift_remove(column).is_some();
        if entry.is_empty() {
            self.entries.shift_remove(record_id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
