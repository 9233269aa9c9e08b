//! Saving flags for the grid and for single records
//!
//! Page loads are tracked by the provider itself (`DataProvider::is_loading`). Flags set here are cleared by
//! the returned guards, so an early return or a failed save cannot leave a
//! record stuck in the saving state.

use dsgrid_core::RecordId;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct LoadingFlags {
    grid_saving: AtomicBool,
    records_saving: Mutex<HashSet<RecordId>>,
}

impl LoadingFlags {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_grid_saving(&self) -> bool {
        self.grid_saving.load(Ordering::SeqCst)
    }

    pub fn is_record_saving(&self, id: &RecordId) -> bool {
        self.records_saving.lock().contains(id)
    }

    /// Whether edits to the record must be refused right now
    pub fn is_record_locked(&self, id: &RecordId) -> bool {
        self.is_grid_saving() || self.is_record_saving(id)
    }

    pub fn grid_saving(self: &Arc<Self>) -> SavingGuard {
        self.grid_saving.store(true, Ordering::SeqCst);
        SavingGuard {
            flags: self.clone(),
            record_id: None,
        }
    }

    pub fn record_saving(self: &Arc<Self>, id: &RecordId) -> SavingGuard {
        self.records_saving.lock().insert(id.clone());
        SavingGuard {
            flags: self.clone(),
            record_id: Some(id.clone()),
        }
    }
}

/// Clears its flag when dropped
pub struct SavingGuard {
    flags: Arc<LoadingFlags>,
    record_id: Option<RecordId>,
}

impl Drop for SavingGuard {
    fn drop(&mut self) {
        match self.record_id.take() {
            Some(id) => {
                self.flags.records_saving.lock().remove(&id);
            }
            None => self.flags.grid_saving.store(false, Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards_clear_flags() {
        let flags = LoadingFlags::new();
        let id = RecordId::from("r1");

        {
            let _guard = flags.record_saving(&id);
            assert!(flags.is_record_saving(&id));
            assert!(flags.is_record_locked(&id));
            assert!(!flags.is_grid_saving());
        }
        assert!(!flags.is_record_saving(&id));

        {
            let _guard = flags.grid_saving();
            assert!(flags.is_record_locked(&RecordId::from("other")));
        }
        assert!(!flags.is_grid_saving());
    }
}
