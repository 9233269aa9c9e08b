//! Change notifications
//!
//! Models own an [`EventEmitter`] rather than being one. Widgets subscribe with
//! a callback and keep the returned [`SubscriptionId`] to unsubscribe later.

use dsgrid_core::RecordId;
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};
use std::sync::Arc;

new_key_type! {
    /// Handle returned by [`EventEmitter::subscribe`]
    pub struct SubscriptionId;
}

/// Events the grid publishes to the rendering widget
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The derived column set changed
    ColumnsChanged,
    /// A cell's value or pending state changed and should re-render
    CellChanged { record_id: RecordId, column: String },
    RecordSaved { record_id: RecordId },
    SaveFailed { record_id: RecordId, message: String },
    /// Pending edits were discarded; `None` for every record
    ChangesDiscarded { record_id: Option<RecordId> },
    SelectionChanged,
    /// An in-progress filter condition changed without being committed
    ConditionChanged { column: String },
    /// The dataset re-fetched its page
    Refreshed,
    LoadingChanged { loading: bool },
}

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub struct EventEmitter<E> {
    subscribers: Mutex<SlotMap<SubscriptionId, Callback<E>>>,
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(SlotMap::with_key()),
        }
    }
}

impl<E> EventEmitter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribers.lock().insert(Arc::new(callback))
    }

    /// Returns false if the id was unknown or already removed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.lock().remove(id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Call every subscriber
    ///
    /// Callbacks run outside the lock so they may subscribe or unsubscribe.
    pub fn emit(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = self.subscribers.lock().values().cloned().collect();
        for callback in callbacks {
            callback(event);
        }
    }
}
