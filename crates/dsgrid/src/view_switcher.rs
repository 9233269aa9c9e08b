//! Saved-view picker

use dsgrid_core::{DataProvider, GridError, Result, SavedQuery};
use std::sync::Arc;
use uuid::Uuid;

use crate::changes::ChangeTracker;
use crate::events::{EventEmitter, GridEvent};

pub struct ViewSwitcherModel {
    provider: Arc<dyn DataProvider>,
    tracker: Arc<ChangeTracker>,
    events: Arc<EventEmitter<GridEvent>>,
    views: Vec<SavedQuery>,
}

impl ViewSwitcherModel {
    pub fn new(
        provider: Arc<dyn DataProvider>,
        tracker: Arc<ChangeTracker>,
        events: Arc<EventEmitter<GridEvent>>,
    ) -> Self {
        Self {
            provider,
            tracker,
            events,
            views: Vec::new(),
        }
    }

    /// Fetch the saved queries; replaces any previously loaded list
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&[SavedQuery]> {
        let mut views = self.provider.saved_queries().await?;
        views.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        tracing::debug!(count = views.len(), "Saved views loaded");
        self.views = views;
        Ok(&self.views)
    }

    /// Loaded views, default first then by name
    pub fn views(&self) -> &[SavedQuery] {
        &self.views
    }

    pub fn current_view_id(&self) -> Option<Uuid> {
        self.provider.current_view_id()
    }

    pub fn current_view(&self) -> Option<&SavedQuery> {
        let id = self.current_view_id()?;
        self.views.iter().find(|v| v.id == id)
    }

    pub fn default_view(&self) -> Option<&SavedQuery> {
        self.views.iter().find(|v| v.is_default)
    }

    /// Views whose name contains `query`, case-insensitive
    pub fn search(&self, query: &str) -> Vec<&SavedQuery> {
        let query = query.trim().to_lowercase();
        self.views
            .iter()
            .filter(|v| query.is_empty() || v.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Switch the dataset to another view
    ///
    /// Pending edits belong to the old page and are dropped.
    pub fn switch_to(&self, id: Uuid) -> Result<()> {
        let view = self
            .views
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| GridError::NotFound(format!("view {}", id)))?;
        if self.current_view_id() == Some(id) {
            return Ok(());
        }

        tracing::info!(view = %view.name, %id, "Switching view");
        self.provider.set_view(id);
        self.provider.refresh();
        self.tracker.reset();
        self.events.emit(&GridEvent::Refreshed);
        Ok(())
    }
}
