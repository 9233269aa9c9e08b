//! Edit-columns panel state
//!
//! Works on a copy of the dataset's raw columns. Nothing reaches the provider
//! until [`EditColumnsModel::save`], which replaces the column set and
//! refreshes once.

use dsgrid_core::{DataProvider, GridError, LinkedEntity, RawColumn, Result};
use std::sync::Arc;

pub struct EditColumnsModel {
    provider: Arc<dyn DataProvider>,
    original: Vec<RawColumn>,
    columns: Vec<RawColumn>,
    pending_links: Vec<LinkedEntity>,
}

impl EditColumnsModel {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        let mut original = provider.columns();
        original.sort_by_key(|c| c.order);
        Self {
            provider,
            columns: original.clone(),
            original,
            pending_links: Vec::new(),
        }
    }

    /// Working copy, in display order
    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Append a column
    ///
    /// A linked column needs its entity link, either already known to the
    /// provider or passed in `link`; the link is registered on save.
    /// Returns false if the column is already present.
    pub fn add_column(&mut self, column: RawColumn, link: Option<LinkedEntity>) -> Result<bool> {
        if self.contains(&column.name) {
            return Ok(false);
        }
        if let Some(alias) = column.entity_alias() {
            let known = self.provider.linking().iter().any(|l| l.alias == alias)
                || self.pending_links.iter().any(|l| l.alias == alias);
            match link {
                Some(link) if link.alias == alias => {
                    if !known {
                        self.pending_links.push(link);
                    }
                }
                Some(link) => {
                    return Err(GridError::Validation(format!(
                        "link alias '{}' does not match column '{}'",
                        link.alias, column.name
                    )));
                }
                None if known => {}
                None => {
                    return Err(GridError::NotFound(format!(
                        "linked entity '{}' for column '{}'",
                        alias, column.name
                    )));
                }
            }
        }
        tracing::debug!(column = %column.name, "Column added");
        self.columns.push(column);
        Ok(true)
    }

    pub fn remove_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c.name != name);
        self.columns.len() != before
    }

    /// Apply a new order
    ///
    /// Unknown names are ignored; columns missing from `names` keep their
    /// relative order after the listed ones.
    pub fn reorder(&mut self, names: &[impl AsRef<str>]) {
        let mut remaining = std::mem::take(&mut self.columns);
        let mut ordered = Vec::with_capacity(remaining.len());
        for name in names {
            if let Some(index) = remaining.iter().position(|c| c.name == name.as_ref()) {
                ordered.push(remaining.remove(index));
            }
        }
        ordered.append(&mut remaining);
        self.columns = ordered;
    }

    /// Returns the new hidden state, or `None` for an unknown column
    pub fn toggle_visibility(&mut self, name: &str) -> Option<bool> {
        let column = self.columns.iter_mut().find(|c| c.name == name)?;
        column.is_hidden = !column.is_hidden;
        Some(column.is_hidden)
    }

    /// Columns whose name or display name contains `query`, case-insensitive
    pub fn search(&self, query: &str) -> Vec<&RawColumn> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.columns.iter().collect();
        }
        self.columns
            .iter()
            .filter(|c| {
                c.display_name.to_lowercase().contains(&query)
                    || c.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.columns != self.original || !self.pending_links.is_empty()
    }

    /// Commit the working copy; no-op when nothing changed
    pub fn save(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        for link in self.pending_links.drain(..) {
            tracing::debug!(alias = %link.alias, entity = %link.name, "Registering linked entity");
            self.provider.add_linked_entity(link);
        }
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.order = index as i32;
        }
        tracing::info!(columns = self.columns.len(), "Saving column set");
        self.provider.set_columns(self.columns.clone());
        self.provider.refresh();
        self.original = self.columns.clone();
        true
    }

    /// Drop every uncommitted change
    pub fn reset(&mut self) {
        self.columns = self.original.clone();
        self.pending_links.clear();
    }
}
