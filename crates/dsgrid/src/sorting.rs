//! Column sorting
//!
//! Sort state lives in the dataset's sort list. A [`SortingModel`] reads and
//! rewrites that list for one column; every change commits the list and
//! triggers one refresh.

use dsgrid_core::{DataProvider, GridError, Result, SortDirection, SortStatus};
use std::sync::Arc;

use crate::columns::GridColumn;

pub struct SortingModel {
    provider: Arc<dyn DataProvider>,
    column: GridColumn,
}

impl SortingModel {
    pub fn new(provider: Arc<dyn DataProvider>, column: GridColumn) -> Self {
        Self { provider, column }
    }

    pub fn column(&self) -> &GridColumn {
        &self.column
    }

    /// Current direction, `SortDirection::None` when the column is not sorted
    pub fn direction(&self) -> SortDirection {
        self.provider
            .sorting()
            .into_iter()
            .find(|s| s.name == self.column.name)
            .map(|s| s.sort_direction)
            .unwrap_or(SortDirection::None)
    }

    /// Position in a multi-column sort, 0 is the primary key
    pub fn priority(&self) -> Option<usize> {
        self.provider
            .sorting()
            .iter()
            .position(|s| s.name == self.column.name)
    }

    /// Sort by this column
    ///
    /// Non-additive replaces the whole sort list; additive updates or appends
    /// this column and keeps the others. `SortDirection::None` removes it.
    pub fn set_direction(&self, direction: SortDirection, additive: bool) -> Result<()> {
        if !self.column.is_sortable {
            return Err(GridError::NotSupported(format!(
                "column '{}' is not sortable",
                self.column.name
            )));
        }

        let mut sorting = if additive {
            self.provider.sorting()
        } else {
            Vec::new()
        };

        let existing = sorting.iter().position(|s| s.name == self.column.name);
        match (direction, existing) {
            (SortDirection::None, Some(index)) => {
                sorting.remove(index);
            }
            (SortDirection::None, None) => {}
            (direction, Some(index)) => sorting[index].sort_direction = direction,
            (direction, None) => sorting.push(SortStatus::new(&self.column.name, direction)),
        }

        tracing::debug!(
            column = %self.column.name,
            direction = direction.label(),
            additive,
            "Sorting changed"
        );
        self.commit(sorting);
        Ok(())
    }

    /// Ascending first, then flip; returns the new direction
    pub fn toggle(&self, additive: bool) -> Result<SortDirection> {
        let direction = self.direction().toggle();
        self.set_direction(direction, additive)?;
        Ok(direction)
    }

    /// Remove this column from the sort list
    pub fn clear(&self) -> Result<()> {
        if self.direction() == SortDirection::None {
            return Ok(());
        }
        let sorting: Vec<SortStatus> = self
            .provider
            .sorting()
            .into_iter()
            .filter(|s| s.name != self.column.name)
            .collect();
        self.commit(sorting);
        Ok(())
    }

    fn commit(&self, sorting: Vec<SortStatus>) {
        self.provider.set_sorting(sorting);
        self.provider.refresh();
    }
}
