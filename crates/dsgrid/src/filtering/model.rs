use dsgrid_core::{
    ConditionOperator, DataProvider, FilterExpression, GridError, Result, Value,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

use super::codec::matches_column;
use super::condition::{Condition, ConditionState};
use crate::columns::GridColumn;
use crate::events::{EventEmitter, GridEvent};

#[derive(Default)]
struct FilterPanel {
    conditions: IndexMap<String, Condition>,
    /// Drop every committed condition at the next save
    clear_committed: bool,
}

/// Filter panel state across columns
///
/// Conditions are opened per column and edited freely; the dataset's filter
/// expression changes only in [`Filtering::save`], all at once.
pub struct Filtering {
    provider: Arc<dyn DataProvider>,
    events: Arc<EventEmitter<GridEvent>>,
    panel: Mutex<FilterPanel>,
}

impl Filtering {
    pub fn new(provider: Arc<dyn DataProvider>, events: Arc<EventEmitter<GridEvent>>) -> Self {
        Self {
            provider,
            events,
            panel: Mutex::new(FilterPanel::default()),
        }
    }

    /// Open the column's condition, seeding it from the committed filter
    pub fn open(&self, column: &GridColumn) -> Result<Condition> {
        if !column.is_filterable {
            return Err(GridError::NotSupported(format!(
                "column '{}' is not filterable",
                column.name
            )));
        }
        let mut panel = self.panel.lock();
        if let Some(existing) = panel.conditions.get(&column.name) {
            return Ok(existing.clone());
        }

        let committed = self.provider.filtering();
        let condition = committed
            .conditions
            .iter()
            .find(|expression| matches_column(expression, column))
            .filter(|_| !panel.clear_committed)
            .map(|expression| Condition::bound(column.clone(), expression))
            .unwrap_or_else(|| Condition::unbound(column.clone()));

        tracing::debug!(column = %column.name, state = ?condition.state(), "Filter condition opened");
        panel.conditions.insert(column.name.clone(), condition.clone());
        Ok(condition)
    }

    pub fn condition(&self, column: &str) -> Option<Condition> {
        self.panel.lock().conditions.get(column).cloned()
    }

    pub fn conditions(&self) -> Vec<Condition> {
        self.panel.lock().conditions.values().cloned().collect()
    }

    pub fn set_operator(&self, column: &str, operator: ConditionOperator) -> Result<Condition> {
        self.edit(column, |condition| condition.set_operator(operator))
    }

    pub fn set_value(&self, column: &str, value: Value) -> Result<Condition> {
        self.edit(column, |condition| condition.set_value(value))
    }

    /// Flag the column's condition for removal at the next save
    pub fn remove(&self, column: &str) -> Result<Condition> {
        self.edit(column, Condition::remove)
    }

    /// Flag every condition, open or committed, for removal
    pub fn clear_all(&self) {
        let mut panel = self.panel.lock();
        panel.clear_committed = true;
        for condition in panel.conditions.values_mut() {
            condition.remove();
        }
        let columns: Vec<String> = panel.conditions.keys().cloned().collect();
        drop(panel);

        tracing::debug!("All filter conditions flagged for removal");
        for column in columns {
            self.events.emit(&GridEvent::ConditionChanged { column });
        }
    }

    /// Inline messages of the conditions that block saving
    pub fn errors(&self) -> Vec<(String, String)> {
        self.panel
            .lock()
            .conditions
            .iter()
            .filter(|(_, condition)| condition.state() == ConditionState::Edited)
            .filter_map(|(name, condition)| {
                condition.error_message().map(|message| (name.clone(), message))
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn has_pending(&self) -> bool {
        let panel = self.panel.lock();
        panel.clear_committed || panel.conditions.values().any(Condition::is_pending_commit)
    }

    /// Commit every open condition in one filter update and one refresh
    ///
    /// Any invalid condition fails the whole save and nothing is committed.
    /// Untouched conditions alone leave the dataset alone.
    #[tracing::instrument(skip(self))]
    pub fn save(&self) -> Result<()> {
        let mut panel = self.panel.lock();

        if !panel.clear_committed && !panel.conditions.values().any(Condition::is_pending_commit) {
            panel.conditions.clear();
            tracing::debug!("Nothing to commit");
            return Ok(());
        }

        let invalid: Vec<String> = panel
            .conditions
            .iter()
            .filter(|(_, condition)| condition.state() == ConditionState::Edited)
            .filter(|(_, condition)| !condition.is_valid())
            .map(|(name, _)| name.clone())
            .collect();
        if !invalid.is_empty() {
            tracing::debug!(columns = ?invalid, "Filter save refused");
            return Err(GridError::InvalidFilter { columns: invalid });
        }

        let mut expression = self.provider.filtering();
        if panel.clear_committed {
            expression = FilterExpression {
                filter_operator: expression.filter_operator,
                ..Default::default()
            };
        }

        for condition in panel.conditions.values() {
            let position = expression
                .conditions
                .iter()
                .position(|committed| matches_column(committed, condition.column()));
            match (condition.state(), position) {
                (ConditionState::Removed, Some(index)) => {
                    expression.conditions.remove(index);
                }
                (ConditionState::Edited, Some(index)) => {
                    expression.conditions[index] = condition.to_expression();
                }
                (ConditionState::Edited, None) => {
                    expression.conditions.push(condition.to_expression());
                }
                _ => {}
            }
        }

        panel.conditions.clear();
        panel.clear_committed = false;
        drop(panel);

        tracing::info!(conditions = expression.conditions.len(), "Committing filter");
        self.provider.set_filtering(expression);
        self.provider.refresh();
        Ok(())
    }

    /// Close the panel without committing
    pub fn discard(&self) {
        let mut panel = self.panel.lock();
        panel.conditions.clear();
        panel.clear_committed = false;
    }

    /// Whether the committed filter has a condition on the column
    pub fn is_filtered(&self, column: &GridColumn) -> bool {
        self.provider
            .filtering()
            .conditions
            .iter()
            .any(|expression| matches_column(expression, column))
    }

    fn edit(&self, column: &str, f: impl FnOnce(&mut Condition)) -> Result<Condition> {
        let mut panel = self.panel.lock();
        let condition = panel
            .conditions
            .get_mut(column)
            .ok_or_else(|| GridError::NotFound(format!("no open condition for '{}'", column)))?;
        f(condition);
        let updated = condition.clone();
        drop(panel);

        self.events.emit(&GridEvent::ConditionChanged {
            column: column.to_string(),
        });
        Ok(updated)
    }
}
