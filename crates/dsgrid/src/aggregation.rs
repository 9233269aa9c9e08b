//! Aggregation and grouping
//!
//! Both edit the dataset's expression lists for one column and commit with a
//! single refresh. [`SummaryContext`] is the read side used when rendering
//! group header and total rows.

use dsgrid_core::{
    AggregationExpression, AggregationFunction, DataProvider, GridError, Result,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::columns::GridColumn;

pub struct AggregationModel {
    provider: Arc<dyn DataProvider>,
    column: GridColumn,
}

impl AggregationModel {
    pub fn new(provider: Arc<dyn DataProvider>, column: GridColumn) -> Self {
        Self { provider, column }
    }

    pub fn function(&self) -> Option<AggregationFunction> {
        self.provider
            .aggregations()
            .into_iter()
            .find(|a| a.column_name == self.column.name)
            .map(|a| a.aggregation_function)
    }

    /// Functions offered for this column
    pub fn available(&self) -> &[AggregationFunction] {
        &self.column.supported_aggregations
    }

    pub fn set_function(&self, function: AggregationFunction) -> Result<()> {
        if !self.column.can_be_aggregated {
            return Err(GridError::NotSupported(format!(
                "column '{}' cannot be aggregated",
                self.column.name
            )));
        }
        if !self.column.supported_aggregations.contains(&function) {
            return Err(GridError::NotSupported(format!(
                "column '{}' does not support {}",
                self.column.name, function
            )));
        }

        let mut aggregations: Vec<AggregationExpression> = self
            .provider
            .aggregations()
            .into_iter()
            .filter(|a| a.column_name != self.column.name)
            .collect();
        aggregations.push(AggregationExpression::new(&self.column.name, function));

        tracing::debug!(column = %self.column.name, %function, "Aggregation changed");
        self.provider.set_aggregations(aggregations);
        self.provider.refresh();
        Ok(())
    }

    pub fn clear(&self) {
        let aggregations = self.provider.aggregations();
        let before = aggregations.len();
        let remaining: Vec<AggregationExpression> = aggregations
            .into_iter()
            .filter(|a| a.column_name != self.column.name)
            .collect();
        if remaining.len() == before {
            return;
        }
        self.provider.set_aggregations(remaining);
        self.provider.refresh();
    }
}

pub struct GroupingModel {
    provider: Arc<dyn DataProvider>,
    column: GridColumn,
    enabled: bool,
}

impl GroupingModel {
    /// `enabled` is the grid-wide grouping switch
    pub fn new(provider: Arc<dyn DataProvider>, column: GridColumn, enabled: bool) -> Self {
        Self {
            provider,
            column,
            enabled,
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.provider.grouping().contains(&self.column.name)
    }

    /// Whether this column can be grouped on at all
    pub fn can_group(&self) -> bool {
        self.enabled && !self.column.is_checkbox() && !self.column.is_action() && !self.column.is_virtual
    }

    pub fn group(&self) -> Result<()> {
        if !self.can_group() {
            return Err(GridError::NotSupported(format!(
                "grouping by '{}' is not available",
                self.column.name
            )));
        }
        let mut grouping = self.provider.grouping();
        if grouping.contains(&self.column.name) {
            return Ok(());
        }
        grouping.push(self.column.name.clone());
        tracing::debug!(column = %self.column.name, "Grouped");
        self.provider.set_grouping(grouping);
        self.provider.refresh();
        Ok(())
    }

    pub fn ungroup(&self) {
        let grouping = self.provider.grouping();
        if !grouping.contains(&self.column.name) {
            return;
        }
        let remaining: Vec<String> = grouping
            .into_iter()
            .filter(|name| *name != self.column.name)
            .collect();
        tracing::debug!(column = %self.column.name, "Ungrouped");
        self.provider.set_grouping(remaining);
        self.provider.refresh();
    }
}

/// Grouped-by and aggregated columns of the current page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryContext {
    pub group_by: HashSet<String>,
    pub aggregated: HashSet<String>,
}

impl SummaryContext {
    pub fn from_provider(provider: &dyn DataProvider) -> Self {
        Self {
            group_by: provider.grouping().into_iter().collect(),
            aggregated: provider
                .aggregations()
                .into_iter()
                .map(|a| a.column_name)
                .collect(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.group_by.is_empty() || !self.aggregated.is_empty()
    }

    /// Columns that keep their full rendering on summary rows
    pub fn renders_on_summary(&self, column: &str) -> bool {
        self.group_by.contains(column) || self.aggregated.contains(column)
    }
}
