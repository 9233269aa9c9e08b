//! Persisted grid state
//!
//! The host stores the grid's state as an opaque JSON dictionary and hands it
//! back on the next init. Restoring never fails: missing keys take their
//! defaults and a key with an unexpected shape is dropped with a warning.

use dsgrid_core::{
    DataProvider, FilterExpression, LinkedEntity, Paging, RawColumn, RecordId, SortStatus,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridState {
    pub columns: Vec<RawColumn>,
    pub linking: Vec<LinkedEntity>,
    pub sorting: Vec<SortStatus>,
    pub filtering: Option<FilterExpression>,
    pub page_size: Option<u32>,
    pub page_number: Option<u32>,
    pub search_query: Option<String>,
    pub selected_ids: Vec<RecordId>,
}

impl GridState {
    /// Rebuild from a stored dictionary
    pub fn restore(stored: Option<&serde_json::Value>) -> Self {
        let Some(stored) = stored else {
            return Self::default();
        };
        let Some(map) = stored.as_object() else {
            tracing::warn!("Stored grid state is not an object, starting from defaults");
            return Self::default();
        };

        Self {
            columns: field(map, "columns"),
            linking: field(map, "linking"),
            sorting: field(map, "sorting"),
            filtering: field(map, "filtering"),
            page_size: field(map, "pageSize"),
            page_number: field(map, "pageNumber"),
            search_query: field(map, "searchQuery"),
            selected_ids: field(map, "selectedIds"),
        }
    }

    pub fn capture(provider: &dyn DataProvider) -> Self {
        let paging = provider.paging();
        let filtering = provider.filtering();
        Self {
            columns: provider.columns(),
            linking: provider.linking(),
            sorting: provider.sorting(),
            filtering: (!filtering.is_empty()).then_some(filtering),
            page_size: Some(paging.page_size),
            page_number: Some(paging.page_number),
            search_query: provider.search_query(),
            selected_ids: provider.selected_record_ids(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Push the state into the provider and refresh once
    ///
    /// Returns false, without touching the provider, for an empty state.
    pub fn apply(&self, provider: &dyn DataProvider) -> bool {
        if self.is_empty() {
            return false;
        }

        let known = provider.linking();
        for link in &self.linking {
            if !known.iter().any(|l| l.alias == link.alias) {
                provider.add_linked_entity(link.clone());
            }
        }
        if !self.columns.is_empty() {
            provider.set_columns(self.columns.clone());
        }
        if !self.sorting.is_empty() {
            provider.set_sorting(self.sorting.clone());
        }
        if let Some(filtering) = &self.filtering {
            provider.set_filtering(filtering.clone());
        }
        if self.page_size.is_some() || self.page_number.is_some() {
            let current = provider.paging();
            provider.set_paging(Paging {
                page_size: self.page_size.unwrap_or(current.page_size),
                page_number: self.page_number.unwrap_or(current.page_number),
            });
        }
        if self.search_query.is_some() {
            provider.set_search_query(self.search_query.clone());
        }
        if !self.selected_ids.is_empty() {
            provider.set_selected_record_ids(self.selected_ids.clone());
        }

        tracing::debug!(
            columns = self.columns.len(),
            sorting = self.sorting.len(),
            "Restored grid state"
        );
        provider.refresh();
        true
    }
}

fn field<T: DeserializeOwned + Default>(
    map: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> T {
    let Some(value) = map.get(key) else {
        return T::default();
    };
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(key, error = %e, "Dropping malformed grid state entry");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsgrid_core::{DataType, SortDirection};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_missing_state_is_default() {
        assert!(GridState::restore(None).is_empty());
        assert!(GridState::restore(Some(&json!("garbage"))).is_empty());
    }

    #[test]
    fn test_partial_state_keeps_valid_keys() {
        let stored = json!({
            "sorting": [{"name": "amount", "sortDirection": 1}],
            "pageSize": "fifty",
            "searchQuery": "contoso",
            "unknownKey": true
        });
        let state = GridState::restore(Some(&stored));
        assert_eq!(
            state.sorting,
            vec![SortStatus::new("amount", SortDirection::Descending)]
        );
        assert_eq!(state.page_size, None);
        assert_eq!(state.search_query.as_deref(), Some("contoso"));
        assert!(state.columns.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let state = GridState {
            columns: vec![RawColumn::new("name", DataType::Text)],
            page_size: Some(50),
            selected_ids: vec![RecordId::from("r1")],
            ..Default::default()
        };
        let restored = GridState::restore(Some(&state.to_json()));
        assert_eq!(restored, state);
    }
}
