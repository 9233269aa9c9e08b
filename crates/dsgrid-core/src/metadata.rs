//! Raw dataset columns and their platform metadata

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum::{AsRefStr, Display, EnumIter};

use crate::DataType;

/// Suffix that marks a synthetic, client-side column
pub const VIRTUAL_COLUMN_SUFFIX: &str = "__virtual";

/// Entity alias of an `alias.attribute` column name
pub fn entity_alias_of(name: &str) -> Option<&str> {
    name.split_once('.').map(|(alias, _)| alias)
}

/// Attribute part of a column name, the whole name when it has no alias
pub fn attribute_name_of(name: &str) -> &str {
    name.split_once('.')
        .map(|(_, attribute)| attribute)
        .unwrap_or(name)
}

/// Horizontal alignment of a column's cells and header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A column as listed by the dataset, before grid capabilities are applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawColumn {
    /// Column name, `alias.attribute` for linked-entity columns
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub data_type: DataType,
    /// Explicit editability; when set it wins over every other rule
    #[serde(default)]
    pub is_editable: Option<bool>,
    #[serde(default)]
    pub disable_sorting: bool,
    #[serde(default)]
    pub alignment: Option<Alignment>,
    /// Relative width
    #[serde(default = "default_visual_size_factor")]
    pub visual_size_factor: f32,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_primary: bool,
}

fn default_visual_size_factor() -> f32 {
    100.0
}

impl RawColumn {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            data_type,
            is_editable: None,
            disable_sorting: false,
            alignment: None,
            visual_size_factor: default_visual_size_factor(),
            order: 0,
            is_hidden: false,
            is_primary: false,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.is_editable = Some(editable);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn sorting_disabled(mut self) -> Self {
        self.disable_sorting = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Columns sourced from a joined entity are named `alias.attribute`
    pub fn is_linked(&self) -> bool {
        entity_alias_of(&self.name).is_some()
    }

    pub fn is_virtual(&self) -> bool {
        self.name.ends_with(VIRTUAL_COLUMN_SUFFIX)
    }

    /// Entity alias of a linked column
    pub fn entity_alias(&self) -> Option<&str> {
        entity_alias_of(&self.name)
    }

    /// Attribute name without the entity alias
    pub fn attribute_name(&self) -> &str {
        attribute_name_of(&self.name)
    }
}

/// Platform requirement level of an attribute
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr,
)]
#[repr(i8)]
pub enum RequiredLevel {
    Unknown = -1,
    #[default]
    None = 0,
    SystemRequired = 1,
    ApplicationRequired = 2,
    Recommended = 3,
}

impl RequiredLevel {
    /// Business- or system-required
    pub fn is_required(&self) -> bool {
        matches!(self, Self::SystemRequired | Self::ApplicationRequired)
    }
}

/// Aggregate functions a column may support
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AggregationFunction {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    CountColumn,
}

/// One choice of an option-set column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionMetadata {
    pub value: i64,
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Attribute metadata fetched from the platform for a single column
///
/// Every field is optional on the wire so a partial blob still parses; an
/// absent blob (`Default`) yields the most conservative capabilities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ColumnMetadata {
    pub is_valid_for_update: Option<bool>,
    pub required_level: RequiredLevel,
    pub supported_aggregations: Vec<AggregationFunction>,
    pub is_filterable: Option<bool>,
    /// Choices for option-set and two-options columns
    pub options: Vec<OptionMetadata>,
    /// Target entity types for lookups
    pub targets: Vec<String>,
    pub precision: Option<u32>,
}

impl ColumnMetadata {
    pub fn allows_update(&self) -> bool {
        self.is_valid_for_update == Some(true)
    }

    pub fn option_label(&self, value: i64) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_linked_column_names() {
        let column = RawColumn::new("acc.name", DataType::Text);
        assert!(column.is_linked());
        assert_eq!(column.entity_alias(), Some("acc"));
        assert_eq!(column.attribute_name(), "name");

        let plain = RawColumn::new("name", DataType::Text);
        assert!(!plain.is_linked());
        assert_eq!(plain.entity_alias(), None);
        assert_eq!(plain.attribute_name(), "name");
    }

    #[test]
    fn test_alias_split_stops_at_first_dot() {
        assert_eq!(entity_alias_of("acc.owner.name"), Some("acc"));
        assert_eq!(attribute_name_of("acc.owner.name"), "owner.name");
        assert_eq!(entity_alias_of("name"), None);
        assert_eq!(attribute_name_of("name"), "name");
    }

    #[test]
    fn test_partial_metadata_blob_parses() {
        let metadata: ColumnMetadata = serde_json::from_str(
            r#"{"IsValidForUpdate": true, "RequiredLevel": 2, "SupportedAggregations": ["sum", "avg"]}"#,
        )
        .unwrap();
        assert!(metadata.allows_update());
        assert!(metadata.required_level.is_required());
        assert_eq!(
            metadata.supported_aggregations,
            vec![AggregationFunction::Sum, AggregationFunction::Avg]
        );
        assert_eq!(metadata.is_filterable, None);
    }

    #[test]
    fn test_default_metadata_is_conservative() {
        let metadata = ColumnMetadata::default();
        assert!(!metadata.allows_update());
        assert!(!metadata.required_level.is_required());
        assert!(metadata.supported_aggregations.is_empty());
    }
}
