//! Grid configuration
//!
//! Hosts pass the grid's manifest parameters as a JSON object with PascalCase
//! keys. Every key is optional; missing keys take the defaults below.

use anyhow::{Context, Result};
use dsgrid_core::{Alignment, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How records can be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    None,
    Single,
    #[default]
    Multiple,
}

/// A control the cell should mount, named by its registry key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Value>,
}

impl ControlDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: IndexMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Per-column control overrides
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ControlOverrides {
    /// Used in both display and edit mode; wins over the other two
    pub both: Option<ControlDescriptor>,
    pub editor: Option<ControlDescriptor>,
    pub renderer: Option<ControlDescriptor>,
}

/// Per-column configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ColumnOverride {
    /// Keep the cell permanently in edit mode
    pub one_click_edit: bool,
    pub alignment: Option<Alignment>,
    pub controls: ControlOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GridConfig {
    pub enable_editing: bool,
    pub enable_filtering: bool,
    pub enable_sorting: bool,
    /// Opt-in; aggregation stays off unless explicitly enabled
    pub enable_aggregation: bool,
    pub enable_grouping: bool,
    pub selection_type: SelectionMode,
    pub enable_zebra: bool,
    pub default_row_height: u32,
    pub column_overrides: IndexMap<String, ColumnOverride>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enable_editing: true,
            enable_filtering: true,
            enable_sorting: true,
            enable_aggregation: false,
            enable_grouping: false,
            selection_type: SelectionMode::Multiple,
            enable_zebra: true,
            default_row_height: 42,
            column_overrides: IndexMap::new(),
        }
    }
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse grid configuration JSON")
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No grid configuration file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid configuration from {:?}", path))?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write grid configuration to {:?}", path))?;
        Ok(())
    }

    /// Default location under the user's config directory
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(config_dir.join("dsgrid").join("grid.json"))
    }

    /// Grouping rides on aggregation and needs both switches
    pub fn grouping_enabled(&self) -> bool {
        self.enable_aggregation && self.enable_grouping
    }

    pub fn column_override(&self, column: &str) -> Option<&ColumnOverride> {
        self.column_overrides.get(column)
    }

    pub fn is_one_click_edit(&self, column: &str) -> bool {
        self.column_override(column)
            .is_some_and(|o| o.one_click_edit)
    }

    pub fn with_column_override(mut self, column: impl Into<String>, value: ColumnOverride) -> Self {
        self.column_overrides.insert(column.into(), value);
        self
    }
}
