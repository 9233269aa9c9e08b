//! Cell formatting over the striped row theme

use dsgrid_core::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::columns::GridColumn;

/// Font weight applied to cells on a custom background without a primary color
pub const EMPHASIS_FONT_WEIGHT: u16 = 600;

/// Theme tweaks attached to a cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeOverride {
    pub font_weight: Option<u16>,
    pub font_size: Option<u16>,
    pub font_family: Option<String>,
    /// Per-component style overrides for nested controls; opaque to the grid
    pub components: IndexMap<String, serde_json::Value>,
}

impl ThemeOverride {
    fn merged_over(self, base: ThemeOverride) -> ThemeOverride {
        let mut components = base.components;
        components.extend(self.components);
        ThemeOverride {
            font_weight: self.font_weight.or(base.font_weight),
            font_size: self.font_size.or(base.font_size),
            font_family: self.font_family.or(base.font_family),
            components,
        }
    }
}

/// Formatting a host attaches to a record's cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomFormatting {
    pub background_color: Option<String>,
    pub primary_color: Option<String>,
    pub text_color: Option<String>,
    pub theme_override: Option<ThemeOverride>,
}

/// Supplies custom formatting per record and column
pub trait FormattingProvider: Send + Sync {
    fn formatting(&self, record: &dyn Record, column: &GridColumn) -> Option<CustomFormatting>;
}

/// Base row colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RowTheme {
    pub background_color: String,
    pub alternate_background_color: String,
    pub text_color: String,
    pub primary_color: String,
}

impl Default for RowTheme {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            alternate_background_color: "#f5f5f5".to_string(),
            text_color: "#242424".to_string(),
            primary_color: "#0f6cbd".to_string(),
        }
    }
}

impl RowTheme {
    pub fn row_background(&self, row_index: usize, zebra: bool) -> &str {
        if zebra && row_index % 2 == 1 {
            &self.alternate_background_color
        } else {
            &self.background_color
        }
    }
}

/// Resolved formatting of one cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormatting {
    pub background_color: String,
    pub primary_color: String,
    pub text_color: String,
    pub theme: ThemeOverride,
}

impl CellFormatting {
    /// Equality ignoring the nested component overrides
    pub fn same_appearance(&self, other: &CellFormatting) -> bool {
        self.background_color == other.background_color
            && self.primary_color == other.primary_color
            && self.text_color == other.text_color
            && self.theme.font_weight == other.theme.font_weight
            && self.theme.font_size == other.theme.font_size
            && self.theme.font_family == other.theme.font_family
    }
}

/// Merge custom formatting over the row default
pub fn resolve_formatting(
    theme: &RowTheme,
    row_index: usize,
    zebra: bool,
    custom: Option<CustomFormatting>,
) -> CellFormatting {
    let row_background = theme.row_background(row_index, zebra);
    let mut formatting = CellFormatting {
        background_color: row_background.to_string(),
        primary_color: theme.primary_color.clone(),
        text_color: theme.text_color.clone(),
        theme: ThemeOverride::default(),
    };
    let Some(custom) = custom else {
        return formatting;
    };

    let custom_background = custom
        .background_color
        .filter(|color| color.as_str() != row_background);
    let emphasize = custom_background.is_some() && custom.primary_color.is_none();

    if let Some(background) = custom_background {
        formatting.background_color = background;
    }
    if let Some(primary) = custom.primary_color {
        formatting.primary_color = primary;
    }
    if let Some(text) = custom.text_color {
        formatting.text_color = text;
    }
    if let Some(theme_override) = custom.theme_override {
        formatting.theme = theme_override.merged_over(formatting.theme);
    }
    if emphasize {
        formatting.theme.font_weight = Some(EMPHASIS_FONT_WEIGHT);
    }
    formatting
}
