use dsgrid_core::{Alignment, ColumnMetadata, DataType, RawColumn};
use indexmap::IndexMap;

use super::{CHECKBOX_COLUMN, CHECKBOX_COLUMN_WIDTH, ColumnSet, GridColumn};
use crate::config::{GridConfig, SelectionMode};

/// Metadata fetched per column name
pub type MetadataMap = IndexMap<String, ColumnMetadata>;

/// Derive the display columns
///
/// Pure: the output depends only on the arguments. Columns without an entry in
/// `metadata` get [`ColumnMetadata::default`], which grants nothing.
pub fn derive_columns(raw: &[RawColumn], metadata: &MetadataMap, config: &GridConfig) -> ColumnSet {
    let fallback = ColumnMetadata::default();

    let mut columns: Vec<GridColumn> = raw
        .iter()
        .map(|column| {
            let meta = metadata.get(&column.name).unwrap_or(&fallback);
            derive_column(column, meta, config)
        })
        .collect();

    // sort_by_key is stable, ties keep dataset order
    columns.sort_by_key(|c| c.order);

    if config.selection_type != SelectionMode::None {
        columns.insert(0, checkbox_column());
    }

    ColumnSet::new(columns)
}

fn derive_column(raw: &RawColumn, meta: &ColumnMetadata, config: &GridConfig) -> GridColumn {
    let is_action = raw.data_type == DataType::Action;
    let is_virtual = raw.is_virtual();
    let is_linked = raw.is_linked();

    let is_editable = !is_action && is_editable(raw, meta, config);
    let is_required =
        !is_action && config.enable_editing && meta.required_level.is_required();
    let is_sortable = !is_action
        && config.enable_sorting
        && raw.data_type != DataType::Image
        && !raw.disable_sorting
        && !is_virtual;
    let is_filterable =
        !is_action && config.enable_filtering && meta.is_filterable.unwrap_or(!is_virtual);
    let can_be_aggregated =
        !is_action && config.enable_aggregation && !meta.supported_aggregations.is_empty();

    GridColumn {
        name: raw.name.clone(),
        display_name: raw.display_name.clone(),
        data_type: raw.data_type,
        alignment: alignment(raw, config),
        visual_size_factor: raw.visual_size_factor,
        order: raw.order,
        is_editable,
        is_required,
        is_filterable,
        is_sortable,
        is_resizable: true,
        can_be_aggregated,
        is_hidden: raw.is_hidden,
        is_virtual,
        is_linked,
        supported_aggregations: if can_be_aggregated {
            meta.supported_aggregations.clone()
        } else {
            Vec::new()
        },
        metadata: meta.clone(),
    }
}

fn is_editable(raw: &RawColumn, meta: &ColumnMetadata, config: &GridConfig) -> bool {
    if let Some(explicit) = raw.is_editable {
        return explicit;
    }
    config.enable_editing
        && !raw.is_linked()
        && !raw.data_type.is_file_like()
        && meta.allows_update()
}

fn alignment(raw: &RawColumn, config: &GridConfig) -> Alignment {
    let configured = config
        .column_override(&raw.name)
        .and_then(|o| o.alignment);
    if let Some(alignment) = configured.or(raw.alignment) {
        return alignment;
    }
    if raw.data_type.is_numeric() || raw.data_type == DataType::Action {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

fn checkbox_column() -> GridColumn {
    GridColumn {
        name: CHECKBOX_COLUMN.to_string(),
        display_name: String::new(),
        data_type: DataType::TwoOptions,
        alignment: Alignment::Center,
        visual_size_factor: CHECKBOX_COLUMN_WIDTH,
        order: i32::MIN,
        is_editable: false,
        is_required: false,
        is_filterable: false,
        is_sortable: false,
        is_resizable: false,
        can_be_aggregated: false,
        is_hidden: false,
        is_virtual: true,
        is_linked: false,
        supported_aggregations: Vec::new(),
        metadata: ColumnMetadata::default(),
    }
}
