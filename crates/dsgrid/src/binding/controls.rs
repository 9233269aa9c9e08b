//! Control selection
//!
//! The control a cell mounts comes from, in order: the column's `both`
//! override, its editor or renderer override for the current mode, and finally
//! the registry entry for the column's data type.

use dsgrid_core::DataType;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::columns::GridColumn;
use crate::config::{ControlDescriptor, ControlOverrides};

/// Whether a cell is showing or editing its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CellMode {
    #[default]
    Display,
    Editing,
}

type ControlFactory = Arc<dyn Fn(&GridColumn, CellMode) -> ControlDescriptor + Send + Sync>;

/// Data type to control factory map
#[derive(Clone)]
pub struct ControlRegistry {
    factories: HashMap<DataType, ControlFactory>,
}

impl Default for ControlRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl ControlRegistry {
    /// Empty registry; every type resolves to the plain text controls
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        for &(data_type, renderer, editor) in BUILTIN_CONTROLS {
            registry.register(data_type, move |_, mode| match mode {
                CellMode::Display => ControlDescriptor::new(renderer),
                CellMode::Editing => ControlDescriptor::new(editor),
            });
        }
        registry
    }

    /// Register or replace the factory for a data type
    pub fn register<F>(&mut self, data_type: DataType, factory: F)
    where
        F: Fn(&GridColumn, CellMode) -> ControlDescriptor + Send + Sync + 'static,
    {
        self.factories.insert(data_type, Arc::new(factory));
    }

    pub fn default_control(&self, column: &GridColumn, mode: CellMode) -> ControlDescriptor {
        match self.factories.get(&column.data_type) {
            Some(factory) => factory(column, mode),
            None => fallback_control(mode),
        }
    }

    /// Resolve the control for a cell, honoring per-column overrides
    pub fn resolve(
        &self,
        column: &GridColumn,
        mode: CellMode,
        overrides: Option<&ControlOverrides>,
    ) -> ControlDescriptor {
        let overridden = overrides.and_then(|o| {
            o.both.as_ref().or(match mode {
                CellMode::Editing => o.editor.as_ref(),
                CellMode::Display => o.renderer.as_ref(),
            })
        });
        match overridden {
            Some(descriptor) => descriptor.clone(),
            None => self.default_control(column, mode),
        }
    }
}

fn fallback_control(mode: CellMode) -> ControlDescriptor {
    match mode {
        CellMode::Display => ControlDescriptor::new("Text"),
        CellMode::Editing => ControlDescriptor::new("TextInput"),
    }
}

/// (data type, renderer, editor)
const BUILTIN_CONTROLS: &[(DataType, &str, &str)] = &[
    (DataType::Text, "Text", "TextInput"),
    (DataType::Email, "EmailLink", "EmailInput"),
    (DataType::Phone, "PhoneLink", "PhoneInput"),
    (DataType::Url, "UrlLink", "UrlInput"),
    (DataType::TextArea, "Text", "TextArea"),
    (DataType::Ticker, "Text", "TickerInput"),
    (DataType::Multiline, "MultilineText", "TextArea"),
    (DataType::WholeNumber, "Number", "NumberInput"),
    (DataType::Duration, "Duration", "DurationInput"),
    (DataType::Language, "Language", "LanguagePicker"),
    (DataType::TimeZone, "TimeZone", "TimeZonePicker"),
    (DataType::Decimal, "Number", "DecimalInput"),
    (DataType::FloatingPoint, "Number", "DecimalInput"),
    (DataType::Currency, "Currency", "CurrencyInput"),
    (DataType::DateOnly, "Date", "DatePicker"),
    (DataType::DateAndTime, "DateTime", "DateTimePicker"),
    (DataType::LookupSimple, "LookupLink", "LookupPicker"),
    (DataType::LookupCustomer, "LookupLink", "LookupPicker"),
    (DataType::LookupOwner, "LookupLink", "LookupPicker"),
    (DataType::LookupPartyList, "LookupLinks", "PartyListPicker"),
    (DataType::LookupRegarding, "LookupLink", "LookupPicker"),
    (DataType::OptionSet, "OptionSet", "OptionSetPicker"),
    (DataType::MultiSelectOptionSet, "MultiSelectOptionSet", "MultiSelectPicker"),
    (DataType::TwoOptions, "TwoOptions", "TwoOptionsToggle"),
    (DataType::File, "FileLink", "FileLink"),
    (DataType::Image, "Image", "Image"),
    (DataType::Action, "CommandBar", "CommandBar"),
];
