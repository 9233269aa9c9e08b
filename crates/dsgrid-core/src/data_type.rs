//! Platform data-type tags

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Data type of a dataset column, as named by the hosting platform
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
pub enum DataType {
    #[default]
    #[serde(rename = "SingleLine.Text")]
    #[strum(serialize = "SingleLine.Text")]
    Text,
    #[serde(rename = "SingleLine.Email")]
    #[strum(serialize = "SingleLine.Email")]
    Email,
    #[serde(rename = "SingleLine.Phone")]
    #[strum(serialize = "SingleLine.Phone")]
    Phone,
    #[serde(rename = "SingleLine.URL")]
    #[strum(serialize = "SingleLine.URL")]
    Url,
    #[serde(rename = "SingleLine.TextArea")]
    #[strum(serialize = "SingleLine.TextArea")]
    TextArea,
    #[serde(rename = "SingleLine.Ticker")]
    #[strum(serialize = "SingleLine.Ticker")]
    Ticker,
    #[serde(rename = "Multiple")]
    #[strum(serialize = "Multiple")]
    Multiline,
    #[serde(rename = "Whole.None")]
    #[strum(serialize = "Whole.None")]
    WholeNumber,
    #[serde(rename = "Whole.Duration")]
    #[strum(serialize = "Whole.Duration")]
    Duration,
    #[serde(rename = "Whole.Language")]
    #[strum(serialize = "Whole.Language")]
    Language,
    #[serde(rename = "Whole.TimeZone")]
    #[strum(serialize = "Whole.TimeZone")]
    TimeZone,
    #[serde(rename = "Decimal")]
    #[strum(serialize = "Decimal")]
    Decimal,
    #[serde(rename = "FP")]
    #[strum(serialize = "FP")]
    FloatingPoint,
    #[serde(rename = "Currency")]
    #[strum(serialize = "Currency")]
    Currency,
    #[serde(rename = "DateAndTime.DateOnly")]
    #[strum(serialize = "DateAndTime.DateOnly")]
    DateOnly,
    #[serde(rename = "DateAndTime.DateAndTime")]
    #[strum(serialize = "DateAndTime.DateAndTime")]
    DateAndTime,
    #[serde(rename = "Lookup.Simple")]
    #[strum(serialize = "Lookup.Simple")]
    LookupSimple,
    #[serde(rename = "Lookup.Customer")]
    #[strum(serialize = "Lookup.Customer")]
    LookupCustomer,
    #[serde(rename = "Lookup.Owner")]
    #[strum(serialize = "Lookup.Owner")]
    LookupOwner,
    #[serde(rename = "Lookup.PartyList")]
    #[strum(serialize = "Lookup.PartyList")]
    LookupPartyList,
    #[serde(rename = "Lookup.Regarding")]
    #[strum(serialize = "Lookup.Regarding")]
    LookupRegarding,
    #[serde(rename = "OptionSet")]
    #[strum(serialize = "OptionSet")]
    OptionSet,
    #[serde(rename = "MultiSelectPicklist")]
    #[strum(serialize = "MultiSelectPicklist")]
    MultiSelectOptionSet,
    #[serde(rename = "TwoOptions")]
    #[strum(serialize = "TwoOptions")]
    TwoOptions,
    #[serde(rename = "File")]
    #[strum(serialize = "File")]
    File,
    #[serde(rename = "Image")]
    #[strum(serialize = "Image")]
    Image,
    /// Ribbon/record-command buttons column
    #[serde(rename = "Action")]
    #[strum(serialize = "Action")]
    Action,
}

impl DataType {
    /// Parse a platform tag, falling back to text for tags this crate does not know
    pub fn from_platform(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            tracing::debug!(tag, "Unknown data type tag, treating as text");
            DataType::Text
        })
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::Email
                | Self::Phone
                | Self::Url
                | Self::TextArea
                | Self::Ticker
                | Self::Multiline
        )
    }

    /// Numeric types, aligned right by default
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::WholeNumber
                | Self::Duration
                | Self::Decimal
                | Self::FloatingPoint
                | Self::Currency
        )
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Self::DateOnly | Self::DateAndTime)
    }

    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::LookupSimple
                | Self::LookupCustomer
                | Self::LookupOwner
                | Self::LookupPartyList
                | Self::LookupRegarding
        )
    }

    pub fn is_option_set(&self) -> bool {
        matches!(
            self,
            Self::OptionSet | Self::MultiSelectOptionSet | Self::TwoOptions
        )
    }

    /// Columns whose filter conditions may hold several selected values
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::OptionSet | Self::MultiSelectOptionSet) || self.is_lookup()
    }

    /// Binary content columns, never editable in the grid
    pub fn is_file_like(&self) -> bool {
        matches!(self, Self::File | Self::Image)
    }
}
