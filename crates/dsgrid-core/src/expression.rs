//! Query expressions the grid commits to the dataset
//!
//! Filter, sort, aggregation, grouping and linking expressions in the shape the
//! data provider consumes them. Numeric codes follow the platform enumerations.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum::{EnumIter, IntoStaticStr};

use crate::{AggregationFunction, Value};

/// Platform condition operators
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize_repr,
    Deserialize_repr,
    EnumIter,
    IntoStaticStr,
)]
#[repr(i16)]
pub enum ConditionOperator {
    None = -1,
    #[default]
    Equal = 0,
    NotEqual = 1,
    GreaterThan = 2,
    LessThan = 3,
    GreaterEqual = 4,
    LessEqual = 5,
    Like = 6,
    NotLike = 7,
    In = 8,
    NotIn = 9,
    Between = 10,
    NotBetween = 11,
    Null = 12,
    NotNull = 13,
    Yesterday = 14,
    Today = 15,
    Tomorrow = 16,
    Last7Days = 17,
    Next7Days = 18,
    LastWeek = 19,
    ThisWeek = 20,
    NextWeek = 21,
    LastMonth = 22,
    ThisMonth = 23,
    NextMonth = 24,
    On = 25,
    OnOrBefore = 26,
    OnOrAfter = 27,
    LastYear = 28,
    ThisYear = 29,
    NextYear = 30,
    LastXHours = 31,
    NextXHours = 32,
    LastXDays = 33,
    NextXDays = 34,
    LastXWeeks = 35,
    NextXWeeks = 36,
    LastXMonths = 37,
    NextXMonths = 38,
    LastXYears = 39,
    NextXYears = 40,
    EqualUserId = 41,
    NotEqualUserId = 42,
    EqualBusinessId = 43,
    NotEqualBusinessId = 44,
    ChildOf = 45,
    Mask = 46,
    NotMask = 47,
    MasksSelect = 48,
    Contains = 49,
    DoesNotContain = 50,
    EqualUserLanguage = 51,
    NotOn = 52,
    OlderThanXMonths = 53,
    BeginsWith = 54,
    DoesNotBeginWith = 55,
    EndsWith = 56,
    DoesNotEndWith = 57,
    ThisFiscalYear = 58,
    ThisFiscalPeriod = 59,
    NextFiscalYear = 60,
    NextFiscalPeriod = 61,
    LastFiscalYear = 62,
    LastFiscalPeriod = 63,
    LastXFiscalYears = 64,
    LastXFiscalPeriods = 65,
    NextXFiscalYears = 66,
    NextXFiscalPeriods = 67,
    InFiscalYear = 68,
    InFiscalPeriod = 69,
    InFiscalPeriodAndYear = 70,
    InOrBeforeFiscalPeriodAndYear = 71,
    InOrAfterFiscalPeriodAndYear = 72,
    EqualUserTeams = 73,
    EqualUserOrUserTeams = 74,
    Under = 75,
    NotUnder = 76,
    UnderOrEqual = 77,
    Above = 78,
    AboveOrEqual = 79,
    EqualUserOrUserHierarchy = 80,
    EqualUserOrUserHierarchyAndTeams = 81,
    OlderThanXYears = 82,
    OlderThanXWeeks = 83,
    OlderThanXDays = 84,
    OlderThanXHours = 85,
    OlderThanXMinutes = 86,
    ContainValues = 87,
    DoesNotContainValues = 88,
}

/// How the conditions of a filter expression combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum FilterOperator {
    #[default]
    And = 0,
    Or = 1,
}

/// A single committed filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionExpression {
    pub attribute_name: String,
    pub condition_operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_alias_name: Option<String>,
}

impl ConditionExpression {
    pub fn new(
        attribute_name: impl Into<String>,
        condition_operator: ConditionOperator,
        value: Value,
    ) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            condition_operator,
            value,
            entity_alias_name: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.entity_alias_name = Some(alias.into());
        self
    }
}

/// The dataset's committed filter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExpression {
    #[serde(default)]
    pub filter_operator: FilterOperator,
    #[serde(default)]
    pub conditions: Vec<ConditionExpression>,
    #[serde(default)]
    pub filters: Vec<FilterExpression>,
}

impl FilterExpression {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.filters.iter().all(|f| f.is_empty())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr)]
#[repr(i8)]
pub enum SortDirection {
    None = -1,
    #[default]
    Ascending = 0,
    Descending = 1,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending | Self::None => Self::Ascending,
        }
    }
}

/// One entry of the dataset's sort list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortStatus {
    pub name: String,
    pub sort_direction: SortDirection,
}

impl SortStatus {
    pub fn new(name: impl Into<String>, sort_direction: SortDirection) -> Self {
        Self {
            name: name.into(),
            sort_direction,
        }
    }
}

/// One aggregate the dataset computes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationExpression {
    pub column_name: String,
    pub alias: String,
    pub aggregation_function: AggregationFunction,
}

impl AggregationExpression {
    /// Builds the aggregate with the conventional `<column>_<function>` alias
    pub fn new(column_name: impl Into<String>, function: AggregationFunction) -> Self {
        let column_name = column_name.into();
        Self {
            alias: format!("{}_{}", column_name, function),
            column_name,
            aggregation_function: function,
        }
    }
}

/// Join type of a linked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[default]
    Outer,
    Inner,
}

/// A joined entity contributing `alias.attribute` columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEntity {
    pub name: String,
    pub from: String,
    pub to: String,
    pub alias: String,
    #[serde(default)]
    pub link_type: LinkType,
}
