//! Condition operator table
//!
//! Which operators take a value, and what kind of value, is fixed platform
//! data. The classification below is the single source for it.

use dsgrid_core::{ConditionOperator, DataType};

use ConditionOperator::*;

/// What an operator expects as its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Implicit value ("today", "current user")
    None,
    /// A count of units ("last X days")
    Numeric,
    /// Free text decorated with `%` wildcards
    Text,
    /// A value of the column's own type
    Typed,
}

pub fn value_kind(operator: ConditionOperator) -> ValueKind {
    match operator {
        ConditionOperator::None
        | Null
        | NotNull
        | Yesterday
        | Today
        | Tomorrow
        | Last7Days
        | Next7Days
        | LastWeek
        | ThisWeek
        | NextWeek
        | LastMonth
        | ThisMonth
        | NextMonth
        | LastYear
        | ThisYear
        | NextYear
        | EqualUserId
        | NotEqualUserId
        | EqualBusinessId
        | NotEqualBusinessId
        | EqualUserLanguage
        | ThisFiscalYear
        | ThisFiscalPeriod
        | NextFiscalYear
        | NextFiscalPeriod
        | LastFiscalYear
        | LastFiscalPeriod
        | EqualUserTeams
        | EqualUserOrUserTeams
        | EqualUserOrUserHierarchy
        | EqualUserOrUserHierarchyAndTeams => ValueKind::None,

        LastXHours | NextXHours | LastXDays | NextXDays | LastXWeeks | NextXWeeks
        | LastXMonths | NextXMonths | LastXYears | NextXYears | LastXFiscalYears
        | LastXFiscalPeriods | NextXFiscalYears | NextXFiscalPeriods | OlderThanXMinutes
        | OlderThanXHours | OlderThanXDays | OlderThanXWeeks | OlderThanXMonths
        | OlderThanXYears => ValueKind::Numeric,

        Like | NotLike | BeginsWith | DoesNotBeginWith | EndsWith | DoesNotEndWith => {
            ValueKind::Text
        }

        _ => ValueKind::Typed,
    }
}

/// The user enters a value for this operator
pub fn requires_value(operator: ConditionOperator) -> bool {
    value_kind(operator) != ValueKind::None
}

/// Manually entered text matched with wildcards
pub fn is_text_operator(operator: ConditionOperator) -> bool {
    value_kind(operator) == ValueKind::Text
}

/// Operators whose value is a list
pub fn is_multi_value(operator: ConditionOperator) -> bool {
    matches!(
        operator,
        In | NotIn | ContainValues | DoesNotContainValues | Between | NotBetween
    )
}

/// Operators whose value is exactly two bounds
pub fn is_range(operator: ConditionOperator) -> bool {
    matches!(operator, Between | NotBetween)
}

pub fn label(operator: ConditionOperator) -> &'static str {
    match operator {
        ConditionOperator::None => "",
        Equal => "Equals",
        NotEqual => "Does not equal",
        GreaterThan => "Is greater than",
        LessThan => "Is less than",
        GreaterEqual => "Is greater than or equal to",
        LessEqual => "Is less than or equal to",
        Like => "Contains",
        NotLike => "Does not contain",
        In => "Equals",
        NotIn => "Does not equal",
        Between => "Between",
        NotBetween => "Not between",
        Null => "Does not contain data",
        NotNull => "Contains data",
        Yesterday => "Yesterday",
        Today => "Today",
        Tomorrow => "Tomorrow",
        Last7Days => "Last 7 days",
        Next7Days => "Next 7 days",
        LastWeek => "Last week",
        ThisWeek => "This week",
        NextWeek => "Next week",
        LastMonth => "Last month",
        ThisMonth => "This month",
        NextMonth => "Next month",
        On => "On",
        OnOrBefore => "On or before",
        OnOrAfter => "On or after",
        LastYear => "Last year",
        ThisYear => "This year",
        NextYear => "Next year",
        LastXHours => "Last X hours",
        NextXHours => "Next X hours",
        LastXDays => "Last X days",
        NextXDays => "Next X days",
        LastXWeeks => "Last X weeks",
        NextXWeeks => "Next X weeks",
        LastXMonths => "Last X months",
        NextXMonths => "Next X months",
        LastXYears => "Last X years",
        NextXYears => "Next X years",
        EqualUserId => "Equals current user",
        NotEqualUserId => "Does not equal current user",
        EqualBusinessId => "Equals current business unit",
        NotEqualBusinessId => "Does not equal current business unit",
        ChildOf => "Child of",
        Mask => "Mask",
        NotMask => "Not mask",
        MasksSelect => "Masks select",
        Contains => "Contains (full text)",
        DoesNotContain => "Does not contain (full text)",
        EqualUserLanguage => "Equals current user language",
        NotOn => "Not on",
        OlderThanXMonths => "Older than X months",
        BeginsWith => "Begins with",
        DoesNotBeginWith => "Does not begin with",
        EndsWith => "Ends with",
        DoesNotEndWith => "Does not end with",
        ThisFiscalYear => "This fiscal year",
        ThisFiscalPeriod => "This fiscal period",
        NextFiscalYear => "Next fiscal year",
        NextFiscalPeriod => "Next fiscal period",
        LastFiscalYear => "Last fiscal year",
        LastFiscalPeriod => "Last fiscal period",
        LastXFiscalYears => "Last X fiscal years",
        LastXFiscalPeriods => "Last X fiscal periods",
        NextXFiscalYears => "Next X fiscal years",
        NextXFiscalPeriods => "Next X fiscal periods",
        InFiscalYear => "In fiscal year",
        InFiscalPeriod => "In fiscal period",
        InFiscalPeriodAndYear => "In fiscal period and year",
        InOrBeforeFiscalPeriodAndYear => "In or before fiscal period and year",
        InOrAfterFiscalPeriodAndYear => "In or after fiscal period and year",
        EqualUserTeams => "Equals current user's teams",
        EqualUserOrUserTeams => "Equals current user or user's teams",
        Under => "Under",
        NotUnder => "Not under",
        UnderOrEqual => "Under or equals",
        Above => "Above",
        AboveOrEqual => "Above or equals",
        EqualUserOrUserHierarchy => "Equals current user or reporting hierarchy",
        EqualUserOrUserHierarchyAndTeams => {
            "Equals current user and their teams or reporting hierarchy"
        }
        OlderThanXYears => "Older than X years",
        OlderThanXWeeks => "Older than X weeks",
        OlderThanXDays => "Older than X days",
        OlderThanXHours => "Older than X hours",
        OlderThanXMinutes => "Older than X minutes",
        ContainValues => "Contains values",
        DoesNotContainValues => "Does not contain values",
    }
}

const TEXT_OPERATORS: &[ConditionOperator] = &[
    Equal,
    NotEqual,
    Like,
    NotLike,
    BeginsWith,
    DoesNotBeginWith,
    EndsWith,
    DoesNotEndWith,
    NotNull,
    Null,
];

const NUMBER_OPERATORS: &[ConditionOperator] = &[
    Equal,
    NotEqual,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
    NotNull,
    Null,
];

const DATE_OPERATORS: &[ConditionOperator] = &[
    On,
    OnOrAfter,
    OnOrBefore,
    NotOn,
    Yesterday,
    Today,
    Tomorrow,
    Last7Days,
    Next7Days,
    LastWeek,
    ThisWeek,
    NextWeek,
    LastMonth,
    ThisMonth,
    NextMonth,
    LastYear,
    ThisYear,
    NextYear,
    LastXDays,
    NextXDays,
    LastXWeeks,
    NextXWeeks,
    LastXMonths,
    NextXMonths,
    LastXYears,
    NextXYears,
    OlderThanXDays,
    OlderThanXWeeks,
    OlderThanXMonths,
    OlderThanXYears,
    ThisFiscalYear,
    ThisFiscalPeriod,
    NextFiscalYear,
    NextFiscalPeriod,
    LastFiscalYear,
    LastFiscalPeriod,
    LastXFiscalYears,
    LastXFiscalPeriods,
    NextXFiscalYears,
    NextXFiscalPeriods,
    NotNull,
    Null,
];

/// Date-and-time columns additionally offer hour granularity
const DATE_TIME_EXTRA: &[ConditionOperator] = &[
    LastXHours,
    NextXHours,
    OlderThanXHours,
    OlderThanXMinutes,
];

const OPTION_SET_OPERATORS: &[ConditionOperator] = &[
    Equal,
    NotEqual,
    Like,
    NotLike,
    BeginsWith,
    DoesNotBeginWith,
    EndsWith,
    DoesNotEndWith,
    NotNull,
    Null,
];

const MULTI_SELECT_OPERATORS: &[ConditionOperator] =
    &[ContainValues, DoesNotContainValues, Equal, NotEqual, NotNull, Null];

const LOOKUP_OPERATORS: &[ConditionOperator] = &[
    Equal,
    NotEqual,
    Like,
    NotLike,
    BeginsWith,
    DoesNotBeginWith,
    EndsWith,
    DoesNotEndWith,
    NotNull,
    Null,
];

const OWNER_EXTRA: &[ConditionOperator] = &[
    EqualUserId,
    NotEqualUserId,
    EqualUserTeams,
    EqualUserOrUserTeams,
    EqualUserOrUserHierarchy,
    EqualUserOrUserHierarchyAndTeams,
];

const PRESENCE_OPERATORS: &[ConditionOperator] = &[NotNull, Null];

/// Operators offered for a column of the given type, in menu order
pub fn operators_for(data_type: DataType) -> Vec<ConditionOperator> {
    let mut operators = match data_type {
        t if t.is_text() => TEXT_OPERATORS.to_vec(),
        t if t.is_numeric() => NUMBER_OPERATORS.to_vec(),
        DataType::Language | DataType::TimeZone => NUMBER_OPERATORS.to_vec(),
        DataType::DateOnly => DATE_OPERATORS.to_vec(),
        DataType::DateAndTime => {
            let mut operators = DATE_OPERATORS.to_vec();
            operators.extend_from_slice(DATE_TIME_EXTRA);
            operators
        }
        DataType::OptionSet | DataType::TwoOptions => OPTION_SET_OPERATORS.to_vec(),
        DataType::MultiSelectOptionSet => MULTI_SELECT_OPERATORS.to_vec(),
        t if t.is_lookup() => LOOKUP_OPERATORS.to_vec(),
        _ => PRESENCE_OPERATORS.to_vec(),
    };
    if data_type == DataType::LookupOwner {
        operators.extend_from_slice(OWNER_EXTRA);
    }
    operators
}

/// Operator a fresh condition starts with
pub fn default_operator(data_type: DataType) -> ConditionOperator {
    operators_for(data_type).first().copied().unwrap_or(Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_value_kinds() {
        assert_eq!(value_kind(Today), ValueKind::None);
        assert_eq!(value_kind(EqualUserId), ValueKind::None);
        assert_eq!(value_kind(LastXDays), ValueKind::Numeric);
        assert_eq!(value_kind(OlderThanXMinutes), ValueKind::Numeric);
        assert_eq!(value_kind(BeginsWith), ValueKind::Text);
        assert_eq!(value_kind(Equal), ValueKind::Typed);
        assert_eq!(value_kind(In), ValueKind::Typed);
        assert!(!requires_value(ThisFiscalYear));
        assert!(requires_value(NextXFiscalPeriods));
    }

    #[test]
    fn test_every_operator_has_a_label() {
        for operator in ConditionOperator::iter().filter(|o| *o != ConditionOperator::None) {
            assert!(!label(operator).is_empty(), "{:?}", operator);
        }
    }

    #[test]
    fn test_operator_menus() {
        assert_eq!(default_operator(DataType::Text), Equal);
        assert_eq!(default_operator(DataType::DateAndTime), On);
        assert_eq!(default_operator(DataType::MultiSelectOptionSet), ContainValues);
        assert!(operators_for(DataType::LookupOwner).contains(&EqualUserId));
        assert!(!operators_for(DataType::LookupSimple).contains(&EqualUserId));
        assert!(operators_for(DataType::DateAndTime).contains(&LastXHours));
        assert!(!operators_for(DataType::DateOnly).contains(&LastXHours));
        assert_eq!(operators_for(DataType::Image), vec![NotNull, Null]);
    }
}
