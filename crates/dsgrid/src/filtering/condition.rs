use dsgrid_core::{ConditionExpression, ConditionOperator, Value};
use serde::Serialize;

use super::codec::{decode_condition, encode_condition, normalize_value};
use super::operators::{ValueKind, default_operator, is_multi_value, is_range, value_kind};
use crate::columns::GridColumn;

/// Lifecycle of a column's in-progress filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConditionState {
    /// No committed condition, nothing edited yet
    Unbound,
    /// Seeded from the committed filter, nothing edited yet
    Bound,
    /// Operator or value changed since opening
    Edited,
    /// Flagged for removal at the next save
    Removed,
}

/// A column's filter condition, edited until the filter panel saves
///
/// Nothing here touches the committed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    column: GridColumn,
    operator: ConditionOperator,
    value: Value,
    state: ConditionState,
}

impl Condition {
    pub fn unbound(column: GridColumn) -> Self {
        Self {
            operator: default_operator(column.data_type),
            column,
            value: Value::Null,
            state: ConditionState::Unbound,
        }
    }

    /// Seed from the committed expression, decoding wildcards and the name suffix
    pub fn bound(column: GridColumn, expression: &ConditionExpression) -> Self {
        let (operator, value) = decode_condition(&column, expression);
        Self {
            column,
            operator,
            value,
            state: ConditionState::Bound,
        }
    }

    pub fn column(&self) -> &GridColumn {
        &self.column
    }

    pub fn operator(&self) -> ConditionOperator {
        self.operator
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn state(&self) -> ConditionState {
        self.state
    }

    pub fn is_removed(&self) -> bool {
        self.state == ConditionState::Removed
    }

    /// Whether saving will write this condition
    pub fn is_pending_commit(&self) -> bool {
        matches!(self.state, ConditionState::Edited | ConditionState::Removed)
    }

    /// Change the operator
    ///
    /// Moving between operators with different value kinds drops the value.
    pub fn set_operator(&mut self, operator: ConditionOperator) {
        if value_kind(self.operator) != value_kind(operator) {
            self.value = Value::Null;
        }
        self.operator = operator;
        self.value = normalize_value(self.column.data_type, operator, std::mem::take(&mut self.value));
        self.auto_switch();
        self.state = ConditionState::Edited;
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = normalize_value(self.column.data_type, self.operator, value);
        self.auto_switch();
        self.state = ConditionState::Edited;
    }

    /// Flag for removal; honored only when the filter panel saves
    pub fn remove(&mut self) {
        self.state = ConditionState::Removed;
    }

    /// Equal/NotEqual on a multi-valued column follow the number of selected values
    fn auto_switch(&mut self) {
        use ConditionOperator::*;

        if !self.column.data_type.is_multi_valued() {
            return;
        }
        let (single, multi) = match self.operator {
            Equal | In => (Equal, In),
            NotEqual | NotIn => (NotEqual, NotIn),
            _ => return,
        };
        let Value::Array(items) = &mut self.value else {
            return;
        };
        match items.len() {
            0 => {
                self.value = Value::Null;
                self.operator = single;
            }
            1 => {
                self.value = items.pop().unwrap_or_default();
                self.operator = single;
            }
            _ => self.operator = multi,
        }
    }

    /// Inline validation message, `None` when the condition can be saved
    pub fn error_message(&self) -> Option<String> {
        if self.is_removed() {
            return None;
        }
        let data_type = self.column.data_type;
        match value_kind(self.operator) {
            ValueKind::None => None,
            ValueKind::Numeric => match self.value.as_i64() {
                Some(count) if count > 0 => None,
                _ => Some("Enter a whole number greater than zero".to_string()),
            },
            ValueKind::Text => match self.value.as_str() {
                Some(text) if !text.is_empty() => None,
                _ => Some("Enter a value".to_string()),
            },
            ValueKind::Typed if is_multi_value(self.operator) => {
                let Some(items) = self.value.as_array().filter(|items| !items.is_empty()) else {
                    return Some("Select at least one value".to_string());
                };
                if is_range(self.operator) && items.len() != 2 {
                    return Some("Enter a start and an end value".to_string());
                }
                items.iter().find_map(|item| typed_error(data_type, item))
            }
            ValueKind::Typed => {
                if self.value.is_empty() {
                    return Some("Enter a value".to_string());
                }
                typed_error(data_type, &self.value)
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error_message().is_none()
    }

    /// The committed form of this condition
    pub fn to_expression(&self) -> ConditionExpression {
        encode_condition(&self.column, self.operator, &self.value)
    }
}

fn typed_error(data_type: dsgrid_core::DataType, value: &Value) -> Option<String> {
    use dsgrid_core::DataType;

    if data_type.is_date() && value.as_date().is_none() {
        return Some("Enter a valid date".to_string());
    }
    match data_type {
        DataType::WholeNumber | DataType::Duration if value.as_i64().is_none() => {
            Some("Enter a whole number".to_string())
        }
        DataType::Decimal | DataType::FloatingPoint | DataType::Currency
            if value.as_f64().is_none() =>
        {
            Some("Enter a number".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{MetadataMap, derive_columns};
    use crate::config::{GridConfig, SelectionMode};
    use chrono::NaiveDate;
    use dsgrid_core::{DataType, RawColumn};
    use pretty_assertions::assert_eq;

    fn column(name: &str, data_type: DataType) -> GridColumn {
        let config = GridConfig {
            selection_type: SelectionMode::None,
            ..Default::default()
        };
        derive_columns(&[RawColumn::new(name, data_type)], &MetadataMap::new(), &config)
            .get(name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_auto_switch_to_in_and_back() {
        let mut condition = Condition::unbound(column("status", DataType::OptionSet));
        condition.set_operator(ConditionOperator::Equal);

        condition.set_value(Value::Array(vec![Value::Int(1)]));
        assert_eq!(condition.operator(), ConditionOperator::Equal);
        assert_eq!(condition.value(), &Value::Int(1));

        condition.set_value(Value::Array(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(condition.operator(), ConditionOperator::In);
        assert_eq!(
            condition.value(),
            &Value::Array(vec![Value::Int(1), Value::Int(2)])
        );

        condition.set_value(Value::Array(vec![Value::Int(2)]));
        assert_eq!(condition.operator(), ConditionOperator::Equal);
        assert_eq!(condition.value(), &Value::Int(2));
    }

    #[test]
    fn test_auto_switch_negated() {
        let mut condition = Condition::unbound(column("owner", DataType::LookupOwner));
        condition.set_operator(ConditionOperator::NotEqual);
        condition.set_value(Value::Array(vec![Value::from("u1"), Value::from("u2")]));
        assert_eq!(condition.operator(), ConditionOperator::NotIn);
    }

    #[test]
    fn test_single_valued_column_never_switches() {
        let mut condition = Condition::unbound(column("name", DataType::Text));
        condition.set_value(Value::Array(vec![Value::from("a"), Value::from("b")]));
        assert_eq!(condition.operator(), ConditionOperator::Equal);
    }

    #[test]
    fn test_operator_kind_change_nulls_value() {
        let mut condition = Condition::unbound(column("createdon", DataType::DateOnly));
        condition.set_value(Value::from("2024-03-01"));
        assert!(!condition.value().is_null());

        condition.set_operator(ConditionOperator::Today);
        assert!(condition.value().is_null());

        condition.set_operator(ConditionOperator::LastXDays);
        condition.set_value(Value::Int(7));
        condition.set_operator(ConditionOperator::NextXDays);
        assert_eq!(condition.value(), &Value::Int(7));

        condition.set_operator(ConditionOperator::OnOrAfter);
        assert!(condition.value().is_null());
    }

    #[test]
    fn test_date_time_value_truncated_on_set() {
        let mut condition = Condition::unbound(column("invoice_date", DataType::DateAndTime));
        let dt = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        condition.set_value(Value::DateTime(dt));
        assert_eq!(
            condition.value(),
            &Value::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
    }

    #[test]
    fn test_validation_messages() {
        let mut amount = Condition::unbound(column("amount", DataType::Currency));
        assert!(!amount.is_valid());
        amount.set_value(Value::from("abc"));
        assert_eq!(amount.error_message().as_deref(), Some("Enter a number"));
        amount.set_value(Value::from("12.5"));
        assert!(amount.is_valid());

        let mut created = Condition::unbound(column("createdon", DataType::DateOnly));
        created.set_operator(ConditionOperator::LastXDays);
        created.set_value(Value::Int(0));
        assert!(!created.is_valid());
        created.set_operator(ConditionOperator::ThisMonth);
        assert!(created.is_valid());

        let mut range = Condition::unbound(column("score", DataType::WholeNumber));
        range.set_operator(ConditionOperator::Between);
        range.set_value(Value::Array(vec![Value::Int(1)]));
        assert!(!range.is_valid());
        range.set_value(Value::Array(vec![Value::Int(1), Value::Int(5)]));
        assert!(range.is_valid());
    }

    #[test]
    fn test_removed_condition_is_valid() {
        let mut condition = Condition::unbound(column("amount", DataType::Currency));
        condition.remove();
        assert!(condition.is_valid());
        assert!(condition.is_pending_commit());
    }
}
