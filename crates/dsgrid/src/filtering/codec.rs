//! Translation between in-progress conditions and committed expressions
//!
//! Text operators store their value with `%` wildcards. Option-set, two-options
//! and simple/owner lookup columns match labels through the `<attribute>name`
//! pseudo-attribute when filtered with a text operator. Decoding reverses both
//! exactly.

use dsgrid_core::{ConditionExpression, ConditionOperator, DataType, Value};

use super::operators::{ValueKind, is_text_operator, value_kind};
use crate::columns::GridColumn;

/// Suffix of the label pseudo-attribute
pub const NAME_ATTRIBUTE_SUFFIX: &str = "name";

/// Wrap a text value in the operator's wildcards
pub fn encode_text(operator: ConditionOperator, text: &str) -> String {
    use ConditionOperator::*;
    match operator {
        BeginsWith | DoesNotBeginWith => format!("{}%", text),
        EndsWith | DoesNotEndWith => format!("%{}", text),
        Like | NotLike => format!("%{}%", text),
        _ => text.to_string(),
    }
}

/// Strip the operator's wildcards
pub fn decode_text(operator: ConditionOperator, text: &str) -> String {
    use ConditionOperator::*;
    match operator {
        BeginsWith | DoesNotBeginWith => text.strip_suffix('%').unwrap_or(text).to_string(),
        EndsWith | DoesNotEndWith => text.strip_prefix('%').unwrap_or(text).to_string(),
        Like | NotLike => {
            let text = text.strip_prefix('%').unwrap_or(text);
            text.strip_suffix('%').unwrap_or(text).to_string()
        }
        _ => text.to_string(),
    }
}

/// Column types that expose a label pseudo-attribute
fn has_name_attribute(data_type: DataType) -> bool {
    matches!(
        data_type,
        DataType::OptionSet | DataType::TwoOptions | DataType::LookupOwner | DataType::LookupSimple
    )
}

/// Whether the condition matches on labels through `<attribute>name`
pub fn uses_name_attribute(data_type: DataType, operator: ConditionOperator) -> bool {
    has_name_attribute(data_type) && is_text_operator(operator)
}

pub fn encode_attribute(attribute: &str, data_type: DataType, operator: ConditionOperator) -> String {
    if uses_name_attribute(data_type, operator) {
        format!("{}{}", attribute, NAME_ATTRIBUTE_SUFFIX)
    } else {
        attribute.to_string()
    }
}

pub fn decode_attribute(attribute: &str, data_type: DataType, operator: ConditionOperator) -> String {
    if uses_name_attribute(data_type, operator) {
        attribute
            .strip_suffix(NAME_ATTRIBUTE_SUFFIX)
            .unwrap_or(attribute)
            .to_string()
    } else {
        attribute.to_string()
    }
}

/// Bring a value to the shape the column filters on
///
/// Date columns filter at date granularity, so date-times and date strings
/// become plain dates. Unparseable values are left for validation to reject.
pub fn normalize_value(data_type: DataType, operator: ConditionOperator, value: Value) -> Value {
    if !data_type.is_date() || value_kind(operator) != ValueKind::Typed {
        return value;
    }
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize_value(data_type, operator, item))
                .collect(),
        ),
        other => other.as_date().map(Value::Date).unwrap_or(other),
    }
}

fn map_text(value: Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(text) => Value::String(f(&text)),
        other => other,
    }
}

/// Build the committed expression for a column condition
pub fn encode_condition(
    column: &GridColumn,
    operator: ConditionOperator,
    value: &Value,
) -> ConditionExpression {
    let attribute = encode_attribute(column.attribute_name(), column.data_type, operator);
    let value = match value_kind(operator) {
        ValueKind::None => Value::Null,
        ValueKind::Text => map_text(value.clone(), |text| encode_text(operator, text)),
        ValueKind::Numeric | ValueKind::Typed => {
            normalize_value(column.data_type, operator, value.clone())
        }
    };
    let expression = ConditionExpression::new(attribute, operator, value);
    match column.entity_alias() {
        Some(alias) => expression.with_alias(alias),
        None => expression,
    }
}

/// Recover operator and user-facing value from a committed expression
pub fn decode_condition(
    column: &GridColumn,
    expression: &ConditionExpression,
) -> (ConditionOperator, Value) {
    let operator = expression.condition_operator;
    let value = match value_kind(operator) {
        ValueKind::None => Value::Null,
        ValueKind::Text => map_text(expression.value.clone(), |text| decode_text(operator, text)),
        ValueKind::Numeric | ValueKind::Typed => {
            normalize_value(column.data_type, operator, expression.value.clone())
        }
    };
    (operator, value)
}

/// Whether a committed expression belongs to this column
///
/// Matched on the decoded attribute and the entity alias.
pub fn matches_column(expression: &ConditionExpression, column: &GridColumn) -> bool {
    let attribute = decode_attribute(
        &expression.attribute_name,
        column.data_type,
        expression.condition_operator,
    );
    attribute == column.attribute_name()
        && expression.entity_alias_name.as_deref() == column.entity_alias()
}
