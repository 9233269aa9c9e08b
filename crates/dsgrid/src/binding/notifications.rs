use dsgrid_core::{Record, SummarizationType, ValidationInfo};
use serde::Serialize;

use crate::columns::GridColumn;

pub const VALIDATION_NOTIFICATION_ID: &str = "validation";
pub const NOT_EDITABLE_NOTIFICATION_ID: &str = "not-editable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NotificationKind {
    Error,
    Warning,
    Info,
}

/// A message shown next to a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellNotification {
    /// Stable identity; cells compare notifications by id only
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
}

impl CellNotification {
    pub fn new(id: impl Into<String>, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Supplies host-defined notifications for a cell
pub trait NotificationProvider: Send + Sync {
    fn notifications(&self, record: &dyn Record, column: &GridColumn) -> Vec<CellNotification>;
}

/// Validation error, the field-security warning, then custom notifications
pub fn collect_notifications(
    column: &GridColumn,
    validation: &ValidationInfo,
    summarization: SummarizationType,
    custom: Vec<CellNotification>,
) -> Vec<CellNotification> {
    let mut notifications = Vec::with_capacity(custom.len() + 2);

    if validation.error {
        notifications.push(CellNotification::new(
            VALIDATION_NOTIFICATION_ID,
            NotificationKind::Error,
            validation
                .error_message
                .clone()
                .unwrap_or_else(|| "Invalid value".to_string()),
        ));
    }

    if column.is_editable
        && validation.security_editable == Some(false)
        && !summarization.is_summary()
    {
        notifications.push(CellNotification::new(
            NOT_EDITABLE_NOTIFICATION_ID,
            NotificationKind::Warning,
            "You do not have permission to edit this field",
        ));
    }

    notifications.extend(custom);
    notifications
}
