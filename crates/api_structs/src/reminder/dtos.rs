use pawtime_domain::{Reminder, ReminderAction, ReminderRecurrence, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub dog_id: ID,
    pub action: ReminderAction,
    pub custom_action_name: String,
    pub recurrence: ReminderRecurrence,
    pub is_enabled: bool,
    pub execution_basis: i64,
    pub execution_date: Option<i64>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            dog_id: reminder.dog_id.clone(),
            action: reminder.action,
            custom_action_name: reminder.custom_action_name,
            recurrence: reminder.recurrence,
            is_enabled: reminder.is_enabled,
            execution_basis: reminder.execution_basis,
            execution_date: reminder.execution_date,
        }
    }
}
