use serde::{Deserialize, Serialize};
use wayfourth_reminders_domain::{Reminder, ReminderStatus, ID};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: ID,
    pub destination: String,
    pub message: String,
    pub remind_at: i64,
    pub status: ReminderStatus,
    pub created_at: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            user_id: reminder.user_id.clone(),
            destination: reminder.destination,
            message: reminder.message,
            remind_at: reminder.remind_at,
            status: reminder.status,
            created_at: reminder.created_at,
        }
    }
}

/// Outcome of one delivery attempt within a sweep
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDeliveryDTO {
    pub id: ID,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
