mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use wayfourth_reminders_domain::{Reminder, ReminderStatus, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
    /// Atomically claims every `pending` reminder with `remind_at <= before`
    /// by moving it to `in_progress`, and returns the claimed reminders.
    /// Two overlapping sweep runs can never claim the same reminder.
    async fn claim_due(&self, before: i64) -> anyhow::Result<Vec<Reminder>>;
    /// Writes the terminal status of a delivery attempt. Errors if the
    /// reminder is not `in_progress` anymore, since that means some other
    /// actor touched it after it was claimed.
    async fn finalize(&self, reminder_id: &ID, status: ReminderStatus) -> anyhow::Result<()>;
}
