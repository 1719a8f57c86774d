use super::IReminderRepo;

use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;
use wayfourth_reminders_domain::{Reminder, ReminderStatus, ID};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    user_uid: Uuid,
    destination: String,
    message: String,
    remind_at: i64,
    status: String,
    created_at: i64,
}

impl Into<Reminder> for ReminderRaw {
    fn into(self) -> Reminder {
        Reminder {
            id: self.reminder_uid.into(),
            user_id: self.user_uid.into(),
            destination: self.destination,
            message: self.message,
            remind_at: self.remind_at,
            status: self.status.parse().unwrap_or_else(|e| {
                error!("Unrecognized reminder status in storage: {:?}", e);
                ReminderStatus::Failed
            }),
            created_at: self.created_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, user_uid, destination, message, remind_at, status, created_at)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.user_id.inner_ref())
        .bind(&reminder.destination)
        .bind(&reminder.message)
        .bind(reminder.remind_at)
        .bind(reminder.status.to_string())
        .bind(reminder.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or(None)
        .map(|reminder| reminder.into())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.user_uid = $1
            ORDER BY r.remind_at
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to fetch reminders for user: {:?}", e);
            vec![]
        })
        .into_iter()
        .map(|reminder| reminder.into())
        .collect()
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders AS r
            WHERE r.reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or(None)
        .map(|reminder| reminder.into())
    }

    async fn claim_due(&self, before: i64) -> anyhow::Result<Vec<Reminder>> {
        let claimed = sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders AS r
            SET status = 'in_progress'
            WHERE r.status = 'pending' AND r.remind_at <= $1
            RETURNING *
            "#,
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await?;

        Ok(claimed.into_iter().map(|reminder| reminder.into()).collect())
    }

    async fn finalize(&self, reminder_id: &ID, status: ReminderStatus) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE reminders AS r
            SET status = $2
            WHERE r.reminder_uid = $1 AND r.status = 'in_progress'
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(status.to_string())
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(anyhow::anyhow!(
                "Reminder: {} is not in_progress and cannot be finalized to: {}",
                reminder_id,
                status
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_status(status: &str) -> ReminderRaw {
        ReminderRaw {
            reminder_uid: Uuid::nil(),
            user_uid: Uuid::nil(),
            destination: "+15551234567".into(),
            message: "Take medicine".into(),
            remind_at: 100,
            status: status.into(),
            created_at: 0,
        }
    }

    #[test]
    fn maps_status_column() {
        let reminder: Reminder = raw_with_status("in_progress").into();
        assert_eq!(reminder.status, ReminderStatus::InProgress);
    }

    #[test]
    fn unrecognized_status_column_falls_back_to_failed() {
        let reminder: Reminder = raw_with_status("exploded").into();
        assert_eq!(reminder.status, ReminderStatus::Failed);
    }
}
