use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use wayfourth_reminders_domain::{Reminder, ReminderStatus, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |r| r.user_id == *user_id);
        reminders.sort_by_key(|r| r.remind_at);
        reminders
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }

    async fn claim_due(&self, before: i64) -> anyhow::Result<Vec<Reminder>> {
        let claimed = update_where(
            &self.reminders,
            |r| r.is_due(before),
            |r| r.status = ReminderStatus::InProgress,
        );
        Ok(claimed)
    }

    async fn finalize(&self, reminder_id: &ID, status: ReminderStatus) -> anyhow::Result<()> {
        let finalized = update_where(
            &self.reminders,
            |r| r.id == *reminder_id && r.status.is_valid_transition(&status),
            |r| r.status = status,
        );
        if finalized.is_empty() {
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

    fn pending_reminder(remind_at: i64) -> Reminder {
        Reminder::new(
            Default::default(),
            "+15551234567".into(),
            "Take medicine".into(),
            remind_at,
            0,
        )
    }

    #[tokio::test]
    async fn claims_only_due_pending_reminders() {
        let repo = InMemoryReminderRepo::new();
        let due = pending_reminder(50);
        let due_exactly_now = pending_reminder(100);
        let future = pending_reminder(101);
        let mut already_sent = pending_reminder(10);
        already_sent.status = ReminderStatus::Sent;

        for r in [&due, &due_exactly_now, &future, &already_sent].iter() {
            repo.insert(r).await.unwrap();
        }

        let claimed = repo.claim_due(100).await.unwrap();
        let claimed_ids = claimed.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        assert_eq!(claimed.len(), 2);
        assert!(claimed_ids.contains(&due.id));
        assert!(claimed_ids.contains(&due_exactly_now.id));
        assert!(claimed.iter().all(|r| r.status == ReminderStatus::InProgress));

        // A second claim over the same window finds nothing
        assert!(repo.claim_due(100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn finalize_requires_claim() {
        let repo = InMemoryReminderRepo::new();
        let reminder = pending_reminder(50);
        repo.insert(&reminder).await.unwrap();

        assert!(repo
            .finalize(&reminder.id, ReminderStatus::Sent)
            .await
            .is_err());

        repo.claim_due(100).await.unwrap();
        assert!(repo
            .finalize(&reminder.id, ReminderStatus::Sent)
            .await
            .is_ok());
        assert_eq!(
            repo.find(&reminder.id).await.unwrap().status,
            ReminderStatus::Sent
        );

        // Terminal, cannot be finalized twice
        assert!(repo
            .finalize(&reminder.id, ReminderStatus::Failed)
            .await
            .is_err());
    }
}
