use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use notely_domain::{Reminder, ReminderStatus, ID};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, user_id: &ID, reminder_id: &ID) -> Option<Reminder> {
        find_by(&self.reminders, |reminder| {
            reminder.user_id == *user_id && reminder.id == *reminder_id
        })
        .into_iter()
        .next()
    }

    async fn find_due_by_status(
        &self,
        status: ReminderStatus,
        before: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>> {
        let mut due = find_by(&self.reminders, |reminder: &Reminder| {
            let due_at = match status {
                ReminderStatus::Snoozed => reminder.effective_due_at(),
                _ => reminder.fire_at,
            };
            reminder.status == status && due_at <= before
        });
        due.sort_by_key(|reminder| reminder.fire_at);
        due.truncate(limit as usize);
        Ok(due)
    }

    async fn claim(&self, user_id: &ID, reminder_id: &ID, version: i64) -> anyhow::Result<bool> {
        let mut reminders = self.reminders.lock().unwrap();
        for reminder in reminders.iter_mut() {
            if reminder.user_id == *user_id && reminder.id == *reminder_id {
                if reminder.version != version {
                    return Ok(false);
                }
                reminder.version += 1;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notely_domain::{ReminderFrequency, ReminderStatus};

    fn reminder(status: ReminderStatus, fire_at: i64, snooze_until: Option<i64>) -> Reminder {
        Reminder {
            id: Default::default(),
            user_id: Default::default(),
            note_id: None,
            fire_at,
            snooze_until,
            status,
            channels: Vec::new(),
            frequency: ReminderFrequency::Once,
            custom_cron: None,
            title_snapshot: String::new(),
            body_snapshot: String::new(),
            last_sent_at: None,
            version: 0,
            created: 0,
            updated: 0,
        }
    }

    #[tokio::test]
    async fn due_query_filters_on_status_and_due_time() {
        let repo = InMemoryReminderRepo::new();
        let due = reminder(ReminderStatus::Scheduled, 100, None);
        let not_due = reminder(ReminderStatus::Scheduled, 101, None);
        let sent = reminder(ReminderStatus::Sent, 50, None);
        for r in [&due, &not_due, &sent] {
            repo.insert(r).await.unwrap();
        }

        let found = repo
            .find_due_by_status(ReminderStatus::Scheduled, 100, 10)
            .await
            .unwrap();
        assert_eq!(found, vec![due]);
    }

    #[tokio::test]
    async fn snoozed_due_query_uses_snooze_time() {
        let repo = InMemoryReminderRepo::new();
        // Snoozed past the horizon even though the nominal fire time passed
        let still_snoozed = reminder(ReminderStatus::Snoozed, 50, Some(200));
        // Snooze expired
        let expired = reminder(ReminderStatus::Snoozed, 60, Some(90));
        // Snoozed status without a snooze time falls back to the fire time
        let no_snooze_time = reminder(ReminderStatus::Snoozed, 70, None);
        for r in [&still_snoozed, &expired, &no_snooze_time] {
            repo.insert(r).await.unwrap();
        }

        let found = repo
            .find_due_by_status(ReminderStatus::Snoozed, 100, 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&expired));
        assert!(found.contains(&no_snooze_time));
    }

    #[tokio::test]
    async fn due_query_respects_limit() {
        let repo = InMemoryReminderRepo::new();
        for i in 0..5 {
            repo.insert(&reminder(ReminderStatus::Scheduled, i, None))
                .await
                .unwrap();
        }

        let found = repo
            .find_due_by_status(ReminderStatus::Scheduled, 100, 3)
            .await
            .unwrap();
        assert_eq!(found.len(), 3);
    }

    #[tokio::test]
    async fn claim_bumps_version_only_when_unchanged() {
        let repo = InMemoryReminderRepo::new();
        let r = reminder(ReminderStatus::Scheduled, 100, None);
        repo.insert(&r).await.unwrap();

        assert!(repo.claim(&r.user_id, &r.id, 0).await.unwrap());
        // Same version again loses, the first claim bumped it
        assert!(!repo.claim(&r.user_id, &r.id, 0).await.unwrap());
        assert!(repo.claim(&r.user_id, &r.id, 1).await.unwrap());

        let stored = repo.find(&r.user_id, &r.id).await.unwrap();
        assert_eq!(stored.version, 2);
    }
}
