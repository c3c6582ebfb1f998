mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
use notely_domain::{Reminder, ReminderStatus, ID};
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID, reminder_id: &ID) -> Option<Reminder>;
    /// Finds reminders in the given status whose effective due time is at
    /// or before `before`, capped at `limit`. For `Snoozed` reminders the
    /// snooze time is the effective due time, for everything else the
    /// nominal fire time is.
    async fn find_due_by_status(
        &self,
        status: ReminderStatus,
        before: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>>;
    /// Bumps the version of a reminder if and only if the stored version
    /// still equals `version`. Returns `false` when it was changed in the
    /// meantime, which means another dispatch run claimed the reminder.
    async fn claim(&self, user_id: &ID, reminder_id: &ID, version: i64) -> anyhow::Result<bool>;
}
