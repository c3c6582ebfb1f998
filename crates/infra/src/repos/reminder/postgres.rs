use super::IReminderRepo;
use notely_domain::{Channel, Reminder, ReminderStatus, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::warn;

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
    user_uid: Uuid,
    reminder_uid: Uuid,
    note_uid: Option<Uuid>,
    fire_at: i64,
    snooze_until: Option<i64>,
    status: String,
    channels: Json<Vec<Channel>>,
    frequency: String,
    custom_cron: Option<String>,
    title_snapshot: String,
    body_snapshot: String,
    last_sent_at: Option<i64>,
    version: i64,
    created: i64,
    updated: i64,
}

impl ReminderRaw {
    /// Reminder rows are also written by the note editing service, so
    /// decoding is defensive. A row with a status or frequency this
    /// version does not know is dropped with a diagnostic instead of
    /// failing the whole query.
    fn into_domain(self) -> Option<Reminder> {
        let status = match self.status.parse::<ReminderStatus>() {
            Ok(status) => status,
            Err(e) => {
                warn!("Dropping reminder: {} from query result. Error message: {}", self.reminder_uid, e);
                return None;
            }
        };
        let frequency = match self.frequency.parse() {
            Ok(frequency) => frequency,
            Err(e) => {
                warn!("Dropping reminder: {} from query result. Error message: {}", self.reminder_uid, e);
                return None;
            }
        };

        Some(Reminder {
            id: self.reminder_uid.into(),
            user_id: self.user_uid.into(),
            note_id: self.note_uid.map(|uid| uid.into()),
            fire_at: self.fire_at,
            snooze_until: self.snooze_until,
            status,
            channels: self.channels.0,
            frequency,
            custom_cron: self.custom_cron,
            title_snapshot: self.title_snapshot,
            body_snapshot: self.body_snapshot,
            last_sent_at: self.last_sent_at,
            version: self.version,
            created: self.created,
            updated: self.updated,
        })
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (user_uid, reminder_uid, note_uid, fire_at, snooze_until, status, channels,
             frequency, custom_cron, title_snapshot, body_snapshot, last_sent_at,
             version, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(reminder.user_id.inner_ref())
        .bind(reminder.id.inner_ref())
        .bind(reminder.note_id.as_ref().map(|id| *id.inner_ref()))
        .bind(reminder.fire_at)
        .bind(reminder.snooze_until)
        .bind(reminder.status.to_string())
        .bind(Json(&reminder.channels))
        .bind(reminder.frequency.to_string())
        .bind(&reminder.custom_cron)
        .bind(&reminder.title_snapshot)
        .bind(&reminder.body_snapshot)
        .bind(reminder.last_sent_at)
        .bind(reminder.version)
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET note_uid = $3, fire_at = $4, snooze_until = $5, status = $6,
                channels = $7, frequency = $8, custom_cron = $9, title_snapshot = $10,
                body_snapshot = $11, last_sent_at = $12, version = $13, updated = $14
            WHERE user_uid = $1 AND reminder_uid = $2
            "#,
        )
        .bind(reminder.user_id.inner_ref())
        .bind(reminder.id.inner_ref())
        .bind(reminder.note_id.as_ref().map(|id| *id.inner_ref()))
        .bind(reminder.fire_at)
        .bind(reminder.snooze_until)
        .bind(reminder.status.to_string())
        .bind(Json(&reminder.channels))
        .bind(reminder.frequency.to_string())
        .bind(&reminder.custom_cron)
        .bind(&reminder.title_snapshot)
        .bind(&reminder.body_snapshot)
        .bind(reminder.last_sent_at)
        .bind(reminder.version)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE user_uid = $1 AND reminder_uid = $2
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(|reminder| reminder.into_domain())
    }

    async fn find_due_by_status(
        &self,
        status: ReminderStatus,
        before: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>> {
        // Snoozed reminders are due when the snooze expires, everything
        // else when the nominal fire time passes.
        let due_time = match status {
            ReminderStatus::Snoozed => "COALESCE(snooze_until, fire_at)",
            _ => "fire_at",
        };
        let query = format!(
            r#"
            SELECT * FROM reminders
            WHERE status = $1 AND {} <= $2
            ORDER BY fire_at
            LIMIT $3
            "#,
            due_time
        );

        let reminders: Vec<ReminderRaw> = sqlx::query_as(&query)
            .bind(status.to_string())
            .bind(before)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(reminders
            .into_iter()
            .filter_map(|reminder| reminder.into_domain())
            .collect())
    }

    async fn claim(&self, user_id: &ID, reminder_id: &ID, version: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET version = version + 1
            WHERE user_uid = $1 AND reminder_uid = $2 AND version = $3
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(reminder_id.inner_ref())
        .bind(version)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }
}
