mod note;
mod reminder;
mod shared;
mod user_preferences;

pub use note::{INoteRepo, InMemoryNoteRepo, PostgresNoteRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use user_preferences::{IPreferencesRepo, InMemoryPreferencesRepo, PostgresPreferencesRepo};

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub notes: Arc<dyn INoteRepo>,
    pub user_preferences: Arc<dyn IPreferencesRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            notes: Arc::new(PostgresNoteRepo::new(pool.clone())),
            user_preferences: Arc::new(PostgresPreferencesRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            notes: Arc::new(InMemoryNoteRepo::new()),
            user_preferences: Arc::new(InMemoryPreferencesRepo::new()),
        }
    }
}
