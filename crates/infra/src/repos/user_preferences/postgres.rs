use super::IPreferencesRepo;
use chrono_tz::Tz;
use notely_domain::{Channel, UserPreferences, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::warn;

pub struct PostgresPreferencesRepo {
    pool: PgPool,
}

impl PostgresPreferencesRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PreferencesRaw {
    user_uid: Uuid,
    reminder_channels: Json<Vec<Channel>>,
    sms_number: Option<String>,
    timezone: String,
}

impl From<PreferencesRaw> for UserPreferences {
    fn from(e: PreferencesRaw) -> Self {
        let timezone = match e.timezone.parse::<Tz>() {
            Ok(timezone) => timezone,
            Err(_) => {
                warn!(
                    "User: {} has the unknown timezone: {} stored, using UTC for them.",
                    e.user_uid, e.timezone
                );
                chrono_tz::UTC
            }
        };
        Self {
            user_id: e.user_uid.into(),
            reminder_channels: e.reminder_channels.0,
            sms_number: e.sms_number,
            timezone,
        }
    }
}

#[async_trait::async_trait]
impl IPreferencesRepo for PostgresPreferencesRepo {
    async fn insert(&self, preferences: &UserPreferences) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences
            (user_uid, reminder_channels, sms_number, timezone)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(preferences.user_id.inner_ref())
        .bind(Json(&preferences.reminder_channels))
        .bind(&preferences.sms_number)
        .bind(preferences.timezone.name())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<UserPreferences>> {
        let preferences: Option<PreferencesRaw> = sqlx::query_as(
            r#"
            SELECT * FROM user_preferences
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(preferences.map(|preferences| preferences.into()))
    }
}
