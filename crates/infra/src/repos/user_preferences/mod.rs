mod inmemory;
mod postgres;

pub use inmemory::InMemoryPreferencesRepo;
use notely_domain::{UserPreferences, ID};
pub use postgres::PostgresPreferencesRepo;

#[async_trait::async_trait]
pub trait IPreferencesRepo: Send + Sync {
    async fn insert(&self, preferences: &UserPreferences) -> anyhow::Result<()>;
    /// `Ok(None)` means the owner simply has no stored preferences, which
    /// is the common case. Query failures are surfaced so that callers can
    /// decide how defensively to treat them.
    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<UserPreferences>>;
}
