use super::IPreferencesRepo;
use crate::repos::shared::inmemory_repo::*;
use notely_domain::{UserPreferences, ID};
use std::sync::Mutex;

pub struct InMemoryPreferencesRepo {
    preferences: Mutex<Vec<UserPreferences>>,
}

impl InMemoryPreferencesRepo {
    pub fn new() -> Self {
        Self {
            preferences: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPreferencesRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPreferencesRepo for InMemoryPreferencesRepo {
    async fn insert(&self, preferences: &UserPreferences) -> anyhow::Result<()> {
        insert(preferences, &self.preferences);
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<UserPreferences>> {
        Ok(find(user_id, &self.preferences))
    }
}
