use notely_domain::{UserContact, UserPreferences, ID};
use notely_infra::NotelyContext;
use std::collections::HashMap;
use tracing::warn;

/// Memoized owner lookups for the duration of one dispatch run.
///
/// Several due reminders usually belong to the same owner, and the
/// directory lookup is a network call. The cache is created per run and
/// handed down the call chain, overlapping runs never share one, so stale
/// contact details cannot outlive the run that read them.
#[derive(Default)]
pub struct OwnerLookupCache {
    contacts: HashMap<ID, UserContact>,
    preferences: HashMap<ID, Option<UserPreferences>>,
}

impl OwnerLookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contact(&mut self, user_id: &ID, ctx: &NotelyContext) -> UserContact {
        if let Some(contact) = self.contacts.get(user_id) {
            return contact.clone();
        }
        let contact = ctx.providers.directory.find_contact(user_id).await;
        self.contacts.insert(user_id.clone(), contact.clone());
        contact
    }

    /// A failing preferences query is remembered as "no preferences" so a
    /// broken row cannot make the run retry the query for every reminder
    /// of the same owner.
    pub async fn preferences(
        &mut self,
        user_id: &ID,
        ctx: &NotelyContext,
    ) -> Option<UserPreferences> {
        if let Some(preferences) = self.preferences.get(user_id) {
            return preferences.clone();
        }
        let preferences = match ctx.repos.user_preferences.find(user_id).await {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!(
                    "Unable to query preferences for user: {}, continuing without them. Error message: {:?}",
                    user_id, e
                );
                None
            }
        };
        self.preferences.insert(user_id.clone(), preferences.clone());
        preferences
    }
}
