use crate::config::UserDirectoryConfig;
use notely_domain::{UserContact, ID};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

#[async_trait::async_trait]
pub trait IUserDirectory: Send + Sync {
    /// Contact details for an owner from the managed auth service. Lookups
    /// cannot fail: any error collapses into a record with every field
    /// empty, and dispatch carries on with the channels that work without
    /// contact details.
    async fn find_contact(&self, user_id: &ID) -> UserContact;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryUserResponse {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct UserDirectoryRestApi {
    client: Client,
    config: Option<UserDirectoryConfig>,
}

impl UserDirectoryRestApi {
    pub fn new(config: Option<UserDirectoryConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl IUserDirectory for UserDirectoryRestApi {
    async fn find_contact(&self, user_id: &ID) -> UserContact {
        let config = match &self.config {
            Some(config) => config,
            None => {
                warn!("User directory is not configured, no contact details for user: {}", user_id);
                return UserContact::unknown();
            }
        };

        let res = match self
            .client
            .get(format!("{}/users/{}", config.base_url, user_id))
            .header("authorization", format!("Bearer {}", config.api_key))
            .send()
            .await
        {
            Ok(res) if res.status().is_success() => res,
            Ok(res) => {
                warn!(
                    "User directory lookup for user: {} failed. Status code: {}",
                    user_id,
                    res.status()
                );
                return UserContact::unknown();
            }
            Err(e) => {
                warn!(
                    "User directory lookup for user: {} failed. Error message: {:?}",
                    user_id, e
                );
                return UserContact::unknown();
            }
        };

        match res.json::<DirectoryUserResponse>().await {
            Ok(user) => UserContact {
                email: user.email,
                phone_number: user.phone_number,
                display_name: user.display_name,
            },
            Err(e) => {
                warn!(
                    "User directory gave an undecodable response for user: {}. Error message: {:?}",
                    user_id, e
                );
                UserContact::unknown()
            }
        }
    }
}

/// Directory used in tests, backed by a plain map
pub struct InMemoryUserDirectory {
    contacts: Mutex<HashMap<ID, UserContact>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            contacts: Mutex::new(HashMap::new()),
        }
    }

    pub fn upsert(&self, user_id: ID, contact: UserContact) {
        self.contacts.lock().unwrap().insert(user_id, contact);
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IUserDirectory for InMemoryUserDirectory {
    async fn find_contact(&self, user_id: &ID) -> UserContact {
        self.contacts
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_else(UserContact::unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_directory_yields_an_unknown_contact() {
        let directory = UserDirectoryRestApi::new(None);

        let contact = directory.find_contact(&ID::default()).await;

        assert_eq!(contact, UserContact::unknown());
    }
}
