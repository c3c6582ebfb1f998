mod directory;
mod email;
mod sms;

use crate::config::Config;
pub use directory::{IUserDirectory, InMemoryUserDirectory, UserDirectoryRestApi};
pub use email::{EmailMessage, EmailRestApi, IEmailProvider, InMemoryEmailProvider};
pub use sms::{ISmsProvider, InMemorySmsProvider, SmsMessage, SmsRestApi};
use std::sync::Arc;

/// The external collaborators reminder dispatch talks to: the delivery
/// providers for the notification channels and the managed auth directory
/// holding contact details.
#[derive(Clone)]
pub struct Providers {
    pub email: Arc<dyn IEmailProvider>,
    pub sms: Arc<dyn ISmsProvider>,
    pub directory: Arc<dyn IUserDirectory>,
}

impl Providers {
    pub fn create(config: &Config) -> Self {
        Self {
            email: Arc::new(EmailRestApi::new(config.email_provider.clone())),
            sms: Arc::new(SmsRestApi::new(config.sms_provider.clone())),
            directory: Arc::new(UserDirectoryRestApi::new(config.user_directory.clone())),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            email: Arc::new(InMemoryEmailProvider::new()),
            sms: Arc::new(InMemorySmsProvider::new()),
            directory: Arc::new(InMemoryUserDirectory::new()),
        }
    }
}
