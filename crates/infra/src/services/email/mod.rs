use crate::config::EmailProviderConfig;
use reqwest::Client;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{error, warn};

/// An email ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait::async_trait]
pub trait IEmailProvider: Send + Sync {
    /// Attempts to deliver one email. Never errors: `false` covers both a
    /// rejected delivery and a provider without configured credentials.
    async fn send(&self, message: &EmailMessage) -> bool;
}

const SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Serialize)]
struct MailAddress {
    email: String,
}

#[derive(Debug, Serialize)]
struct MailPersonalization {
    to: Vec<MailAddress>,
}

#[derive(Debug, Serialize)]
struct MailContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct MailSendRequest {
    personalizations: Vec<MailPersonalization>,
    from: MailAddress,
    subject: String,
    content: Vec<MailContent>,
}

pub struct EmailRestApi {
    client: Client,
    config: Option<EmailProviderConfig>,
}

impl EmailRestApi {
    pub fn new(config: Option<EmailProviderConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl IEmailProvider for EmailRestApi {
    async fn send(&self, message: &EmailMessage) -> bool {
        let config = match &self.config {
            Some(config) => config,
            None => {
                warn!("Email provider is not configured, dropping email to: {}", message.to);
                return false;
            }
        };

        let body = MailSendRequest {
            personalizations: vec![MailPersonalization {
                to: vec![MailAddress {
                    email: message.to.clone(),
                }],
            }],
            from: MailAddress {
                email: config.from_address.clone(),
            },
            subject: message.subject.clone(),
            content: vec![MailContent {
                content_type: "text/html".into(),
                value: message.html.clone(),
            }],
        };

        match self
            .client
            .post(SENDGRID_API_URL)
            .header("authorization", format!("Bearer {}", config.api_key))
            .json(&body)
            .send()
            .await
        {
            Ok(res) if res.status().is_success() => true,
            Ok(res) => {
                error!(
                    "[Unexpected Response] Email API rejected mail to: {}. Status code: {}",
                    message.to,
                    res.status()
                );
                false
            }
            Err(e) => {
                error!("[Network Error] Email API POST error. Error message: {:?}", e);
                false
            }
        }
    }
}

/// Email provider used in tests. Records what would have been sent and can
/// be flipped into an unhealthy state where every delivery fails.
pub struct InMemoryEmailProvider {
    sent: Mutex<Vec<EmailMessage>>,
    healthy: AtomicBool,
}

impl InMemoryEmailProvider {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEmailProvider for InMemoryEmailProvider {
    async fn send(&self, message: &EmailMessage) -> bool {
        if !self.healthy.load(Ordering::SeqCst) {
            return false;
        }
        self.sent.lock().unwrap().push(message.clone());
        true
    }
}
