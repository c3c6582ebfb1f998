use crate::config::SmsProviderConfig;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{error, warn};

/// A text message ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

#[async_trait::async_trait]
pub trait ISmsProvider: Send + Sync {
    /// Attempts to deliver one text message. Never errors: `false` covers
    /// both a rejected delivery and a provider without configured
    /// credentials.
    async fn send(&self, message: &SmsMessage) -> bool;
}

const TWILIO_API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

pub struct SmsRestApi {
    client: Client,
    config: Option<SmsProviderConfig>,
}

impl SmsRestApi {
    pub fn new(config: Option<SmsProviderConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl ISmsProvider for SmsRestApi {
    async fn send(&self, message: &SmsMessage) -> bool {
        let config = match &self.config {
            Some(config) => config,
            None => {
                warn!("SMS provider is not configured, dropping sms to: {}", message.to);
                return false;
            }
        };

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE_URL, config.account_sid
        );
        let params = [
            ("To", message.to.as_str()),
            ("From", config.from_number.as_str()),
            ("Body", message.body.as_str()),
        ];

        match self
            .client
            .post(&url)
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&params)
            .send()
            .await
        {
            Ok(res) if res.status().is_success() => true,
            Ok(res) => {
                error!(
                    "[Unexpected Response] SMS API rejected sms to: {}. Status code: {}",
                    message.to,
                    res.status()
                );
                false
            }
            Err(e) => {
                error!("[Network Error] SMS API POST error. Error message: {:?}", e);
                false
            }
        }
    }
}

/// SMS provider used in tests. Records what would have been sent and can
/// be flipped into an unhealthy state where every delivery fails.
pub struct InMemorySmsProvider {
    sent: Mutex<Vec<SmsMessage>>,
    healthy: AtomicBool,
}

impl InMemorySmsProvider {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn sent_messages(&self) -> Vec<SmsMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemorySmsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISmsProvider for InMemorySmsProvider {
    async fn send(&self, message: &SmsMessage) -> bool {
        if !self.healthy.load(Ordering::SeqCst) {
            return false;
        }
        self.sent.lock().unwrap().push(message.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_sms_provider_declines_to_send() {
        let provider = SmsRestApi::new(None);
        let message = SmsMessage {
            to: "+15550100".into(),
            body: "Pay rent is due".into(),
        };

        assert!(!provider.send(&message).await);
    }
}
