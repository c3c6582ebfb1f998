use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Maximum number of due reminders fetched per status partition in one
    /// dispatch run. A run looks at the `scheduled` and the `snoozed`
    /// partition, so it processes at most twice this number. This exists
    /// to keep a single run bounded when a backlog has piled up, the
    /// remainder is picked up by the next run.
    pub reminder_batch_size: i64,
    /// Shared secret the external cron scheduler has to present in the
    /// `x-dispatch-key` header. When not configured the dispatch route
    /// is open.
    pub dispatch_key: Option<String>,
    pub email_provider: Option<EmailProviderConfig>,
    pub sms_provider: Option<SmsProviderConfig>,
    pub user_directory: Option<UserDirectoryConfig>,
}

#[derive(Debug, Clone)]
pub struct EmailProviderConfig {
    pub api_key: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct SmsProviderConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct UserDirectoryConfig {
    pub base_url: String,
    pub api_key: String,
}

const DEFAULT_REMINDER_BATCH_SIZE: i64 = 100;

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let reminder_batch_size = match std::env::var("REMINDER_BATCH_SIZE") {
            Ok(size) => match size.parse::<i64>() {
                Ok(size) if size > 0 => size,
                _ => {
                    warn!(
                        "The given REMINDER_BATCH_SIZE: {} is not valid, falling back to the default batch size: {}.",
                        size, DEFAULT_REMINDER_BATCH_SIZE
                    );
                    DEFAULT_REMINDER_BATCH_SIZE
                }
            },
            Err(_) => DEFAULT_REMINDER_BATCH_SIZE,
        };

        let dispatch_key = std::env::var("REMINDER_DISPATCH_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let email_provider = match (
            std::env::var("SENDGRID_API_KEY"),
            std::env::var("EMAIL_FROM_ADDRESS"),
        ) {
            (Ok(api_key), Ok(from_address)) => Some(EmailProviderConfig {
                api_key,
                from_address,
            }),
            _ => None,
        };

        let sms_provider = match (
            std::env::var("TWILIO_ACCOUNT_SID"),
            std::env::var("TWILIO_AUTH_TOKEN"),
            std::env::var("TWILIO_FROM_NUMBER"),
        ) {
            (Ok(account_sid), Ok(auth_token), Ok(from_number)) => Some(SmsProviderConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        let user_directory = match (
            std::env::var("USER_DIRECTORY_BASE_URL"),
            std::env::var("USER_DIRECTORY_API_KEY"),
        ) {
            (Ok(base_url), Ok(api_key)) => Some(UserDirectoryConfig { base_url, api_key }),
            _ => None,
        };

        Self {
            port,
            reminder_batch_size,
            dispatch_key,
            email_provider,
            sms_provider,
            user_directory,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
