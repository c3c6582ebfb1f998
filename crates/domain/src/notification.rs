use crate::reminder::{Channel, Reminder};
use crate::user::{UserContact, UserPreferences};
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use itertools::Itertools;

/// Title used in notifications when the stored title snapshot is blank
const UNTITLED_NOTE: &str = "Untitled note";

/// The channels one `Reminder` will actually be attempted on, together with
/// the resolved SMS destination.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveChannels {
    pub channels: Vec<Channel>,
    /// Phone number to use for the `Channel::Sms` attempt. `None` means
    /// SMS delivery is skipped for this reminder.
    pub sms_to: Option<String>,
}

impl EffectiveChannels {
    /// Applies the channel fallback chain for one `Reminder`.
    ///
    /// The reminder's own channel list wins. When it is empty the owner's
    /// default channels from `UserPreferences` apply, and when those are
    /// missing too the reminder falls back to push only. Duplicates are
    /// dropped, keeping first occurrence order.
    ///
    /// The SMS destination prefers the directory phone number over the
    /// number stored in `UserPreferences`. Blank numbers count as absent.
    pub fn resolve(
        reminder: &Reminder,
        contact: &UserContact,
        preferences: Option<&UserPreferences>,
    ) -> Self {
        let requested = if !reminder.channels.is_empty() {
            reminder.channels.clone()
        } else {
            match preferences {
                Some(preferences) if !preferences.reminder_channels.is_empty() => {
                    preferences.reminder_channels.clone()
                }
                _ => vec![Channel::Push],
            }
        };

        let sms_to = contact
            .phone_number
            .clone()
            .filter(|number| !number.is_empty())
            .or_else(|| {
                preferences
                    .and_then(|preferences| preferences.sms_number.clone())
                    .filter(|number| !number.is_empty())
            });

        Self {
            channels: requested.into_iter().unique().collect(),
            sms_to,
        }
    }
}

/// Rendered notification payloads for one `Reminder`.
///
/// All fields derive from the snapshots stored on the reminder, never from
/// the live note, so an edited or deleted note does not change what the
/// owner asked to be reminded about.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    pub subject: String,
    pub html: String,
    pub sms_body: String,
}

impl NotificationContent {
    pub fn compose(reminder: &Reminder, timezone: Tz) -> Self {
        let title = reminder.title_snapshot.trim();
        let title = if title.is_empty() { UNTITLED_NOTE } else { title };
        let subject = format!("Reminder: {}", title);
        let due = format_due_time(reminder.effective_due_at(), timezone);
        let html = format!(
            "<h2>{}</h2><p>Due {}</p><p>{}</p>",
            escape_html(title),
            due,
            escape_html(&reminder.body_snapshot)
        );
        let sms_body = format!("{}\nDue {}", subject, due);

        Self {
            subject,
            html,
            sms_body,
        }
    }
}

/// Formats a due time the way notifications show it, in the owner's
/// timezone. For example `Mar 1, 2024, 9:00 AM`.
pub fn format_due_time(timestamp_millis: i64, timezone: Tz) -> String {
    match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(due) => due
            .with_timezone(&timezone)
            .format("%b %-d, %Y, %-I:%M %p")
            .to_string(),
        // Only reachable with corrupt stored timestamps
        None => timestamp_millis.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
