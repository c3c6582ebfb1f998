use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// A `Reminder` represents a scheduled nudge attached to a `Note` at which
/// the owner should be notified on one or more channels.
///
/// Reminders are identified by the pair of `user_id` and `id`. The `id`
/// alone is only unique within one owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The owner this `Reminder` belongs to
    pub user_id: ID,
    /// The `Note` this `Reminder` is attached to, if it still exists
    pub note_id: Option<ID>,
    /// The nominal timestamp in millis at which the owner should be notified
    pub fire_at: i64,
    /// Optional override of `fire_at`, set when the owner snoozes the
    /// `Reminder` from a notification
    pub snooze_until: Option<i64>,
    pub status: ReminderStatus,
    /// Delivery channels requested on this `Reminder`. When empty the
    /// owner level defaults apply.
    pub channels: Vec<Channel>,
    pub frequency: ReminderFrequency,
    /// Raw schedule expression stored for `ReminderFrequency::Custom`.
    /// Dispatch never evaluates it.
    pub custom_cron: Option<String>,
    /// Copy of the note title taken when the `Reminder` was created or
    /// edited. Notifications render from this, not from the live note.
    pub title_snapshot: String,
    /// Copy of the note body taken when the `Reminder` was created or edited
    pub body_snapshot: String,
    pub last_sent_at: Option<i64>,
    /// This field is needed to avoid sending duplicate notifications when
    /// two dispatch runs overlap. For more info see the db schema comments
    pub version: i64,
    pub created: i64,
    pub updated: i64,
}

impl Reminder {
    /// The timestamp this `Reminder` is actually due at, with an active
    /// snooze taking precedence over the nominal fire time.
    pub fn effective_due_at(&self) -> i64 {
        self.snooze_until.unwrap_or(self.fire_at)
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.status.is_dispatchable() && self.effective_due_at() <= now
    }
}

impl Entity<ID> for Reminder {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Scheduled,
    Snoozed,
    Sent,
    Cancelled,
    Completed,
}

impl ReminderStatus {
    /// Whether a due scan should pick up reminders in this status.
    /// `Sent`, `Cancelled` and `Completed` reminders are never dispatched.
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Snoozed)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Snoozed => "snoozed",
            Self::Sent => "sent",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid reminder status: {0}")]
pub struct InvalidReminderStatusError(String);

impl FromStr for ReminderStatus {
    type Err = InvalidReminderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "snoozed" => Ok(Self::Snoozed),
            "sent" => Ok(Self::Sent),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(InvalidReminderStatusError(s.to_string())),
        }
    }
}

/// A delivery medium for reminder notifications.
///
/// `Push` needs no external provider: marking the reminder as fired is
/// what surfaces it in the owner's in-app overdue list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Push,
    Email,
    Sms,
}

impl Channel {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Once,
    Daily,
    Weekly,
    /// Repeats according to `Reminder::custom_cron`. Accepted at the edit
    /// surface but not evaluated by dispatch.
    Custom,
}

impl ReminderFrequency {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Custom => "custom",
        }
    }
}

impl Display for ReminderFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid reminder frequency: {0}")]
pub struct InvalidReminderFrequencyError(String);

impl FromStr for ReminderFrequency {
    type Err = InvalidReminderFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(Self::Once),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "custom" => Ok(Self::Custom),
            _ => Err(InvalidReminderFrequencyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder_with_times(fire_at: i64, snooze_until: Option<i64>) -> Reminder {
        Reminder {
            id: Default::default(),
            user_id: Default::default(),
            note_id: None,
            fire_at,
            snooze_until,
            status: ReminderStatus::Scheduled,
            channels: Vec::new(),
            frequency: ReminderFrequency::Once,
            custom_cron: None,
            title_snapshot: "Title".into(),
            body_snapshot: "Body".into(),
            last_sent_at: None,
            version: 0,
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn snooze_takes_precedence_over_fire_time() {
        assert_eq!(reminder_with_times(10, None).effective_due_at(), 10);
        assert_eq!(reminder_with_times(10, Some(25)).effective_due_at(), 25);
    }

    #[test]
    fn due_check_requires_dispatchable_status() {
        let mut reminder = reminder_with_times(10, None);
        assert!(reminder.is_due(10));
        assert!(!reminder.is_due(9));

        reminder.snooze_until = Some(20);
        reminder.status = ReminderStatus::Snoozed;
        assert!(!reminder.is_due(15));
        assert!(reminder.is_due(20));

        for status in [
            ReminderStatus::Sent,
            ReminderStatus::Cancelled,
            ReminderStatus::Completed,
        ] {
            reminder.status = status;
            assert!(!reminder.is_due(i64::MAX));
        }
    }

    #[test]
    fn status_round_trips_through_storage_representation() {
        for status in [
            ReminderStatus::Scheduled,
            ReminderStatus::Snoozed,
            ReminderStatus::Sent,
            ReminderStatus::Cancelled,
            ReminderStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<ReminderStatus>().unwrap(), status);
        }
        assert!("paused".parse::<ReminderStatus>().is_err());
    }

    #[test]
    fn frequency_round_trips_through_storage_representation() {
        for frequency in [
            ReminderFrequency::Once,
            ReminderFrequency::Daily,
            ReminderFrequency::Weekly,
            ReminderFrequency::Custom,
        ] {
            assert_eq!(
                frequency.to_string().parse::<ReminderFrequency>().unwrap(),
                frequency
            );
        }
        assert!("monthly".parse::<ReminderFrequency>().is_err());
    }
}
