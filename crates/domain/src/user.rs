use crate::reminder::Channel;
use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;

/// Contact details for a `User`, looked up in the managed auth directory.
///
/// Every field is optional. A failed directory lookup is represented as a
/// record with nothing in it, never as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserContact {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub display_name: Option<String>,
}

impl UserContact {
    /// The record used when the directory has no answer for a `User`
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Owner level settings consulted when a `Reminder` does not carry its own
/// channel list or the directory has no phone number.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPreferences {
    pub user_id: ID,
    /// Default delivery channels for reminders that do not request any
    pub reminder_channels: Vec<Channel>,
    /// Fallback SMS destination
    pub sms_number: Option<String>,
    /// Timezone the owner reads due times in. Also anchors the calendar
    /// arithmetic when a recurring `Reminder` is rescheduled.
    pub timezone: Tz,
}

impl UserPreferences {
    pub fn new(user_id: ID) -> Self {
        Self {
            user_id,
            reminder_channels: Vec::new(),
            sms_number: None,
            timezone: chrono_tz::UTC,
        }
    }
}

impl Entity<ID> for UserPreferences {
    fn id(&self) -> ID {
        self.user_id.clone()
    }
}
