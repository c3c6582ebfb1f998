mod note;
mod notification;
mod recurrence;
mod reminder;
mod shared;
mod user;

pub use note::Note;
pub use notification::{format_due_time, EffectiveChannels, NotificationContent};
pub use recurrence::{next_occurrence, RecurrenceError};
pub use reminder::{Channel, Reminder, ReminderFrequency, ReminderStatus};
pub use shared::entity::{Entity, ID};
pub use user::{UserContact, UserPreferences};
