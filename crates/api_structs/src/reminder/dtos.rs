use notely_domain::{Channel, ID};
use serde::{Deserialize, Serialize};

/// Delivery summary for one reminder handled by a dispatch run
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DispatchedReminderDTO {
    pub reminder_id: ID,
    pub owner_id: ID,
    /// Channels that were actually delivered, which can be fewer than the
    /// channels the reminder asked for
    pub channels: Vec<Channel>,
    /// Next fire time as an ISO 8601 timestamp for recurring reminders,
    /// `null` when the reminder is done
    pub next_fire_at: Option<String>,
}

impl DispatchedReminderDTO {
    pub fn new(
        reminder_id: ID,
        owner_id: ID,
        channels: Vec<Channel>,
        next_fire_at: Option<String>,
    ) -> Self {
        Self {
            reminder_id,
            owner_id,
            channels,
            next_fire_at,
        }
    }
}
