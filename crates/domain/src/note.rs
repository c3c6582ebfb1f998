use crate::shared::entity::{Entity, ID};

/// A `Note` written by a `User`. Dispatch only touches the denormalized
/// `reminder_at` field, which mirrors the next fire time of the reminder
/// attached to this note so that note lists can render it without a join.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    /// Next fire time of the attached `Reminder`, if any
    pub reminder_at: Option<i64>,
    pub updated: i64,
}

impl Entity<ID> for Note {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
