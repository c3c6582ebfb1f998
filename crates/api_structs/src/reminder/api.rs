use crate::dtos::DispatchedReminderDTO;
use serde::{Deserialize, Serialize};

pub mod dispatch_due_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub processed: usize,
        /// Left out entirely when the run had no due reminders
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub reminders: Option<Vec<DispatchedReminderDTO>>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<DispatchedReminderDTO>) -> Self {
            Self {
                processed: reminders.len(),
                reminders: if reminders.is_empty() {
                    None
                } else {
                    Some(reminders)
                },
            }
        }
    }
}
