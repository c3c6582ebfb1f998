use super::delivery::deliver;
use super::owner_cache::OwnerLookupCache;
use crate::error::NotelyError;
use crate::shared::auth::protect_dispatch_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{SecondsFormat, TimeZone, Utc};
use notely_api_structs::dispatch_due_reminders::APIResponse;
use notely_api_structs::dtos::DispatchedReminderDTO;
use notely_domain::{
    next_occurrence, Channel, EffectiveChannels, NotificationContent, Reminder, ReminderStatus, ID,
};
use notely_infra::NotelyContext;
use std::collections::HashMap;
use tracing::{error, info};

pub async fn dispatch_due_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotelyContext>,
) -> Result<HttpResponse, NotelyError> {
    protect_dispatch_route(&http_req, &ctx)?;

    let usecase = DispatchDueRemindersUseCase {
        batch_size: ctx.config.reminder_batch_size,
    };

    execute(usecase, &ctx)
        .await
        .map(|dispatched| {
            let reminders = dispatched
                .into_iter()
                .map(|reminder| {
                    DispatchedReminderDTO::new(
                        reminder.reminder_id,
                        reminder.owner_id,
                        reminder.delivered,
                        reminder.next_fire_at.map(format_fire_at),
                    )
                })
                .collect();
            HttpResponse::Ok().json(APIResponse::new(reminders))
        })
        .map_err(NotelyError::from)
}

fn format_fire_at(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(next) => next.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => millis.to_string(),
    }
}

/// Finds every due reminder, notifies its owner on the resolved channels
/// and then reschedules or closes the reminder.
#[derive(Debug)]
pub struct DispatchDueRemindersUseCase {
    /// Maximum number of reminders fetched per status partition, so one
    /// run handles at most twice this number
    pub batch_size: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for NotelyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

/// What happened to one claimed reminder during a dispatch run
#[derive(Debug)]
pub struct DispatchedReminder {
    pub reminder_id: ID,
    pub owner_id: ID,
    /// Channels delivery actually went out on
    pub delivered: Vec<Channel>,
    pub next_fire_at: Option<i64>,
}

// A reminder could show up in both status partitions if its status changed
// between the two queries. Merging over the composite key keeps it once,
// first partition wins.
fn merge_due_reminders(scheduled: Vec<Reminder>, snoozed: Vec<Reminder>) -> Vec<Reminder> {
    let mut unique: HashMap<(ID, ID), Reminder> = HashMap::new();
    for reminder in scheduled.into_iter().chain(snoozed) {
        unique
            .entry((reminder.user_id.clone(), reminder.id.clone()))
            .or_insert(reminder);
    }

    let mut due = unique.into_values().collect::<Vec<_>>();
    // Oldest due first so a backlog drains in due order
    due.sort_by_key(|reminder| (reminder.effective_due_at(), reminder.id.as_string()));
    due
}

/// Handles one due reminder. Returns `None` when the reminder was skipped
/// without any delivery attempt, either because an overlapping run already
/// claimed it or because the claim itself failed.
async fn dispatch_one(
    mut reminder: Reminder,
    now: i64,
    owners: &mut OwnerLookupCache,
    ctx: &NotelyContext,
) -> Option<DispatchedReminder> {
    match ctx
        .repos
        .reminders
        .claim(&reminder.user_id, &reminder.id, reminder.version)
        .await
    {
        Ok(true) => reminder.version += 1,
        Ok(false) => {
            info!(
                "Reminder: {} was already claimed by an overlapping dispatch run",
                reminder.id
            );
            return None;
        }
        Err(e) => {
            error!(
                "Unable to claim reminder: {}. Error message: {:?}",
                reminder.id, e
            );
            return None;
        }
    }

    let contact = owners.contact(&reminder.user_id, ctx).await;
    let preferences = owners.preferences(&reminder.user_id, ctx).await;
    let timezone = preferences
        .as_ref()
        .map(|preferences| preferences.timezone)
        .unwrap_or(chrono_tz::UTC);

    let effective = EffectiveChannels::resolve(&reminder, &contact, preferences.as_ref());
    let content = NotificationContent::compose(&reminder, timezone);
    let delivered = deliver(&content, &effective, &contact, &ctx.providers).await;

    // Computed before the snooze is cleared, a snoozed recurring reminder
    // repeats from the time it actually fired at
    let next_fire_at =
        match next_occurrence(reminder.frequency, reminder.effective_due_at(), timezone) {
            Ok(next) => next,
            Err(e) => {
                error!(
                    "Unable to compute the next occurrence for reminder: {}. Error message: {:?}",
                    reminder.id, e
                );
                None
            }
        };

    reminder.snooze_until = None;
    reminder.last_sent_at = Some(now);
    reminder.updated = now;
    match next_fire_at {
        Some(next) => {
            reminder.fire_at = next;
            reminder.status = ReminderStatus::Scheduled;
        }
        None => {
            reminder.status = ReminderStatus::Sent;
        }
    }

    if let Err(e) = ctx.repos.reminders.save(&reminder).await {
        error!(
            "Unable to save dispatched reminder: {}. Error message: {:?}",
            reminder.id, e
        );
    } else if let (Some(note_id), Some(next)) = (&reminder.note_id, next_fire_at) {
        if let Err(e) = ctx.repos.notes.set_reminder_at(note_id, next, now).await {
            error!(
                "Unable to mirror the new fire time onto note: {}. Error message: {:?}",
                note_id, e
            );
        }
    }

    Some(DispatchedReminder {
        reminder_id: reminder.id,
        owner_id: reminder.user_id,
        delivered,
        next_fire_at,
    })
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchDueRemindersUseCase {
    type Response = Vec<DispatchedReminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchDueReminders";

    async fn execute(&mut self, ctx: &NotelyContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        let scheduled = ctx
            .repos
            .reminders
            .find_due_by_status(ReminderStatus::Scheduled, now, self.batch_size)
            .await
            .map_err(|e| {
                error!(
                    "Unable to query due scheduled reminders. Error message: {:?}",
                    e
                );
                UseCaseError::StorageError
            })?;
        let snoozed = ctx
            .repos
            .reminders
            .find_due_by_status(ReminderStatus::Snoozed, now, self.batch_size)
            .await
            .map_err(|e| {
                error!(
                    "Unable to query due snoozed reminders. Error message: {:?}",
                    e
                );
                UseCaseError::StorageError
            })?;

        let due = merge_due_reminders(scheduled, snoozed);

        let mut owners = OwnerLookupCache::new();
        let mut dispatched = Vec::with_capacity(due.len());
        for reminder in due {
            if let Some(summary) = dispatch_one(reminder, now, &mut owners, ctx).await {
                dispatched.push(summary);
            }
        }

        info!("Dispatch run processed {} reminders", dispatched.len());
        Ok(dispatched)
    }
}
