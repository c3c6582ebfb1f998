use crate::reminder::ReminderFrequency;
use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecurrenceError {
    /// The reminder carries a `custom` schedule expression, which dispatch
    /// does not evaluate. The reminder should never have reached dispatch
    /// in this shape, so this is surfaced instead of being treated as a
    /// one-shot reminder silently.
    #[error("Custom recurrence rules are not supported")]
    CustomRuleUnsupported,
    #[error("Due timestamp in millis: {0} is out of range")]
    DueTimeOutOfRange(i64),
}

/// Computes the next fire time in millis for a `Reminder` that just fired
/// at `due_at_millis`, or `None` when the reminder does not repeat.
///
/// `Daily` and `Weekly` add whole calendar days in the owner's timezone, so
/// a reminder due at 09:00 stays at 09:00 across DST transitions and month
/// boundaries rather than drifting by the UTC offset change.
pub fn next_occurrence(
    frequency: ReminderFrequency,
    due_at_millis: i64,
    timezone: Tz,
) -> Result<Option<i64>, RecurrenceError> {
    let days = match frequency {
        ReminderFrequency::Once => return Ok(None),
        ReminderFrequency::Daily => 1,
        ReminderFrequency::Weekly => 7,
        ReminderFrequency::Custom => return Err(RecurrenceError::CustomRuleUnsupported),
    };

    let due = Utc
        .timestamp_millis_opt(due_at_millis)
        .single()
        .ok_or(RecurrenceError::DueTimeOutOfRange(due_at_millis))?
        .with_timezone(&timezone);

    let next = add_calendar_days(due, days)
        .ok_or(RecurrenceError::DueTimeOutOfRange(due_at_millis))?;

    Ok(Some(next.timestamp_millis()))
}

fn add_calendar_days(due: DateTime<Tz>, days: u64) -> Option<DateTime<Tz>> {
    // The target wall clock time can be nonexistent or ambiguous when it
    // lands on a DST transition. Fall back to exact 24 hour days then.
    due.checked_add_days(Days::new(days))
        .or_else(|| due.checked_add_signed(Duration::days(days as i64)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;
    use chrono_tz::UTC;

    fn millis(tz: Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        tz.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn one_shot_reminders_have_no_next_occurrence() {
        let due = millis(UTC, 2024, 1, 15, 9, 0);
        assert_eq!(next_occurrence(ReminderFrequency::Once, due, UTC), Ok(None));
    }

    #[test]
    fn daily_crosses_month_boundaries() {
        let due = millis(UTC, 2024, 1, 31, 9, 0);
        let expected = millis(UTC, 2024, 2, 1, 9, 0);
        assert_eq!(
            next_occurrence(ReminderFrequency::Daily, due, UTC),
            Ok(Some(expected))
        );
    }

    #[test]
    fn daily_handles_leap_days() {
        let due = millis(UTC, 2024, 2, 28, 9, 0);
        let expected = millis(UTC, 2024, 2, 29, 9, 0);
        assert_eq!(
            next_occurrence(ReminderFrequency::Daily, due, UTC),
            Ok(Some(expected))
        );
    }

    #[test]
    fn weekly_adds_seven_calendar_days() {
        let due = millis(UTC, 2024, 1, 1, 9, 0);
        let expected = millis(UTC, 2024, 1, 8, 9, 0);
        assert_eq!(
            next_occurrence(ReminderFrequency::Weekly, due, UTC),
            Ok(Some(expected))
        );
    }

    #[test]
    fn daily_keeps_wall_clock_time_across_dst_start() {
        // New York springs forward on 2024-03-10, so this day is only 23
        // hours long in UTC terms.
        let due = millis(New_York, 2024, 3, 9, 9, 0);
        let next = next_occurrence(ReminderFrequency::Daily, due, New_York)
            .unwrap()
            .unwrap();
        assert_eq!(next, millis(New_York, 2024, 3, 10, 9, 0));
        assert_eq!(next - due, Duration::hours(23).num_milliseconds());
    }

    #[test]
    fn daily_falls_back_to_fixed_days_when_target_time_does_not_exist() {
        // 02:30 does not exist on 2024-03-10 in New York.
        let due = millis(New_York, 2024, 3, 9, 2, 30);
        let next = next_occurrence(ReminderFrequency::Daily, due, New_York)
            .unwrap()
            .unwrap();
        assert_eq!(next - due, Duration::hours(24).num_milliseconds());
    }

    #[test]
    fn custom_frequency_is_rejected() {
        let due = millis(UTC, 2024, 1, 15, 9, 0);
        assert_eq!(
            next_occurrence(ReminderFrequency::Custom, due, UTC),
            Err(RecurrenceError::CustomRuleUnsupported)
        );
    }

    #[test]
    fn out_of_range_due_times_are_rejected() {
        assert_eq!(
            next_occurrence(ReminderFrequency::Daily, i64::MAX, UTC),
            Err(RecurrenceError::DueTimeOutOfRange(i64::MAX))
        );
    }

    #[test]
    fn daily_at_the_edge_of_the_supported_range_is_rejected() {
        // Representable on its own, but one more day is not.
        let due = DateTime::<Utc>::MAX_UTC.timestamp_millis();
        assert_eq!(
            next_occurrence(ReminderFrequency::Daily, due, UTC),
            Err(RecurrenceError::DueTimeOutOfRange(due))
        );
    }
}
