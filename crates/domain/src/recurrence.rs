use crate::reminder::{MonthlyConfig, ReminderRecurrence, SkipDate, WeeklyConfig};
use chrono::{Datelike, Duration, LocalResult, NaiveDate, TimeZone};
use chrono_tz::Tz;

/// Computes the next absolute fire instant (millis) strictly after `basis`.
///
/// Pure and deterministic. Returns `None` for a one-time reminder whose
/// date has already passed and for a weekly reminder with no enabled
/// weekdays. Weekly/monthly rules resolve hour:minute in the family
/// timezone, so the result survives DST shifts and short months.
pub fn next_occurrence(recurrence: &ReminderRecurrence, basis: i64, timezone: &Tz) -> Option<i64> {
    match recurrence {
        ReminderRecurrence::OneTime(config) => {
            if config.date > basis {
                Some(config.date)
            } else {
                None
            }
        }
        ReminderRecurrence::Countdown(config) => {
            Some(basis + (config.execution_interval - config.interval_elapsed))
        }
        ReminderRecurrence::Weekly(config) => next_weekly(config, basis, timezone, true),
        ReminderRecurrence::Monthly(config) => next_monthly(config, basis, timezone, true),
    }
}

/// Whether a pending skip actually excluded the upcoming occurrence for
/// this basis. The caller clears the skip flag exactly when this is true,
/// so an edit that never reached the skipped day keeps the skip pending.
pub fn skip_consumed(recurrence: &ReminderRecurrence, basis: i64, timezone: &Tz) -> bool {
    match recurrence {
        ReminderRecurrence::Weekly(config) if config.skip.is_skipping => {
            next_weekly(config, basis, timezone, false) != next_weekly(config, basis, timezone, true)
        }
        ReminderRecurrence::Monthly(config) if config.skip.is_skipping => {
            next_monthly(config, basis, timezone, false)
                != next_monthly(config, basis, timezone, true)
        }
        _ => false,
    }
}

fn next_weekly(config: &WeeklyConfig, basis: i64, timezone: &Tz, honor_skip: bool) -> Option<i64> {
    if config.weekdays.is_empty() {
        return None;
    }
    let mut day = timezone.timestamp_millis(basis).date();
    // A skipped occurrence pushes the result at most one week further out
    for _ in 0..16 {
        if config.weekdays.contains(&day.weekday()) {
            if let Some(candidate) = local_instant(
                timezone,
                day.year(),
                day.month(),
                day.day(),
                config.hour,
                config.minute,
            ) {
                if candidate > basis
                    && !(honor_skip && excluded_by_skip(&config.skip, candidate, timezone))
                {
                    return Some(candidate);
                }
            }
        }
        day = day.succ();
    }
    None
}

fn next_monthly(
    config: &MonthlyConfig,
    basis: i64,
    timezone: &Tz,
    honor_skip: bool,
) -> Option<i64> {
    let basis_date = timezone.timestamp_millis(basis).date();
    let mut year = basis_date.year();
    let mut month = basis_date.month();
    for _ in 0..14 {
        let day = config.day_of_month.min(days_in_month(year, month));
        if let Some(candidate) = local_instant(timezone, year, month, day, config.hour, config.minute)
        {
            if candidate > basis
                && !(honor_skip && excluded_by_skip(&config.skip, candidate, timezone))
            {
                return Some(candidate);
            }
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    None
}

fn excluded_by_skip(skip: &SkipDate, candidate: i64, timezone: &Tz) -> bool {
    if !skip.is_skipping {
        return false;
    }
    match skip.skip_date {
        Some(skip_date) => {
            timezone.timestamp_millis(candidate).date()
                == timezone.timestamp_millis(skip_date).date()
        }
        None => false,
    }
}

/// Resolves a wall-clock time in `timezone` to an absolute instant.
/// A time that does not exist because the clock jumped forward is shifted
/// with the gap; a time that exists twice takes the earlier offset.
fn local_instant(
    timezone: &Tz,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<i64> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.timestamp_millis()),
        LocalResult::Ambiguous(first, _) => Some(first.timestamp_millis()),
        LocalResult::None => timezone
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.timestamp_millis()),
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd(next_year, next_month, 1).pred().day()
}
