use crate::recurrence;
use crate::shared::entity::{Entity, ID};
use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the reminder is about. Shown in the notification title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderAction {
    Feed,
    Water,
    Walk,
    Brush,
    Bathe,
    Medicine,
    Potty,
    Custom,
}

impl ReminderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Water => "water",
            Self::Walk => "walk",
            Self::Brush => "brush",
            Self::Bathe => "bathe",
            Self::Medicine => "medicine",
            Self::Potty => "potty",
            Self::Custom => "custom",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "feed" => Some(Self::Feed),
            "water" => Some(Self::Water),
            "walk" => Some(Self::Walk),
            "brush" => Some(Self::Brush),
            "bathe" => Some(Self::Bathe),
            "medicine" => Some(Self::Medicine),
            "potty" => Some(Self::Potty),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// The human readable name, falling back to the action itself when a
    /// custom reminder has no name.
    pub fn display_name(&self, custom_action_name: &str) -> String {
        match self {
            Self::Feed => "Feed".into(),
            Self::Water => "Fresh Water".into(),
            Self::Walk => "Walk".into(),
            Self::Brush => "Brush".into(),
            Self::Bathe => "Bathe".into(),
            Self::Medicine => "Medicine".into(),
            Self::Potty => "Potty".into(),
            Self::Custom => {
                if custom_action_name.is_empty() {
                    "Custom".into()
                } else {
                    custom_action_name.into()
                }
            }
        }
    }
}

/// Single-use exclusion of one upcoming weekly/monthly occurrence.
/// `skip_date` names the occurrence (compared by calendar day in the
/// family timezone) and the flag clears once a computation skipped it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipDate {
    pub is_skipping: bool,
    pub skip_date: Option<i64>,
}

impl SkipDate {
    pub fn clear(&mut self) {
        self.is_skipping = false;
        self.skip_date = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeConfig {
    /// The single absolute fire instant
    pub date: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownConfig {
    /// Full countdown duration in millis
    pub execution_interval: i64,
    /// Millis already consumed when the countdown was paused mid-flight
    pub interval_elapsed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyConfig {
    pub hour: u32,
    pub minute: u32,
    /// Enabled weekdays. Must not be empty for a schedulable reminder.
    pub weekdays: Vec<Weekday>,
    #[serde(default)]
    pub skip: SkipDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyConfig {
    /// 1-31, clamped to the last day of shorter months
    pub day_of_month: u32,
    pub hour: u32,
    pub minute: u32,
    #[serde(default)]
    pub skip: SkipDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "camelCase")]
pub enum ReminderRecurrence {
    OneTime(OneTimeConfig),
    Countdown(CountdownConfig),
    Weekly(WeeklyConfig),
    Monthly(MonthlyConfig),
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidReminderError {
    #[error("Hour must be between 0 and 23, got {0}")]
    InvalidHour(u32),
    #[error("Minute must be between 0 and 59, got {0}")]
    InvalidMinute(u32),
    #[error("Day of month must be between 1 and 31, got {0}")]
    InvalidDayOfMonth(u32),
    #[error("At least one weekday must be enabled")]
    EmptyWeekdays,
    #[error("Countdown interval must be positive")]
    InvalidCountdownInterval,
    #[error("Elapsed time cannot be negative or exceed the countdown interval")]
    InvalidIntervalElapsed,
    #[error("A custom reminder must have a custom action name")]
    MissingCustomActionName,
}

/// A recurring (or one-off) alarm for one `Dog`, broadcast to the whole
/// `Family` when it fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub dog_id: ID,
    pub family_id: ID,
    pub action: ReminderAction,
    pub custom_action_name: String,
    pub recurrence: ReminderRecurrence,
    pub is_enabled: bool,
    /// Soft delete, excluded from scheduling and query results
    pub is_deleted: bool,
    /// Instant the next occurrence is computed from. Advances on every
    /// fire, create and explicit skip.
    pub execution_basis: i64,
    /// The currently scheduled absolute fire instant. `None` while
    /// disabled, deleted, retired (fired one-time) or without a valid
    /// next occurrence.
    pub execution_date: Option<i64>,
}

impl Reminder {
    pub fn new(
        dog_id: ID,
        family_id: ID,
        action: ReminderAction,
        recurrence: ReminderRecurrence,
    ) -> Self {
        Self {
            id: Default::default(),
            dog_id,
            family_id,
            action,
            custom_action_name: String::new(),
            recurrence,
            is_enabled: true,
            is_deleted: false,
            execution_basis: 0,
            execution_date: None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self.recurrence, ReminderRecurrence::OneTime(_))
    }

    pub fn validate(&self) -> Result<(), InvalidReminderError> {
        if self.action == ReminderAction::Custom && self.custom_action_name.is_empty() {
            return Err(InvalidReminderError::MissingCustomActionName);
        }
        match &self.recurrence {
            ReminderRecurrence::OneTime(_) => Ok(()),
            ReminderRecurrence::Countdown(config) => {
                if config.execution_interval <= 0 {
                    return Err(InvalidReminderError::InvalidCountdownInterval);
                }
                if config.interval_elapsed < 0
                    || config.interval_elapsed >= config.execution_interval
                {
                    return Err(InvalidReminderError::InvalidIntervalElapsed);
                }
                Ok(())
            }
            ReminderRecurrence::Weekly(config) => {
                if config.weekdays.is_empty() {
                    return Err(InvalidReminderError::EmptyWeekdays);
                }
                validate_time_of_day(config.hour, config.minute)
            }
            ReminderRecurrence::Monthly(config) => {
                if config.day_of_month < 1 || config.day_of_month > 31 {
                    return Err(InvalidReminderError::InvalidDayOfMonth(config.day_of_month));
                }
                validate_time_of_day(config.hour, config.minute)
            }
        }
    }

    /// Moves the execution basis to `basis` and recomputes the scheduled
    /// fire instant. A pending skip that excluded the upcoming occurrence
    /// is consumed here, so the following computation no longer sees it.
    pub fn reschedule_from(&mut self, basis: i64, timezone: &Tz) {
        let skip_was_consumed = recurrence::skip_consumed(&self.recurrence, basis, timezone);
        self.execution_basis = basis;
        self.execution_date = recurrence::next_occurrence(&self.recurrence, basis, timezone);
        if skip_was_consumed {
            match &mut self.recurrence {
                ReminderRecurrence::Weekly(config) => config.skip.clear(),
                ReminderRecurrence::Monthly(config) => config.skip.clear(),
                _ => (),
            }
        }
    }
}

fn validate_time_of_day(hour: u32, minute: u32) -> Result<(), InvalidReminderError> {
    if hour > 23 {
        return Err(InvalidReminderError::InvalidHour(hour));
    }
    if minute > 59 {
        return Err(InvalidReminderError::InvalidMinute(minute));
    }
    Ok(())
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::UTC;

    fn countdown(interval: i64, elapsed: i64) -> Reminder {
        Reminder::new(
            ID::new(),
            ID::new(),
            ReminderAction::Feed,
            ReminderRecurrence::Countdown(CountdownConfig {
                execution_interval: interval,
                interval_elapsed: elapsed,
            }),
        )
    }

    #[test]
    fn validates_countdown_interval() {
        assert!(countdown(1800 * 1000, 0).validate().is_ok());
        assert_eq!(
            countdown(0, 0).validate(),
            Err(InvalidReminderError::InvalidCountdownInterval)
        );
        assert_eq!(
            countdown(1000, 1000).validate(),
            Err(InvalidReminderError::InvalidIntervalElapsed)
        );
    }

    #[test]
    fn validates_monthly_day_bounds() {
        let mut reminder = Reminder::new(
            ID::new(),
            ID::new(),
            ReminderAction::Medicine,
            ReminderRecurrence::Monthly(MonthlyConfig {
                day_of_month: 32,
                hour: 8,
                minute: 0,
                skip: Default::default(),
            }),
        );
        assert_eq!(
            reminder.validate(),
            Err(InvalidReminderError::InvalidDayOfMonth(32))
        );
        if let ReminderRecurrence::Monthly(config) = &mut reminder.recurrence {
            config.day_of_month = 31;
        }
        assert!(reminder.validate().is_ok());
    }

    #[test]
    fn custom_action_requires_name() {
        let mut reminder = Reminder::new(
            ID::new(),
            ID::new(),
            ReminderAction::Custom,
            ReminderRecurrence::OneTime(OneTimeConfig { date: 1 }),
        );
        assert_eq!(
            reminder.validate(),
            Err(InvalidReminderError::MissingCustomActionName)
        );
        reminder.custom_action_name = "Give treats".into();
        assert!(reminder.validate().is_ok());
    }

    #[test]
    fn reschedule_from_sets_basis_and_date() {
        let mut reminder = countdown(1800 * 1000, 0);
        reminder.reschedule_from(1_000_000, &UTC);
        assert_eq!(reminder.execution_basis, 1_000_000);
        assert_eq!(reminder.execution_date, Some(1_000_000 + 1800 * 1000));
    }

    #[test]
    fn reschedule_clears_a_consumed_skip() {
        // 2021-06-08 is a Tuesday
        let skipped = Utc.ymd(2021, 6, 8).and_hms(9, 0, 0).timestamp_millis();
        let mut reminder = Reminder::new(
            ID::new(),
            ID::new(),
            ReminderAction::Feed,
            ReminderRecurrence::Weekly(WeeklyConfig {
                hour: 9,
                minute: 0,
                weekdays: vec![Weekday::Tue],
                skip: SkipDate {
                    is_skipping: true,
                    skip_date: Some(skipped),
                },
            }),
        );

        let basis = Utc.ymd(2021, 6, 7).and_hms(10, 0, 0).timestamp_millis();
        reminder.reschedule_from(basis, &UTC);

        // The pending occurrence was excluded and the skip consumed
        let following_tuesday = Utc.ymd(2021, 6, 15).and_hms(9, 0, 0).timestamp_millis();
        assert_eq!(reminder.execution_date, Some(following_tuesday));
        match &reminder.recurrence {
            ReminderRecurrence::Weekly(config) => {
                assert!(!config.skip.is_skipping);
                assert_eq!(config.skip.skip_date, None);
            }
            _ => unreachable!(),
        }

        // The next computation no longer sees the old skip
        reminder.reschedule_from(skipped - 1000, &UTC);
        assert_eq!(reminder.execution_date, Some(skipped));
    }

    #[test]
    fn reschedule_keeps_a_skip_it_never_reached() {
        let skipped = Utc.ymd(2021, 6, 8).and_hms(9, 0, 0).timestamp_millis();
        let mut reminder = Reminder::new(
            ID::new(),
            ID::new(),
            ReminderAction::Feed,
            ReminderRecurrence::Weekly(WeeklyConfig {
                hour: 9,
                minute: 0,
                weekdays: vec![Weekday::Tue],
                skip: SkipDate {
                    is_skipping: true,
                    skip_date: Some(skipped),
                },
            }),
        );

        // Basis already past the skipped day
        let basis = Utc.ymd(2021, 6, 9).and_hms(0, 0, 0).timestamp_millis();
        reminder.reschedule_from(basis, &UTC);

        match &reminder.recurrence {
            ReminderRecurrence::Weekly(config) => assert!(config.skip.is_skipping),
            _ => unreachable!(),
        }
    }

    #[test]
    fn one_time_retires_after_date_has_passed() {
        let mut reminder = Reminder::new(
            ID::new(),
            ID::new(),
            ReminderAction::Walk,
            ReminderRecurrence::OneTime(OneTimeConfig { date: 500 }),
        );
        reminder.reschedule_from(1000, &UTC);
        assert_eq!(reminder.execution_date, None);
    }

    #[test]
    fn recurrence_serde_roundtrip() {
        let recurrence = ReminderRecurrence::Weekly(WeeklyConfig {
            hour: 7,
            minute: 30,
            weekdays: vec![Weekday::Mon, Weekday::Thu],
            skip: SkipDate {
                is_skipping: true,
                skip_date: Some(42),
            },
        });
        let json = serde_json::to_value(&recurrence).unwrap();
        assert_eq!(json["type"], "weekly");
        let back: ReminderRecurrence = serde_json::from_value(json).unwrap();
        assert_eq!(back, recurrence);
    }
}
