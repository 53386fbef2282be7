mod dog;
mod family;
pub mod recurrence;
mod reminder;
pub mod scheduling;
mod shared;
mod user;

pub use dog::Dog;
pub use family::Family;
pub use reminder::{
    CountdownConfig, InvalidReminderError, MonthlyConfig, OneTimeConfig, Reminder, ReminderAction,
    ReminderRecurrence, SkipDate, WeeklyConfig,
};
pub use shared::entity::{Entity, ID};
pub use user::{User, DEFAULT_FOLLOW_UP_DELAY_MILLIS};
