use crate::shared::entity::{Entity, ID};
use chrono_tz::{Tz, UTC};
use pawtime_utils::create_random_secret;

const API_KEY_LEN: usize = 30;

/// A `Family` is the unit that shares `Dog`s and their `Reminder`s.
/// Every member receives the alarm broadcast when a reminder fires.
#[derive(Debug, Clone)]
pub struct Family {
    pub id: ID,
    pub name: String,
    /// Secret presented by clients in the `Authorization` header
    pub api_key: String,
    /// Timezone in which wall-clock reminder rules (weekly/monthly) resolve
    pub timezone: Tz,
    /// When paused, no alarm of this family is armed. Stored execution
    /// state is left untouched so resuming restores the schedule.
    pub is_paused: bool,
    /// A locked family does not accept new members
    pub is_locked: bool,
    /// Maximum number of live (non-deleted) reminders, set from the
    /// family's subscription tier
    pub reminder_limit: usize,
}

impl Family {
    pub fn new(name: &str, reminder_limit: usize) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
            api_key: create_random_secret(API_KEY_LEN),
            timezone: UTC,
            is_paused: false,
            is_locked: false,
            reminder_limit,
        }
    }

    pub fn set_timezone(&mut self, timezone: &str) -> bool {
        match timezone.parse::<Tz>() {
            Ok(tzid) => {
                self.timezone = tzid;
                true
            }
            Err(_) => false,
        }
    }
}

impl Entity for Family {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_family_gets_api_key_and_utc() {
        let family = Family::new("Lennox", 10);
        assert_eq!(family.api_key.len(), API_KEY_LEN);
        assert_eq!(family.timezone, UTC);
        assert!(!family.is_paused);
    }

    #[test]
    fn set_timezone_accepts_valid_and_rejects_garbage() {
        let mut family = Family::new("Lennox", 10);
        assert!(family.set_timezone("Europe/Oslo"));
        assert_eq!(family.timezone, chrono_tz::Europe::Oslo);
        assert!(!family.set_timezone("Mars/Olympus"));
        assert_eq!(family.timezone, chrono_tz::Europe::Oslo);
    }
}
