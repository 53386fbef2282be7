use crate::{Dog, Family, Reminder};

/// The single predicate deciding whether a reminder should have an armed
/// alarm. Mutation handlers, fire callbacks and the boot-time recovery all
/// evaluate this same function, so the paths cannot drift apart.
pub fn is_schedulable(reminder: &Reminder, dog: &Dog, family: &Family) -> bool {
    reminder.is_enabled
        && !reminder.is_deleted
        && reminder.execution_date.is_some()
        && !dog.is_deleted
        && !family.is_paused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::{CountdownConfig, ReminderAction, ReminderRecurrence};
    use crate::shared::entity::ID;

    fn setup() -> (Reminder, Dog, Family) {
        let family = Family::new("Lennox", 10);
        let dog = Dog::new(family.id.clone(), "Bella");
        let mut reminder = Reminder::new(
            dog.id.clone(),
            family.id.clone(),
            ReminderAction::Feed,
            ReminderRecurrence::Countdown(CountdownConfig {
                execution_interval: 1800 * 1000,
                interval_elapsed: 0,
            }),
        );
        reminder.execution_date = Some(10_000);
        (reminder, dog, family)
    }

    #[test]
    fn schedulable_when_everything_is_live() {
        let (reminder, dog, family) = setup();
        assert!(is_schedulable(&reminder, &dog, &family));
    }

    #[test]
    fn any_dead_flag_blocks_scheduling() {
        let (reminder, dog, family) = setup();

        let mut r = reminder.clone();
        r.is_enabled = false;
        assert!(!is_schedulable(&r, &dog, &family));

        let mut r = reminder.clone();
        r.is_deleted = true;
        assert!(!is_schedulable(&r, &dog, &family));

        let mut r = reminder.clone();
        r.execution_date = None;
        assert!(!is_schedulable(&r, &dog, &family));

        let mut d = dog.clone();
        d.is_deleted = true;
        assert!(!is_schedulable(&reminder, &d, &family));

        let mut f = family;
        f.is_paused = true;
        assert!(!is_schedulable(&reminder, &dog, &f));
    }
}
