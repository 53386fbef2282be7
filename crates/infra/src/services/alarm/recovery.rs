use crate::repos::Repos;
use crate::services::alarm::scheduler::AlarmScheduler;
use pawtime_domain::scheduling;
use tracing::info;

/// Rebuilds the scheduler's job map from stored state. Runs once at boot
/// before any request is served; an unreadable store is fatal since the
/// process must not serve with an unknown schedule.
pub struct RecoveryCoordinator {
    repos: Repos,
    scheduler: AlarmScheduler,
}

impl RecoveryCoordinator {
    pub fn new(repos: Repos, scheduler: AlarmScheduler) -> Self {
        Self { repos, scheduler }
    }

    /// Replaces any transient in-memory schedule wholesale, so repeated
    /// runs converge on the same job set.
    pub async fn run(&self) -> anyhow::Result<()> {
        self.scheduler.clear();

        let mut armed = 0;
        let families = self.repos.families.find_all().await?;
        for family in families.iter().filter(|family| !family.is_paused) {
            let users = self.repos.users.find_by_family(&family.id).await?;
            let dogs = self.repos.dogs.find_by_family(&family.id).await?;
            for dog in &dogs {
                for reminder in self.repos.reminders.find_by_dog(&dog.id).await? {
                    if !scheduling::is_schedulable(&reminder, dog, family) {
                        continue;
                    }
                    // Checked by is_schedulable
                    let execution_date = match reminder.execution_date {
                        Some(date) => date,
                        None => continue,
                    };
                    self.scheduler.schedule_primary(&reminder);
                    for user in users.iter().filter(|user| user.wants_follow_up()) {
                        self.scheduler.schedule_follow_up(
                            user,
                            &reminder.id,
                            execution_date + user.follow_up_delay,
                        );
                    }
                    armed += 1;
                }
            }
        }

        info!("Alarm recovery armed {} reminders", armed);
        Ok(())
    }
}
