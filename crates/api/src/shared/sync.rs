use pawtime_domain::{Family, Reminder};
use pawtime_infra::PawtimeContext;
use tracing::warn;

/// Arms the primary job of a committed reminder together with one
/// follow-up job per opted-in member. A reminder without a fire instant,
/// or in a paused family, arms nothing.
pub async fn arm_reminder_jobs(ctx: &PawtimeContext, family: &Family, reminder: &Reminder) {
    let execution_date = match reminder.execution_date {
        Some(date) => date,
        None => return,
    };
    if family.is_paused {
        return;
    }

    ctx.scheduler.schedule_primary(reminder);
    match ctx.repos.users.find_by_family(&family.id).await {
        Ok(users) => {
            for user in users.iter().filter(|user| user.wants_follow_up()) {
                ctx.scheduler.schedule_follow_up(
                    user,
                    &reminder.id,
                    execution_date + user.follow_up_delay,
                );
            }
        }
        Err(e) => {
            warn!(
                "Unable to resolve members of family: {} for follow-up jobs. Error: {:?}",
                family.id, e
            );
        }
    }
}
