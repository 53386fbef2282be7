use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::sync::arm_reminder_jobs;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::skip_reminder::{APIResponse, PathParams};
use pawtime_domain::{Family, Reminder, ID};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::ReminderNotFound => {
            PawtimeError::NotFound("The requested reminder was not found".into())
        }
        UseCaseError::NothingToSkip => {
            PawtimeError::Conflict("The reminder has no upcoming occurrence to skip".into())
        }
    }
}

pub async fn skip_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = SkipReminderUseCase {
        family,
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct SkipReminderUseCase {
    pub family: Family,
    pub reminder_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    ReminderNotFound,
    NothingToSkip,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SkipReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "SkipReminder";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder)
                if reminder.family_id == self.family.id && !reminder.is_deleted =>
            {
                reminder
            }
            _ => return Err(UseCaseError::ReminderNotFound),
        };

        let now = ctx.sys.get_timestamp_millis();
        // Advancing past a pending future instant jumps to the occurrence
        // after it; an already stale instant just restarts from now.
        let basis = match reminder.execution_date {
            Some(date) if date > now => date,
            Some(_) => now,
            None => return Err(UseCaseError::NothingToSkip),
        };
        reminder.reschedule_from(basis, &self.family.timezone);

        let mut tx = ctx
            .repos
            .transactions
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.save_reminder(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.commit().await.map_err(|_| UseCaseError::StorageError)?;

        ctx.scheduler.cancel_reminder(&reminder.id);
        arm_reminder_jobs(ctx, &self.family, &reminder).await;

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawtime_domain::{
        CountdownConfig, Dog, OneTimeConfig, ReminderAction, ReminderRecurrence, WeeklyConfig,
    };
    use pawtime_infra::setup_context_for_tests;

    async fn seed(ctx: &PawtimeContext, recurrence: ReminderRecurrence) -> (Family, Reminder) {
        let family = Family::new("Smith", 10);
        let dog = Dog::new(family.id.clone(), "Rex");
        let mut reminder = Reminder::new(
            dog.id.clone(),
            family.id.clone(),
            ReminderAction::Feed,
            recurrence,
        );
        reminder.reschedule_from(ctx.sys.get_timestamp_millis(), &family.timezone);
        ctx.repos.families.insert(&family).await.unwrap();
        ctx.repos.dogs.insert(&dog).await.unwrap();
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        (family, reminder)
    }

    #[tokio::test]
    async fn skipping_a_weekly_reminder_moves_past_the_pending_occurrence() {
        let (ctx, _) = setup_context_for_tests();
        let (family, reminder) = seed(
            &ctx,
            ReminderRecurrence::Weekly(WeeklyConfig {
                hour: 8,
                minute: 0,
                weekdays: vec![
                    chrono::Weekday::Mon,
                    chrono::Weekday::Tue,
                    chrono::Weekday::Wed,
                    chrono::Weekday::Thu,
                    chrono::Weekday::Fri,
                    chrono::Weekday::Sat,
                    chrono::Weekday::Sun,
                ],
                skip: Default::default(),
            }),
        )
        .await;
        let pending = reminder.execution_date.unwrap();

        let usecase = SkipReminderUseCase {
            family,
            reminder_id: reminder.id.clone(),
        };
        let skipped = execute(usecase, &ctx).await.unwrap();

        assert!(skipped.execution_date.unwrap() > pending);
        assert!(ctx.scheduler.has_primary_job(&reminder.id));
    }

    #[tokio::test]
    async fn skipping_a_countdown_restarts_it_from_the_pending_instant() {
        let (ctx, _) = setup_context_for_tests();
        let (family, reminder) = seed(
            &ctx,
            ReminderRecurrence::Countdown(CountdownConfig {
                execution_interval: 60 * 60 * 1000,
                interval_elapsed: 0,
            }),
        )
        .await;
        let pending = reminder.execution_date.unwrap();

        let usecase = SkipReminderUseCase {
            family,
            reminder_id: reminder.id.clone(),
        };
        let skipped = execute(usecase, &ctx).await.unwrap();

        assert_eq!(skipped.execution_basis, pending);
        assert_eq!(skipped.execution_date, Some(pending + 60 * 60 * 1000));
    }

    #[tokio::test]
    async fn retired_one_time_reminder_has_nothing_to_skip() {
        let (ctx, _) = setup_context_for_tests();
        let (family, reminder) = seed(
            &ctx,
            ReminderRecurrence::OneTime(OneTimeConfig {
                date: ctx.sys.get_timestamp_millis() - 1000,
            }),
        )
        .await;
        assert_eq!(reminder.execution_date, None);

        let usecase = SkipReminderUseCase {
            family,
            reminder_id: reminder.id,
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::NothingToSkip)
        ));
    }
}
