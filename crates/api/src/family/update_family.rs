use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::sync::arm_reminder_jobs;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::update_family::{APIResponse, RequestBody};
use pawtime_domain::{scheduling, Entity, Family, Reminder};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::InvalidTimezone(tz) => {
            PawtimeError::BadClientData(format!("Invalid timezone given: {}", tz))
        }
    }
}

pub async fn update_family_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = UpdateFamilyUseCase {
        family,
        is_paused: body.0.is_paused,
        is_locked: body.0.is_locked,
        timezone: body.0.timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|family| HttpResponse::Ok().json(APIResponse::new(family)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct UpdateFamilyUseCase {
    pub family: Family,
    pub is_paused: Option<bool>,
    pub is_locked: Option<bool>,
    pub timezone: Option<String>,
}

#[derive(Debug)]
enum UseCaseError {
    InvalidTimezone(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateFamilyUseCase {
    type Response = Family;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateFamily";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let mut family = self.family.clone();
        let was_paused = family.is_paused;

        if let Some(timezone) = &self.timezone {
            if !family.set_timezone(timezone) {
                return Err(UseCaseError::InvalidTimezone(timezone.clone()));
            }
        }
        if let Some(is_paused) = self.is_paused {
            family.is_paused = is_paused;
        }
        if let Some(is_locked) = self.is_locked {
            family.is_locked = is_locked;
        }

        let pausing = !was_paused && family.is_paused;
        let resuming = was_paused && !family.is_paused;

        let mut tx = ctx
            .repos
            .transactions
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.save_family(&family)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // On resume, fire instants that passed while paused are recomputed
        // from now instead of firing as a stale burst.
        let mut to_arm: Vec<Reminder> = Vec::new();
        if resuming {
            let now = ctx.sys.get_timestamp_millis();
            let dogs = ctx
                .repos
                .dogs
                .find_by_family(&family.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            for dog in &dogs {
                let reminders = ctx
                    .repos
                    .reminders
                    .find_by_dog(&dog.id)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                for mut reminder in reminders {
                    if !scheduling::is_schedulable(&reminder, dog, &family) {
                        continue;
                    }
                    if matches!(reminder.execution_date, Some(date) if date < now) {
                        reminder.reschedule_from(now, &family.timezone);
                        tx.save_reminder(&reminder)
                            .await
                            .map_err(|_| UseCaseError::StorageError)?;
                    }
                    to_arm.push(reminder);
                }
            }
        }

        tx.commit().await.map_err(|_| UseCaseError::StorageError)?;

        if pausing {
            let member_ids = match ctx.repos.users.find_by_family(&family.id).await {
                Ok(users) => users.iter().map(|user| user.id().clone()).collect(),
                Err(_) => Vec::new(),
            };
            ctx.scheduler.cancel_family(&family.id, &member_ids);
        }
        for reminder in &to_arm {
            arm_reminder_jobs(ctx, &family, reminder).await;
        }

        Ok(family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawtime_domain::{CountdownConfig, Dog, ReminderAction, ReminderRecurrence};
    use pawtime_infra::setup_context_for_tests;

    async fn seed(ctx: &PawtimeContext) -> (Family, Reminder) {
        let family = Family::new("Smith", 10);
        let dog = Dog::new(family.id.clone(), "Rex");
        let mut reminder = Reminder::new(
            dog.id.clone(),
            family.id.clone(),
            ReminderAction::Feed,
            ReminderRecurrence::Countdown(CountdownConfig {
                execution_interval: 60 * 60 * 1000,
                interval_elapsed: 0,
            }),
        );
        reminder.reschedule_from(ctx.sys.get_timestamp_millis(), &family.timezone);
        ctx.repos.families.insert(&family).await.unwrap();
        ctx.repos.dogs.insert(&dog).await.unwrap();
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        (family, reminder)
    }

    #[tokio::test]
    async fn pause_cancels_jobs_but_preserves_execution_state() {
        let (ctx, _) = setup_context_for_tests();
        let (family, reminder) = seed(&ctx).await;
        ctx.scheduler.schedule_primary(&reminder);
        assert_eq!(ctx.scheduler.active_job_count(), 1);

        let usecase = UpdateFamilyUseCase {
            family: family.clone(),
            is_paused: Some(true),
            is_locked: None,
            timezone: None,
        };
        execute(usecase, &ctx).await.unwrap();

        assert_eq!(ctx.scheduler.active_job_count(), 0);
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.execution_date, reminder.execution_date);
    }

    #[tokio::test]
    async fn resume_rearms_pending_reminders() {
        let (ctx, _) = setup_context_for_tests();
        let (mut family, reminder) = seed(&ctx).await;
        family.is_paused = true;
        ctx.repos.families.save(&family).await.unwrap();

        let usecase = UpdateFamilyUseCase {
            family,
            is_paused: Some(false),
            is_locked: None,
            timezone: None,
        };
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx.scheduler.has_primary_job(&reminder.id));
    }

    #[tokio::test]
    async fn resume_recomputes_instants_that_passed_while_paused() {
        let (ctx, _) = setup_context_for_tests();
        let (mut family, mut reminder) = seed(&ctx).await;
        family.is_paused = true;
        ctx.repos.families.save(&family).await.unwrap();
        let now = ctx.sys.get_timestamp_millis();
        reminder.execution_date = Some(now - 10_000);
        ctx.repos.reminders.save(&reminder).await.unwrap();

        let usecase = UpdateFamilyUseCase {
            family,
            is_paused: Some(false),
            is_locked: None,
            timezone: None,
        };
        execute(usecase, &ctx).await.unwrap();

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(stored.execution_date.unwrap() > now);
    }
}
