use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::sync::arm_reminder_jobs;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::update_reminder::{APIResponse, PathParams, RequestBody};
use pawtime_domain::{Family, Reminder, ReminderAction, ReminderRecurrence, ID};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::ReminderNotFound => {
            PawtimeError::NotFound("The requested reminder was not found".into())
        }
        UseCaseError::InvalidReminder(e) => PawtimeError::BadClientData(e),
    }
}

pub async fn update_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = UpdateReminderUseCase {
        family,
        reminder_id: path_params.reminder_id.clone(),
        action: body.0.action,
        custom_action_name: body.0.custom_action_name,
        recurrence: body.0.recurrence,
        is_enabled: body.0.is_enabled,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct UpdateReminderUseCase {
    pub family: Family,
    pub reminder_id: ID,
    pub action: Option<ReminderAction>,
    pub custom_action_name: Option<String>,
    pub recurrence: Option<ReminderRecurrence>,
    pub is_enabled: Option<bool>,
}

#[derive(Debug)]
enum UseCaseError {
    ReminderNotFound,
    InvalidReminder(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder)
                if reminder.family_id == self.family.id && !reminder.is_deleted =>
            {
                reminder
            }
            _ => return Err(UseCaseError::ReminderNotFound),
        };

        let was_enabled = reminder.is_enabled;
        if let Some(action) = &self.action {
            reminder.action = action.clone();
        }
        if let Some(name) = &self.custom_action_name {
            reminder.custom_action_name = name.clone();
        }
        let recurrence_changed = match &self.recurrence {
            Some(recurrence) => {
                reminder.recurrence = recurrence.clone();
                true
            }
            None => false,
        };
        if let Some(is_enabled) = self.is_enabled {
            reminder.is_enabled = is_enabled;
        }
        reminder
            .validate()
            .map_err(|e| UseCaseError::InvalidReminder(e.to_string()))?;

        if reminder.is_enabled {
            // Only a changed schedule resets the basis; renaming the
            // action must not restart a running countdown.
            if recurrence_changed || !was_enabled {
                reminder.reschedule_from(ctx.sys.get_timestamp_millis(), &self.family.timezone);
            }
        } else {
            reminder.execution_date = None;
        }

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
    use pawtime_domain::{CountdownConfig, Dog};
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

    fn update(family: Family, reminder_id: ID) -> UpdateReminderUseCase {
        UpdateReminderUseCase {
            family,
            reminder_id,
            action: None,
            custom_action_name: None,
            recurrence: None,
            is_enabled: None,
        }
    }

    #[tokio::test]
    async fn disabling_removes_the_job_and_clears_the_fire_instant() {
        let (ctx, _) = setup_context_for_tests();
        let (family, reminder) = seed(&ctx).await;
        ctx.scheduler.schedule_primary(&reminder);

        let mut usecase = update(family, reminder.id.clone());
        usecase.is_enabled = Some(false);
        let updated = execute(usecase, &ctx).await.unwrap();

        assert_eq!(updated.execution_date, None);
        assert_eq!(ctx.scheduler.active_job_count(), 0);
    }

    #[tokio::test]
    async fn reenabling_recomputes_from_now_and_rearms() {
        let (ctx, _) = setup_context_for_tests();
        let (family, mut reminder) = seed(&ctx).await;
        reminder.is_enabled = false;
        reminder.execution_date = None;
        ctx.repos.reminders.save(&reminder).await.unwrap();

        let mut usecase = update(family, reminder.id.clone());
        usecase.is_enabled = Some(true);
        let updated = execute(usecase, &ctx).await.unwrap();

        assert!(updated.execution_date.is_some());
        assert!(ctx.scheduler.has_primary_job(&reminder.id));
    }

    #[tokio::test]
    async fn renaming_the_action_keeps_the_schedule() {
        let (ctx, _) = setup_context_for_tests();
        let (family, reminder) = seed(&ctx).await;
        ctx.scheduler.schedule_primary(&reminder);

        let mut usecase = update(family, reminder.id.clone());
        usecase.action = Some(ReminderAction::Water);
        let updated = execute(usecase, &ctx).await.unwrap();

        assert_eq!(updated.action, ReminderAction::Water);
        assert_eq!(updated.execution_date, reminder.execution_date);
        assert_eq!(updated.execution_basis, reminder.execution_basis);
    }

    #[tokio::test]
    async fn changing_the_recurrence_resets_the_basis() {
        let (ctx, _) = setup_context_for_tests();
        let (family, reminder) = seed(&ctx).await;

        let mut usecase = update(family, reminder.id.clone());
        usecase.recurrence = Some(ReminderRecurrence::Countdown(CountdownConfig {
            execution_interval: 2 * 60 * 60 * 1000,
            interval_elapsed: 0,
        }));
        let updated = execute(usecase, &ctx).await.unwrap();

        assert!(updated.execution_date.unwrap() > reminder.execution_date.unwrap());
        assert!(ctx.scheduler.has_primary_job(&reminder.id));
    }
}
