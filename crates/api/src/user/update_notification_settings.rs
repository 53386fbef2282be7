use crate::error::PawtimeError;
use crate::shared::auth::protect_user_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::update_notification_settings::{APIResponse, RequestBody};
use pawtime_domain::{scheduling, Family, User};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::InvalidFollowUpDelay(delay) => PawtimeError::BadClientData(format!(
            "Follow up delay must be positive, got: {}",
            delay
        )),
    }
}

pub async fn update_notification_settings_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let (family, user) = protect_user_route(&http_req, &ctx).await?;

    let usecase = UpdateNotificationSettingsUseCase {
        family,
        user,
        device_token: body.0.device_token,
        is_notification_enabled: body.0.is_notification_enabled,
        is_loud_notification: body.0.is_loud_notification,
        notification_sound: body.0.notification_sound,
        is_follow_up_enabled: body.0.is_follow_up_enabled,
        follow_up_delay: body.0.follow_up_delay,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct UpdateNotificationSettingsUseCase {
    pub family: Family,
    pub user: User,
    pub device_token: Option<String>,
    pub is_notification_enabled: Option<bool>,
    pub is_loud_notification: Option<bool>,
    pub notification_sound: Option<String>,
    pub is_follow_up_enabled: Option<bool>,
    pub follow_up_delay: Option<i64>,
}

#[derive(Debug)]
enum UseCaseError {
    InvalidFollowUpDelay(i64),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateNotificationSettingsUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateNotificationSettings";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let mut user = self.user.clone();

        if let Some(delay) = self.follow_up_delay {
            if delay <= 0 {
                return Err(UseCaseError::InvalidFollowUpDelay(delay));
            }
            user.follow_up_delay = delay;
        }
        if let Some(device_token) = &self.device_token {
            user.device_token = Some(device_token.clone());
        }
        if let Some(enabled) = self.is_notification_enabled {
            user.is_notification_enabled = enabled;
        }
        if let Some(loud) = self.is_loud_notification {
            user.is_loud_notification = loud;
        }
        if let Some(sound) = &self.notification_sound {
            user.notification_sound = sound.clone();
        }
        if let Some(follow_up) = self.is_follow_up_enabled {
            user.is_follow_up_enabled = follow_up;
        }

        let mut tx = ctx
            .repos
            .transactions
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.save_user(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.commit().await.map_err(|_| UseCaseError::StorageError)?;

        // Rebuild this member's follow-up jobs from the new preferences
        ctx.scheduler.cancel_user(&user.id);
        if user.wants_follow_up() && !self.family.is_paused {
            self.arm_follow_ups(ctx, &user).await?;
        }

        Ok(user)
    }
}

impl UpdateNotificationSettingsUseCase {
    async fn arm_follow_ups(
        &self,
        ctx: &PawtimeContext,
        user: &User,
    ) -> Result<(), UseCaseError> {
        let dogs = ctx
            .repos
            .dogs
            .find_by_family(&self.family.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        for dog in &dogs {
            let reminders = ctx
                .repos
                .reminders
                .find_by_dog(&dog.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            for reminder in reminders {
                if !scheduling::is_schedulable(&reminder, dog, &self.family) {
                    continue;
                }
                if let Some(execution_date) = reminder.execution_date {
                    ctx.scheduler.schedule_follow_up(
                        user,
                        &reminder.id,
                        execution_date + user.follow_up_delay,
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawtime_domain::{CountdownConfig, Dog, Reminder, ReminderAction, ReminderRecurrence};
    use pawtime_infra::setup_context_for_tests;

    async fn seed(ctx: &PawtimeContext) -> (Family, User, Reminder) {
        let family = Family::new("Smith", 10);
        let mut user = User::new(family.id.clone(), "Ann");
        user.device_token = Some("token-1".into());
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
        ctx.repos.users.insert(&user).await.unwrap();
        ctx.repos.dogs.insert(&dog).await.unwrap();
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        (family, user, reminder)
    }

    fn settings_update(family: Family, user: User) -> UpdateNotificationSettingsUseCase {
        UpdateNotificationSettingsUseCase {
            family,
            user,
            device_token: None,
            is_notification_enabled: None,
            is_loud_notification: None,
            notification_sound: None,
            is_follow_up_enabled: None,
            follow_up_delay: None,
        }
    }

    #[tokio::test]
    async fn enabling_follow_up_arms_jobs_for_pending_reminders() {
        let (ctx, _) = setup_context_for_tests();
        let (family, user, reminder) = seed(&ctx).await;

        let mut usecase = settings_update(family, user.clone());
        usecase.is_follow_up_enabled = Some(true);
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx.scheduler.has_follow_up_job(&user.id, &reminder.id));
    }

    #[tokio::test]
    async fn disabling_follow_up_cancels_pending_jobs() {
        let (ctx, _) = setup_context_for_tests();
        let (family, mut user, reminder) = seed(&ctx).await;
        user.is_follow_up_enabled = true;
        ctx.repos.users.save(&user).await.unwrap();
        ctx.scheduler.schedule_follow_up(
            &user,
            &reminder.id,
            reminder.execution_date.unwrap() + user.follow_up_delay,
        );

        let mut usecase = settings_update(family, user.clone());
        usecase.is_follow_up_enabled = Some(false);
        execute(usecase, &ctx).await.unwrap();

        assert!(!ctx.scheduler.has_follow_up_job(&user.id, &reminder.id));
    }

    #[tokio::test]
    async fn rejects_non_positive_follow_up_delay() {
        let (ctx, _) = setup_context_for_tests();
        let (family, user, _) = seed(&ctx).await;

        let mut usecase = settings_update(family, user);
        usecase.follow_up_delay = Some(0);
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidFollowUpDelay(0))
        ));
    }
}
