use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::get_reminders::APIResponse;
use pawtime_domain::{Reminder, ID};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
    }
}

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = GetRemindersUseCase {
        family_id: family.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct GetRemindersUseCase {
    pub family_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find_by_family(&self.family_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawtime_domain::{
        CountdownConfig, Dog, Family, ReminderAction, ReminderRecurrence,
    };
    use pawtime_infra::setup_context_for_tests;

    #[tokio::test]
    async fn lists_live_reminders_only() {
        let (ctx, _) = setup_context_for_tests();
        let family = Family::new("Smith", 10);
        let dog = Dog::new(family.id.clone(), "Rex");
        ctx.repos.families.insert(&family).await.unwrap();
        ctx.repos.dogs.insert(&dog).await.unwrap();

        let recurrence = ReminderRecurrence::Countdown(CountdownConfig {
            execution_interval: 1000,
            interval_elapsed: 0,
        });
        let live = Reminder::new(
            dog.id.clone(),
            family.id.clone(),
            ReminderAction::Feed,
            recurrence.clone(),
        );
        let mut deleted = Reminder::new(
            dog.id.clone(),
            family.id.clone(),
            ReminderAction::Walk,
            recurrence,
        );
        deleted.is_deleted = true;
        ctx.repos.reminders.insert(&live).await.unwrap();
        ctx.repos.reminders.insert(&deleted).await.unwrap();

        let usecase = GetRemindersUseCase {
            family_id: family.id,
        };
        let reminders = execute(usecase, &ctx).await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id, live.id);
    }
}
