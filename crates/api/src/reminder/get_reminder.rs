use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::get_reminder::{APIResponse, PathParams};
use pawtime_domain::{Reminder, ID};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::ReminderNotFound => {
            PawtimeError::NotFound("The requested reminder was not found".into())
        }
    }
}

pub async fn get_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = GetReminderUseCase {
        family_id: family.id,
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct GetReminderUseCase {
    pub family_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    ReminderNotFound,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminder";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.family_id == self.family_id && !reminder.is_deleted => {
                Ok(reminder)
            }
            _ => Err(UseCaseError::ReminderNotFound),
        }
    }
}
