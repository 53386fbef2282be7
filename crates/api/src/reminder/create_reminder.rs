use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::sync::arm_reminder_jobs;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::create_reminder::{APIResponse, PathParams, RequestBody};
use pawtime_domain::{Family, Reminder, ReminderAction, ReminderRecurrence, ID};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::DogNotFound => {
            PawtimeError::NotFound("The requested dog was not found".into())
        }
        UseCaseError::ReminderLimitReached(limit) => PawtimeError::Conflict(format!(
            "The family has reached its limit of {} reminders",
            limit
        )),
        UseCaseError::InvalidReminder(e) => PawtimeError::BadClientData(e),
    }
}

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = CreateReminderUseCase {
        family,
        dog_id: path_params.dog_id.clone(),
        action: body.0.action,
        custom_action_name: body.0.custom_action_name,
        recurrence: body.0.recurrence,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct CreateReminderUseCase {
    pub family: Family,
    pub dog_id: ID,
    pub action: ReminderAction,
    pub custom_action_name: Option<String>,
    pub recurrence: ReminderRecurrence,
}

#[derive(Debug)]
enum UseCaseError {
    DogNotFound,
    ReminderLimitReached(usize),
    InvalidReminder(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let dog = match ctx.repos.dogs.find(&self.dog_id).await {
            Some(dog) if dog.family_id == self.family.id && !dog.is_deleted => dog,
            _ => return Err(UseCaseError::DogNotFound),
        };

        let count = ctx
            .repos
            .reminders
            .count_by_family(&self.family.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if count >= self.family.reminder_limit {
            return Err(UseCaseError::ReminderLimitReached(self.family.reminder_limit));
        }

        let mut reminder = Reminder::new(
            dog.id.clone(),
            self.family.id.clone(),
            self.action.clone(),
            self.recurrence.clone(),
        );
        if let Some(name) = &self.custom_action_name {
            reminder.custom_action_name = name.clone();
        }
        reminder
            .validate()
            .map_err(|e| UseCaseError::InvalidReminder(e.to_string()))?;
        reminder.reschedule_from(ctx.sys.get_timestamp_millis(), &self.family.timezone);

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

        arm_reminder_jobs(ctx, &self.family, &reminder).await;

        Ok(reminder)
    }
}
