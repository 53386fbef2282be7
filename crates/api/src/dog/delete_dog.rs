use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::delete_dog::{APIResponse, PathParams};
use pawtime_domain::{Dog, ID};
use pawtime_infra::PawtimeContext;
use tracing::warn;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::DogNotFound => {
            PawtimeError::NotFound("The requested dog was not found".into())
        }
    }
}

pub async fn delete_dog_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = DeleteDogUseCase {
        family_id: family.id,
        dog_id: path_params.dog_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|dog| HttpResponse::Ok().json(APIResponse::new(dog)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct DeleteDogUseCase {
    pub family_id: ID,
    pub dog_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    DogNotFound,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteDogUseCase {
    type Response = Dog;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteDog";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let mut dog = match ctx.repos.dogs.find(&self.dog_id).await {
            Some(dog) if dog.family_id == self.family_id && !dog.is_deleted => dog,
            _ => return Err(UseCaseError::DogNotFound),
        };
        dog.is_deleted = true;

        let mut tx = ctx
            .repos
            .transactions
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.save_dog(&dog)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.commit().await.map_err(|_| UseCaseError::StorageError)?;

        // None of the dog's reminders may fire anymore
        match ctx.repos.reminders.find_by_dog(&dog.id).await {
            Ok(reminders) => {
                for reminder in &reminders {
                    ctx.scheduler.cancel_reminder(&reminder.id);
                }
            }
            Err(e) => {
                warn!(
                    "Unable to resolve reminders of deleted dog: {}. Error: {:?}",
                    dog.id, e
                );
            }
        }

        Ok(dog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawtime_domain::{
        CountdownConfig, Family, Reminder, ReminderAction, ReminderRecurrence,
    };
    use pawtime_infra::setup_context_for_tests;

    #[tokio::test]
    async fn soft_delete_cancels_the_dogs_reminder_jobs() {
        let (ctx, _) = setup_context_for_tests();
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
        ctx.scheduler.schedule_primary(&reminder);

        let usecase = DeleteDogUseCase {
            family_id: family.id.clone(),
            dog_id: dog.id.clone(),
        };
        let deleted = execute(usecase, &ctx).await.unwrap();

        assert!(deleted.is_deleted);
        assert_eq!(ctx.scheduler.active_job_count(), 0);
        assert!(ctx.repos.dogs.find_by_family(&family.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let (ctx, _) = setup_context_for_tests();
        let family = Family::new("Smith", 10);
        let mut dog = Dog::new(family.id.clone(), "Rex");
        dog.is_deleted = true;
        ctx.repos.families.insert(&family).await.unwrap();
        ctx.repos.dogs.insert(&dog).await.unwrap();

        let usecase = DeleteDogUseCase {
            family_id: family.id,
            dog_id: dog.id,
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::DogNotFound)
        ));
    }
}
