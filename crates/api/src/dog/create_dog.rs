use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::create_dog::{APIResponse, RequestBody};
use pawtime_domain::{Dog, ID};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::EmptyName => {
            PawtimeError::BadClientData("A dog must have a name".into())
        }
    }
}

pub async fn create_dog_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = CreateDogUseCase {
        family_id: family.id,
        name: body.0.name,
    };

    execute(usecase, &ctx)
        .await
        .map(|dog| HttpResponse::Created().json(APIResponse::new(dog)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct CreateDogUseCase {
    pub family_id: ID,
    pub name: String,
}

#[derive(Debug)]
enum UseCaseError {
    EmptyName,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateDogUseCase {
    type Response = Dog;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateDog";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        if self.name.trim().is_empty() {
            return Err(UseCaseError::EmptyName);
        }

        let dog = Dog::new(self.family_id.clone(), self.name.trim());

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

        Ok(dog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawtime_domain::Family;
    use pawtime_infra::setup_context_for_tests;

    #[tokio::test]
    async fn creates_dog_for_family() {
        let (ctx, _) = setup_context_for_tests();
        let family = Family::new("Smith", 10);
        ctx.repos.families.insert(&family).await.unwrap();

        let usecase = CreateDogUseCase {
            family_id: family.id.clone(),
            name: "Rex".into(),
        };
        let dog = execute(usecase, &ctx).await.unwrap();
        assert_eq!(dog.name, "Rex");
        assert_eq!(
            ctx.repos.dogs.find_by_family(&family.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let (ctx, _) = setup_context_for_tests();
        let usecase = CreateDogUseCase {
            family_id: ID::new(),
            name: "  ".into(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::EmptyName)
        ));
    }
}
