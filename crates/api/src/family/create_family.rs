use crate::error::PawtimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use pawtime_api_structs::create_family::{APIResponse, RequestBody};
use pawtime_domain::Family;
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::InvalidTimezone(tz) => {
            PawtimeError::BadClientData(format!("Invalid timezone given: {}", tz))
        }
    }
}

pub async fn create_family_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    if body.code != ctx.config.create_family_secret_code {
        return Err(PawtimeError::Unauthorized(
            "Invalid code provided for creating a family".into(),
        ));
    }

    let usecase = CreateFamilyUseCase {
        name: body.0.name,
        timezone: body.0.timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|family| HttpResponse::Created().json(APIResponse::new(family)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct CreateFamilyUseCase {
    pub name: String,
    pub timezone: Option<String>,
}

#[derive(Debug)]
enum UseCaseError {
    InvalidTimezone(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateFamilyUseCase {
    type Response = Family;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateFamily";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let mut family = Family::new(&self.name, ctx.config.default_reminder_limit);
        if let Some(timezone) = &self.timezone {
            if !family.set_timezone(timezone) {
                return Err(UseCaseError::InvalidTimezone(timezone.clone()));
            }
        }

        let mut tx = ctx
            .repos
            .transactions
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.save_family(&family)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.commit().await.map_err(|_| UseCaseError::StorageError)?;

        Ok(family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawtime_infra::setup_context_for_tests;

    #[tokio::test]
    async fn creates_family_with_valid_timezone() {
        let (ctx, _) = setup_context_for_tests();
        let usecase = CreateFamilyUseCase {
            name: "Smith".into(),
            timezone: Some("Europe/Oslo".into()),
        };

        let family = execute(usecase, &ctx).await.unwrap();
        assert_eq!(family.timezone.to_string(), "Europe/Oslo");
        assert!(ctx.repos.families.find(&family.id).await.is_some());
    }

    #[tokio::test]
    async fn rejects_invalid_timezone() {
        let (ctx, _) = setup_context_for_tests();
        let usecase = CreateFamilyUseCase {
            name: "Smith".into(),
            timezone: Some("Mars/Olympus_Mons".into()),
        };

        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidTimezone(_))
        ));
    }
}
