use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::add_family_member::{APIResponse, RequestBody};
use pawtime_domain::{Family, User};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::FamilyLocked => {
            PawtimeError::Conflict("The family is locked and does not accept new members".into())
        }
    }
}

pub async fn add_family_member_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = AddFamilyMemberUseCase {
        family,
        full_name: body.0.full_name,
        device_token: body.0.device_token,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct AddFamilyMemberUseCase {
    pub family: Family,
    pub full_name: String,
    pub device_token: Option<String>,
}

#[derive(Debug)]
enum UseCaseError {
    FamilyLocked,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for AddFamilyMemberUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "AddFamilyMember";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        if self.family.is_locked {
            return Err(UseCaseError::FamilyLocked);
        }

        let mut user = User::new(self.family.id.clone(), &self.full_name);
        user.device_token = self.device_token.clone();

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

        Ok(user)
    }
}
