use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::get_family::APIResponse;
use pawtime_domain::{Dog, Family, User, ID};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
    }
}

pub async fn get_family_controller(
    http_req: HttpRequest,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = GetFamilyUseCase {
        family_id: family.id.clone(),
        family,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.family, res.members, res.dogs)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct GetFamilyUseCase {
    pub family_id: ID,
    pub family: Family,
}

#[derive(Debug)]
struct UseCaseRes {
    pub family: Family,
    pub members: Vec<User>,
    pub dogs: Vec<Dog>,
}

#[derive(Debug)]
enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetFamilyUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "GetFamily";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let members = ctx
            .repos
            .users
            .find_by_family(&self.family_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let dogs = ctx
            .repos
            .dogs
            .find_by_family(&self.family_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes {
            family: self.family.clone(),
            members,
            dogs,
        })
    }
}
