use crate::error::PawtimeError;
use crate::shared::auth::protect_user_route;
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::get_me::APIResponse;
use pawtime_infra::PawtimeContext;

pub async fn get_me_controller(
    http_req: HttpRequest,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let (_, user) = protect_user_route(&http_req, &ctx).await?;

    Ok(HttpResponse::Ok().json(APIResponse::new(user)))
}
