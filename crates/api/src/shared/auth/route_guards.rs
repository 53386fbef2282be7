use crate::error::PawtimeError;
use actix_web::HttpRequest;
use pawtime_domain::{Family, User, ID};
use pawtime_infra::PawtimeContext;

/// Header carrying the id of the acting family member
pub const USER_ID_HEADER: &str = "pawtime-user-id";

fn parse_authtoken_header(http_req: &HttpRequest) -> Option<String> {
    http_req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Resolves the `Family` from the api key in the `Authorization` header.
pub async fn protect_family_route(
    http_req: &HttpRequest,
    ctx: &PawtimeContext,
) -> Result<Family, PawtimeError> {
    let api_key = parse_authtoken_header(http_req).ok_or_else(|| {
        PawtimeError::Unauthorized(
            "Missing or malformed `Authorization: Bearer` header with the family api key".into(),
        )
    })?;
    match ctx.repos.families.find_by_api_key(&api_key).await {
        Some(family) => Ok(family),
        None => Err(PawtimeError::Unauthorized(
            "The provided api key was invalid".into(),
        )),
    }
}

/// Resolves the acting member on top of the family api key. The member id
/// comes from the `pawtime-user-id` header and must belong to the family.
pub async fn protect_user_route(
    http_req: &HttpRequest,
    ctx: &PawtimeContext,
) -> Result<(Family, User), PawtimeError> {
    let family = protect_family_route(http_req, ctx).await?;
    let user_id = http_req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<ID>().ok())
        .ok_or_else(|| {
            PawtimeError::Unauthorized(format!(
                "Missing or malformed `{}` header",
                USER_ID_HEADER
            ))
        })?;
    match ctx.repos.users.find(&user_id).await {
        Some(user) if user.family_id == family.id => Ok((family, user)),
        _ => Err(PawtimeError::NotFound(format!(
            "The user with id: {} was not found in this family",
            user_id
        ))),
    }
}
