use crate::error::PawtimeError;
use crate::shared::auth::protect_family_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use pawtime_api_structs::remove_family_member::{APIResponse, PathParams};
use pawtime_domain::{User, ID};
use pawtime_infra::PawtimeContext;

fn error_handler(e: UseCaseError) -> PawtimeError {
    match e {
        UseCaseError::StorageError => PawtimeError::InternalError,
        UseCaseError::UserNotFound => {
            PawtimeError::NotFound("The requested family member was not found".into())
        }
    }
}

pub async fn remove_family_member_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<PawtimeContext>,
) -> Result<HttpResponse, PawtimeError> {
    let family = protect_family_route(&http_req, &ctx).await?;

    let usecase = RemoveFamilyMemberUseCase {
        family_id: family.id,
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(error_handler)
}

#[derive(Debug)]
struct RemoveFamilyMemberUseCase {
    pub family_id: ID,
    pub user_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    UserNotFound,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RemoveFamilyMemberUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "RemoveFamilyMember";

    async fn execute(&mut self, ctx: &PawtimeContext) -> Result<Self::Response, Self::Error> {
        let user = match ctx.repos.users.find(&self.user_id).await {
            Some(user) if user.family_id == self.family_id => user,
            _ => return Err(UseCaseError::UserNotFound),
        };

        let mut tx = ctx
            .repos
            .transactions
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.delete_user(&user.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        tx.commit().await.map_err(|_| UseCaseError::StorageError)?;

        // Any pending follow-up of the removed member must never fire
        ctx.scheduler.cancel_user(&user.id);

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawtime_domain::Family;
    use pawtime_infra::setup_context_for_tests;

    #[tokio::test]
    async fn removes_member_and_their_follow_up_jobs() {
        let (ctx, _) = setup_context_for_tests();
        let family = Family::new("Smith", 10);
        ctx.repos.families.insert(&family).await.unwrap();
        let mut user = User::new(family.id.clone(), "Ann");
        user.device_token = Some("token-1".into());
        user.is_follow_up_enabled = true;
        ctx.repos.users.insert(&user).await.unwrap();

        let reminder_id = ID::new();
        ctx.scheduler.schedule_follow_up(
            &user,
            &reminder_id,
            ctx.sys.get_timestamp_millis() + 60_000,
        );
        assert_eq!(ctx.scheduler.active_job_count(), 1);

        let usecase = RemoveFamilyMemberUseCase {
            family_id: family.id.clone(),
            user_id: user.id.clone(),
        };
        execute(usecase, &ctx).await.unwrap();

        assert_eq!(ctx.scheduler.active_job_count(), 0);
        assert!(ctx.repos.users.find(&user.id).await.is_none());
    }

    #[tokio::test]
    async fn member_of_another_family_is_not_found() {
        let (ctx, _) = setup_context_for_tests();
        let family = Family::new("Smith", 10);
        let other = Family::new("Jones", 10);
        ctx.repos.families.insert(&family).await.unwrap();
        ctx.repos.families.insert(&other).await.unwrap();
        let user = User::new(other.id.clone(), "Ann");
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = RemoveFamilyMemberUseCase {
            family_id: family.id,
            user_id: user.id,
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::UserNotFound)
        ));
    }
}
