use super::IUserRepo;
use pawtime_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRaw {
    user_uid: Uuid,
    family_uid: Uuid,
    full_name: String,
    device_token: Option<String>,
    is_notification_enabled: bool,
    is_loud_notification: bool,
    notification_sound: String,
    is_follow_up_enabled: bool,
    follow_up_delay: i64,
}

impl Into<User> for UserRaw {
    fn into(self) -> User {
        User {
            id: self.user_uid.into(),
            family_id: self.family_uid.into(),
            full_name: self.full_name,
            device_token: self.device_token,
            is_notification_enabled: self.is_notification_enabled,
            is_loud_notification: self.is_loud_notification,
            notification_sound: self.notification_sound,
            is_follow_up_enabled: self.is_follow_up_enabled,
            follow_up_delay: self.follow_up_delay,
        }
    }
}

pub(crate) const INSERT_USER_QUERY: &str = r#"
    INSERT INTO users (
        user_uid,
        family_uid,
        full_name,
        device_token,
        is_notification_enabled,
        is_loud_notification,
        notification_sound,
        is_follow_up_enabled,
        follow_up_delay
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (user_uid) DO UPDATE SET
        full_name = excluded.full_name,
        device_token = excluded.device_token,
        is_notification_enabled = excluded.is_notification_enabled,
        is_loud_notification = excluded.is_loud_notification,
        notification_sound = excluded.notification_sound,
        is_follow_up_enabled = excluded.is_follow_up_enabled,
        follow_up_delay = excluded.follow_up_delay
    "#;

pub(crate) fn bind_user<'a>(
    query: sqlx::query::Query<'a, sqlx::Postgres, sqlx::postgres::PgArguments>,
    user: &'a User,
) -> sqlx::query::Query<'a, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(user.id.inner_ref())
        .bind(user.family_id.inner_ref())
        .bind(&user.full_name)
        .bind(&user.device_token)
        .bind(user.is_notification_enabled)
        .bind(user.is_loud_notification)
        .bind(&user.notification_sound)
        .bind(user.is_follow_up_enabled)
        .bind(user.follow_up_delay)
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        bind_user(sqlx::query(INSERT_USER_QUERY), user)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        bind_user(sqlx::query(INSERT_USER_QUERY), user)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>("SELECT * FROM users WHERE user_uid = $1")
            .bind(user_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|user| user.into())
    }

    async fn find_by_family(&self, family_id: &ID) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, UserRaw>("SELECT * FROM users WHERE family_uid = $1")
            .bind(family_id.inner_ref())
            .fetch_all(&self.pool)
            .await?;
        Ok(users.into_iter().map(|user| user.into()).collect())
    }

    async fn delete(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>("DELETE FROM users WHERE user_uid = $1 RETURNING *")
            .bind(user_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|user| user.into())
    }
}
