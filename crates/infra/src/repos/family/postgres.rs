use super::IFamilyRepo;
use pawtime_domain::{Family, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresFamilyRepo {
    pool: PgPool,
}

impl PostgresFamilyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct FamilyRaw {
    family_uid: Uuid,
    name: String,
    api_key: String,
    timezone: String,
    is_paused: bool,
    is_locked: bool,
    reminder_limit: i64,
}

impl Into<Family> for FamilyRaw {
    fn into(self) -> Family {
        Family {
            id: self.family_uid.into(),
            name: self.name,
            api_key: self.api_key,
            timezone: self.timezone.parse().unwrap_or(chrono_tz::UTC),
            is_paused: self.is_paused,
            is_locked: self.is_locked,
            reminder_limit: self.reminder_limit as usize,
        }
    }
}

pub(crate) const INSERT_FAMILY_QUERY: &str = r#"
    INSERT INTO families (family_uid, name, api_key, timezone, is_paused, is_locked, reminder_limit)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (family_uid) DO UPDATE SET
        name = excluded.name,
        timezone = excluded.timezone,
        is_paused = excluded.is_paused,
        is_locked = excluded.is_locked,
        reminder_limit = excluded.reminder_limit
    "#;

#[async_trait::async_trait]
impl IFamilyRepo for PostgresFamilyRepo {
    async fn insert(&self, family: &Family) -> anyhow::Result<()> {
        sqlx::query(INSERT_FAMILY_QUERY)
            .bind(family.id.inner_ref())
            .bind(&family.name)
            .bind(&family.api_key)
            .bind(family.timezone.to_string())
            .bind(family.is_paused)
            .bind(family.is_locked)
            .bind(family.reminder_limit as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save(&self, family: &Family) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE families SET
                name = $2,
                timezone = $3,
                is_paused = $4,
                is_locked = $5,
                reminder_limit = $6
            WHERE family_uid = $1
            "#,
        )
        .bind(family.id.inner_ref())
        .bind(&family.name)
        .bind(family.timezone.to_string())
        .bind(family.is_paused)
        .bind(family.is_locked)
        .bind(family.reminder_limit as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, family_id: &ID) -> Option<Family> {
        sqlx::query_as::<_, FamilyRaw>("SELECT * FROM families WHERE family_uid = $1")
            .bind(family_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|family| family.into())
    }

    async fn find_by_api_key(&self, api_key: &str) -> Option<Family> {
        sqlx::query_as::<_, FamilyRaw>("SELECT * FROM families WHERE api_key = $1")
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|family| family.into())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Family>> {
        let families = sqlx::query_as::<_, FamilyRaw>("SELECT * FROM families")
            .fetch_all(&self.pool)
            .await?;
        Ok(families.into_iter().map(|family| family.into()).collect())
    }
}
