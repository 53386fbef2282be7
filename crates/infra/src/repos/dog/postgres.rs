use super::IDogRepo;
use pawtime_domain::{Dog, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresDogRepo {
    pool: PgPool,
}

impl PostgresDogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct DogRaw {
    dog_uid: Uuid,
    family_uid: Uuid,
    name: String,
    is_deleted: bool,
}

impl Into<Dog> for DogRaw {
    fn into(self) -> Dog {
        Dog {
            id: self.dog_uid.into(),
            family_id: self.family_uid.into(),
            name: self.name,
            is_deleted: self.is_deleted,
        }
    }
}

pub(crate) const INSERT_DOG_QUERY: &str = r#"
    INSERT INTO dogs (dog_uid, family_uid, name, is_deleted)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (dog_uid) DO UPDATE SET
        name = excluded.name,
        is_deleted = excluded.is_deleted
    "#;

#[async_trait::async_trait]
impl IDogRepo for PostgresDogRepo {
    async fn insert(&self, dog: &Dog) -> anyhow::Result<()> {
        sqlx::query(INSERT_DOG_QUERY)
            .bind(dog.id.inner_ref())
            .bind(dog.family_id.inner_ref())
            .bind(&dog.name)
            .bind(dog.is_deleted)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save(&self, dog: &Dog) -> anyhow::Result<()> {
        self.insert(dog).await
    }

    async fn find(&self, dog_id: &ID) -> Option<Dog> {
        sqlx::query_as::<_, DogRaw>("SELECT * FROM dogs WHERE dog_uid = $1")
            .bind(dog_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|dog| dog.into())
    }

    async fn find_by_family(&self, family_id: &ID) -> anyhow::Result<Vec<Dog>> {
        let dogs = sqlx::query_as::<_, DogRaw>(
            "SELECT * FROM dogs WHERE family_uid = $1 AND is_deleted = FALSE",
        )
        .bind(family_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(dogs.into_iter().map(|dog| dog.into()).collect())
    }
}
