use super::{ITransaction, ITransactionManager};
use crate::repos::dog::postgres::INSERT_DOG_QUERY;
use crate::repos::family::postgres::INSERT_FAMILY_QUERY;
use crate::repos::reminder::postgres::{bind_reminder, INSERT_REMINDER_QUERY};
use crate::repos::user::postgres::{bind_user, INSERT_USER_QUERY};
use pawtime_domain::{Dog, Family, Reminder, User, ID};
use sqlx::{PgPool, Postgres, Transaction};

pub struct PostgresTransactionManager {
    pool: PgPool,
}

impl PostgresTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ITransactionManager for PostgresTransactionManager {
    async fn begin(&self) -> anyhow::Result<Box<dyn ITransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait::async_trait]
impl ITransaction for PostgresTransaction {
    async fn save_family(&mut self, family: &Family) -> anyhow::Result<()> {
        sqlx::query(INSERT_FAMILY_QUERY)
            .bind(family.id.inner_ref())
            .bind(&family.name)
            .bind(&family.api_key)
            .bind(family.timezone.to_string())
            .bind(family.is_paused)
            .bind(family.is_locked)
            .bind(family.reminder_limit as i64)
            .execute(&mut self.tx)
            .await?;
        Ok(())
    }

    async fn save_user(&mut self, user: &User) -> anyhow::Result<()> {
        bind_user(sqlx::query(INSERT_USER_QUERY), user)
            .execute(&mut self.tx)
            .await?;
        Ok(())
    }

    async fn delete_user(&mut self, user_id: &ID) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE user_uid = $1")
            .bind(user_id.inner_ref())
            .execute(&mut self.tx)
            .await?;
        Ok(())
    }

    async fn save_dog(&mut self, dog: &Dog) -> anyhow::Result<()> {
        sqlx::query(INSERT_DOG_QUERY)
            .bind(dog.id.inner_ref())
            .bind(dog.family_id.inner_ref())
            .bind(&dog.name)
            .bind(dog.is_deleted)
            .execute(&mut self.tx)
            .await?;
        Ok(())
    }

    async fn save_reminder(&mut self, reminder: &Reminder) -> anyhow::Result<()> {
        bind_reminder(sqlx::query(INSERT_REMINDER_QUERY), reminder)
            .execute(&mut self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
