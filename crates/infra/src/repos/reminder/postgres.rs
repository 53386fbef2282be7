use super::IReminderRepo;
use pawtime_domain::{Reminder, ReminderAction, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ReminderRaw {
    reminder_uid: Uuid,
    dog_uid: Uuid,
    family_uid: Uuid,
    action: String,
    custom_action_name: String,
    recurrence: serde_json::Value,
    is_enabled: bool,
    is_deleted: bool,
    execution_basis: i64,
    execution_date: Option<i64>,
}

impl Into<Reminder> for ReminderRaw {
    fn into(self) -> Reminder {
        Reminder {
            id: self.reminder_uid.into(),
            dog_id: self.dog_uid.into(),
            family_id: self.family_uid.into(),
            action: ReminderAction::from_str(&self.action).unwrap_or(ReminderAction::Custom),
            custom_action_name: self.custom_action_name,
            recurrence: serde_json::from_value(self.recurrence).unwrap(),
            is_enabled: self.is_enabled,
            is_deleted: self.is_deleted,
            execution_basis: self.execution_basis,
            execution_date: self.execution_date,
        }
    }
}

pub(crate) const INSERT_REMINDER_QUERY: &str = r#"
    INSERT INTO reminders (
        reminder_uid,
        dog_uid,
        family_uid,
        action,
        custom_action_name,
        recurrence,
        is_enabled,
        is_deleted,
        execution_basis,
        execution_date
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    ON CONFLICT (reminder_uid) DO UPDATE SET
        action = excluded.action,
        custom_action_name = excluded.custom_action_name,
        recurrence = excluded.recurrence,
        is_enabled = excluded.is_enabled,
        is_deleted = excluded.is_deleted,
        execution_basis = excluded.execution_basis,
        execution_date = excluded.execution_date
    "#;

pub(crate) fn bind_reminder<'a>(
    query: sqlx::query::Query<'a, sqlx::Postgres, sqlx::postgres::PgArguments>,
    reminder: &'a Reminder,
) -> sqlx::query::Query<'a, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(reminder.id.inner_ref())
        .bind(reminder.dog_id.inner_ref())
        .bind(reminder.family_id.inner_ref())
        .bind(reminder.action.as_str())
        .bind(&reminder.custom_action_name)
        .bind(Json(&reminder.recurrence))
        .bind(reminder.is_enabled)
        .bind(reminder.is_deleted)
        .bind(reminder.execution_basis)
        .bind(reminder.execution_date)
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        bind_reminder(sqlx::query(INSERT_REMINDER_QUERY), reminder)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.insert(reminder).await
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>("SELECT * FROM reminders WHERE reminder_uid = $1")
            .bind(reminder_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|reminder| reminder.into())
    }

    async fn find_by_family(&self, family_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            "SELECT * FROM reminders WHERE family_uid = $1 AND is_deleted = FALSE",
        )
        .bind(family_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders.into_iter().map(|reminder| reminder.into()).collect())
    }

    async fn find_by_dog(&self, dog_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            "SELECT * FROM reminders WHERE dog_uid = $1 AND is_deleted = FALSE",
        )
        .bind(dog_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders.into_iter().map(|reminder| reminder.into()).collect())
    }

    async fn count_by_family(&self, family_id: &ID) -> anyhow::Result<usize> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reminders WHERE family_uid = $1 AND is_deleted = FALSE",
        )
        .bind(family_id.inner_ref())
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 as usize)
    }

    async fn save_execution_state(
        &self,
        reminder_id: &ID,
        execution_basis: i64,
        execution_date: Option<i64>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders SET
                execution_basis = $2,
                execution_date = $3
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(execution_basis)
        .bind(execution_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
