mod inmemory;
pub(crate) mod postgres;

pub use inmemory::InMemoryReminderRepo;
use pawtime_domain::{Reminder, ID};
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// Live (non soft-deleted) reminders of the family
    async fn find_by_family(&self, family_id: &ID) -> anyhow::Result<Vec<Reminder>>;
    /// Live reminders of one dog
    async fn find_by_dog(&self, dog_id: &ID) -> anyhow::Result<Vec<Reminder>>;
    /// Number of live reminders, checked against the family's limit
    async fn count_by_family(&self, family_id: &ID) -> anyhow::Result<usize>;
    /// Post-fire write of the advanced execution state, made on the
    /// ambient connection rather than a request transaction
    async fn save_execution_state(
        &self,
        reminder_id: &ID,
        execution_basis: i64,
        execution_date: Option<i64>,
    ) -> anyhow::Result<()>;
}
