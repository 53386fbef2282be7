mod inmemory;
mod postgres;

pub use inmemory::{InMemoryStores, InMemoryTransactionManager};
use pawtime_domain::{Dog, Family, Reminder, User, ID};
pub use postgres::PostgresTransactionManager;

/// One request-scoped unit of work. Writes become visible to the rest of
/// the system only when `commit` succeeds; callers must not touch the
/// alarm scheduler before that point, so a rolled-back edit can never
/// leave a stray job armed.
#[async_trait::async_trait]
pub trait ITransaction: Send {
    async fn save_family(&mut self, family: &Family) -> anyhow::Result<()>;
    async fn save_user(&mut self, user: &User) -> anyhow::Result<()>;
    async fn delete_user(&mut self, user_id: &ID) -> anyhow::Result<()>;
    async fn save_dog(&mut self, dog: &Dog) -> anyhow::Result<()>;
    async fn save_reminder(&mut self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait ITransactionManager: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn ITransaction>>;
}
