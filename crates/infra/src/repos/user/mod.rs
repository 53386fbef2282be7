mod inmemory;
pub(crate) mod postgres;

pub use inmemory::InMemoryUserRepo;
use pawtime_domain::{User, ID};
pub use postgres::PostgresUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
    async fn find_by_family(&self, family_id: &ID) -> anyhow::Result<Vec<User>>;
    async fn delete(&self, user_id: &ID) -> Option<User>;
}
