mod inmemory;
pub(crate) mod postgres;

pub use inmemory::InMemoryFamilyRepo;
use pawtime_domain::{Family, ID};
pub use postgres::PostgresFamilyRepo;

#[async_trait::async_trait]
pub trait IFamilyRepo: Send + Sync {
    async fn insert(&self, family: &Family) -> anyhow::Result<()>;
    async fn save(&self, family: &Family) -> anyhow::Result<()>;
    async fn find(&self, family_id: &ID) -> Option<Family>;
    async fn find_by_api_key(&self, api_key: &str) -> Option<Family>;
    async fn find_all(&self) -> anyhow::Result<Vec<Family>>;
}
