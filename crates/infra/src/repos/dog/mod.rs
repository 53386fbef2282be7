mod inmemory;
pub(crate) mod postgres;

pub use inmemory::InMemoryDogRepo;
use pawtime_domain::{Dog, ID};
pub use postgres::PostgresDogRepo;

#[async_trait::async_trait]
pub trait IDogRepo: Send + Sync {
    async fn insert(&self, dog: &Dog) -> anyhow::Result<()>;
    async fn save(&self, dog: &Dog) -> anyhow::Result<()>;
    async fn find(&self, dog_id: &ID) -> Option<Dog>;
    /// Live (non soft-deleted) dogs of the family
    async fn find_by_family(&self, family_id: &ID) -> anyhow::Result<Vec<Dog>>;
}
