mod dog;
mod family;
mod reminder;
pub mod shared;
mod transaction;
mod user;

pub use dog::{IDogRepo, InMemoryDogRepo, PostgresDogRepo};
pub use family::{IFamilyRepo, InMemoryFamilyRepo, PostgresFamilyRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use transaction::{
    ITransaction, ITransactionManager, InMemoryStores, InMemoryTransactionManager,
    PostgresTransactionManager,
};
pub use user::{IUserRepo, InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub families: Arc<dyn IFamilyRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub dogs: Arc<dyn IDogRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub transactions: Arc<dyn ITransactionManager>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self {
            families: Arc::new(PostgresFamilyRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            dogs: Arc::new(PostgresDogRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            transactions: Arc::new(PostgresTransactionManager::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        let stores = InMemoryStores::default();
        Self {
            families: Arc::new(InMemoryFamilyRepo::new(stores.families.clone())),
            users: Arc::new(InMemoryUserRepo::new(stores.users.clone())),
            dogs: Arc::new(InMemoryDogRepo::new(stores.dogs.clone())),
            reminders: Arc::new(InMemoryReminderRepo::new(stores.reminders.clone())),
            transactions: Arc::new(InMemoryTransactionManager::new(stores)),
        }
    }
}
