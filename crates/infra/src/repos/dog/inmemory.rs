use super::IDogRepo;
use crate::repos::shared::inmemory_repo::*;
use pawtime_domain::{Dog, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryDogRepo {
    dogs: Arc<Mutex<Vec<Dog>>>,
}

impl InMemoryDogRepo {
    pub fn new(dogs: Arc<Mutex<Vec<Dog>>>) -> Self {
        Self { dogs }
    }
}

#[async_trait::async_trait]
impl IDogRepo for InMemoryDogRepo {
    async fn insert(&self, dog: &Dog) -> anyhow::Result<()> {
        insert(dog, &self.dogs);
        Ok(())
    }

    async fn save(&self, dog: &Dog) -> anyhow::Result<()> {
        save(dog, &self.dogs);
        Ok(())
    }

    async fn find(&self, dog_id: &ID) -> Option<Dog> {
        find(dog_id, &self.dogs)
    }

    async fn find_by_family(&self, family_id: &ID) -> anyhow::Result<Vec<Dog>> {
        Ok(find_by(&self.dogs, |dog: &Dog| {
            dog.family_id == *family_id && !dog.is_deleted
        }))
    }
}
