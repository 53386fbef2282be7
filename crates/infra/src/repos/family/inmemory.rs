use super::IFamilyRepo;
use crate::repos::shared::inmemory_repo::*;
use pawtime_domain::{Family, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryFamilyRepo {
    families: Arc<Mutex<Vec<Family>>>,
}

impl InMemoryFamilyRepo {
    pub fn new(families: Arc<Mutex<Vec<Family>>>) -> Self {
        Self { families }
    }
}

#[async_trait::async_trait]
impl IFamilyRepo for InMemoryFamilyRepo {
    async fn insert(&self, family: &Family) -> anyhow::Result<()> {
        insert(family, &self.families);
        Ok(())
    }

    async fn save(&self, family: &Family) -> anyhow::Result<()> {
        save(family, &self.families);
        Ok(())
    }

    async fn find(&self, family_id: &ID) -> Option<Family> {
        find(family_id, &self.families)
    }

    async fn find_by_api_key(&self, api_key: &str) -> Option<Family> {
        find_by(&self.families, |family: &Family| family.api_key == api_key)
            .into_iter()
            .next()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Family>> {
        Ok(find_by(&self.families, |_| true))
    }
}
