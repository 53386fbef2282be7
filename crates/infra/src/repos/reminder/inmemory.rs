use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use pawtime_domain::{Reminder, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryReminderRepo {
    reminders: Arc<Mutex<Vec<Reminder>>>,
}

impl InMemoryReminderRepo {
    pub fn new(reminders: Arc<Mutex<Vec<Reminder>>>) -> Self {
        Self { reminders }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_family(&self, family_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |reminder: &Reminder| {
            reminder.family_id == *family_id && !reminder.is_deleted
        }))
    }

    async fn find_by_dog(&self, dog_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |reminder: &Reminder| {
            reminder.dog_id == *dog_id && !reminder.is_deleted
        }))
    }

    async fn count_by_family(&self, family_id: &ID) -> anyhow::Result<usize> {
        Ok(self.find_by_family(family_id).await?.len())
    }

    async fn save_execution_state(
        &self,
        reminder_id: &ID,
        execution_basis: i64,
        execution_date: Option<i64>,
    ) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        for reminder in reminders.iter_mut() {
            if reminder.id == *reminder_id {
                reminder.execution_basis = execution_basis;
                reminder.execution_date = execution_date;
            }
        }
        Ok(())
    }
}
