use super::{ITransaction, ITransactionManager};
use crate::repos::shared::inmemory_repo::{delete, upsert};
use pawtime_domain::{Dog, Family, Reminder, User, ID};
use std::sync::{Arc, Mutex};

/// The collections shared between the in-memory repos and the in-memory
/// transaction manager, so committed writes are visible through both.
#[derive(Clone, Default)]
pub struct InMemoryStores {
    pub families: Arc<Mutex<Vec<Family>>>,
    pub users: Arc<Mutex<Vec<User>>>,
    pub dogs: Arc<Mutex<Vec<Dog>>>,
    pub reminders: Arc<Mutex<Vec<Reminder>>>,
}

enum TxOp {
    SaveFamily(Family),
    SaveUser(User),
    DeleteUser(ID),
    SaveDog(Dog),
    SaveReminder(Reminder),
}

pub struct InMemoryTransactionManager {
    stores: InMemoryStores,
}

impl InMemoryTransactionManager {
    pub fn new(stores: InMemoryStores) -> Self {
        Self { stores }
    }
}

#[async_trait::async_trait]
impl ITransactionManager for InMemoryTransactionManager {
    async fn begin(&self) -> anyhow::Result<Box<dyn ITransaction>> {
        Ok(Box::new(InMemoryTransaction {
            ops: Vec::new(),
            stores: self.stores.clone(),
        }))
    }
}

/// Buffers writes until commit; a rollback (or a drop) leaves the stores
/// untouched, mirroring the postgres transaction semantics.
pub struct InMemoryTransaction {
    ops: Vec<TxOp>,
    stores: InMemoryStores,
}

#[async_trait::async_trait]
impl ITransaction for InMemoryTransaction {
    async fn save_family(&mut self, family: &Family) -> anyhow::Result<()> {
        self.ops.push(TxOp::SaveFamily(family.clone()));
        Ok(())
    }

    async fn save_user(&mut self, user: &User) -> anyhow::Result<()> {
        self.ops.push(TxOp::SaveUser(user.clone()));
        Ok(())
    }

    async fn delete_user(&mut self, user_id: &ID) -> anyhow::Result<()> {
        self.ops.push(TxOp::DeleteUser(user_id.clone()));
        Ok(())
    }

    async fn save_dog(&mut self, dog: &Dog) -> anyhow::Result<()> {
        self.ops.push(TxOp::SaveDog(dog.clone()));
        Ok(())
    }

    async fn save_reminder(&mut self, reminder: &Reminder) -> anyhow::Result<()> {
        self.ops.push(TxOp::SaveReminder(reminder.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        for op in self.ops {
            match op {
                TxOp::SaveFamily(family) => upsert(&family, &self.stores.families),
                TxOp::SaveUser(user) => upsert(&user, &self.stores.users),
                TxOp::DeleteUser(user_id) => {
                    delete(&user_id, &self.stores.users);
                }
                TxOp::SaveDog(dog) => upsert(&dog, &self.stores.dogs),
                TxOp::SaveReminder(reminder) => upsert(&reminder, &self.stores.reminders),
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}
