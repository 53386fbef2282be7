use crate::shared::entity::{Entity, ID};

/// A `Dog` belongs to exactly one `Family` and owns its `Reminder`s.
#[derive(Debug, Clone)]
pub struct Dog {
    pub id: ID,
    pub family_id: ID,
    pub name: String,
    /// Soft delete. A deleted dog is excluded from queries and none of
    /// its reminders ever schedule.
    pub is_deleted: bool,
}

impl Dog {
    pub fn new(family_id: ID, name: &str) -> Self {
        Self {
            id: Default::default(),
            family_id,
            name: name.to_string(),
            is_deleted: false,
        }
    }
}

impl Entity for Dog {
    fn id(&self) -> &ID {
        &self.id
    }
}
