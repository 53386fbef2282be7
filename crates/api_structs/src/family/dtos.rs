use pawtime_domain::{Family, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDTO {
    pub id: ID,
    pub name: String,
    pub timezone: String,
    pub is_paused: bool,
    pub is_locked: bool,
    pub reminder_limit: usize,
}

impl FamilyDTO {
    pub fn new(family: Family) -> Self {
        Self {
            id: family.id.clone(),
            name: family.name,
            timezone: family.timezone.to_string(),
            is_paused: family.is_paused,
            is_locked: family.is_locked,
            reminder_limit: family.reminder_limit,
        }
    }
}
