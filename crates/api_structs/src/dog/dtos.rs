use pawtime_domain::{Dog, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DogDTO {
    pub id: ID,
    pub family_id: ID,
    pub name: String,
}

impl DogDTO {
    pub fn new(dog: Dog) -> Self {
        Self {
            id: dog.id.clone(),
            family_id: dog.family_id.clone(),
            name: dog.name,
        }
    }
}
