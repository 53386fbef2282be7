use crate::dtos::DogDTO;
use pawtime_domain::{Dog, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DogResponse {
    pub dog: DogDTO,
}

impl DogResponse {
    pub fn new(dog: Dog) -> Self {
        Self {
            dog: DogDTO::new(dog),
        }
    }
}

pub mod create_dog {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
    }

    pub type APIResponse = DogResponse;
}

pub mod delete_dog {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub dog_id: ID,
    }

    pub type APIResponse = DogResponse;
}
