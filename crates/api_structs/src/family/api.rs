use crate::dtos::{DogDTO, FamilyDTO, UserDTO};
use pawtime_domain::{Dog, Family, User, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyResponse {
    pub family: FamilyDTO,
}

impl FamilyResponse {
    pub fn new(family: Family) -> Self {
        Self {
            family: FamilyDTO::new(family),
        }
    }
}

pub mod create_family {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub code: String,
        pub name: String,
        pub timezone: Option<String>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub family: FamilyDTO,
        /// Returned exactly once, at creation
        pub api_key: String,
    }

    impl APIResponse {
        pub fn new(family: Family) -> Self {
            let api_key = family.api_key.clone();
            Self {
                family: FamilyDTO::new(family),
                api_key,
            }
        }
    }
}

pub mod get_family {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub family: FamilyDTO,
        pub members: Vec<UserDTO>,
        pub dogs: Vec<DogDTO>,
    }

    impl APIResponse {
        pub fn new(family: Family, members: Vec<User>, dogs: Vec<Dog>) -> Self {
            Self {
                family: FamilyDTO::new(family),
                members: members.into_iter().map(UserDTO::new).collect(),
                dogs: dogs.into_iter().map(DogDTO::new).collect(),
            }
        }
    }
}

pub mod update_family {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub is_paused: Option<bool>,
        pub is_locked: Option<bool>,
        pub timezone: Option<String>,
    }

    pub type APIResponse = FamilyResponse;
}

pub mod add_family_member {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub full_name: String,
        pub device_token: Option<String>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub user: UserDTO,
    }

    impl APIResponse {
        pub fn new(user: User) -> Self {
            Self {
                user: UserDTO::new(user),
            }
        }
    }
}

pub mod remove_family_member {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub user: UserDTO,
    }

    impl APIResponse {
        pub fn new(user: User) -> Self {
            Self {
                user: UserDTO::new(user),
            }
        }
    }
}
