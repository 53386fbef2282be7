use crate::dtos::UserDTO;
use pawtime_domain::User;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: UserDTO,
}

impl UserResponse {
    pub fn new(user: User) -> Self {
        Self {
            user: UserDTO::new(user),
        }
    }
}

pub mod get_me {
    use super::*;

    pub type APIResponse = UserResponse;
}

pub mod update_notification_settings {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub device_token: Option<String>,
        pub is_notification_enabled: Option<bool>,
        pub is_loud_notification: Option<bool>,
        pub notification_sound: Option<String>,
        pub is_follow_up_enabled: Option<bool>,
        pub follow_up_delay: Option<i64>,
    }

    pub type APIResponse = UserResponse;
}
