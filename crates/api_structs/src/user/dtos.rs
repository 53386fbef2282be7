use pawtime_domain::{User, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub family_id: ID,
    pub full_name: String,
    pub has_device_token: bool,
    pub is_notification_enabled: bool,
    pub is_loud_notification: bool,
    pub notification_sound: String,
    pub is_follow_up_enabled: bool,
    pub follow_up_delay: i64,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id.clone(),
            family_id: user.family_id.clone(),
            full_name: user.full_name,
            has_device_token: user.device_token.is_some(),
            is_notification_enabled: user.is_notification_enabled,
            is_loud_notification: user.is_loud_notification,
            notification_sound: user.notification_sound,
            is_follow_up_enabled: user.is_follow_up_enabled,
            follow_up_delay: user.follow_up_delay,
        }
    }
}
