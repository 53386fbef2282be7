use crate::shared::entity::{Entity, ID};

pub const DEFAULT_FOLLOW_UP_DELAY_MILLIS: i64 = 1000 * 60 * 5;

/// A member of a `Family`. Carries the per-device push state and the
/// notification preferences that decide how (and whether) this member
/// is notified when a reminder fires.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub family_id: ID,
    pub full_name: String,
    /// Push token of the member's device. `None` means the member
    /// cannot receive pushes at all.
    pub device_token: Option<String>,
    pub is_notification_enabled: bool,
    /// Loud members get a payload without a sound cue; their client
    /// plays an in-app alarm instead.
    pub is_loud_notification: bool,
    pub notification_sound: String,
    /// Whether a follow-up push should be sent if the member does not
    /// react to the primary alarm
    pub is_follow_up_enabled: bool,
    /// Delay between the primary fire and the follow-up push, in millis
    pub follow_up_delay: i64,
}

impl User {
    pub fn new(family_id: ID, full_name: &str) -> Self {
        Self {
            id: Default::default(),
            family_id,
            full_name: full_name.to_string(),
            device_token: None,
            is_notification_enabled: true,
            is_loud_notification: false,
            notification_sound: "radar".into(),
            is_follow_up_enabled: false,
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY_MILLIS,
        }
    }

    pub fn can_receive_push(&self) -> bool {
        self.device_token.is_some() && self.is_notification_enabled
    }

    pub fn wants_follow_up(&self) -> bool {
        self.is_follow_up_enabled && self.can_receive_push()
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_eligibility_needs_token_and_enabled_flag() {
        let mut user = User::new(ID::new(), "Joanne");
        assert!(!user.can_receive_push());

        user.device_token = Some("token".into());
        assert!(user.can_receive_push());

        user.is_notification_enabled = false;
        assert!(!user.can_receive_push());
    }

    #[test]
    fn follow_up_requires_push_eligibility() {
        let mut user = User::new(ID::new(), "Joanne");
        user.is_follow_up_enabled = true;
        assert!(!user.wants_follow_up());

        user.device_token = Some("token".into());
        assert!(user.wants_follow_up());
    }
}
