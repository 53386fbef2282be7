use crate::repos::Repos;
use crate::services::push::{IPushTransport, PushNotification};
use pawtime_domain::{Dog, Reminder, User, ID};
use std::sync::Arc;
use tracing::warn;

const PRIMARY_CATEGORY: &str = "reminder";
const FOLLOW_UP_CATEGORY: &str = "reminderFollowUp";

/// Turns a firing reminder into one push per qualifying family member.
/// Recipients are resolved at fire time, so preference changes made after
/// a job was armed are always honored.
#[derive(Clone)]
pub struct NotificationDispatcher {
    repos: Repos,
    transport: Arc<dyn IPushTransport>,
}

impl NotificationDispatcher {
    pub fn new(repos: Repos, transport: Arc<dyn IPushTransport>) -> Self {
        Self { repos, transport }
    }

    pub async fn broadcast_to_family(&self, reminder: &Reminder, dog: &Dog) {
        let users = match self.repos.users.find_by_family(&reminder.family_id).await {
            Ok(users) => users,
            Err(e) => {
                warn!(
                    "Unable to resolve members of family: {} for broadcast. Error: {:?}",
                    reminder.family_id, e
                );
                return;
            }
        };
        for user in users.iter().filter(|user| user.can_receive_push()) {
            self.transport
                .send(payload(PRIMARY_CATEGORY, reminder, dog, user))
                .await;
        }
    }

    /// Nudges a single member who did not react to the primary alarm.
    /// The follow-up preference is re-checked here, not when the job was
    /// armed.
    pub async fn send_follow_up(&self, user_id: &ID, reminder_id: &ID) {
        let user = match self.repos.users.find(user_id).await {
            Some(user) if user.wants_follow_up() => user,
            _ => return,
        };
        let reminder = match self.repos.reminders.find(reminder_id).await {
            Some(reminder) if reminder.is_enabled && !reminder.is_deleted => reminder,
            _ => return,
        };
        let dog = match self.repos.dogs.find(&reminder.dog_id).await {
            Some(dog) if !dog.is_deleted => dog,
            _ => return,
        };
        self.transport
            .send(payload(FOLLOW_UP_CATEGORY, &reminder, &dog, &user))
            .await;
    }
}

fn payload(category: &str, reminder: &Reminder, dog: &Dog, user: &User) -> PushNotification {
    let action = reminder.action.display_name(&reminder.custom_action_name);
    let body = match category {
        FOLLOW_UP_CATEGORY => format!("{} is still waiting for: {}", dog.name, action),
        _ => format!("Time to take care of {}: {}", dog.name, action),
    };
    PushNotification {
        // Checked by the caller through `can_receive_push`
        device_token: user.device_token.clone().unwrap_or_default(),
        category: category.to_string(),
        title: action,
        body,
        sound: if user.is_loud_notification {
            None
        } else {
            Some(user.notification_sound.clone())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::push::InMemoryPushTransport;
    use pawtime_domain::{
        CountdownConfig, Family, ReminderAction, ReminderRecurrence,
    };

    struct TestWorld {
        repos: Repos,
        transport: Arc<InMemoryPushTransport>,
        dispatcher: NotificationDispatcher,
        family: Family,
        dog: Dog,
        reminder: Reminder,
    }

    async fn setup() -> TestWorld {
        let repos = Repos::create_inmemory();
        let transport = Arc::new(InMemoryPushTransport::default());
        let dispatcher = NotificationDispatcher::new(repos.clone(), transport.clone());

        let family = Family::new("Smith", 10);
        let dog = Dog::new(family.id.clone(), "Rex");
        let reminder = Reminder::new(
            dog.id.clone(),
            family.id.clone(),
            ReminderAction::Feed,
            ReminderRecurrence::Countdown(CountdownConfig {
                execution_interval: 1000,
                interval_elapsed: 0,
            }),
        );
        repos.families.insert(&family).await.unwrap();
        repos.dogs.insert(&dog).await.unwrap();
        repos.reminders.insert(&reminder).await.unwrap();

        TestWorld {
            repos,
            transport,
            dispatcher,
            family,
            dog,
            reminder,
        }
    }

    fn member(family_id: &ID, name: &str, token: Option<&str>) -> User {
        let mut user = User::new(family_id.clone(), name);
        user.device_token = token.map(|token| token.into());
        user
    }

    #[tokio::test]
    async fn broadcast_skips_members_without_token_or_with_muted_notifications() {
        let world = setup().await;
        let reachable = member(&world.family.id, "Ann", Some("token-1"));
        let no_token = member(&world.family.id, "Ben", None);
        let mut muted = member(&world.family.id, "Cleo", Some("token-2"));
        muted.is_notification_enabled = false;
        for user in [&reachable, &no_token, &muted] {
            world.repos.users.insert(user).await.unwrap();
        }

        world
            .dispatcher
            .broadcast_to_family(&world.reminder, &world.dog)
            .await;

        let sent = world.transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].device_token, "token-1");
        assert_eq!(sent[0].title, "Feed");
        assert!(sent[0].body.contains("Rex"));
    }

    #[tokio::test]
    async fn loud_members_get_a_payload_without_sound() {
        let world = setup().await;
        let mut loud = member(&world.family.id, "Ann", Some("token-1"));
        loud.is_loud_notification = true;
        let quiet = member(&world.family.id, "Ben", Some("token-2"));
        world.repos.users.insert(&loud).await.unwrap();
        world.repos.users.insert(&quiet).await.unwrap();

        world
            .dispatcher
            .broadcast_to_family(&world.reminder, &world.dog)
            .await;

        let sent = world.transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        let loud_push = sent.iter().find(|p| p.device_token == "token-1").unwrap();
        let quiet_push = sent.iter().find(|p| p.device_token == "token-2").unwrap();
        assert_eq!(loud_push.sound, None);
        assert_eq!(quiet_push.sound, Some("radar".into()));
    }

    #[tokio::test]
    async fn follow_up_rechecks_the_preference_at_fire_time() {
        let world = setup().await;
        let mut user = member(&world.family.id, "Ann", Some("token-1"));
        user.is_follow_up_enabled = true;
        world.repos.users.insert(&user).await.unwrap();

        world
            .dispatcher
            .send_follow_up(&user.id, &world.reminder.id)
            .await;
        assert_eq!(world.transport.sent.lock().unwrap().len(), 1);
        assert_eq!(
            world.transport.sent.lock().unwrap()[0].category,
            "reminderFollowUp"
        );

        user.is_follow_up_enabled = false;
        world.repos.users.save(&user).await.unwrap();
        world
            .dispatcher
            .send_follow_up(&user.id, &world.reminder.id)
            .await;
        assert_eq!(world.transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn follow_up_for_a_deleted_reminder_is_dropped() {
        let world = setup().await;
        let mut user = member(&world.family.id, "Ann", Some("token-1"));
        user.is_follow_up_enabled = true;
        world.repos.users.insert(&user).await.unwrap();

        let mut reminder = world.reminder.clone();
        reminder.is_deleted = true;
        world.repos.reminders.save(&reminder).await.unwrap();

        world
            .dispatcher
            .send_follow_up(&user.id, &reminder.id)
            .await;
        assert!(world.transport.sent.lock().unwrap().is_empty());
    }
}
