use crate::repos::Repos;
use crate::services::alarm::dispatcher::NotificationDispatcher;
use crate::system::ISys;
use pawtime_domain::{scheduling, Reminder, User, ID};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// A primary job broadcasts one reminder to its whole family. A follow-up
/// job nudges a single member some delay after the primary fire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum JobKey {
    Primary { family_id: ID, reminder_id: ID },
    FollowUp { user_id: ID, reminder_id: ID },
}

impl JobKey {
    fn reminder_id(&self) -> &ID {
        match self {
            Self::Primary { reminder_id, .. } => reminder_id,
            Self::FollowUp { reminder_id, .. } => reminder_id,
        }
    }
}

struct ArmedJob {
    /// Re-arming a key bumps the generation. A sleeper that wakes with a
    /// stale generation was replaced and must not fire.
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

struct SchedulerInner {
    jobs: Mutex<HashMap<JobKey, ArmedJob>>,
    generation: AtomicU64,
    repos: Repos,
    sys: Arc<dyn ISys>,
    dispatcher: NotificationDispatcher,
}

/// Owns every pending alarm as an in-memory timer. Jobs are pure derived
/// state: anything armed here can be rebuilt from the stored reminders,
/// which is what `RecoveryCoordinator` does at boot.
#[derive(Clone)]
pub struct AlarmScheduler {
    inner: Arc<SchedulerInner>,
}

impl AlarmScheduler {
    pub fn new(repos: Repos, sys: Arc<dyn ISys>, dispatcher: NotificationDispatcher) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                jobs: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
                repos,
                sys,
                dispatcher,
            }),
        }
    }

    /// Arms (or replaces) the broadcast job of a reminder at its scheduled
    /// fire instant. A reminder without one is ignored.
    pub fn schedule_primary(&self, reminder: &Reminder) {
        let fire_at = match reminder.execution_date {
            Some(date) => date,
            None => return,
        };
        self.arm(
            JobKey::Primary {
                family_id: reminder.family_id.clone(),
                reminder_id: reminder.id.clone(),
            },
            fire_at,
        );
    }

    pub fn schedule_follow_up(&self, user: &User, reminder_id: &ID, fire_at: i64) {
        if !user.wants_follow_up() {
            return;
        }
        self.arm(
            JobKey::FollowUp {
                user_id: user.id.clone(),
                reminder_id: reminder_id.clone(),
            },
            fire_at,
        );
    }

    /// Cancels the primary job and every pending follow-up of a reminder.
    /// A cancelled job is guaranteed not to fire.
    pub fn cancel_reminder(&self, reminder_id: &ID) {
        self.remove_where(|key| key.reminder_id() == reminder_id);
    }

    /// Cancels every pending follow-up of one member, used when the member
    /// leaves the family or turns follow-ups off.
    pub fn cancel_user(&self, user_id: &ID) {
        self.remove_where(|key| matches!(key, JobKey::FollowUp { user_id: id, .. } if id == user_id));
    }

    /// Cancels every job of a family, used on pause. Stored execution
    /// state is untouched so a resume can re-arm without shifting.
    pub fn cancel_family(&self, family_id: &ID, member_ids: &[ID]) {
        self.remove_where(|key| match key {
            JobKey::Primary { family_id: id, .. } => id == family_id,
            JobKey::FollowUp { user_id, .. } => member_ids.contains(user_id),
        });
    }

    /// Drops every armed job. Used on shutdown and before a recovery pass
    /// rebuilds the schedule from stored state.
    pub fn clear(&self) {
        self.remove_where(|_| true);
    }

    pub fn active_job_count(&self) -> usize {
        self.inner.jobs.lock().unwrap().len()
    }

    pub fn has_primary_job(&self, reminder_id: &ID) -> bool {
        self.inner
            .jobs
            .lock()
            .unwrap()
            .keys()
            .any(|key| matches!(key, JobKey::Primary { reminder_id: id, .. } if id == reminder_id))
    }

    pub fn has_follow_up_job(&self, user_id: &ID, reminder_id: &ID) -> bool {
        let key = JobKey::FollowUp {
            user_id: user_id.clone(),
            reminder_id: reminder_id.clone(),
        };
        self.inner.jobs.lock().unwrap().contains_key(&key)
    }

    fn arm(&self, key: JobKey, fire_at: i64) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst);
        {
            let mut jobs = self.inner.jobs.lock().unwrap();
            if let Some(old) = jobs.insert(
                key.clone(),
                ArmedJob {
                    generation,
                    handle: None,
                },
            ) {
                if let Some(handle) = old.handle {
                    handle.abort();
                }
            }
        }

        let delay = fire_at - self.inner.sys.get_timestamp_millis();
        let scheduler = self.clone();
        let sleeper_key = key.clone();
        let handle = tokio::spawn(async move {
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay as u64)).await;
            }
            // The job may have been cancelled or replaced while sleeping.
            let current = {
                let mut jobs = scheduler.inner.jobs.lock().unwrap();
                match jobs.get(&sleeper_key) {
                    Some(job) if job.generation == generation => {
                        jobs.remove(&sleeper_key);
                        true
                    }
                    _ => false,
                }
            };
            if current {
                scheduler.fire(sleeper_key).await;
            }
        });

        let mut jobs = self.inner.jobs.lock().unwrap();
        match jobs.get_mut(&key) {
            Some(job) if job.generation == generation => job.handle = Some(handle),
            // Superseded while spawning; the stale sleeper would no-op on
            // its generation check anyway
            Some(_) => handle.abort(),
            // Entry already gone: cancelled, or an immediate fire claimed
            // it and may be mid-flight. Must not abort that task.
            None => {}
        }
    }

    fn remove_where<F: Fn(&JobKey) -> bool>(&self, predicate: F) {
        let mut jobs = self.inner.jobs.lock().unwrap();
        let keys: Vec<_> = jobs.keys().filter(|key| predicate(key)).cloned().collect();
        for key in keys {
            if let Some(job) = jobs.remove(&key) {
                if let Some(handle) = job.handle {
                    handle.abort();
                }
            }
        }
    }

    async fn fire(&self, key: JobKey) {
        match key {
            JobKey::Primary {
                family_id,
                reminder_id,
            } => self.fire_primary(&family_id, &reminder_id).await,
            JobKey::FollowUp {
                user_id,
                reminder_id,
            } => {
                self.inner
                    .dispatcher
                    .send_follow_up(&user_id, &reminder_id)
                    .await
            }
        }
    }

    async fn fire_primary(&self, family_id: &ID, reminder_id: &ID) {
        let inner = &self.inner;
        let mut reminder = match inner.repos.reminders.find(reminder_id).await {
            Some(reminder) => reminder,
            None => return,
        };
        let family = match inner.repos.families.find(family_id).await {
            Some(family) => family,
            None => return,
        };
        let dog = match inner.repos.dogs.find(&reminder.dog_id).await {
            Some(dog) => dog,
            None => return,
        };
        // Re-checked at fire time; the state may have changed while the
        // timer slept.
        if !scheduling::is_schedulable(&reminder, &dog, &family) {
            return;
        }

        let fired_at = inner.sys.get_timestamp_millis();
        inner.dispatcher.broadcast_to_family(&reminder, &dog).await;

        let recurrence_before = reminder.recurrence.clone();
        reminder.reschedule_from(fired_at, &family.timezone);
        let persisted = if reminder.recurrence == recurrence_before {
            inner
                .repos
                .reminders
                .save_execution_state(
                    &reminder.id,
                    reminder.execution_basis,
                    reminder.execution_date,
                )
                .await
        } else {
            // A consumed skip flag has to be written back as well
            inner.repos.reminders.save(&reminder).await
        };
        if let Err(e) = persisted {
            error!(
                "Unable to persist execution state of reminder: {} after fire. Error: {:?}",
                reminder.id, e
            );
            // Left unarmed; the next recovery pass reconciles from the
            // stored state.
            return;
        }

        if reminder.execution_date.is_some() {
            self.schedule_primary(&reminder);
        }

        match inner.repos.users.find_by_family(family_id).await {
            Ok(users) => {
                for user in users.iter().filter(|user| user.wants_follow_up()) {
                    self.schedule_follow_up(user, &reminder.id, fired_at + user.follow_up_delay);
                }
            }
            Err(e) => {
                warn!(
                    "Unable to resolve members of family: {} for follow-ups. Error: {:?}",
                    family_id, e
                );
            }
        }
    }
}
