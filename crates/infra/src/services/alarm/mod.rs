mod dispatcher;
mod recovery;
mod scheduler;

pub use dispatcher::NotificationDispatcher;
pub use recovery::RecoveryCoordinator;
pub use scheduler::AlarmScheduler;
