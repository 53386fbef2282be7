mod config;
pub mod repos;
pub mod services;
pub mod system;

pub use config::Config;
use repos::Repos;
use services::alarm::{AlarmScheduler, NotificationDispatcher, RecoveryCoordinator};
use services::{HttpPushTransport, IPushTransport, InMemoryPushTransport};
use std::sync::Arc;
use system::{ISys, RealSys};

#[derive(Clone)]
pub struct PawtimeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub scheduler: AlarmScheduler,
}

impl PawtimeContext {
    fn create(
        repos: Repos,
        config: Config,
        sys: Arc<dyn ISys>,
        transport: Arc<dyn IPushTransport>,
    ) -> Self {
        let dispatcher = NotificationDispatcher::new(repos.clone(), transport);
        let scheduler = AlarmScheduler::new(repos.clone(), sys.clone(), dispatcher);
        Self {
            repos,
            config,
            sys,
            scheduler,
        }
    }

    pub fn recovery(&self) -> RecoveryCoordinator {
        RecoveryCoordinator::new(self.repos.clone(), self.scheduler.clone())
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> PawtimeContext {
    let config = Config::new();
    let connection_string =
        std::env::var("DATABASE_URL").expect("DATABASE_URL env var to be present");
    let repos = Repos::create_postgres(&connection_string)
        .await
        .expect("Postgres connection and migrations to succeed");
    let transport: Arc<dyn IPushTransport> = match &config.push_provider_url {
        Some(url) => Arc::new(HttpPushTransport::new(
            url.clone(),
            config.push_provider_key.clone(),
        )),
        None => Arc::new(InMemoryPushTransport::default()),
    };
    PawtimeContext::create(repos, config, Arc::new(RealSys {}), transport)
}

pub fn setup_context_for_tests() -> (PawtimeContext, Arc<InMemoryPushTransport>) {
    let transport = Arc::new(InMemoryPushTransport::default());
    let context = PawtimeContext::create(
        Repos::create_inmemory(),
        Config::new(),
        Arc::new(RealSys {}),
        transport.clone(),
    );
    (context, transport)
}
