use pawtime_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret code clients must present to create a new `Family`
    pub create_family_secret_code: String,
    /// Port for the application to run on
    pub port: usize,
    /// Endpoint of the external push provider. When unset, pushes are
    /// recorded in memory instead of delivered, which is what tests and
    /// local development want.
    pub push_provider_url: Option<String>,
    /// Key sent along with every push submission
    pub push_provider_key: String,
    /// Reminder cap given to newly created families. A family's own limit
    /// can be raised later through its subscription.
    pub default_reminder_limit: usize,
}

impl Config {
    pub fn new() -> Self {
        let create_family_secret_code = match std::env::var("CREATE_FAMILY_SECRET_CODE") {
            Ok(code) => code,
            Err(_) => {
                info!("Did not find CREATE_FAMILY_SECRET_CODE environment variable. Going to create one.");
                let code = create_random_secret(16);
                info!(
                    "Secret code for creating families was generated and set to: {}",
                    code
                );
                code
            }
        };
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        let push_provider_url = std::env::var("PUSH_PROVIDER_URL").ok();
        if push_provider_url.is_none() {
            warn!("Did not find PUSH_PROVIDER_URL environment variable. Push notifications will be recorded but not delivered.");
        }
        let push_provider_key = std::env::var("PUSH_PROVIDER_API_KEY").unwrap_or_default();

        let default_reminder_limit = std::env::var("DEFAULT_REMINDER_LIMIT")
            .ok()
            .and_then(|limit| limit.parse::<usize>().ok())
            .unwrap_or(10);

        Self {
            create_family_secret_code,
            port,
            push_provider_url,
            push_provider_key,
            default_reminder_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
