use serde::Serialize;
use std::sync::Mutex;
use tracing::error;

/// One push submission handed to the external provider. `sound` is left
/// out for loud-notification members; their client plays an in-app alarm
/// instead of the payload sound.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushNotification {
    pub device_token: String,
    pub category: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

/// Fire-and-forget push delivery. Transport failures are logged and never
/// retried here.
#[async_trait::async_trait]
pub trait IPushTransport: Send + Sync {
    async fn send(&self, notification: PushNotification);
}

pub struct HttpPushTransport {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpPushTransport {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl IPushTransport for HttpPushTransport {
    async fn send(&self, notification: PushNotification) {
        let res = self
            .client
            .post(&self.url)
            .header("pawtime-push-key", &self.api_key)
            .json(&notification)
            .send()
            .await;
        match res {
            Ok(res) if !res.status().is_success() => {
                error!(
                    "Push provider rejected notification for device {} with status: {}",
                    notification.device_token,
                    res.status()
                );
            }
            Err(e) => {
                error!(
                    "Unable to reach push provider for device {}. Error: {:?}",
                    notification.device_token, e
                );
            }
            _ => (),
        }
    }
}

/// Records pushes instead of delivering them. Used in tests and when no
/// provider endpoint is configured.
#[derive(Default)]
pub struct InMemoryPushTransport {
    pub sent: Mutex<Vec<PushNotification>>,
}

#[async_trait::async_trait]
impl IPushTransport for InMemoryPushTransport {
    async fn send(&self, notification: PushNotification) {
        self.sent.lock().unwrap().push(notification);
    }
}
