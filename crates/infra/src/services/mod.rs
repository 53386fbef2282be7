pub mod alarm;
mod push;

pub use push::{HttpPushTransport, IPushTransport, InMemoryPushTransport, PushNotification};
