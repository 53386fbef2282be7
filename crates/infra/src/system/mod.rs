use chrono::Utc;

/// Clock used by the alarm subsystem. Behind a trait so tests can pin
/// time when computing fire delays.
pub trait ISys: Send + Sync {
    /// Current UTC timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock, used outside of tests
pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
