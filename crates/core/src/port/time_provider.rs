// Time Provider Port (for testability)

use std::time::SystemTime;

/// Timestamp layout used in every JSON payload (local time, microseconds)
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;

    /// Current local time as an ISO-8601 string without offset
    fn now_iso(&self) -> String;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn now_iso(&self) -> String {
        chrono::Local::now()
            .naive_local()
            .format(ISO_FORMAT)
            .to_string()
    }
}

/// Format a filesystem timestamp the same way as `now_iso`
pub fn format_system_time(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .naive_local()
        .format(ISO_FORMAT)
        .to_string()
}

/// Fixed clock for tests
pub struct FixedTimeProvider {
    pub millis: i64,
    pub iso: String,
}

impl FixedTimeProvider {
    pub fn new(iso: impl Into<String>) -> Self {
        Self {
            millis: 0,
            iso: iso.into(),
        }
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.millis
    }

    fn now_iso(&self) -> String {
        self.iso.clone()
    }
}
