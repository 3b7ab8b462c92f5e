//! Time source for timestamps written by the relay and the upsert service.

use chrono::{DateTime, SecondsFormat, Utc};

/// Supplies "now" as an ISO-8601 string and as epoch milliseconds.
pub trait Clock: Send + Sync {
    /// Current time as ISO-8601 (`2024-01-01T00:00:00.000Z`).
    fn now_iso(&self) -> String;

    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_iso(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at one instant. `now_iso` returns the string it was built
/// from verbatim.
#[derive(Debug, Clone)]
pub struct FixedClock {
    iso: String,
    millis: i64,
}

impl FixedClock {
    /// Freeze at an RFC 3339 timestamp. An unparseable string still works
    /// as `now_iso`; `now_millis` is then 0.
    pub fn at(iso: impl Into<String>) -> Self {
        let iso = iso.into();
        let millis = DateTime::parse_from_rfc3339(&iso)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0);
        Self { iso, millis }
    }
}

impl Clock for FixedClock {
    fn now_iso(&self) -> String {
        self.iso.clone()
    }

    fn now_millis(&self) -> i64 {
        self.millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_formats_like_iso_string() {
        let now = SystemClock.now_iso();
        assert!(now.ends_with('Z'));
        // yyyy-mm-ddThh:mm:ss.mmmZ
        assert_eq!(now.len(), 24);
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }

    #[test]
    fn fixed_clock_is_verbatim() {
        let clock = FixedClock::at("2024-01-01T00:00:00Z");
        assert_eq!(clock.now_iso(), "2024-01-01T00:00:00Z");
        assert_eq!(clock.now_millis(), 1_704_067_200_000);
    }

    #[test]
    fn fixed_clock_tolerates_garbage() {
        let clock = FixedClock::at("not a date");
        assert_eq!(clock.now_iso(), "not a date");
        assert_eq!(clock.now_millis(), 0);
    }
}
