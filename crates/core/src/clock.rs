//! Time source abstraction.
//!
//! Every date decision in the core is made against an injected clock so the
//! booking window is deterministic under test. Production code uses
//! [`SystemClock`]; tests pin a [`FixedClock`].

use chrono::{DateTime, NaiveDate, Utc};

/// A source of "now" for the scheduling core.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the service's business timezone.
    ///
    /// The service assumes a single business timezone; the default derives
    /// the date from [`Clock::now`] in UTC.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant, for deterministic tests and tooling.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_reports_pinned_date() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 10, 14, 30, 0).unwrap());
        assert_eq!(
            clock.today(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
    }
}
