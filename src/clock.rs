//! Reference-day computation in one fixed time zone.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, instrument};

/// Computes the calendar day in the configured reference zone.
///
/// The day boundary follows the zone, not UTC and not the host's local
/// time. Callers compute the day once per request and pass it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceClock {
    zone: Tz,
}

impl ReferenceClock {
    /// Creates a clock for `zone`.
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// The reference zone.
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Today's reference day.
    #[instrument(skip(self), fields(zone = %self.zone))]
    pub fn today(&self) -> NaiveDate {
        let day = self.day_at(Utc::now());
        debug!(%day, "Reference day computed");
        day
    }

    /// Reference day of an arbitrary instant.
    pub fn day_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone).date_naive()
    }
}

impl Default for ReferenceClock {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

/// Ordinal of `day` counted from 0001-01-01, which is day 1.
pub fn day_ordinal(day: NaiveDate) -> i64 {
    i64::from(day.num_days_from_ce())
}
