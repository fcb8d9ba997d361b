/// Calendar-day normalization and the clock abstraction
///
/// Every completion is keyed by a calendar day. Timestamps are collapsed to the
/// day they fall on in their own offset, so two instants captured on the same
/// local day compare equal regardless of time of day.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Anything that can be collapsed to a calendar day
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

/// Strip the time-of-day from a timestamp, keeping year/month/day
pub fn normalize<T: CalendarDay + ?Sized>(timestamp: &T) -> NaiveDate {
    timestamp.calendar_day()
}

/// Parse a `YYYY-MM-DD` day as sent by clients
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Source of the current instant
///
/// Injected into the lifecycle service so "today" can be pinned in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// The current calendar day
    fn today(&self) -> NaiveDate {
        normalize(&self.now())
    }
}

/// Wall clock in the process's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    /// A clock reading noon on the given day
    ///
    /// Returns None only when noon does not exist locally on that day.
    pub fn at_noon(day: NaiveDate) -> Option<Self> {
        let noon = day.and_hms_opt(12, 0, 0)?;
        Local.from_local_datetime(&noon).single().map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
