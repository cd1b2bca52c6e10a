//! # Market Clock
//!
//! Decides whether the reference equities market is in its regular session.
//! Off-chain rebalancing is expected while the market trades and on-chain
//! settlement once it closes, so this is the only time input the lifecycle
//! classifier needs.
//!
//! Regular session is Monday to Friday, `09:30:00 <= t < 16:00:00` in
//! America/New_York civil time. Exchange holidays are not modelled: on a
//! holiday that falls on a weekday the market reports as open.

use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use synthpool_types::{
    SynthPoolError, SynthPoolResult, MARKET_CLOSE_HOUR, MARKET_CLOSE_MINUTE, MARKET_OPEN_HOUR,
    MARKET_OPEN_MINUTE,
};

// ============================================================================
// Clock Injection
// ============================================================================

/// Source of "now"
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedReason {
    Weekend,
    OutsideHours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSession {
    Open,
    Closed(ClosedReason),
}

impl MarketSession {
    pub fn is_open(&self) -> bool {
        matches!(self, MarketSession::Open)
    }
}

// ============================================================================
// Market Hours
// ============================================================================

/// Regular trading hours of a market, as seconds from local midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketHours {
    timezone: Tz,
    /// Inclusive
    open_secs: u32,
    /// Exclusive
    close_secs: u32,
}

impl MarketHours {
    /// NYSE / NASDAQ regular session
    pub fn nyse() -> Self {
        Self {
            timezone: chrono_tz::America::New_York,
            open_secs: MARKET_OPEN_HOUR * 3600 + MARKET_OPEN_MINUTE * 60,
            close_secs: MARKET_CLOSE_HOUR * 3600 + MARKET_CLOSE_MINUTE * 60,
        }
    }

    /// Build market hours from an IANA timezone name and local open/close times
    pub fn new(timezone: &str, open: NaiveTime, close: NaiveTime) -> SynthPoolResult<Self> {
        let tz = timezone
            .parse::<Tz>()
            .map_err(|e| SynthPoolError::unknown_timezone(timezone, &format!("{}", e)))?;

        if open >= close {
            return Err(SynthPoolError::invalid_parameter(
                "market_hours",
                &format!("{}-{}", open, close),
                "open strictly before close",
            ));
        }

        Ok(Self {
            timezone: tz,
            open_secs: open.num_seconds_from_midnight(),
            close_secs: close.num_seconds_from_midnight(),
        })
    }

    /// Parse `HH:MM` or `HH:MM:SS` local times
    pub fn parse(timezone: &str, open: &str, close: &str) -> SynthPoolResult<Self> {
        Self::new(timezone, parse_local_time("open", open)?, parse_local_time("close", close)?)
    }

    /// Classify `now` against the regular session
    pub fn session(&self, now: DateTime<Utc>) -> MarketSession {
        let local = now.with_timezone(&self.timezone);

        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return MarketSession::Closed(ClosedReason::Weekend);
        }

        // Sub-second precision is truncated, so 15:59:59.999 is still open
        let t = local.num_seconds_from_midnight();
        if t >= self.open_secs && t < self.close_secs {
            MarketSession::Open
        } else {
            MarketSession::Closed(ClosedReason::OutsideHours)
        }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.session(now).is_open()
    }

    /// Same as [`MarketHours::is_open`] for a raw unix timestamp (seconds)
    pub fn is_open_at(&self, unix_seconds: i64) -> SynthPoolResult<bool> {
        let now = DateTime::<Utc>::from_timestamp(unix_seconds, 0)
            .ok_or_else(|| SynthPoolError::invalid_timestamp(unix_seconds))?;
        Ok(self.is_open(now))
    }
}

impl Default for MarketHours {
    fn default() -> Self {
        Self::nyse()
    }
}

fn parse_local_time(field: &str, value: &str) -> SynthPoolResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| SynthPoolError::invalid_parameter(field, value, "HH:MM or HH:MM:SS"))
}

/// Whether the NYSE regular session is open at `now`
pub fn is_market_open(now: DateTime<Utc>) -> bool {
    MarketHours::nyse().is_open(now)
}

/// Whether the NYSE regular session is open at a unix timestamp (seconds)
pub fn is_market_open_at(unix_seconds: i64) -> SynthPoolResult<bool> {
    MarketHours::nyse().is_open_at(unix_seconds)
}

// ============================================================================
// Market Clock
// ============================================================================

/// Market hours bound to a clock
#[derive(Debug, Clone)]
pub struct MarketClock<C: Clock = SystemClock> {
    clock: C,
    hours: MarketHours,
}

impl<C: Clock> MarketClock<C> {
    pub fn new(clock: C, hours: MarketHours) -> Self {
        Self { clock, hours }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn hours(&self) -> &MarketHours {
        &self.hours
    }

    pub fn session_now(&self) -> MarketSession {
        self.hours.session(self.clock.now())
    }

    pub fn is_open_now(&self) -> bool {
        self.session_now().is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_session_boundaries_in_winter() {
        // 2024-01-16 is a Tuesday, New York on EST (UTC-5)
        assert!(!is_market_open(utc(2024, 1, 16, 14, 29, 59)));
        assert!(is_market_open(utc(2024, 1, 16, 14, 30, 0)));
        assert!(is_market_open(utc(2024, 1, 16, 20, 59, 59)));
        assert!(!is_market_open(utc(2024, 1, 16, 21, 0, 0)));
    }

    #[test]
    fn test_session_boundaries_in_summer() {
        // 2024-07-16 is a Tuesday, New York on EDT (UTC-4)
        assert!(!is_market_open(utc(2024, 7, 16, 13, 29, 59)));
        assert!(is_market_open(utc(2024, 7, 16, 13, 30, 0)));
        assert!(is_market_open(utc(2024, 7, 16, 19, 59, 59)));
        assert!(!is_market_open(utc(2024, 7, 16, 20, 0, 0)));
    }

    #[test]
    fn test_dst_switch_day() {
        // DST started 2024-03-10; Monday 2024-03-11 opens at 13:30 UTC
        assert!(is_market_open(utc(2024, 3, 11, 13, 30, 0)));
        // The previous Friday it opened an hour later in UTC terms
        assert!(!is_market_open(utc(2024, 3, 8, 13, 30, 0)));
        assert!(is_market_open(utc(2024, 3, 8, 14, 30, 0)));
    }

    #[test]
    fn test_weekend_closed() {
        // Saturday and Sunday at what would be mid-session
        let saturday = utc(2024, 7, 13, 15, 0, 0);
        let sunday = utc(2024, 7, 14, 15, 0, 0);
        assert_eq!(MarketHours::nyse().session(saturday), MarketSession::Closed(ClosedReason::Weekend));
        assert_eq!(MarketHours::nyse().session(sunday), MarketSession::Closed(ClosedReason::Weekend));
    }

    #[test]
    fn test_weekday_is_judged_in_new_york() {
        // Friday 23:00 New York is already Saturday in UTC
        let friday_night = utc(2024, 7, 13, 3, 0, 0);
        assert_eq!(
            MarketHours::nyse().session(friday_night),
            MarketSession::Closed(ClosedReason::OutsideHours)
        );
    }

    #[test]
    fn test_holidays_not_modelled() {
        // 2024-01-15 is Martin Luther King Jr. Day, a Monday
        assert!(is_market_open(utc(2024, 1, 15, 15, 0, 0)));
    }

    #[test]
    fn test_timestamp_input() {
        // 2024-07-16T14:00:00Z
        assert!(is_market_open_at(1_721_138_400).unwrap());
        assert_eq!(
            is_market_open_at(i64::MAX),
            Err(SynthPoolError::invalid_timestamp(i64::MAX))
        );
    }

    #[test]
    fn test_custom_hours() {
        let hours = MarketHours::parse("Europe/London", "08:00", "16:30").unwrap();
        // 2024-01-16 09:00 London (GMT)
        assert!(hours.is_open(utc(2024, 1, 16, 9, 0, 0)));
        assert!(hours.is_open(utc(2024, 1, 16, 16, 29, 59)));
        assert!(!hours.is_open(utc(2024, 1, 16, 16, 30, 0)));

        assert!(MarketHours::parse("Mars/Olympus_Mons", "09:30", "16:00").is_err());
        assert!(MarketHours::parse("America/New_York", "16:00", "09:30").is_err());
        assert!(MarketHours::parse("America/New_York", "9h30", "16:00").is_err());
        assert_eq!(
            MarketHours::parse("America/New_York", "09:30:00", "16:00").unwrap(),
            MarketHours::nyse()
        );
    }

    #[test]
    fn test_market_clock_uses_injected_clock() {
        let open = MarketClock::new(FixedClock(utc(2024, 7, 16, 14, 0, 0)), MarketHours::nyse());
        assert!(open.is_open_now());

        let closed = MarketClock::new(FixedClock(utc(2024, 7, 16, 22, 0, 0)), MarketHours::nyse());
        assert_eq!(closed.session_now(), MarketSession::Closed(ClosedReason::OutsideHours));
    }
}
