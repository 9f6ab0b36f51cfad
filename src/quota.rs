//! Client-side daily request quota
//!
//! Tracks how many generation requests were made on the current calendar
//! day and warns as the user approaches the daily limit. The counter lives
//! in the injected [`KeyValueStore`] under
//! [`keys::DAILY_REQUEST_COUNT`] and [`keys::LAST_REQUEST_DATE`].
//!
//! Days are compared as rendered date strings of the local calendar date,
//! so the quota resets at local midnight rather than 24 hours after first
//! use. The tracker only warns; the backend enforces its own, separate
//! limit (surfaced as [`crate::error::SynthError::RateLimited`]).
//!
//! Storage failures never reach the caller. A failed read counts as "no
//! prior usage" and a failed write is logged and dropped.

use crate::storage::{keys, KeyValueStore};
use chrono::{Local, NaiveDate};
use std::sync::{Arc, Mutex};

/// Requests allowed per calendar day
pub const DAILY_LIMIT: u32 = 10;

/// Usage count from which [`QuotaTracker::record_usage`] starts warning
pub const WARNING_THRESHOLD: u32 = 8;

/// Source of "today" for the tracker
pub trait Clock: Send + Sync {
    /// The current local calendar date
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the local time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a settable date
#[derive(Debug)]
pub struct FixedClock {
    date: Mutex<NaiveDate>,
}

impl FixedClock {
    /// Create a clock that reports `date` until changed
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    /// Move the clock to `date`
    pub fn set(&self, date: NaiveDate) {
        *self.date.lock().unwrap_or_else(|e| e.into_inner()) = date;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Render a date the way the counter's day stamp is stored, e.g.
/// `Sun Oct 18 2026`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use synthdata::quota::day_stamp;
///
/// let date = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
/// assert_eq!(day_stamp(date), "Mon Oct 05 2026");
/// ```
pub fn day_stamp(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Daily request counter over a key-value store
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use synthdata::quota::{QuotaTracker, DAILY_LIMIT};
/// use synthdata::storage::MemoryStore;
///
/// let tracker = QuotaTracker::new(Arc::new(MemoryStore::new()));
/// assert_eq!(tracker.remaining_requests(), DAILY_LIMIT);
///
/// assert!(tracker.record_usage().is_none());
/// assert_eq!(tracker.remaining_requests(), DAILY_LIMIT - 1);
/// ```
pub struct QuotaTracker {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    // Serialises the read-modify-write in `record_usage`.
    write_lock: Mutex<()>,
}

impl QuotaTracker {
    /// Create a tracker using the local wall clock
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(LocalClock))
    }

    /// Create a tracker with an explicit clock
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Count one successful generation request against today's quota.
    ///
    /// Resets the counter first if the stored day is not today. Returns a
    /// warning once the count reaches [`WARNING_THRESHOLD`].
    pub fn record_usage(&self) -> Option<String> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let today = day_stamp(self.clock.today());
        let mut count = self.stored_count();

        if self.stored_day().as_deref() != Some(today.as_str()) {
            count = 0;
            self.write(keys::LAST_REQUEST_DATE, &today);
        }

        count = count.saturating_add(1);
        self.write(keys::DAILY_REQUEST_COUNT, &count.to_string());
        tracing::debug!(count, day = %today, "Recorded generation request");

        if count >= WARNING_THRESHOLD {
            let remaining = DAILY_LIMIT.saturating_sub(count);
            Some(format!("You have {} requests remaining today.", remaining))
        } else {
            None
        }
    }

    /// Requests left today. Never writes to the store.
    pub fn remaining_requests(&self) -> u32 {
        let today = day_stamp(self.clock.today());
        if self.stored_day().as_deref() != Some(today.as_str()) {
            return DAILY_LIMIT;
        }
        DAILY_LIMIT.saturating_sub(self.stored_count())
    }

    fn stored_day(&self) -> Option<String> {
        self.read(keys::LAST_REQUEST_DATE)
    }

    fn stored_count(&self) -> u32 {
        match self.read(keys::DAILY_REQUEST_COUNT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring malformed request count {:?}", raw);
                0
            }),
            None => 0,
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {} from client store: {}", key, e);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!("Failed to write {} to client store: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SynthError};
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker_on(day: NaiveDate) -> (QuotaTracker, Arc<MemoryStore>, Arc<FixedClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(day));
        let tracker = QuotaTracker::with_clock(store.clone(), clock.clone());
        (tracker, store, clock)
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(SynthError::Storage("disk on fire".into()).into())
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(SynthError::Storage("disk on fire".into()).into())
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(SynthError::Storage("disk on fire".into()).into())
        }
    }

    #[test]
    fn test_day_stamp_format() {
        assert_eq!(day_stamp(date(2026, 10, 18)), "Sun Oct 18 2026");
    }

    #[test]
    fn test_fresh_day_has_full_quota() {
        let (tracker, store, _) = tracker_on(date(2026, 10, 18));
        assert_eq!(tracker.remaining_requests(), 10);
        assert!(store.is_empty());
    }

    #[test]
    fn test_warnings_start_at_eighth_request() {
        let (tracker, _, _) = tracker_on(date(2026, 10, 18));
        for _ in 0..7 {
            assert_eq!(tracker.record_usage(), None);
        }
        assert_eq!(
            tracker.record_usage().as_deref(),
            Some("You have 2 requests remaining today.")
        );
        assert_eq!(
            tracker.record_usage().as_deref(),
            Some("You have 1 requests remaining today.")
        );
        assert_eq!(tracker.remaining_requests(), 1);
    }

    #[test]
    fn test_past_limit_reports_zero() {
        let (tracker, _, _) = tracker_on(date(2026, 10, 18));
        for _ in 0..10 {
            tracker.record_usage();
        }
        assert_eq!(
            tracker.record_usage().as_deref(),
            Some("You have 0 requests remaining today.")
        );
        assert_eq!(tracker.remaining_requests(), 0);
    }

    #[test]
    fn test_stale_counter_reads_as_full_without_writing() {
        let (tracker, store, _) = tracker_on(date(2026, 10, 18));
        store.set(keys::DAILY_REQUEST_COUNT, "10").unwrap();
        store
            .set(keys::LAST_REQUEST_DATE, &day_stamp(date(2026, 10, 17)))
            .unwrap();

        assert_eq!(tracker.remaining_requests(), 10);
        assert_eq!(
            store.get(keys::DAILY_REQUEST_COUNT).unwrap().as_deref(),
            Some("10")
        );
        assert_eq!(
            store.get(keys::LAST_REQUEST_DATE).unwrap().as_deref(),
            Some("Sat Oct 17 2026")
        );
    }

    #[test]
    fn test_stale_counter_resets_on_record() {
        let (tracker, store, _) = tracker_on(date(2026, 10, 18));
        store.set(keys::DAILY_REQUEST_COUNT, "10").unwrap();
        store
            .set(keys::LAST_REQUEST_DATE, &day_stamp(date(2026, 10, 17)))
            .unwrap();

        assert_eq!(tracker.record_usage(), None);
        assert_eq!(
            store.get(keys::DAILY_REQUEST_COUNT).unwrap().as_deref(),
            Some("1")
        );
        assert_eq!(
            store.get(keys::LAST_REQUEST_DATE).unwrap().as_deref(),
            Some("Sun Oct 18 2026")
        );
        assert_eq!(tracker.remaining_requests(), 9);
    }

    #[test]
    fn test_midnight_rollover() {
        let (tracker, _, clock) = tracker_on(date(2026, 10, 18));
        for _ in 0..9 {
            tracker.record_usage();
        }
        assert_eq!(tracker.remaining_requests(), 1);

        clock.set(date(2026, 10, 19));
        assert_eq!(tracker.remaining_requests(), 10);
        assert_eq!(tracker.record_usage(), None);
        assert_eq!(tracker.remaining_requests(), 9);
    }

    #[test]
    fn test_malformed_count_treated_as_zero() {
        let (tracker, store, _) = tracker_on(date(2026, 10, 18));
        store.set(keys::DAILY_REQUEST_COUNT, "lots").unwrap();
        store
            .set(keys::LAST_REQUEST_DATE, "Sun Oct 18 2026")
            .unwrap();
        assert_eq!(tracker.remaining_requests(), 10);
        tracker.record_usage();
        assert_eq!(tracker.remaining_requests(), 9);
    }

    #[test]
    fn test_broken_store_fails_open() {
        let tracker = QuotaTracker::with_clock(
            Arc::new(BrokenStore),
            Arc::new(FixedClock::new(date(2026, 10, 18))),
        );
        assert_eq!(tracker.remaining_requests(), 10);
        assert_eq!(tracker.record_usage(), None);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let (tracker, _, _) = tracker_on(date(2026, 10, 18));
        let tracker = Arc::new(tracker);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    tracker.record_usage();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.remaining_requests(), 2);
    }
}
