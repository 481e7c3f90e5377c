use std::fmt;
use std::time::Duration;

use log::{debug, info};

use crate::clock::{Clock, ScheduledTask};
use crate::store::{KEY_LAST_SESSION, KEY_PLAYTIME, Namespace, Store};

const TICK_PERIOD : Duration = Duration::from_secs(1);

/// Display name the user picked. Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> Namespace<'_> {
        Namespace::Identity(&self.0)
    }

    /// Up to two leading characters, used when there is no avatar.
    pub fn initials(&self) -> String {
        self.0.chars().take(2).collect::<String>().to_uppercase()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub accumulated_seconds: u64,
    pub last_session_epoch_millis: Option<i64>,
}

impl SessionRecord {
    pub fn load(store: &Store, identity: &Identity) -> Self {
        Self {
            accumulated_seconds: store.get_parsed(identity.namespace(), KEY_PLAYTIME).unwrap_or(0),
            last_session_epoch_millis: store.get_parsed(identity.namespace(), KEY_LAST_SESSION),
        }
    }
}

/// Accumulates playtime while the dashboard is up. Each tick recomputes the
/// total from the start instant, so a late or coalesced tick still writes
/// the right number.
#[derive(Debug)]
pub struct SessionClock {
    identity: Identity,
    base_seconds: u64,
    started_at: Duration,
    displayed_seconds: u64,
    ticker: ScheduledTask,
}

impl SessionClock {
    pub fn start(identity: Identity, store: &Store, clock: &dyn Clock) -> Self {
        let record = SessionRecord::load(store, &identity);
        let now = clock.now();
        info!("Session started for {} at {}s of playtime", identity, record.accumulated_seconds);

        Self {
            identity,
            base_seconds: record.accumulated_seconds,
            started_at: now,
            displayed_seconds: record.accumulated_seconds,
            ticker: ScheduledTask::every(now, TICK_PERIOD),
        }
    }

    /// Writes the new total if a tick is due. Returns whether it ticked.
    pub fn poll(&mut self, store: &mut Store, clock: &dyn Clock) -> bool {
        let now = clock.now();
        if !self.ticker.poll(now) {
            return false;
        }

        let elapsed = now.saturating_sub(self.started_at).as_secs();
        let total = self.base_seconds.saturating_add(elapsed).max(self.displayed_seconds);
        let now_millis = clock.epoch_millis();

        store.set(self.identity.namespace(), KEY_PLAYTIME, total.to_string());
        store.set(self.identity.namespace(), KEY_LAST_SESSION, now_millis.to_string());

        self.displayed_seconds = total;
        true
    }

    pub fn stop(&mut self) {
        if self.ticker.cancel() {
            debug!("Session clock for {} stopped at {}s", self.identity, self.displayed_seconds);
        }
    }

    pub fn accumulated_seconds(&self) -> u64 {
        self.displayed_seconds
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.ticker.next_due()
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn format_playtime(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

pub fn format_last_played(last_epoch_millis: Option<i64>, now_epoch_millis: i64) -> String {
    let Some(last) = last_epoch_millis else {
        return String::from("Never");
    };
    let minutes = now_epoch_millis.saturating_sub(last).max(0) / 60_000;
    match minutes {
        0 => String::from("Just now"),
        1 => String::from("1 minute ago"),
        m if m < 60 => format!("{m} minutes ago"),
        m if m < 120 => String::from("1 hour ago"),
        m if m < 60 * 24 => format!("{} hours ago", m / 60),
        m if m < 60 * 48 => String::from("1 day ago"),
        m => format!("{} days ago", m / (60 * 24)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const ORIGIN_MILLIS : i64 = 1_700_000_000_000;

    fn steve() -> Identity {
        Identity::parse("Steve").unwrap()
    }

    #[test]
    fn identity_is_trimmed_and_non_empty() {
        assert_eq!(Identity::parse("  Steve ").unwrap().as_str(), "Steve");
        assert!(Identity::parse("").is_none());
        assert!(Identity::parse(" \t\n").is_none());
        assert_eq!(steve().initials(), "ST");
    }

    #[test]
    fn new_identity_starts_at_zero() {
        let store = Store::in_memory();
        let record = SessionRecord::load(&store, &steve());
        assert_eq!(record.accumulated_seconds, 0);
        assert_eq!(record.last_session_epoch_millis, None);
        assert_eq!(format_playtime(record.accumulated_seconds), "0h 0m");
    }

    #[test]
    fn sixty_five_ticks_persist_sixty_five_seconds() {
        let clock = ManualClock::new(ORIGIN_MILLIS);
        let mut store = Store::in_memory();
        let mut session = SessionClock::start(steve(), &store, &clock);

        for _ in 0..65 {
            clock.advance(Duration::from_secs(1));
            assert!(session.poll(&mut store, &clock));
        }

        assert_eq!(store.get(Namespace::Identity("Steve"), KEY_PLAYTIME).as_deref(), Some("65"));
        let expected_millis = (ORIGIN_MILLIS + 65_000).to_string();
        assert_eq!(store.get(Namespace::Identity("Steve"), KEY_LAST_SESSION), Some(expected_millis));
        assert_eq!(session.accumulated_seconds(), 65);
        assert_eq!(format_playtime(session.accumulated_seconds()), "0h 1m");
    }

    #[test]
    fn resumes_from_the_persisted_total() {
        let clock = ManualClock::new(ORIGIN_MILLIS);
        let mut store = Store::in_memory();
        store.set(steve().namespace(), KEY_PLAYTIME, "7200");
        let mut session = SessionClock::start(steve(), &store, &clock);

        clock.advance(Duration::from_secs(30));
        session.poll(&mut store, &clock);
        assert_eq!(session.accumulated_seconds(), 7230);
        assert_eq!(store.get_parsed::<u64>(steve().namespace(), KEY_PLAYTIME), Some(7230));
    }

    #[test]
    fn stalled_frames_coalesce_into_one_correct_write() {
        let clock = ManualClock::new(ORIGIN_MILLIS);
        let mut store = Store::in_memory();
        let mut session = SessionClock::start(steve(), &store, &clock);

        clock.advance(Duration::from_millis(12_300));
        assert!(session.poll(&mut store, &clock));
        assert!(!session.poll(&mut store, &clock));
        assert_eq!(store.get_parsed::<u64>(steve().namespace(), KEY_PLAYTIME), Some(12));
        assert_eq!(session.next_due(), Some(Duration::from_secs(13)));
    }

    #[test]
    fn no_write_before_the_first_tick() {
        let clock = ManualClock::new(ORIGIN_MILLIS);
        let mut store = Store::in_memory();
        let mut session = SessionClock::start(steve(), &store, &clock);
        clock.advance(Duration::from_millis(999));
        assert!(!session.poll(&mut store, &clock));
        assert_eq!(store.get(steve().namespace(), KEY_PLAYTIME), None);
    }

    #[test]
    fn stopped_clock_never_writes_again() {
        let clock = ManualClock::new(ORIGIN_MILLIS);
        let mut store = Store::in_memory();
        let mut session = SessionClock::start(steve(), &store, &clock);

        clock.advance(Duration::from_secs(3));
        session.poll(&mut store, &clock);
        session.stop();

        clock.advance(Duration::from_secs(10));
        assert!(!session.poll(&mut store, &clock));
        assert_eq!(store.get_parsed::<u64>(steve().namespace(), KEY_PLAYTIME), Some(3));
        assert_eq!(session.next_due(), None);
    }

    #[test]
    fn total_never_decreases_across_ticks() {
        let clock = ManualClock::new(ORIGIN_MILLIS);
        let mut store = Store::in_memory();
        let mut session = SessionClock::start(steve(), &store, &clock);

        let mut previous = 0;
        for step in [1_000, 1_500, 700, 3_000, 1_000] {
            clock.advance(Duration::from_millis(step));
            session.poll(&mut store, &clock);
            assert!(session.accumulated_seconds() >= previous);
            previous = session.accumulated_seconds();
        }
        assert_eq!(previous, 7);
        let record = SessionRecord::load(&store, &steve());
        assert_eq!(record.accumulated_seconds, 7);
        assert_eq!(record.last_session_epoch_millis, Some(ORIGIN_MILLIS + 7_200));
    }

    #[test]
    fn last_played_wording() {
        let now = ORIGIN_MILLIS;
        assert_eq!(format_last_played(None, now), "Never");
        assert_eq!(format_last_played(Some(now - 30_000), now), "Just now");
        assert_eq!(format_last_played(Some(now - 5 * 60_000), now), "5 minutes ago");
        assert_eq!(format_last_played(Some(now - 2 * 3_600_000), now), "2 hours ago");
        assert_eq!(format_last_played(Some(now - 3 * 86_400_000), now), "3 days ago");
    }

    #[test]
    fn playtime_formatting() {
        assert_eq!(format_playtime(127 * 3600 + 42 * 60 + 5), "127h 42m");
    }

    #[test]
    fn saturated_playtime_keeps_ticking_without_wrapping() {
        let clock = ManualClock::new(ORIGIN_MILLIS);
        let mut store = Store::in_memory();
        store.set(steve().namespace(), KEY_PLAYTIME, u64::MAX.to_string());
        let mut session = SessionClock::start(steve(), &store, &clock);

        clock.advance(Duration::from_secs(1));
        assert!(session.poll(&mut store, &clock));
        assert_eq!(session.accumulated_seconds(), u64::MAX);
        assert_eq!(store.get_parsed::<u64>(steve().namespace(), KEY_PLAYTIME), Some(u64::MAX));
    }

    #[test]
    fn absurd_last_session_timestamps_still_format() {
        let now = ORIGIN_MILLIS;
        assert!(format_last_played(Some(i64::MIN), now).ends_with("days ago"));
        assert_eq!(format_last_played(Some(i64::MAX), now), "Just now");
    }
}
