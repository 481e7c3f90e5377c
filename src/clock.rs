#[cfg(test)]
use std::cell::Cell;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Time source for everything that ticks. Monotonic time is measured from
/// an arbitrary origin; wall time is only used for persisted timestamps.
pub trait Clock {
    fn now(&self) -> Duration;
    fn epoch_millis(&self) -> i64;
}

pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn epoch_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }
}

/// Clock that only moves when told to. Both readings advance together.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    elapsed: Cell<Duration>,
    epoch_origin_millis: i64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(epoch_origin_millis: i64) -> Self {
        Self {
            elapsed: Cell::new(Duration::ZERO),
            epoch_origin_millis,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }

    fn epoch_millis(&self) -> i64 {
        self.epoch_origin_millis + self.elapsed.get().as_millis() as i64
    }
}

/// A deadline polled from the frame loop. One-shot tasks fire once;
/// repeating tasks fire on every poll that crosses at least one period
/// boundary, with missed periods coalesced into that single firing.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    next_due: Duration,
    period: Option<Duration>,
    active: bool,
}

impl ScheduledTask {
    pub fn once(now: Duration, delay: Duration) -> Self {
        Self {
            next_due: now + delay,
            period: None,
            active: true,
        }
    }

    pub fn every(now: Duration, period: Duration) -> Self {
        Self {
            next_due: now + period,
            period: Some(period),
            active: true,
        }
    }

    pub fn poll(&mut self, now: Duration) -> bool {
        if !self.active || now < self.next_due {
            return false;
        }
        match self.period {
            Some(period) if !period.is_zero() => {
                while self.next_due <= now {
                    self.next_due += period;
                }
            }
            _ => self.active = false,
        }
        true
    }

    /// Returns true only for the call that actually cancelled the task.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.active.then_some(self.next_due)
    }
}

/// Earliest of two optional deadlines.
pub fn earliest(a: Option<Duration>, b: Option<Duration>) -> Option<Duration> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
