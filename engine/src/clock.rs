//! Pausable logical clock with repeating and one-shot timed events.
//!
//! The clock never calls back into game code. Instead, `update()` (and `pause()`) return the
//! events that became due, in delivery order, and the caller applies them. That keeps timer
//! "callbacks" from observing or mutating the clock while it is iterating its own tables.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Smallest interval a repeating subscription may use.
pub const MIN_SUBSCRIPTION_INTERVAL: Duration = Duration::from_millis(1);

/// Monotonic wall-clock reading, relative to an arbitrary origin.
pub trait TimeSource: fmt::Debug {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven time source for tests and deterministic headless runs.
///
/// Clones share the same reading, so a test can keep one handle and give another to a `Clock`.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeoutId(u64);

#[derive(Debug, Clone)]
struct Subscription<E> {
    event: E,
    interval: Duration,
    start: Duration,
    fired: u64,
}

impl<E> Subscription<E> {
    /// `None` once the next boundary is no longer representable; the subscription goes quiet.
    fn next_due(&self) -> Option<Duration> {
        let boundary = u32::try_from(self.fired.checked_add(1)?).ok()?;
        self.start.checked_add(self.interval.checked_mul(boundary)?)
    }
}

#[derive(Debug, Clone)]
struct Timeout<E> {
    event: E,
    due: Duration,
}

/// Logical elapsed-time source for one run.
///
/// Elapsed time only moves while the clock is running, and is sampled from the time source on
/// `update()`/`pause()`/`resume()`, so every reader within a frame sees the same value.
#[derive(Debug)]
pub struct Clock<E> {
    source: Box<dyn TimeSource>,
    running: bool,
    segment_origin: Duration,
    segment: Duration,
    accumulated: Duration,
    next_id: u64,
    subscriptions: BTreeMap<u64, Subscription<E>>,
    timeouts: BTreeMap<u64, Timeout<E>>,
}

impl<E: Clone> Clock<E> {
    pub fn new(source: impl TimeSource + 'static) -> Self {
        let source: Box<dyn TimeSource> = Box::new(source);
        let segment_origin = source.now();
        Self {
            source,
            running: false,
            segment_origin,
            segment: Duration::ZERO,
            accumulated: Duration::ZERO,
            next_id: 0,
            subscriptions: BTreeMap::new(),
            timeouts: BTreeMap::new(),
        }
    }

    pub fn system() -> Self {
        Self::new(SystemTimeSource::new())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        self.accumulated.saturating_add(self.segment)
    }

    pub fn pending_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.len()
    }

    pub fn start(&mut self) {
        self.resume();
    }

    pub fn resume(&mut self) {
        let now = self.source.now();
        if self.running {
            // Re-arming a running clock keeps the time already spent in this segment.
            self.accumulated = self
                .accumulated
                .saturating_add(now.saturating_sub(self.segment_origin));
        }
        self.running = true;
        self.segment_origin = now;
        self.segment = Duration::ZERO;
    }

    /// Delivers anything already due, then freezes elapsed time.
    pub fn pause(&mut self) -> Vec<E> {
        let due = self.update();
        self.running = false;
        self.accumulated = self.accumulated.saturating_add(self.segment);
        self.segment = Duration::ZERO;
        due
    }

    /// Samples the time source and returns every event that became due, in delivery order:
    /// repeating subscriptions first (subscription order, once per missed boundary), then
    /// one-shot timeouts.
    pub fn update(&mut self) -> Vec<E> {
        if !self.running {
            return Vec::new();
        }

        self.segment = self.source.now().saturating_sub(self.segment_origin);
        let elapsed = self.elapsed();

        let mut due = Vec::new();
        for sub in self.subscriptions.values_mut() {
            let mut caught_up = 0u32;
            while sub.next_due().is_some_and(|at| elapsed > at) {
                due.push(sub.event.clone());
                sub.fired += 1;
                caught_up += 1;
            }
            if caught_up > 1 {
                log::debug!("clock: subscription caught up {caught_up} intervals");
            }
        }

        let expired: Vec<u64> = self
            .timeouts
            .iter()
            .filter(|(_, t)| elapsed > t.due)
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            if let Some(timeout) = self.timeouts.remove(&id) {
                due.push(timeout.event);
            }
        }

        due
    }

    /// Registers a repeating event. The first delivery is one `interval` after now.
    pub fn subscribe(&mut self, event: E, interval: Duration) -> SubscriptionId {
        let interval = if interval < MIN_SUBSCRIPTION_INTERVAL {
            log::warn!("clock: subscription interval {interval:?} clamped to {MIN_SUBSCRIPTION_INTERVAL:?}");
            MIN_SUBSCRIPTION_INTERVAL
        } else {
            interval
        };
        let id = self.allocate_id();
        self.subscriptions.insert(
            id,
            Subscription {
                event,
                interval,
                start: self.elapsed(),
                fired: 0,
            },
        );
        SubscriptionId(id)
    }

    /// Registers a one-shot event delivered once elapsed time exceeds now + `delay`.
    pub fn set_timeout(&mut self, event: E, delay: Duration) -> TimeoutId {
        let id = self.allocate_id();
        self.timeouts.insert(
            id,
            Timeout {
                event,
                due: self.elapsed().saturating_add(delay),
            },
        );
        TimeoutId(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(&id.0);
    }

    pub fn remove_timeout(&mut self, id: TimeoutId) {
        self.timeouts.remove(&id.0);
    }

    /// Drops every pending event, zeroes elapsed time and stops the clock.
    ///
    /// Ids keep counting up across resets, so a handle from an earlier run never aliases a new one.
    pub fn reset(&mut self) {
        self.subscriptions.clear();
        self.timeouts.clear();
        self.running = false;
        self.segment = Duration::ZERO;
        self.accumulated = Duration::ZERO;
        self.segment_origin = self.source.now();
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
