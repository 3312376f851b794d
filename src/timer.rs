use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use futures_timer::Delay;

use crate::feedback::NotificationTimer;
use crate::form::SubmitTicket;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TimerId(pub u64);

/// Payload delivered back to the page when a one-shot timer fires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerEvent {
    Notification(NotificationTimer),
    SimulatedDelivery(SubmitTicket),
}

/// One-shot timer facility. Times are offsets from the host's own origin.
pub trait TimerHost {
    fn now(&self) -> Duration;
    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId;
    /// Returns `false` when the timer already fired or was never scheduled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

#[derive(Debug, Default)]
struct TimerQueue {
    next_id: u64,
    due: BTreeMap<(Duration, TimerId), TimerEvent>,
    index: BTreeMap<TimerId, Duration>,
}

impl TimerQueue {
    fn push(&mut self, at: Duration, event: TimerEvent) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.due.insert((at, id), event);
        self.index.insert(id, at);
        id
    }

    fn remove(&mut self, id: TimerId) -> bool {
        let Some(at) = self.index.remove(&id) else {
            return false;
        };
        self.due.remove(&(at, id)).is_some()
    }

    fn peek(&self) -> Option<(Duration, TimerId)> {
        self.due.first_key_value().map(|(key, _)| *key)
    }

    fn pop_first(&mut self) -> Option<(Duration, TimerId, TimerEvent)> {
        let ((at, id), event) = self.due.pop_first()?;
        self.index.remove(&id);
        Some((at, id, event))
    }

    fn len(&self) -> usize {
        self.due.len()
    }
}

/// Deterministic timer host driven by an explicit virtual clock.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    queue: TimerQueue,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|(at, _)| at)
    }

    /// Pops the earliest timer due at or before `deadline`, moving the clock
    /// to its due time. Timers scheduled by the caller while handling the
    /// returned event are eligible on the next call.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<(TimerId, TimerEvent)> {
        let (at, _) = self.queue.peek()?;
        if at > deadline {
            return None;
        }
        let (at, id, event) = self.queue.pop_first()?;
        self.now = self.now.max(at);
        Some((id, event))
    }

    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl TimerHost for ManualTimers {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
        self.queue.push(self.now + delay, event)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.remove(id)
    }
}

/// Wall-clock timer host. The owner polls [`DelayTimers::next_fire`] from its
/// executor and routes each returned event back into the page.
#[derive(Debug)]
pub struct DelayTimers {
    origin: Instant,
    queue: TimerQueue,
}

impl Default for DelayTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayTimers {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: TimerQueue::default(),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Waits for the earliest scheduled timer. Returns `None` when nothing is
    /// scheduled.
    pub async fn next_fire(&mut self) -> Option<(TimerId, TimerEvent)> {
        let (at, _) = self.queue.peek()?;
        let elapsed = self.origin.elapsed();
        if at > elapsed {
            Delay::new(at - elapsed).await;
        }
        self.queue.pop_first().map(|(_, id, event)| (id, event))
    }
}

impl TimerHost for DelayTimers {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
        let at = self.origin.elapsed() + delay;
        self.queue.push(at, event)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.remove(id)
    }
}
