//! Timeline - Cancellable Virtual Timers
//!
//! Every delayed step in the app (screen transitions, scan progress, the
//! nature reaction choreography, chat replies) is scheduled here instead of
//! on wall-clock sleeps. The owner advances the timeline with elapsed frame
//! time; due events come back out in order.
//!
//! # Ordering
//!
//! Events fire by due time, ties broken by scheduling order. An event
//! scheduled while handling another one measures its delay from the firing
//! instant, so chained delays behave like nested timers.
//!
//! # Cancellation
//!
//! Events are grouped by [`SequenceKey`]. Cancelling a key bumps its
//! generation: anything scheduled under the old generation is dropped and
//! never fires.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Group of timers that are cancelled together
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKey {
    /// Pending activation of a navigation target
    Activation,
    /// Exit transitions of screens being left
    Exit,
    /// Selection feedback before moving to the map
    Selection,
    /// Scan progress (analyzing → detected → result)
    Scan,
    /// Result screen reveal choreography
    Reveal,
    /// Delayed chatbot replies
    Chat,
    /// Deferred geolocation request for the map
    Map,
    /// Screen-reader announcement lifetime
    Announcement,
}

/// Handle identifying the generation an event was scheduled under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SequenceToken {
    /// Sequence group
    pub key: SequenceKey,
    /// Generation of the group at scheduling time
    pub generation: u64,
}

/// An event that came due
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<E> {
    /// Virtual time at which it fired
    pub at: Duration,
    /// Token it was scheduled under
    pub token: SequenceToken,
    /// The payload
    pub event: E,
}

struct Scheduled<E> {
    due: Duration,
    seq: u64,
    token: SequenceToken,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    // Reversed so the max-heap yields the earliest event first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Virtual-time timer queue
pub struct Timeline<E> {
    now: Duration,
    next_seq: u64,
    generations: HashMap<SequenceKey, u64>,
    queue: BinaryHeap<Scheduled<E>>,
}

impl<E> Timeline<E> {
    /// Create an empty timeline at time zero
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            generations: HashMap::new(),
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` after the current virtual time
    pub fn schedule(&mut self, key: SequenceKey, delay: Duration, event: E) -> SequenceToken {
        let token = self.token(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due: self.now + delay,
            seq,
            token,
            event,
        });
        token
    }

    /// Invalidate every pending event scheduled under `key`.
    ///
    /// Returns the number of events dropped.
    pub fn cancel(&mut self, key: SequenceKey) -> usize {
        *self.generations.entry(key).or_insert(0) += 1;
        let before = self.queue.len();
        self.queue.retain(|s| s.token.key != key);
        before - self.queue.len()
    }

    /// Whether a token still belongs to the live generation of its key
    #[must_use]
    pub fn is_current(&self, token: SequenceToken) -> bool {
        self.token(token.key) == token
    }

    /// Number of live events pending under `key`
    #[must_use]
    pub fn pending(&self, key: SequenceKey) -> usize {
        self.queue
            .iter()
            .filter(|s| s.token.key == key && self.is_current(s.token))
            .count()
    }

    /// Whether nothing is scheduled
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Time until the next pending event, if any
    #[must_use]
    pub fn next_due_in(&self) -> Option<Duration> {
        self.queue.peek().map(|s| s.due.saturating_sub(self.now))
    }

    /// Pop the next live event due at or before `until`.
    ///
    /// Virtual time moves to the event's due time so anything scheduled
    /// while handling it is measured from that instant.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<E>> {
        loop {
            let due = self.queue.peek()?.due;
            if due > until {
                return None;
            }
            let scheduled = self.queue.pop()?;
            self.now = self.now.max(scheduled.due);
            if self.is_current(scheduled.token) {
                return Some(Fired {
                    at: scheduled.due,
                    token: scheduled.token,
                    event: scheduled.event,
                });
            }
        }
    }

    /// Move virtual time forward to `until` once all due events are handled
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Advance by `delta` and collect every event that fired.
    ///
    /// Convenience for callers that do not schedule from inside handlers.
    pub fn advance(&mut self, delta: Duration) -> Vec<E> {
        let until = self.now + delta;
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(until) {
            fired.push(f.event);
        }
        self.settle(until);
        fired
    }

    fn token(&self, key: SequenceKey) -> SequenceToken {
        SequenceToken {
            key,
            generation: self.generations.get(&key).copied().unwrap_or(0),
        }
    }
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}
