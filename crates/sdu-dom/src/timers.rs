//! Timer queue
//!
//! A virtual clock standing in for `setInterval` and `requestAnimationFrame`.
//! Due timers are handed out one at a time so that a callback which clears or
//! replaces timers is observed before the next one fires.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Shortest interval period; zero-length periods are clamped up to this.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Identifies the component a timer or animation frame belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskOwner(pub usize);

#[derive(Debug, Clone)]
struct Interval {
    owner: TaskOwner,
    period: Duration,
    due: Duration,
}

#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    next_id: u64,
    intervals: BTreeMap<TimerId, Interval>,
    frames: Vec<TaskOwner>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the page started
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a repeating timer
    pub fn set_interval(&mut self, owner: TaskOwner, period: Duration) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.intervals.insert(
            id,
            Interval {
                owner,
                period,
                due: self.now + period,
            },
        );

        tracing::trace!(timer = id.0, owner = owner.0, period_ms = period.as_millis() as u64, "Interval scheduled");

        id
    }

    /// Cancel a timer; unknown or already cancelled ids are ignored
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.intervals.remove(&id).is_some()
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.intervals.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.intervals.len()
    }

    /// Number of live timers owned by `owner`
    pub fn live_for(&self, owner: TaskOwner) -> usize {
        self.intervals.values().filter(|t| t.owner == owner).count()
    }

    /// When the timer fires next
    pub fn next_due(&self, id: TimerId) -> Option<Duration> {
        self.intervals.get(&id).map(|t| t.due)
    }

    /// Take the earliest timer due at or before `deadline`, advancing the clock
    /// to its due time and rescheduling it.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<(TimerId, TaskOwner)> {
        let (id, due) = self
            .intervals
            .iter()
            .filter(|(_, timer)| timer.due <= deadline)
            .min_by_key(|(id, timer)| (timer.due, **id))
            .map(|(id, timer)| (*id, timer.due))?;

        self.now = self.now.max(due);

        let timer = self.intervals.get_mut(&id)?;
        timer.due += timer.period;
        Some((id, timer.owner))
    }

    /// Move the clock forward once all due timers have run
    pub fn settle(&mut self, deadline: Duration) {
        if deadline > self.now {
            self.now = deadline;
        }
    }

    /// Request a frame callback; at most one pending frame per owner
    pub fn request_animation_frame(&mut self, owner: TaskOwner) -> bool {
        if self.frames.contains(&owner) {
            return false;
        }
        self.frames.push(owner);
        true
    }

    pub fn has_pending_frames(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn take_animation_frames(&mut self) -> Vec<TaskOwner> {
        std::mem::take(&mut self.frames)
    }
}
