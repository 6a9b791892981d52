//! Single scheduler primitive for every delayed or repeating page action.
//!
//! The browser's `setTimeout` chains are replaced by a virtual clock: tasks are
//! queued with a due time and drained in (due, insertion) order by the caller.
//! Nested schedules made while a task runs are relative to that task's due time,
//! so chained delays add up exactly regardless of frame jitter.

use std::collections::BTreeMap;

use crate::config::Millis;

/// Handle returned by every `schedule_*` call; pass it to [`Timeline::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Entry<T> {
    id: TimerId,
    task: T,
    period: Option<Millis>,
}

pub struct Timeline<T> {
    now: Millis,
    seq: u64,
    next_id: u64,
    queue: BTreeMap<(Millis, u64), Entry<T>>,
}

impl<T: Clone> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            seq: 0,
            next_id: 0,
            queue: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Move the clock forward without running anything. Time never goes back.
    pub fn set_now(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    pub fn schedule_after(&mut self, delay: Millis, task: T) -> TimerId {
        let id = self.fresh_id();
        self.insert(self.now + delay, id, task, None);
        id
    }

    /// Run `task` every `period` ms, first after one period (`setInterval` semantics).
    pub fn schedule_every(&mut self, period: Millis, task: T) -> TimerId {
        let id = self.fresh_id();
        self.insert(self.now + period.max(1), id, task, Some(period.max(1)));
        id
    }

    /// Drop a pending or repeating task. Returns false if nothing was queued under `id`.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|_, e| e.id != id);
        self.queue.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.values().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the earliest queued task.
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest task due at or before `until`, advancing the clock to its
    /// due time. Repeating tasks are re-queued one period later under the same
    /// id. Periods a repeating task missed during a long gap between ticks
    /// collapse into the latest one, so it fires at most once per drain.
    pub fn pop_due(&mut self, until: Millis) -> Option<(TimerId, T)> {
        loop {
            let (&key, _) = self.queue.iter().next()?;
            if key.0 > until {
                return None;
            }
            let entry = self.queue.remove(&key)?;
            if let Some(period) = entry.period {
                let latest = key.0 + (until - key.0) / period * period;
                if latest > key.0 {
                    self.insert(latest, entry.id, entry.task, Some(period));
                    continue;
                }
                self.insert(key.0 + period, entry.id, entry.task.clone(), Some(period));
            }
            self.now = self.now.max(key.0);
            return Some((entry.id, entry.task));
        }
    }

    fn fresh_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    fn insert(&mut self, due: Millis, id: TimerId, task: T, period: Option<Millis>) {
        self.seq += 1;
        self.queue.insert((due, self.seq), Entry { id, task, period });
    }
}
