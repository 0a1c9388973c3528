//! Host-driven timer queue.
//!
//! The engine never sleeps. "Wait 800ms" becomes an entry in this queue,
//! and the host runs due entries by calling `TouchEngine::advance` with the
//! current time. Cancelling a timer removes its entry, so a cancelled timer
//! can never fire late.

use std::collections::{BTreeMap, HashMap};
use vkb_core::Millis;

/// Handle to a scheduled entry. Unique for the lifetime of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Deadline-ordered queue of pending payloads.
#[derive(Debug)]
pub struct TimerQueue<P> {
    /// Keyed by `(deadline, handle)` so equal deadlines fire in scheduling order.
    entries: BTreeMap<(Millis, TimerHandle), P>,
    deadlines: HashMap<TimerHandle, Millis>,
    next_handle: u64,
}

impl<P> Default for TimerQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> TimerQueue<P> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Schedule `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Millis, payload: P) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.insert((deadline, handle), payload);
        self.deadlines.insert(handle, deadline);
        handle
    }

    /// Remove a pending entry. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => self.entries.remove(&(deadline, handle)).is_some(),
            None => false,
        }
    }

    /// Pop the earliest entry whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerHandle, Millis, P)> {
        let (&(deadline, handle), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&handle);
        let payload = self.entries.remove(&(deadline, handle))?;
        Some((handle, deadline, payload))
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
