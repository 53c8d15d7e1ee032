//! A fixed capacity deferred-execution queue.
//!
//! The queue only keeps deadlines; it never runs anything by itself. The host
//! loop asks for [`DeferredQueue::next_deadline`], waits until then and calls
//! [`MacroEngine::tick`], which hands every due entry to the engine.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::engine::MacroEngine;
use crate::error::TdmError;
use crate::host::{Deferred, DeferredToken, Feedback, KeyClassifier, KeyOutput, Scheduler};

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Entry {
    token: DeferredToken,
    task: Deferred,
    deadline: Instant,
}

/// Deferred callbacks ordered by deadline, at most `N` pending at once.
#[derive(Debug)]
pub struct DeferredQueue<const N: usize> {
    entries: Vec<Entry, N>,
    /// Time that new delays are measured from
    now: Instant,
    next_token: u16,
}

impl<const N: usize> Default for DeferredQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DeferredQueue<N> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            now: Instant::from_ticks(0),
            next_token: 1,
        }
    }

    /// Set the current time, delays scheduled afterwards count from `now`
    pub fn sync(&mut self, now: Instant) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Deadline of the earliest pending entry
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Remove and return the earliest entry that is due at `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(DeferredToken, Deferred)> {
        self.sync(now);
        match self.entries.first() {
            Some(entry) if entry.deadline <= now => {
                let entry = self.entries.remove(0);
                Some((entry.token, entry.task))
            }
            _ => None,
        }
    }

    /// Schedule a fired entry again under the same token
    pub fn rearm(&mut self, token: DeferredToken, task: Deferred, delay_ms: u32) -> Result<(), TdmError> {
        self.insert(Entry {
            token,
            task,
            deadline: self.now + Duration::from_millis(delay_ms as u64),
        })
    }

    pub fn is_pending(&self, token: DeferredToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: Entry) -> Result<(), TdmError> {
        // Keep the entries sorted, equal deadlines fire in scheduling order
        let idx = self
            .entries
            .iter()
            .position(|e| e.deadline > entry.deadline)
            .unwrap_or(self.entries.len());
        self.entries.insert(idx, entry).map_err(|_| TdmError::SchedulerFull)
    }

    fn allocate_token(&mut self) -> DeferredToken {
        loop {
            let token = DeferredToken(self.next_token);
            self.next_token = self.next_token.wrapping_add(1).max(1);
            if !self.is_pending(token) {
                return token;
            }
        }
    }
}

impl<const N: usize> Scheduler for DeferredQueue<N> {
    fn schedule(&mut self, delay_ms: u32, task: Deferred) -> Result<DeferredToken, TdmError> {
        if self.entries.is_full() {
            return Err(TdmError::SchedulerFull);
        }
        let token = self.allocate_token();
        self.insert(Entry {
            token,
            task,
            deadline: self.now + Duration::from_millis(delay_ms as u64),
        })?;
        Ok(token)
    }

    fn cancel(&mut self, token: DeferredToken) {
        self.entries.retain(|e| e.token != token);
    }
}

impl<K, O, F, const BUFFER_SIZE: usize, const NUM_PAIRS: usize, const N: usize>
    MacroEngine<K, O, DeferredQueue<N>, F, BUFFER_SIZE, NUM_PAIRS>
where
    K: KeyClassifier,
    O: KeyOutput,
    F: Feedback,
{
    /// Run every callback that is due at `now`, re-arming those that ask for it.
    pub fn tick(&mut self, now: Instant) {
        while let Some((token, task)) = self.scheduler.pop_due(now) {
            let rearm = self.on_deferred(token, task);
            if rearm > 0 {
                if let Err(e) = self.scheduler.rearm(token, task, rearm) {
                    error!("Failed to re-arm {:?}: {:?}", token, e);
                }
            }
        }
    }
}
