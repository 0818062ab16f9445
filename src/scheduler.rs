//! One-shot timers owned by the control thread.
//!
//! A slot holds at most one armed deadline. Every arm hands out a fresh
//! generation, and a fire is only honoured when it carries the generation that
//! is still armed, so cancelling or re-arming leaves nothing behind that can
//! touch state later.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Timers the runtime knows how to route back to their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerId {
    AutoStop,
    ChargeFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    generation: u64,
    due: Instant,
    delay: Duration,
}

#[derive(Debug, Default)]
pub struct TimerSlot {
    armed: Option<Armed>,
    next_generation: u64,
    scheduled_total: u64,
    cancelled_total: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot, replacing any outstanding deadline. Returns the new generation.
    pub fn schedule(&mut self, now: Instant, delay: Duration) -> u64 {
        self.next_generation += 1;
        self.scheduled_total += 1;
        let generation = self.next_generation;
        self.armed = Some(Armed {
            generation,
            due: now + delay,
            delay,
        });
        generation
    }

    /// Disarm the slot. Returns `false` when nothing was armed.
    pub fn cancel(&mut self) -> bool {
        if self.armed.take().is_some() {
            self.cancelled_total += 1;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.armed.map(|armed| armed.due)
    }

    /// Delay the current deadline was armed with.
    pub fn delay(&self) -> Option<Duration> {
        self.armed.map(|armed| armed.delay)
    }

    pub fn generation(&self) -> Option<u64> {
        self.armed.map(|armed| armed.generation)
    }

    /// Generation of the armed deadline if it has passed at `now`.
    pub fn expired(&self, now: Instant) -> Option<u64> {
        self.armed
            .filter(|armed| armed.due <= now)
            .map(|armed| armed.generation)
    }

    /// Consume a fire. Stale generations are rejected and leave the slot untouched.
    pub fn accept_fire(&mut self, generation: u64) -> bool {
        match self.armed {
            Some(armed) if armed.generation == generation => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }

    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total
    }

    pub fn cancelled_total(&self) -> u64 {
        self.cancelled_total
    }
}

/// Earliest of a set of optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}
