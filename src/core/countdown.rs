//! # Countdown: timer-driven announcement state machine.
//!
//! A [`Countdown`] holds the whole seconds left before a restart and the
//! [`ThresholdTable`]. It does no waiting itself: the driver asks for the next
//! [`Wake`], sleeps for `wake.delay`, then reports the wake back.
//!
//! ```text
//! remaining = 65, table = [..., 60, 30, 10, 5, 4, 3, 2, 1]
//!
//! next_wake() → Wake{ delay: 5s,  checkpoint: 60 }  on_wake → remaining = 60
//! next_wake() → Wake{ delay: 30s, checkpoint: 30 }  on_wake → remaining = 30
//! ...
//! next_wake() → Wake{ delay: 1s,  checkpoint: 0 }   on_wake → remaining = 0
//! next_wake() → None                                 (fire)
//! ```
//!
//! ## Rules
//! - Checkpoints are strictly decreasing and the last one is always `0`.
//! - The sum of all wake delays equals the initial `remaining`.

use std::time::Duration;

use crate::policies::ThresholdTable;

/// One scheduled wake-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wake {
    /// How long to sleep from the previous checkpoint.
    pub delay: Duration,
    /// Seconds left once the wake happens.
    pub checkpoint: u64,
}

/// Remaining-seconds state of one arm.
#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u64,
    thresholds: ThresholdTable,
}

impl Countdown {
    pub fn new(remaining: u64, thresholds: ThresholdTable) -> Self {
        Self {
            remaining,
            thresholds,
        }
    }

    /// Seconds left at the last reached checkpoint.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Next wake, or `None` once zero is reached.
    pub fn next_wake(&self) -> Option<Wake> {
        if self.remaining == 0 {
            return None;
        }
        let checkpoint = self.thresholds.next_below(self.remaining);
        Some(Wake {
            delay: Duration::from_secs(self.remaining - checkpoint),
            checkpoint,
        })
    }

    /// Records that `wake` happened; returns the reached checkpoint.
    pub fn on_wake(&mut self, wake: Wake) -> u64 {
        self.remaining = wake.checkpoint;
        wake.checkpoint
    }
}
