//! Search limits and the deadline clock.
//!
//! The searcher checks the clock at node entry, but only every
//! `check_interval` nodes; between checks it reads the stop flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::types::Color;

/// Depth and time bounds for one `go`.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Maximum iterative-deepening depth in plies.
    pub depth: u8,
    pub move_time: Option<Duration>,
    pub time_control: TimeControl,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
            time_control: TimeControl::new(None),
        }
    }

    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// Budget derived from the remaining clock: a thirtieth of what is left
    /// plus half the increment, never below 10ms.
    pub fn from_clock(depth: u8, remaining: Duration, increment: Duration) -> Self {
        let budget = (remaining / 30 + increment / 2)
            .min(remaining.saturating_sub(Duration::from_millis(50)))
            .max(Duration::from_millis(10));
        Self::depth_and_time(depth, budget)
    }

    /// Picks the mover's clock out of a UCI `go wtime .. btime ..` pair.
    pub fn for_side(
        depth: u8,
        side: Color,
        wtime: Duration,
        btime: Duration,
        winc: Duration,
        binc: Duration,
    ) -> Self {
        match side {
            Color::White => Self::from_clock(depth, wtime, winc),
            Color::Black => Self::from_clock(depth, btime, binc),
        }
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }

    pub fn start(&mut self) {
        self.time_control.start();
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(3)
    }
}

/// Shared stop flag plus wall-clock deadline.
///
/// Clones share the flag, so a UCI `stop` on one handle halts the search
/// holding another.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
    started: Option<Instant>,
    time_limit: Option<Duration>,
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            started: None,
            time_limit,
            check_interval: 1024,
        }
    }

    /// Starts the clock and clears any earlier stop.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Reads the clock, raising the stop flag once the limit has passed.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if let Some(limit) = self.time_limit
            && let Some(start) = self.started
            && start.elapsed() >= limit
        {
            self.stop();
            return true;
        }
        false
    }

    /// Node-entry check: the flag every node, the clock every `check_interval`.
    #[inline]
    pub fn should_stop_at(&self, nodes: u64) -> bool {
        if nodes.is_multiple_of(self.check_interval) {
            self.check_time()
        } else {
            self.is_stopped()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |s| s.elapsed())
    }

    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }

    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
