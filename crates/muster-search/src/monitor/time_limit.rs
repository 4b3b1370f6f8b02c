// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Time Limit Monitor
//!
//! Enforces a wall-clock budget on a search. The clock is only read when
//! `(steps & clock_check_mask) == 0`, so the default mask (`0x3FFF`) reads
//! it about every 16,384 steps.
//!
//! By default the budget starts when the search is entered. A monitor built
//! with `starting_at` keeps its anchor instead, which lets several consecutive
//! searches share one budget.
//!
//! ```rust
//! use muster_search::monitor::time_limit::TimeLimitMonitor;
//! use muster_search::monitor::search_monitor::{SearchCommand, SearchMonitor};
//! use std::time::Duration;
//!
//! let mut mon = TimeLimitMonitor::new(Duration::from_secs(5));
//! mon.on_enter_search();
//! mon.on_step();
//! assert_eq!(mon.search_command(), SearchCommand::Continue);
//! ```

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor {
    clock_check_mask: u64,
    steps: u64,
    time_limit: Duration,
    start_time: Instant,
    restart_on_enter: bool,
}

impl TimeLimitMonitor {
    /// Check every 16,384 steps.
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_STEP_CLOCK_CHECK_MASK)
    }

    #[inline]
    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            steps: 0,
            time_limit,
            start_time: Instant::now(),
            restart_on_enter: true,
        }
    }

    /// Creates a monitor whose budget runs from `start_time` regardless of
    /// when the search is entered. The clock is read on every check.
    #[inline]
    pub fn starting_at(start_time: Instant, time_limit: Duration) -> Self {
        Self {
            clock_check_mask: 0,
            steps: 0,
            time_limit,
            start_time,
            restart_on_enter: false,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Returns `true` if the budget is spent, reading the clock unconditionally.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.time_limit
    }
}

impl SearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self) {
        if self.restart_on_enter {
            self.start_time = Instant::now();
        }
        self.steps = 0;
    }

    fn on_exit_search(&mut self) {}

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if (self.steps & self.clock_check_mask) == 0 && self.is_expired() {
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expired(mask: u64) -> TimeLimitMonitor {
        let mut mon = TimeLimitMonitor::with_clock_check_mask(Duration::from_millis(10), mask);
        mon.start_time = Instant::now() - Duration::from_millis(50);
        mon
    }

    #[test]
    fn test_terminates_after_time_limit_when_mask_condition_met() {
        let mon = expired(TimeLimitMonitor::DEFAULT_STEP_CLOCK_CHECK_MASK);
        match mon.search_command() {
            SearchCommand::Terminate(msg) => assert!(msg.contains("time limit")),
            other => panic!("expected Terminate, got {:?}", other),
        }
    }

    #[test]
    fn test_skips_clock_when_mask_condition_not_met() {
        let mut mon = expired(TimeLimitMonitor::DEFAULT_STEP_CLOCK_CHECK_MASK);
        mon.on_step();
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_mask_zero_always_checks() {
        let mut mon = expired(0);
        mon.steps = 12345;
        assert!(mon.search_command().is_terminate());
    }

    #[test]
    fn test_continues_before_time_limit() {
        let mon = TimeLimitMonitor::new(Duration::from_secs(3600));
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_enter_search_restarts_clock() {
        let mut mon = expired(0);
        mon.on_enter_search();
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_anchored_monitor_keeps_start_on_enter() {
        let mut mon = TimeLimitMonitor::starting_at(
            Instant::now() - Duration::from_millis(50),
            Duration::from_millis(10),
        );
        mon.on_enter_search();
        mon.on_step();
        assert!(mon.search_command().is_terminate());
        assert!(mon.is_expired());
    }

    #[test]
    fn test_on_step_wraps() {
        let mut mon = TimeLimitMonitor::new(Duration::from_secs(1));
        mon.steps = u64::MAX;
        mon.on_step();
        assert_eq!(mon.steps, 0);
    }
}
