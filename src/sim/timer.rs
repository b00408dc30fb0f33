//! Logical countdowns advanced by the simulation tick
//!
//! Nothing here schedules itself: the owner calls `advance(dt_ms)` and acts on
//! what comes back. A cancelled timer yields nothing, so a stale expiry can
//! never reach torn-down state.

/// Result of advancing a `PhaseTimer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerUpdate<A> {
    /// Remaining whole seconds, present on every report interval
    pub remaining_secs: Option<u32>,
    /// The expiry action, yielded exactly once
    pub elapsed: Option<A>,
}

impl<A> Default for TimerUpdate<A> {
    fn default() -> Self {
        Self {
            remaining_secs: None,
            elapsed: None,
        }
    }
}

/// Countdown for the active phase, carrying the action to take when it runs out
#[derive(Debug, Clone)]
pub struct PhaseTimer<A> {
    action: Option<A>,
    duration_secs: u32,
    elapsed_ms: u64,
    report_interval_ms: u32,
    since_report_ms: u32,
}

impl<A> PhaseTimer<A> {
    pub fn new(report_interval_ms: u32) -> Self {
        Self {
            action: None,
            duration_secs: 0,
            elapsed_ms: 0,
            report_interval_ms: report_interval_ms.max(1),
            since_report_ms: 0,
        }
    }

    /// Start a countdown, replacing any running one. Returns the initial display value.
    pub fn start(&mut self, duration_secs: u32, on_elapsed: A) -> u32 {
        self.action = Some(on_elapsed);
        self.duration_secs = duration_secs;
        self.elapsed_ms = 0;
        self.since_report_ms = 0;
        self.remaining_secs()
    }

    /// Stop without firing. Returns true if a countdown was running.
    pub fn cancel(&mut self) -> bool {
        self.action.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.action.is_some()
    }

    /// Whole seconds left, floored and clamped at zero
    pub fn remaining_secs(&self) -> u32 {
        let elapsed_secs = (self.elapsed_ms / 1000).min(u32::MAX as u64) as u32;
        self.duration_secs.saturating_sub(elapsed_secs)
    }

    pub fn advance(&mut self, dt_ms: u32) -> TimerUpdate<A> {
        if self.action.is_none() {
            return TimerUpdate::default();
        }

        self.elapsed_ms += dt_ms as u64;
        self.since_report_ms += dt_ms;

        let remaining = self.remaining_secs();
        if remaining == 0 {
            self.since_report_ms = 0;
            return TimerUpdate {
                remaining_secs: Some(0),
                elapsed: self.action.take(),
            };
        }

        let mut update = TimerUpdate::default();
        if self.since_report_ms >= self.report_interval_ms {
            self.since_report_ms %= self.report_interval_ms;
            update.remaining_secs = Some(remaining);
        }
        update
    }
}

/// One-shot delay used for feedback pauses
#[derive(Debug, Clone)]
pub struct Delay<A> {
    pending: Option<(u32, A)>,
}

impl<A> Default for Delay<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> Delay<A> {
    /// Schedule `action` after `delay_ms`, replacing anything pending
    pub fn schedule(&mut self, delay_ms: u32, action: A) {
        self.pending = Some((delay_ms, action));
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn advance(&mut self, dt_ms: u32) -> Option<A> {
        let (remaining, _) = self.pending.as_mut()?;
        if *remaining > dt_ms {
            *remaining -= dt_ms;
            return None;
        }
        self.pending.take().map(|(_, action)| action)
    }
}

/// Session countdown ticking once per whole second
#[derive(Debug, Clone)]
pub struct SessionClock {
    remaining_secs: u32,
    carry_ms: u32,
    running: bool,
}

impl SessionClock {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining_secs: duration_secs,
            carry_ms: 0,
            running: false,
        }
    }

    pub fn start(&mut self, duration_secs: u32) {
        self.remaining_secs = duration_secs;
        self.carry_ms = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Advance and return how many whole seconds ticked by
    pub fn advance(&mut self, dt_ms: u32) -> u32 {
        if !self.running {
            return 0;
        }
        self.carry_ms += dt_ms;
        let ticks = (self.carry_ms / 1000).min(self.remaining_secs);
        self.carry_ms %= 1000;
        self.remaining_secs -= ticks;
        ticks
    }
}
