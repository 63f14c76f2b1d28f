use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Stopped,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerSignal {
    /// Remaining time just crossed the low-time threshold.
    LowTime,
    /// Remaining time reached zero. Emitted once per run.
    Expired,
}

/// Exam countdown, ticking once per second while running.
///
/// Ticks are driven by [`Countdown::poll`] with the current instant. The only
/// pending tick is `next_tick`, so `stop`/`reset` cancel it by clearing one field.
#[derive(Clone, Debug)]
pub struct Countdown {
    total_secs: u32,
    low_time_secs: u32,
    remaining_secs: u32,
    phase: TimerPhase,
    next_tick: Option<Instant>,
}

impl Countdown {
    pub fn new(total_secs: u32, low_time_secs: u32) -> Self {
        Self {
            total_secs,
            low_time_secs,
            remaining_secs: total_secs,
            phase: TimerPhase::Idle,
            next_tick: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.phase == TimerPhase::Running {
            return;
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = self.total_secs;
        }
        self.phase = TimerPhase::Running;
        self.next_tick = Some(now + TICK);
    }

    /// Apply every whole-second tick due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<TimerSignal> {
        let mut signal = None;
        while let Some(deadline) = self.next_tick {
            if now < deadline {
                break;
            }
            let was_low = self.is_low_time();
            self.remaining_secs = self.remaining_secs.saturating_sub(1);

            if self.remaining_secs == 0 {
                self.next_tick = None;
                self.phase = TimerPhase::Expired;
                return Some(TimerSignal::Expired);
            }
            if !was_low && self.is_low_time() {
                signal = Some(TimerSignal::LowTime);
            }
            self.next_tick = Some(deadline + TICK);
        }
        signal
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Stopped;
        }
    }

    pub fn reset(&mut self) {
        self.next_tick = None;
        self.remaining_secs = self.total_secs;
        self.phase = TimerPhase::Idle;
    }

    #[cfg(test)]
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// True once the timer has been started since the last reset.
    pub fn has_started(&self) -> bool {
        self.phase != TimerPhase::Idle
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_low_time(&self) -> bool {
        self.remaining_secs <= self.low_time_secs
    }

    pub fn display(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }
}

pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
