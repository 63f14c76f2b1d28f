use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateStatus {
    Pending,
    Ready,
    Abandoned,
}

/// One-shot wait for the question set, bounded by `ceiling`.
///
/// The countdown may only start once the gate reports `Ready`. Once the ceiling
/// passes the gate is `Abandoned` and the timer is never started for that load.
#[derive(Clone, Copy, Debug)]
pub struct ReadinessGate {
    armed_at: Instant,
    ceiling: Duration,
}

impl ReadinessGate {
    pub fn arm(now: Instant, ceiling: Duration) -> Self {
        Self {
            armed_at: now,
            ceiling,
        }
    }

    pub fn check(&self, ready: bool, now: Instant) -> GateStatus {
        if now.saturating_duration_since(self.armed_at) >= self.ceiling {
            GateStatus::Abandoned
        } else if ready {
            GateStatus::Ready
        } else {
            GateStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_within_ceiling() {
        let t0 = Instant::now();
        let gate = ReadinessGate::arm(t0, Duration::from_secs(20));
        assert_eq!(gate.check(false, t0), GateStatus::Pending);
        assert_eq!(
            gate.check(true, t0 + Duration::from_millis(19_900)),
            GateStatus::Ready
        );
    }

    #[test]
    fn test_abandoned_after_ceiling_even_if_ready() {
        let t0 = Instant::now();
        let gate = ReadinessGate::arm(t0, Duration::from_secs(20));
        assert_eq!(
            gate.check(false, t0 + Duration::from_secs(20)),
            GateStatus::Abandoned
        );
        assert_eq!(
            gate.check(true, t0 + Duration::from_secs(21)),
            GateStatus::Abandoned
        );
    }
}
