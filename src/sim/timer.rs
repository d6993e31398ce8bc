//! Cancelable delayed events
//!
//! The frame loop feeds elapsed milliseconds in; expired timers come back out
//! in the order they were due.

use serde::{Deserialize, Serialize};

/// Which delayed event a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    CountdownTick,
    Relaunch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    kind: TimerKind,
    remaining_ms: f64,
}

/// Pending timers, at most one per kind
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `kind` to fire after `delay_ms`, replacing any pending instance
    pub fn schedule(&mut self, kind: TimerKind, delay_ms: u32) {
        self.cancel(kind);
        self.pending.push(Pending {
            kind,
            remaining_ms: f64::from(delay_ms),
        });
    }

    /// Drop a pending timer; no-op when none is armed
    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|p| p.kind != kind);
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|p| p.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance by `elapsed_ms` and return the timers that expired
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<TimerKind> {
        if elapsed_ms <= 0.0 {
            return Vec::new();
        }

        for p in &mut self.pending {
            p.remaining_ms -= elapsed_ms;
        }

        let mut fired: Vec<Pending> = self
            .pending
            .iter()
            .copied()
            .filter(|p| p.remaining_ms <= 0.0)
            .collect();
        self.pending.retain(|p| p.remaining_ms > 0.0);

        // Most overdue first
        fired.sort_by(|a, b| a.remaining_ms.total_cmp(&b.remaining_ms));
        fired.into_iter().map(|p| p.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = Timers::new();
        timers.schedule(TimerKind::CountdownTick, 1000);
        assert!(timers.advance(999.0).is_empty());
        assert_eq!(timers.advance(1.0), vec![TimerKind::CountdownTick]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_schedule_replaces_pending() {
        let mut timers = Timers::new();
        timers.schedule(TimerKind::Relaunch, 1000);
        timers.advance(600.0);
        timers.schedule(TimerKind::Relaunch, 1000);
        assert!(timers.advance(600.0).is_empty());
        assert_eq!(timers.advance(400.0), vec![TimerKind::Relaunch]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timers = Timers::new();
        timers.cancel(TimerKind::Relaunch);
        timers.schedule(TimerKind::Relaunch, 10);
        timers.cancel(TimerKind::Relaunch);
        timers.cancel(TimerKind::Relaunch);
        assert!(!timers.is_pending(TimerKind::Relaunch));
        assert!(timers.advance(100.0).is_empty());
    }

    #[test]
    fn test_fire_order_by_due_time() {
        let mut timers = Timers::new();
        timers.schedule(TimerKind::CountdownTick, 500);
        timers.schedule(TimerKind::Relaunch, 200);
        assert_eq!(
            timers.advance(1000.0),
            vec![TimerKind::Relaunch, TimerKind::CountdownTick]
        );
    }
}
