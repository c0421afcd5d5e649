//! Timing configuration and the cooperative timer queue
//!
//! Everything runs on one logical thread. Timers never fire on their own:
//! the owner advances a virtual clock and receives the due events in order.

use serde::{Deserialize, Serialize};

/// Timer intervals and delays (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Redraw interval of a spinning reel
    pub spin_tick_ms: u64,
    /// Delay between an armed lever pull and the lamp
    pub bonus_lamp_delay_ms: u64,
    /// Delay before the purchase modal closes after a purchase
    pub purchase_close_delay_ms: u64,
}

impl TimingConfig {
    /// Standard machine timing
    pub fn normal() -> Self {
        Self {
            spin_tick_ms: 50,
            bonus_lamp_delay_ms: 1500,
            purchase_close_delay_ms: 1000,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCHEDULER
// ═══════════════════════════════════════════════════════════════════════════════

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer signals when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Visual redraw of a spinning reel
    SpinTick { reel: usize },
    /// Bonus lamp switches on
    BonusLamp,
    /// Purchase modal closes
    PurchaseClose,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    id: TimerId,
    due_ms: u64,
    /// `Some` for repeating timers
    interval_ms: Option<u64>,
    event: TimerEvent,
}

/// A fired timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    /// Virtual time the timer was due
    pub at_ms: u64,
    pub event: TimerEvent,
}

/// Virtual-clock timer queue
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire once after `delay_ms`
    pub fn schedule_once(&mut self, delay_ms: u64, event: TimerEvent) -> TimerId {
        self.push(delay_ms, None, event)
    }

    /// Fire every `interval_ms` until cancelled. A zero interval is treated as 1.
    pub fn schedule_repeating(&mut self, interval_ms: u64, event: TimerEvent) -> TimerId {
        let interval = interval_ms.max(1);
        self.push(interval, Some(interval), event)
    }

    fn push(&mut self, delay_ms: u64, interval_ms: Option<u64>, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            interval_ms,
            event,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired, was cancelled, or
    /// never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Is the timer still pending?
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward and collect every timer that came due, ordered
    /// by due time (ties by scheduling order). Repeating timers are re-armed.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<Fired> {
        let target = self.now_ms.saturating_add(delta_ms);
        let mut fired = Vec::new();

        while let Some(pos) = self.next_due(target) {
            let timer = self.timers[pos];
            self.now_ms = timer.due_ms;
            fired.push(Fired {
                id: timer.id,
                at_ms: timer.due_ms,
                event: timer.event,
            });
            match timer.interval_ms {
                Some(interval) => self.timers[pos].due_ms = timer.due_ms + interval,
                None => {
                    self.timers.remove(pos);
                }
            }
        }

        self.now_ms = target;
        fired
    }

    fn next_due(&self, target: u64) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= target)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_once(1500, TimerEvent::BonusLamp);

        assert!(scheduler.advance(1499).is_empty());
        let fired = scheduler.advance(1);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert_eq!(fired[0].at_ms, 1500);
        assert!(scheduler.advance(10_000).is_empty());
        assert!(!scheduler.is_pending(id));
    }

    #[test]
    fn test_repeating_fires_each_interval() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(50, TimerEvent::SpinTick { reel: 0 });

        let fired = scheduler.advance(200);
        let times: Vec<u64> = fired.iter().map(|f| f.at_ms).collect();
        assert_eq!(times, vec![50, 100, 150, 200]);
        assert_eq!(scheduler.now_ms(), 200);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_repeating(50, TimerEvent::SpinTick { reel: 1 });

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(!scheduler.cancel(TimerId(999)));
        assert!(scheduler.advance(1000).is_empty());
    }

    #[test]
    fn test_events_ordered_by_due_time() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(120, TimerEvent::BonusLamp);
        scheduler.schedule_repeating(50, TimerEvent::SpinTick { reel: 2 });

        let events: Vec<TimerEvent> = scheduler.advance(150).into_iter().map(|f| f.event).collect();
        assert_eq!(
            events,
            vec![
                TimerEvent::SpinTick { reel: 2 },
                TimerEvent::SpinTick { reel: 2 },
                TimerEvent::BonusLamp,
                TimerEvent::SpinTick { reel: 2 },
            ]
        );
    }
}
