//! Single reel spin/stop unit

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;
use crate::timing::TimerId;

/// One of the machine's reels
#[derive(Debug, Clone)]
pub struct Reel {
    index: usize,
    spinning: bool,
    /// Final symbol, unset while spinning and before the first spin
    settled: Option<Symbol>,
    /// Symbol currently shown, churned while spinning
    displayed: Option<Symbol>,
    /// Redraw timer, present only while spinning
    timer: Option<TimerId>,
}

impl Reel {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            spinning: false,
            settled: None,
            displayed: None,
            timer: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn settled(&self) -> Option<Symbol> {
        self.settled
    }

    pub fn displayed(&self) -> Option<Symbol> {
        self.displayed
    }

    /// Begin spinning with the given redraw timer
    pub fn start(&mut self, timer: TimerId) {
        self.spinning = true;
        self.settled = None;
        self.timer = Some(timer);
    }

    /// Visual redraw; ignored unless spinning
    pub fn churn(&mut self, symbol: Symbol) {
        if self.spinning {
            self.displayed = Some(symbol);
        }
    }

    /// Commit the final symbol. Returns the redraw timer to cancel, handed
    /// out at most once per spin.
    pub fn halt(&mut self, symbol: Symbol) -> Option<TimerId> {
        self.spinning = false;
        self.settled = Some(symbol);
        self.displayed = Some(symbol);
        self.timer.take()
    }

    /// Read-only view for rendering
    pub fn view(&self) -> ReelView {
        ReelView {
            index: self.index,
            spinning: self.spinning,
            settled: self.settled,
            displayed: self.displayed,
            stop_enabled: self.spinning,
        }
    }
}

/// Rendered reel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelView {
    pub index: usize,
    pub spinning: bool,
    pub settled: Option<Symbol>,
    pub displayed: Option<Symbol>,
    /// Stop button state
    pub stop_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{Scheduler, TimerEvent};

    #[test]
    fn test_spin_then_halt() {
        let mut scheduler = Scheduler::new();
        let timer = scheduler.schedule_repeating(50, TimerEvent::SpinTick { reel: 0 });
        let mut reel = Reel::new(0);

        reel.start(timer);
        assert!(reel.is_spinning());
        assert_eq!(reel.settled(), None);

        reel.churn(Symbol::Bell);
        assert_eq!(reel.displayed(), Some(Symbol::Bell));
        assert_eq!(reel.settled(), None);

        assert_eq!(reel.halt(Symbol::Bar), Some(timer));
        assert!(!reel.is_spinning());
        assert_eq!(reel.settled(), Some(Symbol::Bar));
        assert_eq!(reel.displayed(), Some(Symbol::Bar));
    }

    #[test]
    fn test_timer_handed_out_once() {
        let mut scheduler = Scheduler::new();
        let timer = scheduler.schedule_repeating(50, TimerEvent::SpinTick { reel: 1 });
        let mut reel = Reel::new(1);
        reel.start(timer);

        assert!(reel.halt(Symbol::Blank).is_some());
        assert!(reel.halt(Symbol::Blank).is_none());
    }

    #[test]
    fn test_churn_ignored_when_stopped() {
        let mut reel = Reel::new(2);
        reel.churn(Symbol::SevenBar);
        assert_eq!(reel.displayed(), None);
    }

    #[test]
    fn test_restart_clears_settled() {
        let mut scheduler = Scheduler::new();
        let mut reel = Reel::new(0);
        reel.start(scheduler.schedule_repeating(50, TimerEvent::SpinTick { reel: 0 }));
        reel.halt(Symbol::Grape);

        reel.start(scheduler.schedule_repeating(50, TimerEvent::SpinTick { reel: 0 }));
        assert_eq!(reel.settled(), None);
        assert!(reel.view().stop_enabled);
    }
}
