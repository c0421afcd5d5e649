//! Reel stop and settlement results

use serde::{Deserialize, Serialize};

use crate::paytable::{REEL_COUNT, WinMatch};
use crate::symbols::Symbol;

/// Outcome of one lever-pull cycle, produced when the last reel stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Final symbols, reel 0 first
    pub symbols: [Symbol; REEL_COUNT],
    /// Coins credited
    pub payout: u64,
    /// Paying rule, if any
    pub win: Option<WinMatch>,
    /// Bonus was armed for this cycle
    pub bonus: bool,
}

impl Settlement {
    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}

/// Result of a stop command that halted a reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelStop {
    pub reel: usize,
    pub symbol: Symbol,
    /// Present when this stop settled the cycle
    pub settlement: Option<Settlement>,
}
