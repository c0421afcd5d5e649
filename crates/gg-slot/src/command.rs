//! Commands forwarded by a front-end

use crate::error::{ExchangeError, PurchaseError};
use crate::prizes::Prize;
use crate::spin::ReelStop;

/// Player command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert,
    PullLever,
    Stop(usize),
    Exchange(u32),
    OpenPurchase(u64),
    ConfirmPurchase { amount: u64, key: String },
    ClosePurchase,
    /// Let virtual time pass
    Advance(u64),
}

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Preconditions unmet, nothing changed
    Ignored,
    Inserted,
    LeverPulled,
    Stopped(ReelStop),
    Exchanged(Prize),
    ExchangeFailed(ExchangeError),
    Purchased(u64),
    PurchaseFailed(PurchaseError),
    PurchaseOpened,
    PurchaseClosed,
    /// Number of timers fired
    Advanced(usize),
}
