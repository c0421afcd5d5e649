//! Coin purchase gate and modal state
//!
//! The serial key is a placeholder check: `key == amount * multiplier`.

use serde::{Deserialize, Serialize};

use crate::error::PurchaseError;
use crate::timing::TimerId;

/// Serial-key check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseGate {
    pub key_multiplier: u64,
}

impl PurchaseGate {
    pub fn new(key_multiplier: u64) -> Self {
        Self { key_multiplier }
    }

    /// Key that unlocks `amount` coins, `None` when it does not fit in a u64
    pub fn expected_key(&self, amount: u64) -> Option<u64> {
        amount.checked_mul(self.key_multiplier)
    }

    /// Check typed key text. Returns the amount to credit.
    pub fn verify(&self, amount: u64, entered_key: &str) -> Result<u64, PurchaseError> {
        if amount == 0 {
            return Err(PurchaseError::InvalidAmount(amount));
        }
        let expected = self.expected_key(amount).ok_or(PurchaseError::WrongKey)?;
        match entered_key.trim().parse::<u64>() {
            Ok(key) if key == expected => Ok(amount),
            _ => Err(PurchaseError::WrongKey),
        }
    }
}

impl Default for PurchaseGate {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Purchase modal state
#[derive(Debug, Clone, Default)]
pub struct PurchaseModal {
    open: bool,
    amount: u64,
    message: Option<String>,
    close_timer: Option<TimerId>,
}

impl PurchaseModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show for a preset amount with a clean message line
    pub fn open(&mut self, amount: u64) {
        self.open = true;
        self.amount = amount;
        self.message = None;
    }

    /// Hide; returns a pending auto-close timer to cancel
    pub fn close(&mut self) -> Option<TimerId> {
        self.open = false;
        self.close_timer.take()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Arm auto-close; returns the replaced timer, if any
    pub fn arm_close(&mut self, timer: TimerId) -> Option<TimerId> {
        self.close_timer.replace(timer)
    }

    /// Auto-close fired
    pub fn on_close_timer(&mut self, timer: TimerId) {
        if self.close_timer == Some(timer) {
            self.close_timer = None;
            self.open = false;
        }
    }

    pub fn view(&self) -> PurchaseView {
        PurchaseView {
            open: self.open,
            amount: self.amount,
            message: self.message.clone(),
        }
    }
}

/// Rendered modal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseView {
    pub open: bool,
    pub amount: u64,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_three_times_amount() {
        let gate = PurchaseGate::default();
        assert_eq!(gate.expected_key(10), Some(30));
        assert_eq!(gate.verify(10, "30"), Ok(10));
        assert_eq!(gate.verify(10, " 30 "), Ok(10));
        assert_eq!(gate.verify(10, "31"), Err(PurchaseError::WrongKey));
        assert_eq!(gate.verify(10, "10"), Err(PurchaseError::WrongKey));
    }

    #[test]
    fn test_overflowing_amount_never_unlocks() {
        let gate = PurchaseGate::default();
        let amount = u64::MAX / 2;
        assert_eq!(gate.expected_key(amount), None);
        assert_eq!(
            gate.verify(amount, &u64::MAX.to_string()),
            Err(PurchaseError::WrongKey)
        );
        assert_eq!(gate.expected_key(u64::MAX / 3), Some(u64::MAX / 3 * 3));
    }

    #[test]
    fn test_unparseable_key_rejected() {
        let gate = PurchaseGate::default();
        assert_eq!(gate.verify(10, ""), Err(PurchaseError::WrongKey));
        assert_eq!(gate.verify(10, "thirty"), Err(PurchaseError::WrongKey));
        assert_eq!(gate.verify(10, "-30"), Err(PurchaseError::WrongKey));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let gate = PurchaseGate::default();
        assert_eq!(gate.verify(0, "0"), Err(PurchaseError::InvalidAmount(0)));
    }

    #[test]
    fn test_modal_open_clears_message() {
        let mut modal = PurchaseModal::default();
        modal.open(50);
        modal.set_message("Wrong serial key.");
        modal.open(100);

        let view = modal.view();
        assert!(view.open);
        assert_eq!(view.amount, 100);
        assert_eq!(view.message, None);
    }
}
