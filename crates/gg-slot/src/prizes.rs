//! Prize catalog and redemption ledger

use std::collections::HashSet;

use gg_state::PrizeRecord;
use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;

/// A redeemable prize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    /// Stable unique ID
    pub id: u32,
    pub name: String,
    /// Price in coins
    pub cost: u64,
    /// Set once on exchange, never cleared
    #[serde(default)]
    pub collected: bool,
}

impl Prize {
    pub fn new(id: u32, name: impl Into<String>, cost: u64) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            collected: false,
        }
    }
}

/// Standard prize catalog
pub fn standard_prizes() -> Vec<Prize> {
    vec![
        Prize::new(1, "Giant GOGO! Sticker", 100),
        Prize::new(2, "Original T-shirt", 500),
        Prize::new(3, "Premium Figure", 1500),
    ]
}

/// Catalog with redemption state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeLedger {
    prizes: Vec<Prize>,
}

impl PrizeLedger {
    /// Build a ledger. Duplicate IDs keep the first entry.
    pub fn new(prizes: Vec<Prize>) -> Self {
        let mut seen = HashSet::new();
        let prizes = prizes.into_iter().filter(|p| seen.insert(p.id)).collect();
        Self { prizes }
    }

    pub fn standard() -> Self {
        Self::new(standard_prizes())
    }

    pub fn get(&self, id: u32) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == id)
    }

    /// All prizes in catalog order
    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    /// Prizes still available
    pub fn purchasable(&self) -> impl Iterator<Item = &Prize> {
        self.prizes.iter().filter(|p| !p.collected)
    }

    /// Prizes already exchanged
    pub fn collected(&self) -> impl Iterator<Item = &Prize> {
        self.prizes.iter().filter(|p| p.collected)
    }

    /// Every prize has been exchanged
    pub fn all_collected(&self) -> bool {
        self.prizes.iter().all(|p| p.collected)
    }

    /// Check an exchange against a balance without changing anything
    pub fn check(&self, id: u32, coins: u64) -> Result<&Prize, ExchangeError> {
        let prize = self
            .get(id)
            .filter(|p| !p.collected)
            .ok_or(ExchangeError::NotExchangeable(id))?;
        if coins < prize.cost {
            return Err(ExchangeError::InsufficientFunds {
                cost: prize.cost,
                coins,
            });
        }
        Ok(prize)
    }

    /// Mark a prize collected. Returns false if unknown or already collected.
    pub fn mark_collected(&mut self, id: u32) -> bool {
        match self.prizes.iter_mut().find(|p| p.id == id) {
            Some(prize) if !prize.collected => {
                prize.collected = true;
                true
            }
            _ => false,
        }
    }

    /// Merge persisted flags by ID. Unknown IDs are ignored; a stored `true`
    /// is never overridden back to `false`.
    pub fn apply_records(&mut self, records: &[PrizeRecord]) {
        for record in records.iter().filter(|r| r.collected) {
            if let Some(prize) = self.prizes.iter_mut().find(|p| p.id == record.id) {
                prize.collected = true;
            } else {
                log::debug!("Ignoring stored flag for unknown prize {}", record.id);
            }
        }
    }

    /// Flags to persist
    pub fn records(&self) -> Vec<PrizeRecord> {
        self.prizes
            .iter()
            .map(|p| PrizeRecord {
                id: p.id,
                collected: p.collected,
            })
            .collect()
    }
}

impl Default for PrizeLedger {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rendered prize entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeView {
    pub id: u32,
    pub name: String,
    pub cost: u64,
    /// Exchange button state
    pub affordable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_rules() {
        let mut ledger = PrizeLedger::standard();

        assert_eq!(ledger.check(99, 10_000), Err(ExchangeError::NotExchangeable(99)));
        assert_eq!(
            ledger.check(1, 99),
            Err(ExchangeError::InsufficientFunds { cost: 100, coins: 99 })
        );
        assert_eq!(ledger.check(1, 100).map(|p| p.id), Ok(1));

        assert!(ledger.mark_collected(1));
        assert_eq!(ledger.check(1, 10_000), Err(ExchangeError::NotExchangeable(1)));
    }

    #[test]
    fn test_mark_collected_once() {
        let mut ledger = PrizeLedger::standard();
        assert!(ledger.mark_collected(2));
        assert!(!ledger.mark_collected(2));
        assert!(!ledger.mark_collected(42));
        assert_eq!(ledger.collected().count(), 1);
        assert_eq!(ledger.purchasable().count(), 2);
    }

    #[test]
    fn test_apply_records_merges_by_id() {
        let mut ledger = PrizeLedger::standard();
        ledger.apply_records(&[
            PrizeRecord { id: 3, collected: true },
            PrizeRecord { id: 77, collected: true },
            PrizeRecord { id: 1, collected: false },
        ]);

        assert!(ledger.get(3).unwrap().collected);
        assert!(!ledger.get(1).unwrap().collected);
        assert!(!ledger.get(2).unwrap().collected);
        assert_eq!(ledger.prizes().len(), 3);
    }

    #[test]
    fn test_records_round_trip() {
        let mut ledger = PrizeLedger::standard();
        ledger.mark_collected(2);

        let mut fresh = PrizeLedger::standard();
        fresh.apply_records(&ledger.records());
        assert_eq!(fresh, ledger);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let ledger = PrizeLedger::new(vec![Prize::new(1, "A", 10), Prize::new(1, "B", 20)]);
        assert_eq!(ledger.prizes().len(), 1);
        assert_eq!(ledger.get(1).unwrap().name, "A");
    }

    #[test]
    fn test_all_collected() {
        let mut ledger = PrizeLedger::standard();
        for id in 1..=3 {
            ledger.mark_collected(id);
        }
        assert!(ledger.all_collected());
        assert_eq!(ledger.purchasable().count(), 0);
    }
}
