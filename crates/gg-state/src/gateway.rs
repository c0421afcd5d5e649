//! Persistence gateway for the slot session
//!
//! Two keys are used:
//! - `slot_coins`: decimal coin balance
//! - `slot_prizes`: JSON array of `{ "id", "collected" }` records

use serde::{Deserialize, Serialize};

use crate::error::StateResult;
use crate::store::KeyValueStore;

/// Key holding the coin balance
pub const COINS_KEY: &str = "slot_coins";
/// Key holding the prize collection
pub const PRIZES_KEY: &str = "slot_prizes";

/// Persisted collected flag of one prize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRecord {
    pub id: u32,
    #[serde(default)]
    pub collected: bool,
}

/// Everything read back at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    /// Coin balance (0 when absent or unparseable)
    pub coins: u64,
    /// Prize records (empty when absent or unparseable)
    pub prizes: Vec<PrizeRecord>,
}

impl PersistedState {
    /// Collected flag stored for a prize, if any
    pub fn collected(&self, id: u32) -> Option<bool> {
        self.prizes.iter().find(|p| p.id == id).map(|p| p.collected)
    }
}

/// Load/save access to the slot keys
pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the full persisted state. Never fails.
    pub fn load(&self) -> PersistedState {
        PersistedState {
            coins: self.load_coins(),
            prizes: self.load_prizes(),
        }
    }

    /// Read the coin balance, defaulting to 0
    pub fn load_coins(&self) -> u64 {
        match self.store.get(COINS_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Unparseable coin balance {:?}, using 0", raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read coin balance: {}", e);
                0
            }
        }
    }

    /// Read the prize records, defaulting to none
    ///
    /// Entries are decoded one by one; an unreadable entry is skipped without
    /// losing the others.
    pub fn load_prizes(&self) -> Vec<PrizeRecord> {
        match self.store.get(PRIZES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(entries) => entries
                    .into_iter()
                    .filter_map(|entry| match serde_json::from_value(entry) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            log::warn!("Skipping unreadable prize record: {}", e);
                            None
                        }
                    })
                    .collect(),
                Err(e) => {
                    log::warn!("Unparseable prize ledger, ignoring: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read prize ledger: {}", e);
                Vec::new()
            }
        }
    }

    /// Write the coin balance
    pub fn save_coins(&mut self, coins: u64) -> StateResult<()> {
        self.store.set(COINS_KEY, &coins.to_string())
    }

    /// Write the prize records
    pub fn save_prizes(&mut self, prizes: &[PrizeRecord]) -> StateResult<()> {
        let json = serde_json::to_string(prizes)?;
        self.store.set(PRIZES_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_coins_round_trip() {
        let store = MemoryStore::new();
        let mut gateway = PersistenceGateway::new(Box::new(store.clone()));
        gateway.save_coins(42).unwrap();

        let reloaded = PersistenceGateway::new(Box::new(store));
        assert_eq!(reloaded.load().coins, 42);
    }

    #[test]
    fn test_prizes_round_trip() {
        let store = MemoryStore::new();
        let mut gateway = PersistenceGateway::new(Box::new(store.clone()));
        let records = vec![
            PrizeRecord { id: 1, collected: true },
            PrizeRecord { id: 2, collected: false },
        ];
        gateway.save_prizes(&records).unwrap();

        let state = PersistenceGateway::new(Box::new(store)).load();
        assert_eq!(state.prizes, records);
        assert_eq!(state.collected(1), Some(true));
        assert_eq!(state.collected(3), None);
    }

    #[test]
    fn test_missing_keys_default() {
        let gateway = PersistenceGateway::new(Box::new(MemoryStore::new()));
        assert_eq!(gateway.load(), PersistedState::default());
    }

    #[test]
    fn test_malformed_values_default() {
        let mut store = MemoryStore::new();
        store.set(COINS_KEY, "lots").unwrap();
        store.set(PRIZES_KEY, "{broken").unwrap();

        let state = PersistenceGateway::new(Box::new(store)).load();
        assert_eq!(state.coins, 0);
        assert!(state.prizes.is_empty());
    }

    #[test]
    fn test_bad_record_keeps_the_rest() {
        let mut store = MemoryStore::new();
        store
            .set(
                PRIZES_KEY,
                r#"[{"id":1,"collected":true},{"id":"two"},{"id":3}]"#,
            )
            .unwrap();

        let state = PersistenceGateway::new(Box::new(store)).load();
        assert_eq!(
            state.prizes,
            vec![
                PrizeRecord { id: 1, collected: true },
                PrizeRecord { id: 3, collected: false },
            ]
        );
    }

    #[test]
    fn test_extra_record_fields_tolerated() {
        let mut store = MemoryStore::new();
        store
            .set(
                PRIZES_KEY,
                r#"[{"id":1,"name":"Sticker","cost":100,"collected":true}]"#,
            )
            .unwrap();

        let state = PersistenceGateway::new(Box::new(store)).load();
        assert_eq!(state.collected(1), Some(true));
    }
}
