//! # gg-state: Persistence for the GOGO slot
//!
//! Durable string key-value storage for the coin balance and the prize
//! collection:
//! - `KeyValueStore` trait with in-memory and JSON-file backends
//! - `PersistenceGateway` for the `slot_coins` / `slot_prizes` keys
//!
//! Loading never fails: absent or malformed entries fall back to defaults.

pub mod error;
pub mod gateway;
pub mod store;

pub use error::*;
pub use gateway::*;
pub use store::*;
