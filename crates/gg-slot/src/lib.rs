//! # gg-slot: GOGO slot machine core
//!
//! A three-reel slot: insert coins, pull the lever, stop each reel, get paid.
//! Won coins buy prizes; coins can be bought behind a serial-key gate.
//!
//! ## Architecture
//!
//! ```text
//! GameSession
//!     │
//!     ├── Reel × 3 (spin / stop, redraw timer)
//!     ├── Scheduler (virtual clock: reel ticks, GOGO lamp, modal close)
//!     ├── RandomSource (final symbols, bonus trial)
//!     ├── PayTable (settlement payout)
//!     ├── PrizeLedger + PurchaseGate
//!     ├── PersistenceGateway (gg-state)
//!     └── GameUi (render snapshot, confirm)
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod message;
pub mod paytable;
pub mod prizes;
pub mod purchase;
pub mod random;
pub mod reel;
pub mod session;
pub mod spin;
pub mod symbols;
pub mod timing;
pub mod ui;

pub use command::*;
pub use config::*;
pub use error::*;
pub use message::*;
pub use paytable::*;
pub use prizes::*;
pub use purchase::*;
pub use random::*;
pub use reel::*;
pub use session::*;
pub use spin::*;
pub use symbols::*;
pub use timing::*;
pub use ui::*;
