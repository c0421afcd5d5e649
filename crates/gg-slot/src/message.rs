//! Player-facing message line

use std::fmt;

/// Message shown under the reels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameMessage {
    /// Startup prompt
    Welcome,
    PullLever,
    StopReels,
    InsufficientCoins,
    Win(u64),
    NoWin,
    PrizeExchanged(String),
    NotExchangeable,
    CannotAfford { cost: u64 },
    ExchangeDeclined,
    CoinsPurchased(u64),
    WrongSerialKey,
    InvalidPurchase,
}

impl fmt::Display for GameMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMessage::Welcome => write!(f, "Press INSERT to start!"),
            GameMessage::PullLever => write!(f, "Pull the lever."),
            GameMessage::StopReels => write!(f, "Hit STOP on each reel!"),
            GameMessage::InsufficientCoins => {
                write!(f, "Insufficient coins. Please buy more.")
            }
            GameMessage::Win(amount) => write!(f, "You won {} coins! Congratulations!", amount),
            GameMessage::NoWin => write!(f, "No win this time."),
            GameMessage::PrizeExchanged(name) => write!(f, "Exchanged for {}!", name),
            GameMessage::NotExchangeable => write!(f, "That prize is not available."),
            GameMessage::CannotAfford { cost } => {
                write!(f, "Not enough coins: this prize costs {}.", cost)
            }
            GameMessage::ExchangeDeclined => write!(f, "Exchange cancelled."),
            GameMessage::CoinsPurchased(amount) => write!(f, "Purchased {} coins!", amount),
            GameMessage::WrongSerialKey => write!(f, "Wrong serial key."),
            GameMessage::InvalidPurchase => write!(f, "Choose an amount to buy."),
        }
    }
}
