//! Symbol definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reel symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    /// Red seven, the jackpot symbol
    SevenBar = 0,
    Bar = 1,
    /// Pays on reel 0 alone
    Cherry = 2,
    Bell = 3,
    Grape = 4,
    /// Empty position
    Blank = 5,
}

impl Symbol {
    /// Every symbol, in declaration order
    pub const ALL: [Symbol; 6] = [
        Symbol::SevenBar,
        Symbol::Bar,
        Symbol::Cherry,
        Symbol::Bell,
        Symbol::Grape,
        Symbol::Blank,
    ];

    /// Number of distinct symbols
    pub const COUNT: usize = Self::ALL.len();

    /// Symbol at a position of `ALL`, wrapping
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    /// Short display label
    pub fn label(&self) -> &'static str {
        match self {
            Symbol::SevenBar => "7",
            Symbol::Bar => "BAR",
            Symbol::Cherry => "CHERRY",
            Symbol::Bell => "BELL",
            Symbol::Grape => "GRAPE",
            Symbol::Blank => "BLANK",
        }
    }

    /// Parse a display label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
