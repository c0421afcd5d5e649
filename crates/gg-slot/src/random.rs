//! Random sources
//!
//! The session draws final reel symbols and the bonus trial through
//! `RandomSource`, so tests can script outcomes.

use std::collections::VecDeque;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::symbols::Symbol;

/// Source of outcome randomness
pub trait RandomSource {
    /// One uniform draw from the symbol set
    fn symbol(&mut self) -> Symbol;

    /// Bernoulli trial, true with `probability`
    fn chance(&mut self, probability: f64) -> bool;
}

/// `rand`-backed source
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl RngSource<ChaCha8Rng> {
    /// Seeded from the OS
    pub fn from_os_rng() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn symbol(&mut self) -> Symbol {
        Symbol::from_index(self.rng.random_range(0..Symbol::COUNT))
    }

    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }
}

/// Scripted source for replays and tests
///
/// Symbols and bonus answers are consumed in order; once a queue runs dry
/// the fallback symbol (or `false`) is returned.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    symbols: VecDeque<Symbol>,
    bonus: VecDeque<bool>,
    fallback: Symbol,
}

impl ScriptedSource {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
            bonus: VecDeque::new(),
            fallback: Symbol::Blank,
        }
    }

    /// Queue answers for the bonus trial
    pub fn with_bonus(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.bonus.extend(answers);
        self
    }

    /// Symbol returned when the queue is empty
    pub fn with_fallback(mut self, symbol: Symbol) -> Self {
        self.fallback = symbol;
        self
    }

    /// Symbols not yet drawn
    pub fn remaining(&self) -> usize {
        self.symbols.len()
    }
}

impl RandomSource for ScriptedSource {
    fn symbol(&mut self) -> Symbol {
        self.symbols.pop_front().unwrap_or(self.fallback)
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.bonus.pop_front().unwrap_or(false)
    }
}
