//! Paytable and win calculation

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Number of reels on the machine
pub const REEL_COUNT: usize = 3;

/// Outcome pattern a rule pays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPattern {
    /// Exact symbols on every reel, positionally
    Triple([Symbol; REEL_COUNT]),
    /// Symbol on reel 0, other reels ignored
    Leading(Symbol),
}

impl PayPattern {
    /// Three of the same symbol
    pub fn three_of(symbol: Symbol) -> Self {
        Self::Triple([symbol; REEL_COUNT])
    }

    /// Does the settled outcome match?
    pub fn matches(&self, settled: &[Symbol; REEL_COUNT]) -> bool {
        match self {
            PayPattern::Triple(pattern) => pattern == settled,
            PayPattern::Leading(symbol) => settled[0] == *symbol,
        }
    }
}

/// A single pay rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRule {
    pub pattern: PayPattern,
    /// Coins awarded
    pub payout: u64,
}

impl PayRule {
    pub fn new(pattern: PayPattern, payout: u64) -> Self {
        Self { pattern, payout }
    }
}

/// Matched rule for a settled outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinMatch {
    pub rule: PayRule,
    /// Index of the rule in declaration order
    pub rule_index: usize,
}

/// Complete paytable
///
/// Rules keep their declaration order. Triple rules are always tried before
/// leading-symbol rules, and within each group the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayTable {
    rules: Vec<PayRule>,
}

impl PayTable {
    pub fn new(rules: Vec<PayRule>) -> Self {
        Self { rules }
    }

    /// The machine's standard table
    pub fn standard() -> Self {
        Self::new(vec![
            PayRule::new(PayPattern::three_of(Symbol::SevenBar), 100),
            PayRule::new(PayPattern::three_of(Symbol::Bar), 50),
            PayRule::new(PayPattern::Leading(Symbol::Cherry), 3),
            PayRule::new(PayPattern::three_of(Symbol::Bell), 10),
            PayRule::new(PayPattern::three_of(Symbol::Grape), 5),
        ])
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[PayRule] {
        &self.rules
    }

    /// Find the paying rule for a settled outcome
    pub fn find_match(&self, settled: &[Symbol; REEL_COUNT]) -> Option<WinMatch> {
        let triples = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, r)| matches!(r.pattern, PayPattern::Triple(_)));
        let leading = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, r)| matches!(r.pattern, PayPattern::Leading(_)));

        triples
            .chain(leading)
            .find(|(_, rule)| rule.pattern.matches(settled))
            .map(|(rule_index, rule)| WinMatch {
                rule: *rule,
                rule_index,
            })
    }

    /// Coins won by a settled outcome
    pub fn evaluate(&self, settled: &[Symbol; REEL_COUNT]) -> u64 {
        self.find_match(settled).map(|m| m.rule.payout).unwrap_or(0)
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Evaluate an outcome against the standard table
pub fn evaluate(settled: [Symbol; REEL_COUNT]) -> u64 {
    PayTable::standard().evaluate(&settled)
}
