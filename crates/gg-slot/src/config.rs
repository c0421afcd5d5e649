//! Slot machine configuration

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::paytable::{PayTable, REEL_COUNT};
use crate::prizes::{Prize, standard_prizes};
use crate::symbols::Symbol;
use crate::timing::TimingConfig;

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Coins taken by one insert
    pub play_cost: u64,
    /// Chance of arming the bonus on a lever pull
    pub bonus_probability: f64,
    /// Reel whose stop is forced while the bonus is armed
    pub bonus_reel: usize,
    /// Symbol forced on the bonus reel
    pub bonus_symbol: Symbol,
    /// Serial key = amount × multiplier
    pub key_multiplier: u64,
    /// Timer intervals
    pub timing: TimingConfig,
    /// Pay rules in declaration order
    pub paytable: PayTable,
    /// Prize catalog
    pub prizes: Vec<Prize>,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            play_cost: 3,
            bonus_probability: 0.05,
            bonus_reel: 2,
            bonus_symbol: Symbol::SevenBar,
            key_multiplier: 3,
            timing: TimingConfig::default(),
            paytable: PayTable::standard(),
            prizes: standard_prizes(),
        }
    }
}

impl SlotConfig {
    /// Parse and validate JSON
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Check ranges and catalog consistency
    pub fn validate(&self) -> ConfigResult<()> {
        if self.play_cost == 0 {
            return Err(ConfigError::Validation("play_cost must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.bonus_probability) {
            return Err(ConfigError::Validation(format!(
                "bonus_probability out of range: {}",
                self.bonus_probability
            )));
        }
        if self.bonus_reel >= REEL_COUNT {
            return Err(ConfigError::Validation(format!(
                "bonus_reel out of range: {}",
                self.bonus_reel
            )));
        }
        if self.key_multiplier == 0 {
            return Err(ConfigError::Validation("key_multiplier must be positive".into()));
        }
        if self.timing.spin_tick_ms == 0 {
            return Err(ConfigError::Validation("spin_tick_ms must be positive".into()));
        }

        let mut ids = HashSet::new();
        for prize in &self.prizes {
            if !ids.insert(prize.id) {
                return Err(ConfigError::Validation(format!("duplicate prize id {}", prize.id)));
            }
            if prize.cost == 0 {
                return Err(ConfigError::Validation(format!(
                    "prize {} must cost at least one coin",
                    prize.id
                )));
            }
        }

        if self.paytable.rules().iter().any(|r| r.payout == 0) {
            log::warn!("Paytable contains zero-payout rules");
        }

        Ok(())
    }
}
