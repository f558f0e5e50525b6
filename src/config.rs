//! Resolver configuration.
//!
//! Rule constants that the core book fixes but tables sometimes house-rule.
//! Every field has a default, so a TOML file only needs the values it
//! changes.

use crate::error::StatError;
use crate::stat_id::Skill;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable rule constants for [`StatResolver`](crate::StatResolver).
///
/// # Examples
///
/// ```rust
/// use sheetstat::ResolverConfig;
///
/// let config = ResolverConfig::from_toml_str("overweight_step = 4").unwrap();
/// assert_eq!(config.overweight_step, 4);
/// assert_eq!(config.base_die, "1d10");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Die expression every skill check starts from.
    pub base_die: String,
    /// Weight of a single coin of any denomination.
    pub currency_weight_per_piece: f64,
    /// Carry capacity granted per point of body.
    pub carry_per_body: i32,
    /// Weight over capacity that costs one point of ref/dex/spd.
    pub overweight_step: i32,
    /// Lower bound of the stun base.
    pub stun_min: i32,
    /// Upper bound of the stun base.
    pub stun_max: i32,
    /// Extra divisor applied to every attribute at zero hit points.
    pub dead_divisor: i32,
    /// Extra divisor applied to ref, dex, int and will below the wound threshold.
    pub wounded_divisor: i32,
    /// Reproduce the legacy sheet, which divides ref by dex's divisor and
    /// dex by ref's divisor in the death state.
    pub legacy_dead_divisor_swap: bool,
    /// Skills penalized by worn armor encumbrance.
    pub armor_penalized_skills: Vec<Skill>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            base_die: "1d10".to_string(),
            currency_weight_per_piece: 0.001,
            carry_per_body: 10,
            overweight_step: 5,
            stun_min: 1,
            stun_max: 10,
            dead_divisor: 3,
            wounded_divisor: 2,
            legacy_dead_divisor_swap: false,
            armor_penalized_skills: vec![Skill::HexWeave, Skill::RitualCraft, Skill::SpellCast],
        }
    }
}

impl ResolverConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, StatError> {
        let config: ResolverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, StatError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values the formulas cannot work with.
    pub fn validate(&self) -> Result<(), StatError> {
        let positive = [
            ("carry_per_body", self.carry_per_body),
            ("overweight_step", self.overweight_step),
            ("dead_divisor", self.dead_divisor),
            ("wounded_divisor", self.wounded_divisor),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(StatError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.stun_min > self.stun_max {
            return Err(StatError::InvalidConfig(format!(
                "stun_min ({}) exceeds stun_max ({})",
                self.stun_min, self.stun_max
            )));
        }
        if !self.currency_weight_per_piece.is_finite() || self.currency_weight_per_piece < 0.0 {
            return Err(StatError::InvalidConfig(
                "currency_weight_per_piece must be a non-negative number".to_string(),
            ));
        }
        if self.base_die.trim().is_empty() {
            return Err(StatError::InvalidConfig("base_die is empty".to_string()));
        }
        Ok(())
    }
}
