//! Resolved character output.
//!
//! `ResolvedCharacter` is the complete result of one resolution, together
//! with the per-stat modifier breakdowns that produced it. Hosts persist it
//! through [`ResolvedCharacter::to_update`], a flat map of dotted document
//! paths to new values.

use crate::accumulator::Accumulated;
use crate::health::HealthState;
use crate::stat_id::{Attribute, CoreStat, DerivedStat};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A resolved primary attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAttribute {
    pub current: i32,
    pub max: i32,
    /// Encumbrance penalty subtracted before division.
    pub penalty: i32,
    pub modifiers: Accumulated,
}

/// A resolved hp/sta/resolve/focus maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPool {
    pub max: i32,
    pub modifiers: Accumulated,
}

/// A resolved core stat. Leap is the only fractional one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCoreStat<T = i32> {
    pub current: T,
    pub max: i32,
    pub modifiers: Accumulated,
}

/// The six core stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreStats {
    pub stun: ResolvedCoreStat,
    pub run: ResolvedCoreStat,
    pub leap: ResolvedCoreStat<f64>,
    pub enc: ResolvedCoreStat,
    pub rec: ResolvedCoreStat,
    pub wound_threshold: ResolvedCoreStat,
}

impl CoreStats {
    /// Current value of any core stat, widened to `f64`.
    pub fn current(&self, stat: CoreStat) -> f64 {
        match stat {
            CoreStat::Leap => self.leap.current,
            other => f64::from(self.integral(other).map_or(0, |s| s.current)),
        }
    }

    pub fn max(&self, stat: CoreStat) -> i32 {
        match stat {
            CoreStat::Leap => self.leap.max,
            other => self.integral(other).map_or(0, |s| s.max),
        }
    }

    pub fn modifiers(&self, stat: CoreStat) -> Option<&Accumulated> {
        match stat {
            CoreStat::Leap => Some(&self.leap.modifiers),
            other => self.integral(other).map(|s| &s.modifiers),
        }
    }

    fn integral(&self, stat: CoreStat) -> Option<&ResolvedCoreStat> {
        match stat {
            CoreStat::Stun => Some(&self.stun),
            CoreStat::Run => Some(&self.run),
            CoreStat::Enc => Some(&self.enc),
            CoreStat::Rec => Some(&self.rec),
            CoreStat::WoundThreshold => Some(&self.wound_threshold),
            CoreStat::Leap => None,
        }
    }
}

/// Everything the resolver computes for one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCharacter {
    pub attributes: BTreeMap<Attribute, ResolvedAttribute>,
    pub derived: BTreeMap<DerivedStat, ResolvedPool>,
    /// `baseMax × 5`, whatever modifiers or pinned maxima say.
    pub hp_unmodified_max: i32,
    pub core: CoreStats,
    pub base: i32,
    pub base_max: i32,
    pub carry_capacity: i32,
    pub total_weight: f64,
    pub overweight_penalty: i32,
    pub armor_penalty: i32,
    pub health: HealthState,
    pub melee_bonus: i32,
    pub punch: String,
    pub kick: String,
}

impl ResolvedCharacter {
    pub fn attribute(&self, attribute: Attribute) -> Option<&ResolvedAttribute> {
        self.attributes.get(&attribute)
    }

    /// Resolved `current` of an attribute.
    pub fn current(&self, attribute: Attribute) -> i32 {
        self.attribute(attribute).map_or(0, |a| a.current)
    }

    pub fn pool_max(&self, stat: DerivedStat) -> i32 {
        self.derived.get(&stat).map_or(0, |p| p.max)
    }

    pub fn death_state_applied(&self) -> bool {
        self.health.is_dead()
    }

    pub fn wound_threshold_applied(&self) -> bool {
        self.health.is_wounded()
    }

    /// Render the host update document: dotted paths to new values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::{Attribute, CharacterBaseState, StatResolver};
    /// use serde_json::json;
    ///
    /// let character = CharacterBaseState::new()
    ///     .with_attribute(Attribute::Body, 6)
    ///     .with_attribute(Attribute::Will, 8)
    ///     .with_hp_value(35);
    /// let resolved = StatResolver::new().resolve(&character).unwrap();
    /// let update = resolved.to_update();
    ///
    /// assert_eq!(update["system.derivedStats.hp.max"], json!(35));
    /// assert_eq!(update["system.attackStats.punch.value"], json!("1d6+0"));
    /// assert_eq!(update["system.deathStateApplied"], json!(false));
    /// ```
    pub fn to_update(&self) -> Map<String, Value> {
        let mut update = Map::new();
        let mut set = |path: String, value: Value| {
            update.insert(path, value);
        };

        set("system.deathStateApplied".into(), self.death_state_applied().into());
        set(
            "system.woundThresholdApplied".into(),
            self.wound_threshold_applied().into(),
        );

        for attribute in Attribute::ALL {
            set(
                format!("system.stats.{attribute}.current"),
                self.current(attribute).into(),
            );
        }

        for stat in DerivedStat::ALL {
            set(
                format!("system.derivedStats.{stat}.max"),
                self.pool_max(stat).into(),
            );
        }
        set(
            "system.derivedStats.hp.unmodifiedMax".into(),
            self.hp_unmodified_max.into(),
        );

        for stat in CoreStat::ALL {
            let current = match stat {
                CoreStat::Leap => Value::from(self.core.leap.current),
                // integral stats stay JSON integers
                other => Value::from(self.core.current(other) as i64),
            };
            set(format!("system.coreStats.{stat}.current"), current);
            set(
                format!("system.coreStats.{stat}.max"),
                self.core.max(stat).into(),
            );
        }

        set("system.attackStats.meleeBonus".into(), self.melee_bonus.into());
        set(
            "system.attackStats.punch.value".into(),
            self.punch.clone().into(),
        );
        set("system.attackStats.kick.value".into(), self.kick.clone().into());

        update
    }

    /// Paths whose value differs between `previous` and `self`, sorted.
    pub fn changed_paths(&self, previous: &ResolvedCharacter) -> Vec<String> {
        let before = previous.to_update();
        let mut changed: Vec<String> = self
            .to_update()
            .into_iter()
            .filter(|(path, value)| before.get(path) != Some(value))
            .map(|(path, _)| path)
            .collect();
        changed.sort();
        changed
    }
}
