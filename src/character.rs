//! Character input model.
//!
//! `CharacterBaseState` is an immutable snapshot of everything the
//! resolver reads: attribute maxima, modifier lists, active effects,
//! inventory, remaining hit points and a few sheet flags. Fields the
//! resolver writes (attribute `current`, stat maxima) are outputs and do
//! not appear here, except where the sheet lets players pin them
//! (`customStat`).

use crate::inventory::Inventory;
use crate::modifier::{ActiveEffect, StaticModifier};
use crate::stat_id::{Attribute, CoreStat, DerivedStat, Skill};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A primary attribute as the player assigned it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryStat {
    pub max: i32,
    pub modifiers: Vec<StaticModifier>,
}

/// A resource pool (hp, sta, resolve, focus).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolStat {
    /// Only read when the sheet pins maxima with `customStat`.
    pub max: i32,
    /// Remaining amount, spent and restored by play.
    pub value: i32,
    pub modifiers: Vec<StaticModifier>,
}

/// Modifier list of a core stat.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreStatInput {
    pub modifiers: Vec<StaticModifier>,
}

/// A trained skill.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillValue {
    pub value: i32,
    pub modifiers: Vec<StaticModifier>,
}

/// Kind of actor document. Loot containers have no stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    #[default]
    Character,
    Monster,
    Loot,
}

/// How society regards the character. Only player characters have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SocialStanding {
    Tolerated,
    Hated,
    Feared,
    ToleratedFeared,
    HatedFeared,
    #[default]
    #[serde(other)]
    Equal,
}

impl SocialStanding {
    pub fn is_tolerated(self) -> bool {
        matches!(self, SocialStanding::Tolerated | SocialStanding::ToleratedFeared)
    }

    pub fn is_hated(self) -> bool {
        matches!(self, SocialStanding::Hated | SocialStanding::HatedFeared)
    }

    pub fn is_feared(self) -> bool {
        matches!(
            self,
            SocialStanding::Feared | SocialStanding::ToleratedFeared | SocialStanding::HatedFeared
        )
    }
}

static EMPTY_PRIMARY: PrimaryStat = PrimaryStat {
    max: 0,
    modifiers: Vec::new(),
};
static EMPTY_POOL: PoolStat = PoolStat {
    max: 0,
    value: 0,
    modifiers: Vec::new(),
};
static EMPTY_CORE: CoreStatInput = CoreStatInput {
    modifiers: Vec::new(),
};

/// Snapshot of a character, as read from the host document.
///
/// Missing attributes, pools, core stats and skills read as zero with no
/// modifiers.
///
/// # Examples
///
/// ```rust
/// use sheetstat::{Attribute, CharacterBaseState};
///
/// let character = CharacterBaseState::new()
///     .with_attribute(Attribute::Body, 6)
///     .with_attribute(Attribute::Will, 8)
///     .with_hp_value(35);
/// assert_eq!(character.stat(Attribute::Body).max, 6);
/// assert_eq!(character.stat(Attribute::Luck).max, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterBaseState {
    #[serde(rename = "type")]
    pub kind: ActorKind,
    pub stats: BTreeMap<Attribute, PrimaryStat>,
    pub derived_stats: BTreeMap<DerivedStat, PoolStat>,
    pub core_stats: BTreeMap<CoreStat, CoreStatInput>,
    pub skills: BTreeMap<Skill, SkillValue>,
    /// Players pinned hp/sta/resolve/focus maxima by hand.
    pub custom_stat: bool,
    pub social_standing: SocialStanding,
    pub effects: Vec<ActiveEffect>,
    pub inventory: Inventory,
}

impl CharacterBaseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stat(&self, attribute: Attribute) -> &PrimaryStat {
        self.stats.get(&attribute).unwrap_or(&EMPTY_PRIMARY)
    }

    pub fn pool(&self, stat: DerivedStat) -> &PoolStat {
        self.derived_stats.get(&stat).unwrap_or(&EMPTY_POOL)
    }

    pub fn core(&self, stat: CoreStat) -> &CoreStatInput {
        self.core_stats.get(&stat).unwrap_or(&EMPTY_CORE)
    }

    pub fn skill(&self, skill: Skill) -> Option<&SkillValue> {
        self.skills.get(&skill)
    }

    /// Remaining hit points.
    pub fn hp_value(&self) -> i32 {
        self.pool(DerivedStat::Hp).value
    }

    pub fn with_kind(mut self, kind: ActorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute, max: i32) -> Self {
        self.stats.entry(attribute).or_default().max = max;
        self
    }

    pub fn with_attribute_modifier(mut self, attribute: Attribute, modifier: StaticModifier) -> Self {
        self.stats.entry(attribute).or_default().modifiers.push(modifier);
        self
    }

    pub fn with_core_modifier(mut self, stat: CoreStat, modifier: StaticModifier) -> Self {
        self.core_stats.entry(stat).or_default().modifiers.push(modifier);
        self
    }

    pub fn with_pool_modifier(mut self, stat: DerivedStat, modifier: StaticModifier) -> Self {
        self.derived_stats.entry(stat).or_default().modifiers.push(modifier);
        self
    }

    pub fn with_hp_value(mut self, value: i32) -> Self {
        self.derived_stats.entry(DerivedStat::Hp).or_default().value = value;
        self
    }

    /// Pin pool maxima, as a sheet with `customStat` does.
    pub fn with_custom_pools(mut self, hp: i32, sta: i32, resolve: i32, focus: i32) -> Self {
        self.custom_stat = true;
        for (stat, max) in [
            (DerivedStat::Hp, hp),
            (DerivedStat::Sta, sta),
            (DerivedStat::Resolve, resolve),
            (DerivedStat::Focus, focus),
        ] {
            self.derived_stats.entry(stat).or_default().max = max;
        }
        self
    }

    pub fn with_skill(mut self, skill: Skill, value: i32) -> Self {
        self.skills.entry(skill).or_default().value = value;
        self
    }

    pub fn with_social_standing(mut self, standing: SocialStanding) -> Self {
        self.social_standing = standing;
        self
    }

    pub fn with_effect(mut self, effect: ActiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entries_read_as_zero() {
        let character = CharacterBaseState::new();
        assert_eq!(character.stat(Attribute::Int).max, 0);
        assert_eq!(character.pool(DerivedStat::Focus).value, 0);
        assert!(character.core(CoreStat::Run).modifiers.is_empty());
        assert!(character.skill(Skill::Dodge).is_none());
    }

    #[test]
    fn test_deserialize_host_shape() {
        let character: CharacterBaseState = serde_json::from_str(
            r#"{
                "type": "character",
                "customStat": false,
                "socialStanding": "hatedFeared",
                "stats": {
                    "body": {"max": 6, "modifiers": [{"name": "Mutation", "value": "1"}]},
                    "will": {"max": 8}
                },
                "derivedStats": {"hp": {"value": 20, "max": 35}},
                "coreStats": {"woundThreshold": {"modifiers": [{"name": "Tough", "value": 1}]}},
                "skills": {"charisma": {"value": 4}},
                "inventory": {"currency": {"crown": 120}}
            }"#,
        )
        .unwrap();

        assert_eq!(character.kind, ActorKind::Character);
        assert_eq!(character.stat(Attribute::Body).modifiers[0].value, 1);
        assert_eq!(character.hp_value(), 20);
        assert_eq!(character.core(CoreStat::WoundThreshold).modifiers.len(), 1);
        assert_eq!(character.skill(Skill::Charisma).unwrap().value, 4);
        assert!(character.social_standing.is_hated());
        assert!(character.social_standing.is_feared());
        assert_eq!(character.inventory.currency.crown, 120);
    }

    #[test]
    fn test_unknown_standing_is_equal() {
        let standing: SocialStanding = serde_json::from_str("\"admired\"").unwrap();
        assert_eq!(standing, SocialStanding::Equal);
    }

    #[test]
    fn test_standing_round_trips_host_names() {
        assert_eq!(SocialStanding::default(), SocialStanding::Equal);
        assert_eq!(serde_json::to_string(&SocialStanding::Equal).unwrap(), "\"equal\"");
        let standing: SocialStanding = serde_json::from_str("\"toleratedFeared\"").unwrap();
        assert_eq!(standing, SocialStanding::ToleratedFeared);

        let character: CharacterBaseState = serde_json::from_str("{}").unwrap();
        assert_eq!(character.social_standing, SocialStanding::Equal);
    }
}
