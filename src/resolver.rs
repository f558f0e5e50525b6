//! Stat resolver module.
//!
//! Provides the `StatResolver` type, which is the main entry point for stat
//! resolution. Resolution is a pure function of the character snapshot:
//!
//! 1. Accumulates modifiers per attribute, core stat and pool
//! 2. Computes encumbrance penalties from the inventory
//! 3. Evaluates the health state from hit points and the wound threshold
//! 4. Resolves attribute currents, applying wound or death overrides
//! 5. Resolves pools, core stats and unarmed attacks from the currents
//!
//! The stages follow [`StatGraph::character_sheet`]: everything the health
//! state needs is computed from maxima only, so every stage reads values
//! resolved in the same pass.

use crate::accumulator::{accumulate, Accumulated};
use crate::character::{ActorKind, CharacterBaseState};
use crate::config::ResolverConfig;
use crate::error::StatError;
use crate::graph::{StatGraph, StatNode};
use crate::health::HealthState;
use crate::numeric::{ceil_div, floor_div, nested_floor_div, overweight_penalty};
use crate::resolved::{CoreStats, ResolvedAttribute, ResolvedCharacter, ResolvedCoreStat, ResolvedPool};
use crate::stat_id::{Attribute, CoreStat, DerivedStat, StatTarget};
use std::collections::BTreeMap;

/// The derived-stat resolver.
///
/// Immutable after construction; share it freely between threads.
///
/// # Examples
///
/// ```rust
/// use sheetstat::{Attribute, CharacterBaseState, CoreStat, DerivedStat, StatResolver};
///
/// let character = CharacterBaseState::new()
///     .with_attribute(Attribute::Body, 6)
///     .with_attribute(Attribute::Will, 8)
///     .with_hp_value(35);
///
/// let resolved = StatResolver::new().resolve(&character).unwrap();
/// assert_eq!(resolved.base, 7);
/// assert_eq!(resolved.pool_max(DerivedStat::Hp), 35);
/// assert_eq!(resolved.core.max(CoreStat::WoundThreshold), 7);
/// ```
#[derive(Debug, Clone)]
pub struct StatResolver {
    config: ResolverConfig,
    graph: StatGraph,
}

/// Modifier totals of one character, folded once per resolution.
struct Modifiers {
    attributes: BTreeMap<Attribute, Accumulated>,
    core: BTreeMap<CoreStat, Accumulated>,
    derived: BTreeMap<DerivedStat, Accumulated>,
}

impl Modifiers {
    fn collect(character: &CharacterBaseState) -> Self {
        let effects = &character.effects;
        Self {
            attributes: Attribute::ALL
                .into_iter()
                .map(|a| (a, accumulate(&character.stat(a).modifiers, effects, a)))
                .collect(),
            core: CoreStat::ALL
                .into_iter()
                .map(|c| {
                    let target = StatTarget::Core(c);
                    (c, accumulate(&character.core(c).modifiers, effects, target))
                })
                .collect(),
            derived: DerivedStat::ALL
                .into_iter()
                .map(|d| {
                    let target = StatTarget::Derived(d);
                    (d, accumulate(&character.pool(d).modifiers, effects, target))
                })
                .collect(),
        }
    }

    fn attribute(&self, attribute: Attribute) -> Accumulated {
        self.attributes.get(&attribute).cloned().unwrap_or_default()
    }

    fn core(&self, stat: CoreStat) -> Accumulated {
        self.core.get(&stat).cloned().unwrap_or_default()
    }

    fn derived(&self, stat: DerivedStat) -> Accumulated {
        self.derived.get(&stat).cloned().unwrap_or_default()
    }
}

impl StatResolver {
    /// Create a resolver with the core-book rule constants.
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
            graph: StatGraph::character_sheet(),
        }
    }

    /// Create a resolver with house rules.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::{ResolverConfig, StatResolver};
    ///
    /// let config = ResolverConfig { wounded_divisor: 0, ..ResolverConfig::default() };
    /// assert!(StatResolver::with_config(config).is_err());
    /// ```
    pub fn with_config(config: ResolverConfig) -> Result<Self, StatError> {
        config.validate()?;
        Ok(Self {
            config,
            graph: StatGraph::character_sheet(),
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn graph(&self) -> &StatGraph {
        &self.graph
    }

    /// Every value that can change when `node` changes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::graph::StatNode;
    /// use sheetstat::{Attribute, CoreStat, StatResolver};
    ///
    /// let resolver = StatResolver::new();
    /// let affected = resolver.affected_by(StatNode::AttributeMax(Attribute::Spd));
    /// assert!(affected.contains(&StatNode::Core(CoreStat::Leap)));
    /// assert!(!affected.contains(&StatNode::MeleeBonus));
    /// ```
    pub fn affected_by(&self, node: StatNode) -> Vec<StatNode> {
        self.graph.affected_by(node)
    }

    /// Order in which resolution evaluates values, dependencies first.
    pub fn resolution_order(&self) -> Result<Vec<StatNode>, StatError> {
        self.graph.topological_sort()
    }

    /// Resolve every derived value of a character.
    ///
    /// Returns `None` for loot actors, which carry no stats.
    pub fn resolve(&self, character: &CharacterBaseState) -> Option<ResolvedCharacter> {
        if character.kind == ActorKind::Loot {
            tracing::debug!("loot actor has nothing to resolve");
            return None;
        }

        let span = tracing::debug_span!("resolve", kind = ?character.kind);
        let _enter = span.enter();

        let config = &self.config;
        let mods = Modifiers::collect(character);

        // Encumbrance, from maxima and inventory only.
        let body_mods = mods.attribute(Attribute::Body);
        let enc_mods = mods.core(CoreStat::Enc);
        let body_max = character.stat(Attribute::Body).max;
        let carry_capacity = floor_div(body_max.saturating_add(body_mods.additive), body_mods.divisor)
            .saturating_mul(config.carry_per_body)
            .saturating_add(enc_mods.additive);
        let total_weight = character
            .inventory
            .total_weight(config.currency_weight_per_piece);
        let overweight = overweight_penalty(total_weight, carry_capacity, config.overweight_step);
        let armor_penalty = character.inventory.armor_encumbrance();

        // The wound threshold reads maxima only, so the health state is
        // known before any current.
        let base_max = floor_div(
            body_max.saturating_add(character.stat(Attribute::Will).max),
            2,
        );
        let wt_mods = mods.core(CoreStat::WoundThreshold);
        let wound_threshold = wt_mods.resolve(base_max);
        let health = HealthState::evaluate(character.hp_value(), wound_threshold);

        let attributes: BTreeMap<Attribute, ResolvedAttribute> = Attribute::ALL
            .into_iter()
            .map(|attribute| {
                let penalty = match attribute {
                    Attribute::Ref | Attribute::Dex => armor_penalty.saturating_add(overweight),
                    Attribute::Spd => overweight,
                    _ => 0,
                };
                let resolved = self.resolve_attribute(character, &mods, attribute, penalty, health);
                tracing::trace!(
                    %attribute,
                    current = resolved.current,
                    additive = resolved.modifiers.additive,
                    divisor = resolved.modifiers.divisor,
                    penalty,
                    "attribute resolved"
                );
                (attribute, resolved)
            })
            .collect();
        let current = |a: Attribute| attributes.get(&a).map_or(0, |r| r.current);

        let body = current(Attribute::Body);
        let will = current(Attribute::Will);
        let int = current(Attribute::Int);
        let spd = current(Attribute::Spd);
        let base = floor_div(body.saturating_add(will), 2);

        let derived = DerivedStat::ALL
            .into_iter()
            .map(|stat| {
                let modifiers = mods.derived(stat);
                let max = if character.custom_stat {
                    character.pool(stat).max
                } else {
                    let mind = floor_div(will.saturating_add(int), 2);
                    match stat {
                        DerivedStat::Hp | DerivedStat::Sta => modifiers.resolve(base.saturating_mul(5)),
                        DerivedStat::Resolve => mind.saturating_mul(5).saturating_add(modifiers.additive),
                        DerivedStat::Focus => mind.saturating_mul(3).saturating_add(modifiers.additive),
                    }
                };
                (stat, ResolvedPool { max, modifiers })
            })
            .collect();

        let integral = |stat: CoreStat, input: i32, max: i32| {
            let modifiers = mods.core(stat);
            ResolvedCoreStat {
                current: modifiers.resolve(input),
                max,
                modifiers,
            }
        };
        let stun_base = base.clamp(config.stun_min, config.stun_max);
        let leap_mods = mods.core(CoreStat::Leap);
        let leap_floor = floor_div(spd.saturating_mul(3), 5).saturating_add(leap_mods.additive);
        let core = CoreStats {
            stun: integral(
                CoreStat::Stun,
                stun_base,
                base_max.clamp(config.stun_min, config.stun_max),
            ),
            run: integral(CoreStat::Run, spd.saturating_mul(3), spd.saturating_mul(3)),
            leap: ResolvedCoreStat {
                current: f64::from(leap_floor) / f64::from(leap_mods.divisor),
                max: floor_div(character.stat(Attribute::Spd).max.saturating_mul(3), 5),
                modifiers: leap_mods,
            },
            enc: integral(
                CoreStat::Enc,
                body.saturating_mul(config.carry_per_body),
                body.saturating_mul(config.carry_per_body),
            ),
            rec: integral(CoreStat::Rec, base, base_max),
            wound_threshold: ResolvedCoreStat {
                current: wound_threshold,
                max: base_max,
                modifiers: wt_mods,
            },
        };

        let melee_bonus = ceil_div(body.saturating_sub(6), 2).saturating_mul(2);

        Some(ResolvedCharacter {
            attributes,
            derived,
            hp_unmodified_max: base_max.saturating_mul(5),
            core,
            base,
            base_max,
            carry_capacity,
            total_weight,
            overweight_penalty: overweight,
            armor_penalty,
            health,
            melee_bonus,
            punch: format!("1d6+{melee_bonus}"),
            kick: format!("1d6+{}", melee_bonus.saturating_add(4)),
        })
    }

    fn resolve_attribute(
        &self,
        character: &CharacterBaseState,
        mods: &Modifiers,
        attribute: Attribute,
        penalty: i32,
        health: HealthState,
    ) -> ResolvedAttribute {
        let max = character.stat(attribute).max;
        let modifiers = mods.attribute(attribute);
        let raw = max
            .saturating_add(modifiers.additive)
            .saturating_sub(penalty);

        let current = match health {
            HealthState::Dead => {
                let divisor = if self.config.legacy_dead_divisor_swap {
                    match attribute {
                        Attribute::Ref => mods.attribute(Attribute::Dex).divisor,
                        Attribute::Dex => mods.attribute(Attribute::Ref).divisor,
                        _ => modifiers.divisor,
                    }
                } else {
                    modifiers.divisor
                };
                nested_floor_div(raw, self.config.dead_divisor, divisor)
            }
            HealthState::Wounded
                if matches!(
                    attribute,
                    Attribute::Ref | Attribute::Dex | Attribute::Int | Attribute::Will
                ) =>
            {
                nested_floor_div(raw, self.config.wounded_divisor, modifiers.divisor)
            }
            _ => floor_div(raw, modifiers.divisor),
        };

        ResolvedAttribute {
            current,
            max,
            penalty,
            modifiers,
        }
    }
}

impl Default for StatResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Inventory, Item};
    use crate::modifier::{ActiveEffect, StaticModifier};

    fn body_will(body: i32, will: i32) -> CharacterBaseState {
        CharacterBaseState::new()
            .with_attribute(Attribute::Body, body)
            .with_attribute(Attribute::Will, will)
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StatResolver>();
    }

    #[test]
    fn test_loot_resolves_to_none() {
        let loot = body_will(6, 8).with_kind(ActorKind::Loot);
        assert!(StatResolver::new().resolve(&loot).is_none());
    }

    #[test]
    fn test_monster_resolves() {
        let monster = body_will(6, 8).with_kind(ActorKind::Monster).with_hp_value(30);
        let resolved = StatResolver::new().resolve(&monster).unwrap();
        assert_eq!(resolved.base, 7);
    }

    #[test]
    fn test_carry_capacity_uses_body_modifiers() {
        let character = body_will(6, 6)
            .with_hp_value(30)
            .with_attribute_modifier(Attribute::Body, StaticModifier::new("Mutagen", 2))
            .with_core_modifier(CoreStat::Enc, StaticModifier::new("Pack", 5))
            .with_effect(ActiveEffect::new("Feeble").with_attribute(Attribute::Body, "/2"));
        let resolved = StatResolver::new().resolve(&character).unwrap();
        // floor((6 + 2) / 2) * 10 + 5
        assert_eq!(resolved.carry_capacity, 45);
    }

    #[test]
    fn test_wounded_leaves_body_alone() {
        let character = body_will(6, 8)
            .with_attribute(Attribute::Ref, 9)
            .with_attribute(Attribute::Emp, 5)
            .with_hp_value(3);
        let resolved = StatResolver::new().resolve(&character).unwrap();

        assert_eq!(resolved.health, HealthState::Wounded);
        assert_eq!(resolved.current(Attribute::Ref), 4);
        assert_eq!(resolved.current(Attribute::Will), 4);
        assert_eq!(resolved.current(Attribute::Body), 6);
        assert_eq!(resolved.current(Attribute::Emp), 5);
        // base follows the overridden will: floor((6 + 4) / 2)
        assert_eq!(resolved.base, 5);
    }

    #[test]
    fn test_leap_is_fractional() {
        let character = body_will(6, 6)
            .with_attribute(Attribute::Spd, 6)
            .with_hp_value(30)
            .with_core_modifier(CoreStat::Leap, StaticModifier::new("Springs", 2))
            .with_effect(ActiveEffect::new("Heavy boots").with_stat(CoreStat::Leap, "/2"));
        let resolved = StatResolver::new().resolve(&character).unwrap();
        // floor(18 / 5) + 2 = 5, then / 2
        assert_eq!(resolved.core.leap.current, 2.5);
        assert_eq!(resolved.core.leap.max, 3);
    }

    #[test]
    fn test_melee_bonus_and_unarmed() {
        let strong = body_will(10, 5).with_hp_value(30);
        let resolved = StatResolver::new().resolve(&strong).unwrap();
        assert_eq!(resolved.melee_bonus, 4);
        assert_eq!(resolved.punch, "1d6+4");
        assert_eq!(resolved.kick, "1d6+8");

        let frail = body_will(3, 5).with_hp_value(30);
        let resolved = StatResolver::new().resolve(&frail).unwrap();
        // ceil(-3 / 2) * 2
        assert_eq!(resolved.melee_bonus, -2);
        assert_eq!(resolved.kick, "1d6+2");
    }

    #[test]
    fn test_overweight_penalizes_ref_dex_spd() {
        let character = body_will(4, 4)
            .with_attribute(Attribute::Ref, 8)
            .with_attribute(Attribute::Dex, 8)
            .with_attribute(Attribute::Spd, 8)
            .with_attribute(Attribute::Int, 8)
            .with_hp_value(20)
            .with_inventory(Inventory {
                items: vec![Item::new("Anvil", 51.0, 1.0)],
                ..Inventory::default()
            });
        let resolved = StatResolver::new().resolve(&character).unwrap();

        // capacity 40, 11 over -> 3 points
        assert_eq!(resolved.overweight_penalty, 3);
        assert_eq!(resolved.current(Attribute::Ref), 5);
        assert_eq!(resolved.current(Attribute::Dex), 5);
        assert_eq!(resolved.current(Attribute::Spd), 5);
        assert_eq!(resolved.current(Attribute::Int), 8);
    }

    #[test]
    fn test_extreme_maxima_saturate() {
        // (every attribute and modifier, hp, melee bonus)
        for (extreme, hp, bonus) in [(i32::MIN, 1, i32::MIN), (i32::MAX, i32::MAX, i32::MAX - 5)] {
            let mut character = CharacterBaseState::new()
                .with_hp_value(hp)
                .with_attribute_modifier(Attribute::Body, StaticModifier::new("Giant", extreme))
                .with_effect(ActiveEffect::new("Surge").with_stat(CoreStat::Leap, &extreme.to_string()))
                .with_inventory(Inventory {
                    items: vec![Item::armor("Plate", 1.0, extreme), Item::armor("Plate", 1.0, extreme)],
                    ..Inventory::default()
                });
            for attribute in Attribute::ALL {
                character = character.with_attribute(attribute, extreme);
            }
            let resolved = StatResolver::new().resolve(&character).unwrap();

            assert_eq!(resolved.health, HealthState::Normal);
            assert_eq!(resolved.melee_bonus, bonus);
            assert_eq!(resolved.punch, format!("1d6+{bonus}"));
            assert_eq!(resolved.kick, format!("1d6+{}", bonus.saturating_add(4)));
        }
    }

    #[test]
    fn test_stun_clamped() {
        let giant = body_will(14, 14).with_hp_value(70);
        let resolved = StatResolver::new().resolve(&giant).unwrap();
        assert_eq!(resolved.core.stun.current, 10);
        assert_eq!(resolved.core.stun.max, 10);

        let house = ResolverConfig {
            stun_max: 12,
            ..ResolverConfig::default()
        };
        let resolved = StatResolver::with_config(house).unwrap().resolve(&giant).unwrap();
        assert_eq!(resolved.core.stun.current, 12);
    }
}
