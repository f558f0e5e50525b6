//! Modifier accumulation.
//!
//! Every attribute and stat folds its static modifiers and the matching
//! directives of all active effects into one additive total and one
//! divisor. Additive amounts sum; a divisor directive replaces the
//! current divisor, so the last one wins.

use crate::modifier::{ActiveEffect, EffectTargets, Modifier, StaticModifier};
use crate::numeric::floor_div;
use serde::{Deserialize, Serialize};

/// One named contribution to an accumulated total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub source: String,
    pub modifier: Modifier,
}

/// The folded modifiers of one attribute or stat.
///
/// # Examples
///
/// ```rust
/// use sheetstat::accumulator::Accumulated;
/// use sheetstat::Modifier;
///
/// let mut acc = Accumulated::default();
/// acc.apply("Potion", Modifier::Additive(2));
/// acc.apply("Curse", Modifier::Divisor(2));
/// assert_eq!(acc.additive, 2);
/// assert_eq!(acc.divisor, 2);
/// assert_eq!(acc.resolve(7), 4); // floor((7 + 2) / 2)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulated {
    pub additive: i32,
    pub divisor: i32,
    /// Contributions in application order.
    pub breakdown: Vec<Contribution>,
}

impl Default for Accumulated {
    fn default() -> Self {
        Self {
            additive: 0,
            divisor: 1,
            breakdown: Vec::new(),
        }
    }
}

impl Accumulated {
    /// Fold one modifier into the totals.
    pub fn apply(&mut self, source: impl Into<String>, modifier: Modifier) {
        match modifier {
            Modifier::Additive(v) => self.additive = self.additive.saturating_add(v),
            Modifier::Divisor(d) => self.divisor = d,
        }
        self.breakdown.push(Contribution {
            source: source.into(),
            modifier,
        });
    }

    /// `floor((base + additive) / divisor)`.
    pub fn resolve(&self, base: i32) -> i32 {
        floor_div(base.saturating_add(self.additive), self.divisor)
    }
}

/// Accumulate the modifiers aimed at `target`.
///
/// Static modifiers come first, then active effects in list order.
/// Inactive effects and unparseable directives contribute nothing.
///
/// # Examples
///
/// ```rust
/// use sheetstat::accumulator::accumulate;
/// use sheetstat::{ActiveEffect, Attribute, StaticModifier};
///
/// let statics = vec![StaticModifier::new("Training", 1)];
/// let effects = vec![
///     ActiveEffect::new("Haste").with_attribute(Attribute::Spd, "+2"),
///     ActiveEffect::new("Slow").with_attribute(Attribute::Spd, "/2"),
///     ActiveEffect::new("Stale").with_attribute(Attribute::Spd, "+9").inactive(),
/// ];
///
/// let acc = accumulate(&statics, &effects, Attribute::Spd);
/// assert_eq!(acc.additive, 3);
/// assert_eq!(acc.divisor, 2);
/// ```
pub fn accumulate<T>(statics: &[StaticModifier], effects: &[ActiveEffect], target: T) -> Accumulated
where
    T: PartialEq + Copy,
    ActiveEffect: EffectTargets<T>,
{
    let mut acc = Accumulated::default();

    for modifier in statics {
        acc.apply(modifier.name.as_str(), Modifier::Additive(modifier.value));
    }

    for effect in effects.iter().filter(|e| e.active) {
        let entries = EffectTargets::<T>::entries(effect);
        for entry in entries.iter().filter(|entry| entry.target == target) {
            if let Some(modifier) = entry.modifier {
                acc.apply(effect.name.as_str(), modifier);
            }
        }
    }

    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_id::{Attribute, CoreStat, StatTarget};

    #[test]
    fn test_default_is_identity() {
        let acc = accumulate(&[], &[], Attribute::Int);
        assert_eq!(acc.additive, 0);
        assert_eq!(acc.divisor, 1);
        assert_eq!(acc.resolve(7), 7);
    }

    #[test]
    fn test_last_divisor_wins() {
        let effects = vec![
            ActiveEffect::new("A").with_attribute(Attribute::Ref, "+1"),
            ActiveEffect::new("B")
                .with_attribute(Attribute::Ref, "/3")
                .with_attribute(Attribute::Ref, "+2"),
            ActiveEffect::new("C").with_attribute(Attribute::Ref, "/2"),
        ];
        let acc = accumulate(&[], &effects, Attribute::Ref);
        assert_eq!(acc.additive, 3);
        assert_eq!(acc.divisor, 2);
    }

    #[test]
    fn test_other_targets_ignored() {
        let effects = vec![ActiveEffect::new("A")
            .with_attribute(Attribute::Dex, "+4")
            .with_stat(CoreStat::Run, "+4")];
        let acc = accumulate(&[], &effects, Attribute::Ref);
        assert_eq!(acc.additive, 0);
        assert!(acc.breakdown.is_empty());

        let run = accumulate(&[], &effects, StatTarget::Core(CoreStat::Run));
        assert_eq!(run.additive, 4);
    }

    #[test]
    fn test_malformed_directive_skipped() {
        let effects = vec![ActiveEffect::new("Odd")
            .with_attribute(Attribute::Will, "a lot")
            .with_attribute(Attribute::Will, "/0")
            .with_attribute(Attribute::Will, "+1")];
        let acc = accumulate(&[], &effects, Attribute::Will);
        assert_eq!(acc.additive, 1);
        assert_eq!(acc.divisor, 1);
        assert_eq!(acc.breakdown.len(), 1);
    }

    #[test]
    fn test_breakdown_order() {
        let statics = vec![StaticModifier::new("Base bonus", 2)];
        let effects = vec![ActiveEffect::new("Potion").with_attribute(Attribute::Body, "-1")];
        let acc = accumulate(&statics, &effects, Attribute::Body);
        assert_eq!(acc.breakdown[0].source, "Base bonus");
        assert_eq!(acc.breakdown[1].source, "Potion");
        assert_eq!(acc.breakdown[1].modifier, Modifier::Additive(-1));
    }
}
