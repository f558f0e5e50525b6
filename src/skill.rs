//! Skill-check roll formulas.
//!
//! A skill check rolls the base die plus the resolved attribute and the
//! skill value, adjusted by social standing, static skill modifiers, skill
//! effects, armor encumbrance for spellcasting skills and a situational
//! modifier. The host rolls the formula; this module only writes it.

use crate::character::{ActorKind, CharacterBaseState, SocialStanding};
use crate::error::StatError;
use crate::modifier::Modifier;
use crate::resolved::ResolvedCharacter;
use crate::resolver::StatResolver;
use crate::stat_id::{Attribute, Skill};
use serde::{Deserialize, Serialize};

/// A skill check request.
///
/// # Examples
///
/// ```rust
/// use sheetstat::{Attribute, Skill, SkillCheck};
///
/// let check = SkillCheck::new(Attribute::Will, Skill::SpellCast)
///     .with_details()
///     .with_custom_modifier(-2);
/// assert!(check.display_details);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheck {
    pub attribute: Attribute,
    pub skill: Skill,
    /// Annotate every term with its source, as `term[label]`.
    #[serde(default)]
    pub display_details: bool,
    /// Situational modifier entered at roll time.
    #[serde(default)]
    pub custom_modifier: i32,
}

impl SkillCheck {
    pub fn new(attribute: Attribute, skill: Skill) -> Self {
        Self {
            attribute,
            skill,
            display_details: false,
            custom_modifier: 0,
        }
    }

    pub fn with_details(mut self) -> Self {
        self.display_details = true;
        self
    }

    pub fn with_custom_modifier(mut self, modifier: i32) -> Self {
        self.custom_modifier = modifier;
        self
    }
}

/// A roll formula and the chat flavor text that goes with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollFormula {
    pub formula: String,
    pub flavor: String,
}

/// Appends terms, annotated or not.
struct FormulaBuilder {
    formula: String,
    details: bool,
}

impl FormulaBuilder {
    fn push(&mut self, term: &str, label: &str) {
        self.formula.push_str(term);
        if self.details {
            self.formula.push('[');
            self.formula.push_str(label);
            self.formula.push(']');
        }
    }

    /// Signed amount: `+v`, `v` when negative, nothing when zero.
    fn push_signed(&mut self, value: i32, label: &str) {
        if value != 0 {
            self.push(&Modifier::Additive(value).to_string(), label);
        }
    }
}

fn social_standing_terms(
    standing: SocialStanding,
    skill: Skill,
) -> impl Iterator<Item = (i32, &'static str)> {
    let mut terms = Vec::new();
    if matches!(
        skill,
        Skill::Charisma | Skill::Leadership | Skill::Persuasion | Skill::Seduction
    ) {
        if standing.is_tolerated() {
            terms.push((-1, "Tolerated"));
        } else if standing.is_hated() {
            terms.push((-2, "Hated"));
        }
    }
    if skill == Skill::Charisma && standing.is_feared() {
        terms.push((-1, "Feared"));
    }
    if skill == Skill::Intimidation && standing.is_feared() {
        terms.push((1, "Feared"));
    }
    terms.into_iter()
}

impl StatResolver {
    /// Assemble the roll formula of a skill check.
    ///
    /// `resolved` must come from resolving `character`; the attribute term
    /// and the armor penalty are read from it.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::SkillAttributeMismatch`] when the skill does not
    /// belong to the requested attribute.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::{Attribute, CharacterBaseState, Skill, SkillCheck, StatResolver};
    ///
    /// let character = CharacterBaseState::new()
    ///     .with_attribute(Attribute::Body, 6)
    ///     .with_attribute(Attribute::Will, 8)
    ///     .with_attribute(Attribute::Ref, 7)
    ///     .with_skill(Skill::Dodge, 4)
    ///     .with_hp_value(35);
    /// let resolver = StatResolver::new();
    /// let resolved = resolver.resolve(&character).unwrap();
    ///
    /// let check = SkillCheck::new(Attribute::Ref, Skill::Dodge).with_custom_modifier(-1);
    /// let roll = resolver.skill_check(&character, &resolved, check).unwrap();
    /// assert_eq!(roll.formula, "1d10+7+4-1");
    /// assert_eq!(roll.flavor, "Reflex: Dodge/Escape Check");
    /// ```
    pub fn skill_check(
        &self,
        character: &CharacterBaseState,
        resolved: &ResolvedCharacter,
        check: SkillCheck,
    ) -> Result<RollFormula, StatError> {
        let SkillCheck {
            attribute,
            skill,
            display_details,
            custom_modifier,
        } = check;

        let expected = skill.attribute();
        if expected != attribute {
            return Err(StatError::SkillAttributeMismatch {
                skill,
                expected,
                requested: attribute,
            });
        }

        let attribute_name = attribute.display_name();
        let skill_name = skill.display_name();
        let skill_input = character.skill(skill);

        let mut builder = FormulaBuilder {
            formula: self.config().base_die.clone(),
            details: display_details,
        };
        builder.push(&format!("+{}", resolved.current(attribute)), attribute_name);
        builder.push(
            &format!("+{}", skill_input.map_or(0, |s| s.value)),
            skill_name,
        );

        if character.kind == ActorKind::Character {
            for (value, label) in social_standing_terms(character.social_standing, skill) {
                builder.push_signed(value, label);
            }
        }

        for modifier in skill_input.into_iter().flat_map(|s| &s.modifiers) {
            builder.push_signed(modifier.value, &modifier.name);
        }

        for effect in character.effects.iter().filter(|e| e.active) {
            for entry in effect.skills.iter().filter(|entry| entry.target == skill) {
                match entry.modifier {
                    Some(modifier) => builder.push(&modifier.to_string(), &effect.name),
                    None => tracing::debug!(effect = %effect.name, %skill, "skipping malformed skill modifier"),
                }
            }
        }

        if resolved.armor_penalty > 0 && self.config().armor_penalized_skills.contains(&skill) {
            builder.push(&format!("-{}", resolved.armor_penalty), "Encumbrance");
        }

        builder.push_signed(custom_modifier, "Custom");

        let roll = RollFormula {
            formula: builder.formula,
            flavor: format!("{attribute_name}: {skill_name} Check"),
        };
        tracing::debug!(formula = %roll.formula, %skill, "skill check assembled");
        Ok(roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Inventory, Item};
    use crate::modifier::{ActiveEffect, StaticModifier};

    fn roll(character: &CharacterBaseState, check: SkillCheck) -> Result<RollFormula, StatError> {
        let resolver = StatResolver::new();
        let resolved = resolver.resolve(character).unwrap();
        resolver.skill_check(character, &resolved, check)
    }

    fn sheet() -> CharacterBaseState {
        CharacterBaseState::new()
            .with_attribute(Attribute::Body, 6)
            .with_attribute(Attribute::Will, 8)
            .with_attribute(Attribute::Emp, 6)
            .with_hp_value(35)
    }

    #[test]
    fn test_mismatch_is_error() {
        let err = roll(&sheet(), SkillCheck::new(Attribute::Body, Skill::Charisma)).unwrap_err();
        assert!(matches!(
            err,
            StatError::SkillAttributeMismatch {
                expected: Attribute::Emp,
                requested: Attribute::Body,
                ..
            }
        ));
    }

    #[test]
    fn test_hated_and_feared_charisma() {
        let character = sheet()
            .with_skill(Skill::Charisma, 3)
            .with_social_standing(SocialStanding::HatedFeared);
        let formula = roll(&character, SkillCheck::new(Attribute::Emp, Skill::Charisma))
            .unwrap()
            .formula;
        assert_eq!(formula, "1d10+6+3-2-1");
    }

    #[test]
    fn test_tolerated_leadership() {
        let character = sheet().with_social_standing(SocialStanding::Tolerated);
        let formula = roll(&character, SkillCheck::new(Attribute::Emp, Skill::Leadership))
            .unwrap()
            .formula;
        assert_eq!(formula, "1d10+6+0-1");
    }

    #[test]
    fn test_feared_intimidation_bonus() {
        let character = sheet()
            .with_skill(Skill::Intimidation, 5)
            .with_social_standing(SocialStanding::Feared);
        let formula = roll(&character, SkillCheck::new(Attribute::Will, Skill::Intimidation))
            .unwrap()
            .formula;
        assert_eq!(formula, "1d10+8+5+1");
    }

    #[test]
    fn test_monsters_ignore_standing() {
        let monster = sheet()
            .with_kind(ActorKind::Monster)
            .with_social_standing(SocialStanding::Hated);
        let formula = roll(&monster, SkillCheck::new(Attribute::Emp, Skill::Persuasion))
            .unwrap()
            .formula;
        assert_eq!(formula, "1d10+6+0");
    }

    #[test]
    fn test_modifiers_effects_armor_custom_with_details() {
        let mut character = sheet()
            .with_skill(Skill::SpellCast, 4)
            .with_effect(ActiveEffect::new("Focus").with_skill(Skill::SpellCast, "+2"))
            .with_effect(ActiveEffect::new("Dimeritium").with_skill(Skill::SpellCast, "/2"))
            .with_effect(
                ActiveEffect::new("Old")
                    .with_skill(Skill::SpellCast, "+9")
                    .inactive(),
            )
            .with_inventory(Inventory {
                items: vec![Item::armor("Plate", 10.0, 3)],
                ..Inventory::default()
            });
        if let Some(skill) = character.skills.get_mut(&Skill::SpellCast) {
            skill.modifiers.push(StaticModifier::new("Talent", 1));
            skill.modifiers.push(StaticModifier::new("Nothing", 0));
            skill.modifiers.push(StaticModifier::new("Hangover", -1));
        }

        let check = SkillCheck::new(Attribute::Will, Skill::SpellCast)
            .with_details()
            .with_custom_modifier(3);
        let roll = roll(&character, check).unwrap();

        assert_eq!(
            roll.formula,
            "1d10+8[Will]+4[Spell Casting]+1[Talent]-1[Hangover]\
             +2[Focus]/2[Dimeritium]-3[Encumbrance]+3[Custom]"
        );
        assert_eq!(roll.flavor, "Will: Spell Casting Check");
    }

    #[test]
    fn test_armor_ignored_for_other_skills() {
        let character = sheet().with_inventory(Inventory {
            items: vec![Item::armor("Plate", 10.0, 3)],
            ..Inventory::default()
        });
        let formula = roll(&character, SkillCheck::new(Attribute::Will, Skill::Courage))
            .unwrap()
            .formula;
        assert_eq!(formula, "1d10+8+0");
    }
}
