//! Modifier types.
//!
//! A modifier either adds a signed amount or replaces the divisor of the
//! stat it targets. Host documents serialize both as the same string
//! field (`"+2"`, `"-1"`, `"/2"`); the string is decided into a
//! [`Modifier`] once, when the document is read, so nothing downstream
//! ever sniffs strings.
//!
//! Malformed input never fails a document. Lenient readers turn it into
//! "no modifier" and log it at `debug` level.

use crate::error::StatError;
use crate::stat_id::{lookup_label, Attribute, LabelTarget, Skill, StatTarget};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A decided modifier directive.
///
/// # Examples
///
/// ```rust
/// use sheetstat::Modifier;
///
/// assert_eq!("+2".parse::<Modifier>().unwrap(), Modifier::Additive(2));
/// assert_eq!("-1".parse::<Modifier>().unwrap(), Modifier::Additive(-1));
/// assert_eq!("/2".parse::<Modifier>().unwrap(), Modifier::Divisor(2));
/// assert!("fast".parse::<Modifier>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Signed amount added before division.
    Additive(i32),
    /// Divisor applied to the whole sum. Always positive.
    Divisor(i32),
}

impl Modifier {
    /// Parse a modifier, returning `None` (and logging) for malformed input.
    pub fn parse_lenient(text: &str) -> Option<Modifier> {
        match text.parse() {
            Ok(modifier) => Some(modifier),
            Err(err) => {
                tracing::debug!(%err, "skipping malformed modifier");
                None
            }
        }
    }
}

impl FromStr for Modifier {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || StatError::InvalidModifier(s.to_string());

        if let Some(pos) = text.rfind('/') {
            let divisor: i32 = text[pos + 1..].trim().parse().map_err(|_| invalid())?;
            if divisor <= 0 {
                return Err(invalid());
            }
            return Ok(Modifier::Divisor(divisor));
        }

        text.parse().map(Modifier::Additive).map_err(|_| invalid())
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Additive(v) if *v < 0 => write!(f, "{v}"),
            Modifier::Additive(v) => write!(f, "+{v}"),
            Modifier::Divisor(d) => write!(f, "/{d}"),
        }
    }
}

impl Serialize for Modifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Modifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Number-or-string, as host documents store modifier fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

fn lenient_modifier<'de, D>(deserializer: D) -> Result<Option<Modifier>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawField::deserialize(deserializer)? {
        RawField::Int(v) => i32::try_from(v).ok().map(Modifier::Additive),
        RawField::Text(text) => Modifier::parse_lenient(&text),
        RawField::Float(v) if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) => {
            Some(Modifier::Additive(v as i32))
        }
        RawField::Float(v) => {
            tracing::debug!(value = v, "skipping fractional modifier");
            None
        }
        RawField::Other(value) => {
            tracing::debug!(%value, "skipping malformed modifier");
            None
        }
    })
}

fn lenient_value<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match lenient_modifier(deserializer)? {
        Some(Modifier::Additive(v)) => v,
        Some(Modifier::Divisor(_)) | None => 0,
    })
}

/// A named, player-entered modifier attached directly to a stat or skill.
///
/// Only the additive form exists here; a malformed value reads as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticModifier {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: i32,
}

impl StaticModifier {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One directive of an active effect, aimed at a typed target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEntry<T> {
    pub target: T,
    /// `None` when the host supplied something unparseable.
    #[serde(default, deserialize_with = "lenient_modifier")]
    pub modifier: Option<Modifier>,
}

impl<T> EffectEntry<T> {
    /// Build an entry from a serialized directive, leniently.
    pub fn parse(target: T, modifier: &str) -> Self {
        Self {
            target,
            modifier: Modifier::parse_lenient(modifier),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A toggleable modifier source attached to a character.
///
/// # Examples
///
/// ```rust
/// use sheetstat::{ActiveEffect, Attribute, Modifier};
///
/// let effect = ActiveEffect::new("Blinded")
///     .with_attribute(Attribute::Ref, "/2")
///     .with_attribute(Attribute::Dex, "-3");
/// assert!(effect.active);
/// assert_eq!(effect.attributes[0].modifier, Some(Modifier::Divisor(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub attributes: Vec<EffectEntry<Attribute>>,
    #[serde(default)]
    pub stats: Vec<EffectEntry<StatTarget>>,
    #[serde(default)]
    pub skills: Vec<EffectEntry<Skill>>,
}

impl ActiveEffect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            attributes: Vec::new(),
            stats: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute, modifier: &str) -> Self {
        self.attributes.push(EffectEntry::parse(attribute, modifier));
        self
    }

    pub fn with_stat(mut self, stat: impl Into<StatTarget>, modifier: &str) -> Self {
        self.stats.push(EffectEntry::parse(stat.into(), modifier));
        self
    }

    pub fn with_skill(mut self, skill: Skill, modifier: &str) -> Self {
        self.skills.push(EffectEntry::parse(skill, modifier));
        self
    }
}

/// Access to the entries of an effect aimed at one kind of target.
pub trait EffectTargets<T> {
    fn entries(&self) -> &[EffectEntry<T>];
}

impl EffectTargets<Attribute> for ActiveEffect {
    fn entries(&self) -> &[EffectEntry<Attribute>] {
        &self.attributes
    }
}

impl EffectTargets<StatTarget> for ActiveEffect {
    fn entries(&self) -> &[EffectEntry<StatTarget>] {
        &self.stats
    }
}

impl EffectTargets<Skill> for ActiveEffect {
    fn entries(&self) -> &[EffectEntry<Skill>] {
        &self.skills
    }
}

/// An effect directive as the host stores it: a label and a raw string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostDirective {
    #[serde(alias = "stat", alias = "derivedStat", alias = "skill")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_modifier")]
    pub modifier: Option<Modifier>,
}

/// An effect item as the host stores it, with label-keyed directives.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEffect {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub stats: Vec<HostDirective>,
    #[serde(default)]
    pub derived: Vec<HostDirective>,
    #[serde(default)]
    pub skills: Vec<HostDirective>,
}

impl From<HostEffect> for ActiveEffect {
    /// Route every directive through the label table. Directives with
    /// unknown labels are dropped.
    fn from(host: HostEffect) -> Self {
        let mut effect = ActiveEffect::new(host.name);
        effect.active = host.is_active;

        let directives = host
            .stats
            .into_iter()
            .chain(host.derived)
            .chain(host.skills);
        for directive in directives {
            let modifier = directive.modifier;
            match lookup_label(&directive.label) {
                Ok(LabelTarget::Attribute(target)) => {
                    effect.attributes.push(EffectEntry { target, modifier })
                }
                Ok(LabelTarget::Stat(target)) => effect.stats.push(EffectEntry { target, modifier }),
                Ok(LabelTarget::Skill(target)) => effect.skills.push(EffectEntry { target, modifier }),
                Err(err) => {
                    tracing::debug!(effect = %effect.name, %err, "dropping effect directive");
                }
            }
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_id::{CoreStat, DerivedStat};

    #[test]
    fn test_parse_additive() {
        assert_eq!("+2".parse::<Modifier>().unwrap(), Modifier::Additive(2));
        assert_eq!(" 3 ".parse::<Modifier>().unwrap(), Modifier::Additive(3));
        assert_eq!("-4".parse::<Modifier>().unwrap(), Modifier::Additive(-4));
    }

    #[test]
    fn test_parse_divisor() {
        assert_eq!("/2".parse::<Modifier>().unwrap(), Modifier::Divisor(2));
        assert_eq!("/ 3".parse::<Modifier>().unwrap(), Modifier::Divisor(3));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", "abc", "2.5", "/", "/x", "/0", "/-2", "++1"] {
            assert!(text.parse::<Modifier>().is_err(), "{text:?} should be rejected");
            assert_eq!(Modifier::parse_lenient(text), None);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Modifier::Additive(2).to_string(), "+2");
        assert_eq!(Modifier::Additive(-2).to_string(), "-2");
        assert_eq!(Modifier::Divisor(2).to_string(), "/2");
    }

    #[test]
    fn test_static_modifier_lenient_value() {
        let parsed: Vec<StaticModifier> = serde_json::from_str(
            r#"[{"name":"a","value":2},{"name":"b","value":"-1"},{"name":"c","value":"lots"},{"name":"d"}]"#,
        )
        .unwrap();
        let values: Vec<i32> = parsed.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![2, -1, 0, 0]);
    }

    #[test]
    fn test_whole_float_is_additive() {
        let parsed: Vec<StaticModifier> = serde_json::from_str(
            r#"[{"name":"a","value":2.0},{"name":"b","value":-3.0},{"name":"c","value":1.5},{"name":"d","value":1e12}]"#,
        )
        .unwrap();
        let values: Vec<i32> = parsed.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![2, -3, 0, 0]);

        let entry: EffectEntry<Attribute> =
            serde_json::from_str(r#"{"target":"ref","modifier":2.0}"#).unwrap();
        assert_eq!(entry.modifier, Some(Modifier::Additive(2)));
    }

    #[test]
    fn test_effect_entry_deserialize_malformed() {
        let entry: EffectEntry<Attribute> =
            serde_json::from_str(r#"{"target":"ref","modifier":"half"}"#).unwrap();
        assert_eq!(entry.target, Attribute::Ref);
        assert_eq!(entry.modifier, None);
    }

    #[test]
    fn test_host_effect_routing() {
        let host: HostEffect = serde_json::from_str(
            r#"{
                "name": "Drunk",
                "isActive": true,
                "stats": [
                    {"stat": "WITCHER.Actor.Stat.Ref", "modifier": "-2"},
                    {"stat": "WITCHER.Actor.Stat.Nope", "modifier": "-2"}
                ],
                "derived": [
                    {"derivedStat": "WITCHER.Actor.CoreStat.Run", "modifier": "/2"},
                    {"derivedStat": "WITCHER.Actor.DerStat.HP", "modifier": "+5"}
                ],
                "skills": [
                    {"skill": "WITCHER.SkEmpCharisma", "modifier": "+1"}
                ]
            }"#,
        )
        .unwrap();

        let effect = ActiveEffect::from(host);
        assert!(effect.active);
        assert_eq!(effect.attributes.len(), 1);
        assert_eq!(effect.attributes[0].target, Attribute::Ref);
        assert_eq!(
            effect.stats,
            vec![
                EffectEntry {
                    target: StatTarget::Core(CoreStat::Run),
                    modifier: Some(Modifier::Divisor(2)),
                },
                EffectEntry {
                    target: StatTarget::Derived(DerivedStat::Hp),
                    modifier: Some(Modifier::Additive(5)),
                },
            ]
        );
        assert_eq!(effect.skills[0].target, Skill::Charisma);
    }
}
