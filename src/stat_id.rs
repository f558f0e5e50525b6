//! Stat identifier module.
//!
//! Typed identifiers for every statistic the resolver reads or writes,
//! plus the table mapping the host's label strings onto them. Modifier
//! routing works on these enums, never on display text.

use crate::error::StatError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// One of the nine primary character attributes.
///
/// # Examples
///
/// ```rust
/// use sheetstat::Attribute;
///
/// let body: Attribute = "body".parse().unwrap();
/// assert_eq!(body, Attribute::Body);
/// assert_eq!(body.to_string(), "body");
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Int,
    Ref,
    Dex,
    Body,
    Spd,
    Emp,
    Cra,
    Will,
    Luck,
}

impl Attribute {
    /// All attributes in sheet order.
    pub const ALL: [Attribute; 9] = [
        Attribute::Int,
        Attribute::Ref,
        Attribute::Dex,
        Attribute::Body,
        Attribute::Spd,
        Attribute::Emp,
        Attribute::Cra,
        Attribute::Will,
        Attribute::Luck,
    ];

    /// Document key, as used in `system.stats.<key>`.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::Int => "int",
            Attribute::Ref => "ref",
            Attribute::Dex => "dex",
            Attribute::Body => "body",
            Attribute::Spd => "spd",
            Attribute::Emp => "emp",
            Attribute::Cra => "cra",
            Attribute::Will => "will",
            Attribute::Luck => "luck",
        }
    }

    /// Host label used by active effects to target this attribute.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Int => "WITCHER.Actor.Stat.Int",
            Attribute::Ref => "WITCHER.Actor.Stat.Ref",
            Attribute::Dex => "WITCHER.Actor.Stat.Dex",
            Attribute::Body => "WITCHER.Actor.Stat.Body",
            Attribute::Spd => "WITCHER.Actor.Stat.Spd",
            Attribute::Emp => "WITCHER.Actor.Stat.Emp",
            Attribute::Cra => "WITCHER.Actor.Stat.Cra",
            Attribute::Will => "WITCHER.Actor.Stat.Will",
            Attribute::Luck => "WITCHER.Actor.Stat.Luck",
        }
    }

    /// English display name, used for roll annotations.
    pub fn display_name(self) -> &'static str {
        match self {
            Attribute::Int => "Intelligence",
            Attribute::Ref => "Reflex",
            Attribute::Dex => "Dexterity",
            Attribute::Body => "Body",
            Attribute::Spd => "Speed",
            Attribute::Emp => "Empathy",
            Attribute::Cra => "Craft",
            Attribute::Will => "Will",
            Attribute::Luck => "Luck",
        }
    }

    /// Skills governed by this attribute. Speed and luck own none.
    pub fn skills(self) -> impl Iterator<Item = Skill> {
        Skill::ALL
            .into_iter()
            .filter(move |s| s.attribute() == self)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|a| a.key() == s)
            .ok_or_else(|| StatError::UnknownLabel(s.to_string()))
    }
}

/// A secondary statistic recomputed from attributes every cycle.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoreStat {
    Stun,
    Run,
    Leap,
    Enc,
    Rec,
    WoundThreshold,
}

impl CoreStat {
    pub const ALL: [CoreStat; 6] = [
        CoreStat::Stun,
        CoreStat::Run,
        CoreStat::Leap,
        CoreStat::Enc,
        CoreStat::Rec,
        CoreStat::WoundThreshold,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CoreStat::Stun => "stun",
            CoreStat::Run => "run",
            CoreStat::Leap => "leap",
            CoreStat::Enc => "enc",
            CoreStat::Rec => "rec",
            CoreStat::WoundThreshold => "woundThreshold",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoreStat::Stun => "WITCHER.Actor.CoreStat.Stun",
            CoreStat::Run => "WITCHER.Actor.CoreStat.Run",
            CoreStat::Leap => "WITCHER.Actor.CoreStat.Leap",
            CoreStat::Enc => "WITCHER.Actor.CoreStat.Enc",
            CoreStat::Rec => "WITCHER.Actor.CoreStat.Rec",
            CoreStat::WoundThreshold => "WITCHER.Actor.CoreStat.woundThreshold",
        }
    }
}

impl fmt::Display for CoreStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A pool with a recomputed ceiling and a separately tracked remaining value.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedStat {
    Hp,
    Sta,
    Resolve,
    Focus,
}

impl DerivedStat {
    pub const ALL: [DerivedStat; 4] = [
        DerivedStat::Hp,
        DerivedStat::Sta,
        DerivedStat::Resolve,
        DerivedStat::Focus,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DerivedStat::Hp => "hp",
            DerivedStat::Sta => "sta",
            DerivedStat::Resolve => "resolve",
            DerivedStat::Focus => "focus",
        }
    }

    /// Host label, where the host exposes one to active effects.
    pub fn label(self) -> Option<&'static str> {
        match self {
            DerivedStat::Hp => Some("WITCHER.Actor.DerStat.HP"),
            DerivedStat::Sta => Some("WITCHER.Actor.DerStat.Sta"),
            DerivedStat::Resolve | DerivedStat::Focus => None,
        }
    }
}

impl fmt::Display for DerivedStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Target of an active effect's non-attribute modifier.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatTarget {
    Core(CoreStat),
    Derived(DerivedStat),
}

impl fmt::Display for StatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatTarget::Core(c) => c.fmt(f),
            StatTarget::Derived(d) => d.fmt(f),
        }
    }
}

impl From<CoreStat> for StatTarget {
    fn from(core: CoreStat) -> Self {
        StatTarget::Core(core)
    }
}

impl From<DerivedStat> for StatTarget {
    fn from(derived: DerivedStat) -> Self {
        StatTarget::Derived(derived)
    }
}

/// A skill, statically owned by exactly one attribute.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Skill {
    // Intelligence
    Awareness,
    Business,
    Deduction,
    Education,
    CommonSpeech,
    ElderSpeech,
    DwarvenSpeech,
    MonsterLore,
    SocialEtiquette,
    Streetwise,
    Tactics,
    Teaching,
    Wilderness,
    // Reflex
    Brawling,
    Dodge,
    Melee,
    Riding,
    Sailing,
    SmallBlades,
    StaffSpear,
    Swordsmanship,
    // Dexterity
    Archery,
    Athletics,
    Crossbow,
    Sleight,
    Stealth,
    // Body
    Physique,
    Endurance,
    // Empathy
    Charisma,
    Deceit,
    FineArts,
    Gambling,
    Grooming,
    Perception,
    Leadership,
    Persuasion,
    Performance,
    Seduction,
    // Craft
    Alchemy,
    Crafting,
    Disguise,
    FirstAid,
    Forgery,
    PickLock,
    TrapCraft,
    // Will
    Courage,
    HexWeave,
    Intimidation,
    SpellCast,
    ResistMagic,
    ResistCoercion,
    RitualCraft,
}

impl Skill {
    pub const ALL: [Skill; 52] = [
        Skill::Awareness,
        Skill::Business,
        Skill::Deduction,
        Skill::Education,
        Skill::CommonSpeech,
        Skill::ElderSpeech,
        Skill::DwarvenSpeech,
        Skill::MonsterLore,
        Skill::SocialEtiquette,
        Skill::Streetwise,
        Skill::Tactics,
        Skill::Teaching,
        Skill::Wilderness,
        Skill::Brawling,
        Skill::Dodge,
        Skill::Melee,
        Skill::Riding,
        Skill::Sailing,
        Skill::SmallBlades,
        Skill::StaffSpear,
        Skill::Swordsmanship,
        Skill::Archery,
        Skill::Athletics,
        Skill::Crossbow,
        Skill::Sleight,
        Skill::Stealth,
        Skill::Physique,
        Skill::Endurance,
        Skill::Charisma,
        Skill::Deceit,
        Skill::FineArts,
        Skill::Gambling,
        Skill::Grooming,
        Skill::Perception,
        Skill::Leadership,
        Skill::Persuasion,
        Skill::Performance,
        Skill::Seduction,
        Skill::Alchemy,
        Skill::Crafting,
        Skill::Disguise,
        Skill::FirstAid,
        Skill::Forgery,
        Skill::PickLock,
        Skill::TrapCraft,
        Skill::Courage,
        Skill::HexWeave,
        Skill::Intimidation,
        Skill::SpellCast,
        Skill::ResistMagic,
        Skill::ResistCoercion,
        Skill::RitualCraft,
    ];

    /// The attribute this skill is rolled with.
    pub fn attribute(self) -> Attribute {
        use Skill::*;
        match self {
            Awareness | Business | Deduction | Education | CommonSpeech | ElderSpeech
            | DwarvenSpeech | MonsterLore | SocialEtiquette | Streetwise | Tactics | Teaching
            | Wilderness => Attribute::Int,
            Brawling | Dodge | Melee | Riding | Sailing | SmallBlades | StaffSpear
            | Swordsmanship => Attribute::Ref,
            Archery | Athletics | Crossbow | Sleight | Stealth => Attribute::Dex,
            Physique | Endurance => Attribute::Body,
            Charisma | Deceit | FineArts | Gambling | Grooming | Perception | Leadership
            | Persuasion | Performance | Seduction => Attribute::Emp,
            Alchemy | Crafting | Disguise | FirstAid | Forgery | PickLock | TrapCraft => {
                Attribute::Cra
            }
            Courage | HexWeave | Intimidation | SpellCast | ResistMagic | ResistCoercion
            | RitualCraft => Attribute::Will,
        }
    }

    /// Document key, as used in `system.skills.<attribute>.<key>`.
    pub fn key(self) -> &'static str {
        use Skill::*;
        match self {
            Awareness => "awareness",
            Business => "business",
            Deduction => "deduction",
            Education => "education",
            CommonSpeech => "commonsp",
            ElderSpeech => "eldersp",
            DwarvenSpeech => "dwarven",
            MonsterLore => "monster",
            SocialEtiquette => "socialetq",
            Streetwise => "streetwise",
            Tactics => "tactics",
            Teaching => "teaching",
            Wilderness => "wilderness",
            Brawling => "brawling",
            Dodge => "dodge",
            Melee => "melee",
            Riding => "riding",
            Sailing => "sailing",
            SmallBlades => "smallblades",
            StaffSpear => "staffspear",
            Swordsmanship => "swordsmanship",
            Archery => "archery",
            Athletics => "athletics",
            Crossbow => "crossbow",
            Sleight => "sleight",
            Stealth => "stealth",
            Physique => "physique",
            Endurance => "endurance",
            Charisma => "charisma",
            Deceit => "deceit",
            FineArts => "finearts",
            Gambling => "gambling",
            Grooming => "grooming",
            Perception => "perception",
            Leadership => "leadership",
            Persuasion => "persuasion",
            Performance => "performance",
            Seduction => "seduction",
            Alchemy => "alchemy",
            Crafting => "crafting",
            Disguise => "disguise",
            FirstAid => "firstaid",
            Forgery => "forgery",
            PickLock => "picklock",
            TrapCraft => "trapcraft",
            Courage => "courage",
            HexWeave => "hexweave",
            Intimidation => "intimidation",
            SpellCast => "spellcast",
            ResistMagic => "resistmagic",
            ResistCoercion => "resistcoerc",
            RitualCraft => "ritcraft",
        }
    }

    /// Host label used by active effects to target this skill.
    pub fn label(self) -> &'static str {
        use Skill::*;
        match self {
            Awareness => "WITCHER.SkIntAwareness",
            Business => "WITCHER.SkIntBusiness",
            Deduction => "WITCHER.SkIntDeduction",
            Education => "WITCHER.SkIntEducation",
            CommonSpeech => "WITCHER.SkIntCommon",
            ElderSpeech => "WITCHER.SkIntElder",
            DwarvenSpeech => "WITCHER.SkIntDwarven",
            MonsterLore => "WITCHER.SkIntMonster",
            SocialEtiquette => "WITCHER.SkIntSocialEt",
            Streetwise => "WITCHER.SkIntStreet",
            Tactics => "WITCHER.SkIntTactics",
            Teaching => "WITCHER.SkIntTeaching",
            Wilderness => "WITCHER.SkIntWilderness",
            Brawling => "WITCHER.SkRefBrawling",
            Dodge => "WITCHER.SkRefDodge",
            Melee => "WITCHER.SkRefMelee",
            Riding => "WITCHER.SkRefRiding",
            Sailing => "WITCHER.SkRefSailing",
            SmallBlades => "WITCHER.SkRefSmall",
            StaffSpear => "WITCHER.SkRefStaff",
            Swordsmanship => "WITCHER.SkRefSwordsmanship",
            Archery => "WITCHER.SkDexArchery",
            Athletics => "WITCHER.SkDexAthletics",
            Crossbow => "WITCHER.SkDexCrossbow",
            Sleight => "WITCHER.SkDexSleight",
            Stealth => "WITCHER.SkDexStealth",
            Physique => "WITCHER.SkBodyPhys",
            Endurance => "WITCHER.SkBodyEnd",
            Charisma => "WITCHER.SkEmpCharisma",
            Deceit => "WITCHER.SkEmpDeceit",
            FineArts => "WITCHER.SkEmpArts",
            Gambling => "WITCHER.SkEmpGambling",
            Grooming => "WITCHER.SkEmpGrooming",
            Perception => "WITCHER.SkEmpHumanPerc",
            Leadership => "WITCHER.SkEmpLeadership",
            Persuasion => "WITCHER.SkEmpPersuasion",
            Performance => "WITCHER.SkEmpPerformance",
            Seduction => "WITCHER.SkEmpSeduction",
            Alchemy => "WITCHER.SkCraAlchemy",
            Crafting => "WITCHER.SkCraCrafting",
            Disguise => "WITCHER.SkCraDisguise",
            FirstAid => "WITCHER.SkCraAid",
            Forgery => "WITCHER.SkCraForge",
            PickLock => "WITCHER.SkCraPick",
            TrapCraft => "WITCHER.SkCraTrapCraft",
            Courage => "WITCHER.SkWillCourage",
            HexWeave => "WITCHER.SkWillHex",
            Intimidation => "WITCHER.SkWillIntim",
            SpellCast => "WITCHER.SkWillSpellcast",
            ResistMagic => "WITCHER.SkWillResistMag",
            ResistCoercion => "WITCHER.SkWillResistCoer",
            RitualCraft => "WITCHER.SkWillRitCraft",
        }
    }

    /// English display name, used for roll annotations and flavor text.
    pub fn display_name(self) -> &'static str {
        use Skill::*;
        match self {
            Awareness => "Awareness",
            Business => "Business",
            Deduction => "Deduction",
            Education => "Education",
            CommonSpeech => "Language: Common Speech",
            ElderSpeech => "Language: Elder Speech",
            DwarvenSpeech => "Language: Dwarven",
            MonsterLore => "Monster Lore",
            SocialEtiquette => "Social Etiquette",
            Streetwise => "Streetwise",
            Tactics => "Tactics",
            Teaching => "Teaching",
            Wilderness => "Wilderness Survival",
            Brawling => "Brawling",
            Dodge => "Dodge/Escape",
            Melee => "Melee",
            Riding => "Riding",
            Sailing => "Sailing",
            SmallBlades => "Small Blades",
            StaffSpear => "Staff/Spear",
            Swordsmanship => "Swordsmanship",
            Archery => "Archery",
            Athletics => "Athletics",
            Crossbow => "Crossbow",
            Sleight => "Sleight of Hand",
            Stealth => "Stealth",
            Physique => "Physique",
            Endurance => "Endurance",
            Charisma => "Charisma",
            Deceit => "Deceit",
            FineArts => "Fine Arts",
            Gambling => "Gambling",
            Grooming => "Grooming and Style",
            Perception => "Human Perception",
            Leadership => "Leadership",
            Persuasion => "Persuasion",
            Performance => "Performance",
            Seduction => "Seduction",
            Alchemy => "Alchemy",
            Crafting => "Crafting",
            Disguise => "Disguise",
            FirstAid => "First Aid",
            Forgery => "Forgery",
            PickLock => "Pick Lock",
            TrapCraft => "Trap Crafting",
            Courage => "Courage",
            HexWeave => "Hex Weaving",
            Intimidation => "Intimidation",
            SpellCast => "Spell Casting",
            ResistMagic => "Resist Magic",
            ResistCoercion => "Resist Coercion",
            RitualCraft => "Ritual Crafting",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Skill {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .iter()
            .copied()
            .find(|skill| skill.key() == s)
            .ok_or_else(|| StatError::UnknownLabel(s.to_string()))
    }
}

impl Serialize for Skill {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.key().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Skill {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// What a host label resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    Attribute(Attribute),
    Stat(StatTarget),
    Skill(Skill),
}

fn label_table() -> &'static HashMap<&'static str, LabelTarget> {
    static TABLE: OnceLock<HashMap<&'static str, LabelTarget>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for attribute in Attribute::ALL {
            table.insert(attribute.label(), LabelTarget::Attribute(attribute));
        }
        for core in CoreStat::ALL {
            table.insert(core.label(), LabelTarget::Stat(StatTarget::Core(core)));
        }
        for derived in DerivedStat::ALL {
            if let Some(label) = derived.label() {
                table.insert(label, LabelTarget::Stat(StatTarget::Derived(derived)));
            }
        }
        for skill in Skill::ALL {
            table.insert(skill.label(), LabelTarget::Skill(skill));
        }
        table
    })
}

/// Resolve a host label (e.g. `"WITCHER.Actor.Stat.Ref"`) to a typed target.
///
/// # Examples
///
/// ```rust
/// use sheetstat::stat_id::{lookup_label, LabelTarget};
/// use sheetstat::Attribute;
///
/// let target = lookup_label("WITCHER.Actor.Stat.Ref").unwrap();
/// assert_eq!(target, LabelTarget::Attribute(Attribute::Ref));
/// assert!(lookup_label("Reflex").is_err());
/// ```
pub fn lookup_label(label: &str) -> Result<LabelTarget, StatError> {
    label_table()
        .get(label)
        .copied()
        .ok_or_else(|| StatError::UnknownLabel(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_roundtrip_key() {
        for attribute in Attribute::ALL {
            assert_eq!(attribute.key().parse::<Attribute>().unwrap(), attribute);
        }
    }

    #[test]
    fn test_skill_owners() {
        assert_eq!(Skill::HexWeave.attribute(), Attribute::Will);
        assert_eq!(Skill::Dodge.attribute(), Attribute::Ref);
        assert_eq!(Attribute::Int.skills().count(), 13);
        assert_eq!(Attribute::Spd.skills().count(), 0);
        assert_eq!(Attribute::Luck.skills().count(), 0);
    }

    #[test]
    fn test_label_table_is_complete() {
        // 9 attributes + 6 core stats + 2 labelled derived stats + 52 skills
        assert_eq!(label_table().len(), 69);
        assert_eq!(
            lookup_label("WITCHER.Actor.CoreStat.woundThreshold").unwrap(),
            LabelTarget::Stat(StatTarget::Core(CoreStat::WoundThreshold))
        );
        assert_eq!(
            lookup_label("WITCHER.SkWillRitCraft").unwrap(),
            LabelTarget::Skill(Skill::RitualCraft)
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&CoreStat::WoundThreshold).unwrap();
        assert_eq!(json, "\"woundThreshold\"");
        let skill: Skill = serde_json::from_str("\"resistcoerc\"").unwrap();
        assert_eq!(skill, Skill::ResistCoercion);
        let target: StatTarget = serde_json::from_str("\"sta\"").unwrap();
        assert_eq!(target, StatTarget::Derived(DerivedStat::Sta));
    }
}
