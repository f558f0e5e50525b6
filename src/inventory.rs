//! Carried items and coin.
//!
//! Supplies the two encumbrance inputs of attribute resolution: total
//! carried weight and the penalty of worn armor.

use serde::{Deserialize, Deserializer, Serialize};

/// Broad item category. Only armor matters to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Armor,
    Weapon,
    #[default]
    #[serde(other)]
    Other,
}

fn equipped_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(text) => text == "checked",
        Flag::Other(_) => false,
    })
}

/// A carried item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: ItemKind,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub quantity: f64,
    /// Sheets store either a boolean or the checkbox value `"checked"`.
    #[serde(default, alias = "equiped", deserialize_with = "equipped_flag")]
    pub equipped: bool,
    /// Armor penalty to ref and dex while worn.
    #[serde(default)]
    pub encumb: i32,
}

impl Item {
    pub fn new(name: impl Into<String>, weight: f64, quantity: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            quantity,
            ..Self::default()
        }
    }

    /// A worn armor piece with the given encumbrance.
    pub fn armor(name: impl Into<String>, weight: f64, encumb: i32) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Armor,
            weight,
            quantity: 1.0,
            equipped: true,
            encumb,
        }
    }

    pub fn unequipped(mut self) -> Self {
        self.equipped = false;
        self
    }
}

/// Coin counts per denomination. Every coin weighs the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub bizant: u32,
    pub ducat: u32,
    pub lintar: u32,
    pub floren: u32,
    pub crown: u32,
    pub oren: u32,
    pub falsecoin: u32,
}

impl Currency {
    pub fn total_pieces(&self) -> u64 {
        [
            self.bizant,
            self.ducat,
            self.lintar,
            self.floren,
            self.crown,
            self.oren,
            self.falsecoin,
        ]
        .iter()
        .map(|&n| u64::from(n))
        .sum()
    }
}

/// Everything a character carries.
///
/// # Examples
///
/// ```rust
/// use sheetstat::inventory::{Currency, Inventory, Item};
///
/// let inventory = Inventory {
///     items: vec![Item::new("Rope", 1.5, 3.0), Item::armor("Brigandine", 8.0, 2)],
///     currency: Currency { crown: 500, ..Currency::default() },
/// };
/// // ceil(1.5 * 3 + 8) + 500 coins * 0.001
/// assert!((inventory.total_weight(0.001) - 13.5).abs() < 1e-9);
/// assert_eq!(inventory.armor_encumbrance(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub items: Vec<Item>,
    pub currency: Currency,
}

impl Inventory {
    /// Sum of weight × quantity over all items, rounded up.
    pub fn item_weight(&self) -> f64 {
        let total: f64 = self
            .items
            .iter()
            .filter(|item| item.weight != 0.0 && item.quantity != 0.0)
            .map(|item| item.weight * item.quantity)
            .sum();
        total.ceil()
    }

    pub fn currency_weight(&self, weight_per_piece: f64) -> f64 {
        self.currency.total_pieces() as f64 * weight_per_piece
    }

    pub fn total_weight(&self, weight_per_piece: f64) -> f64 {
        self.item_weight() + self.currency_weight(weight_per_piece)
    }

    /// Sum of `encumb` over equipped armor.
    pub fn armor_encumbrance(&self) -> i32 {
        self.items
            .iter()
            .filter(|item| item.kind == ItemKind::Armor && item.equipped)
            .fold(0i32, |total, item| total.saturating_add(item.encumb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_weight_rounds_up() {
        let inventory = Inventory {
            items: vec![Item::new("Dagger", 0.5, 1.0), Item::new("Arrows", 0.1, 3.0)],
            ..Inventory::default()
        };
        assert_eq!(inventory.item_weight(), 1.0);
    }

    #[test]
    fn test_currency_weight() {
        let currency = Currency {
            crown: 1000,
            oren: 500,
            ..Currency::default()
        };
        assert_eq!(currency.total_pieces(), 1500);
        let inventory = Inventory {
            currency,
            ..Inventory::default()
        };
        assert!((inventory.currency_weight(0.001) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_armor_encumbrance_only_counts_worn_armor() {
        let inventory = Inventory {
            items: vec![
                Item::armor("Helm", 2.0, 1),
                Item::armor("Cuirass", 8.0, 2),
                Item::armor("Spare greaves", 4.0, 3).unequipped(),
                Item {
                    encumb: 5,
                    equipped: true,
                    ..Item::new("Sword", 1.5, 1.0)
                },
            ],
            ..Inventory::default()
        };
        assert_eq!(inventory.armor_encumbrance(), 3);
    }

    #[test]
    fn test_equipped_flag_forms() {
        let items: Vec<Item> = serde_json::from_str(
            r#"[
                {"type": "armor", "equipped": true, "encumb": 1},
                {"type": "armor", "equipped": "checked", "encumb": 2},
                {"type": "armor", "equiped": "checked", "encumb": 4},
                {"type": "armor", "equipped": "", "encumb": 8},
                {"type": "armor", "equipped": false, "encumb": 16},
                {"type": "valuable", "equipped": true, "encumb": 32}
            ]"#,
        )
        .unwrap();
        let inventory = Inventory {
            items,
            ..Inventory::default()
        };
        assert_eq!(inventory.items[5].kind, ItemKind::Other);
        assert_eq!(inventory.armor_encumbrance(), 7);
    }
}
