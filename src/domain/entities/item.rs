//! Items and inventory entries

use crate::domain::value_objects::{CharacterId, InventoryEntryId, ItemId};

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
    Consumable,
    Weapon,
    Armor,
    Accessory,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumable => "consumable",
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Accessory => "accessory",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "consumable" => Some(Self::Consumable),
            "weapon" => Some(Self::Weapon),
            "armor" => Some(Self::Armor),
            "accessory" => Some(Self::Accessory),
            _ => None,
        }
    }
}

/// Item rarity, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "common" => Some(Self::Common),
            "uncommon" => Some(Self::Uncommon),
            "rare" => Some(Self::Rare),
            "epic" => Some(Self::Epic),
            "legendary" => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// An item template - immutable reference data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub hp_restore: i32,
    pub mp_restore: i32,
}

impl Item {
    /// Item granted by opening a chest
    pub const CHEST_LOOT: ItemId = ItemId::new(6);

    /// Whether using the item restores anything
    pub fn restores(&self) -> bool {
        self.hp_restore > 0 || self.mp_restore > 0
    }
}

/// A stack of one item held by a character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub id: InventoryEntryId,
    pub character_id: CharacterId,
    pub item_id: ItemId,
    pub quantity: i32,
    pub equipped: bool,
}

impl InventoryEntry {
    pub fn new(character_id: CharacterId, item_id: ItemId, quantity: i32) -> Self {
        Self {
            id: InventoryEntryId::new(),
            character_id,
            item_id,
            quantity,
            equipped: false,
        }
    }
}

/// An inventory entry joined with its item template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub entry: InventoryEntry,
    pub item: Item,
}
