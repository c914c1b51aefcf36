// Gtmacro Equipment Query
// Point-in-time queries over the equipped-item and inventory snapshots

use std::fmt;

use serde::Deserialize;

/// Name the client reports for an empty slot
pub const NOTHING: &str = "Nothing";

/// Host-side identifier of an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of the equipped-items snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquippedItem {
    pub name: String,
    /// Whether the item is currently worn or held
    pub equipped: bool,
}

impl EquippedItem {
    pub fn new(name: impl Into<String>, equipped: bool) -> Self {
        Self {
            name: name.into(),
            equipped,
        }
    }
}

/// One entry of the inventory snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
}

impl InventoryItem {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: ItemId(id),
            name: name.into(),
        }
    }
}

/// Case-insensitive name comparison
pub fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Whether a reported name stands for an empty slot
pub fn is_nothing(name: &str) -> bool {
    name.trim().is_empty() || names_match(name, NOTHING)
}

/// The actively held (main-hand) item: the first equipped entry
///
/// Returns `None` for an empty hand, including the client's "Nothing".
pub fn held_item(items: &[EquippedItem]) -> Option<&str> {
    items
        .iter()
        .find(|item| item.equipped)
        .map(|item| item.name.as_str())
        .filter(|name| !is_nothing(name))
}

/// Predicate identifying a logical slot (waist, neck, left hand) by item name
///
/// The client exposes no slot information, so a slot is recognised by
/// case-insensitive substrings of the item worn in it ("belt", "purgatory").
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct SlotQuery {
    needles: Vec<String>,
}

impl SlotQuery {
    pub fn new<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            needles: needles
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Check whether an item name belongs to this slot
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.needles.iter().any(|needle| lower.contains(needle.as_str()))
    }

    pub fn needles(&self) -> &[String] {
        &self.needles
    }
}

impl From<Vec<String>> for SlotQuery {
    fn from(needles: Vec<String>) -> Self {
        Self::new(needles)
    }
}

/// First equipped item whose name satisfies the slot query
pub fn find_equipped<'a>(items: &'a [EquippedItem], query: &SlotQuery) -> Option<&'a str> {
    items
        .iter()
        .filter(|item| item.equipped)
        .map(|item| item.name.as_str())
        .find(|name| query.matches(name))
}

fn compact(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find an inventory item by name, ignoring case and whitespace
///
/// Game command tokens are written without spaces ("beltofthewild") while
/// the inventory reports display names ("Belt of the Wild"); an exact
/// compacted match wins over a prefix match ("heartwood" -> "Heartwood Charm").
pub fn find_in_inventory<'a>(items: &'a [InventoryItem], name: &str) -> Option<&'a InventoryItem> {
    let wanted = compact(name);
    if wanted.is_empty() {
        return None;
    }
    items
        .iter()
        .find(|item| compact(&item.name) == wanted)
        .or_else(|| items.iter().find(|item| compact(&item.name).starts_with(&wanted)))
}
