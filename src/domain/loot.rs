//! # Loot Entities
//!
//! Records produced by one item lookup. Every text field is always present;
//! an empty string means "unknown".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where an item drops from or is obtained by (monster, duty, node, recipe...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootDrop {
    /// Monster name, "Duty", "Treasure Map", "Desynthesis" or a gathered item name
    pub source: String,
    pub location: String,
    /// Map flag formatted as `(x,y)`, empty when no coordinates were found
    pub flag: String,
    /// Level or grade text
    pub level: String,
}

impl LootDrop {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        location: impl Into<String>,
        flag: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            location: location.into(),
            flag: flag.into(),
            level: level.into(),
        }
    }

    /// Drop with only a source and a location known
    #[must_use]
    pub fn at(source: impl Into<String>, location: impl Into<String>) -> Self {
        Self::new(source, location, String::new(), String::new())
    }
}

/// A vendor offering the item
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootPurchase {
    pub vendor: String,
    pub location: String,
    pub flag: String,
    /// Cost amount as written on the page (not parsed)
    pub cost: String,
    /// Currency or item paid with
    pub cost_type: String,
}

impl LootPurchase {
    #[must_use]
    pub fn new(
        vendor: impl Into<String>,
        location: impl Into<String>,
        flag: impl Into<String>,
        cost: impl Into<String>,
        cost_type: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            location: location.into(),
            flag: flag.into(),
            cost: cost.into(),
            cost_type: cost_type.into(),
        }
    }
}

/// One record emitted by an extraction rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LootEntry {
    Drop(LootDrop),
    Purchase(LootPurchase),
}

impl From<LootDrop> for LootEntry {
    fn from(drop: LootDrop) -> Self {
        Self::Drop(drop)
    }
}

impl From<LootPurchase> for LootEntry {
    fn from(purchase: LootPurchase) -> Self {
        Self::Purchase(purchase)
    }
}

/// Aggregate result of one item lookup
///
/// Created by the caller with the item name, filled in place by the
/// extraction engine, then read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootData {
    pub loot_name: String,
    pub drops: Vec<LootDrop>,
    pub purchases: Vec<LootPurchase>,
}

impl LootData {
    #[must_use]
    pub fn new(loot_name: impl Into<String>) -> Self {
        Self {
            loot_name: loot_name.into(),
            drops: Vec::new(),
            purchases: Vec::new(),
        }
    }

    /// Replace the item name with its wiki page title when the name is a known alias.
    /// Returns true when the name was changed.
    pub fn apply_alias(&mut self, aliases: &HashMap<String, String>) -> bool {
        match aliases.get(&self.loot_name) {
            Some(fixed) if *fixed != self.loot_name => {
                self.loot_name.clone_from(fixed);
                true
            }
            _ => false,
        }
    }

    /// Merge rule output into the drop and purchase collections. No deduplication.
    pub fn merge<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = LootEntry>,
    {
        for entry in entries {
            match entry {
                LootEntry::Drop(drop) => self.drops.push(drop),
                LootEntry::Purchase(purchase) => self.purchases.push(purchase),
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty() && self.purchases.is_empty()
    }
}
