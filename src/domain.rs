//! Domain module - loot records produced by an item lookup

pub mod loot;

pub use loot::{LootData, LootDrop, LootEntry, LootPurchase};
