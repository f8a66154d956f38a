//! Wiki Loot Extract - item source extraction from wiki article HTML
//!
//! Given the rendered article of one item, recognizes the page layouts that
//! describe where the item comes from (monster drop tables, duty lists,
//! vendors, gathering nodes, recipes, treasure maps, desynthesis) and collects
//! them into a [`LootData`] record.

pub mod domain;
pub mod infrastructure;

pub use domain::{LootData, LootDrop, LootEntry, LootPurchase};
pub use infrastructure::{
    AppConfig, ConfigManager, ExtractionConfig, ExtractionEngine, ExtractionError,
    ExtractionResult, WikiPage,
};
