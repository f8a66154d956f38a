//! Extraction rules
//!
//! Each rule looks at one section or table shape of the article template and
//! maps it to loot entries. Rules only read the document and never fail: a
//! missing section means an empty result.

pub mod duty;
pub mod gathering;
pub mod gathering_table;
pub mod monster_table;
pub mod recipe;
pub mod section_links;
pub mod vendor;

pub use duty::DutyDrops;
pub use gathering::{AetherialReduction, GatheringList, GatheringNode, GatheringShape};
pub use gathering_table::GatheringTable;
pub use monster_table::MonsterDropTable;
pub use recipe::Recipe;
pub use section_links::{DESYNTHESIS, SectionLinks, TREASURE_HUNT};
pub use vendor::VendorPurchase;

use scraper::ElementRef;

use crate::domain::loot::LootEntry;

/// Maps the article content node to zero or more loot entries
pub trait ExtractionRule: Send + Sync {
    /// Stable identifier used in logs
    fn name(&self) -> &'static str;

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry>;
}

/// Every rule the engine runs by default
pub static REGISTRY: [&'static dyn ExtractionRule; 10] = [
    &DutyDrops,
    &MonsterDropTable,
    &VendorPurchase,
    &Recipe,
    &TREASURE_HUNT,
    &DESYNTHESIS,
    &GatheringList,
    &AetherialReduction,
    &GatheringNode,
    &GatheringTable,
];
