//! Sections listing sources as links: Treasure Hunt and Desynthesis

use scraper::ElementRef;

use super::ExtractionRule;
use crate::domain::loot::{LootDrop, LootEntry};
use crate::infrastructure::extraction::navigation::{
    ANCHOR, LIST_ITEM, NodeList, clean_text, find_section_heading, section_body,
};

/// A section whose list items each name a location in their last link
pub struct SectionLinks {
    pub name: &'static str,
    pub anchor_ids: &'static [&'static str],
    pub source: &'static str,
}

pub const TREASURE_HUNT: SectionLinks = SectionLinks {
    name: "treasure_hunt",
    anchor_ids: &["Treasure_Hunt"],
    source: "Treasure Map",
};

pub const DESYNTHESIS: SectionLinks = SectionLinks {
    name: "desynthesis",
    anchor_ids: &["Desynthesis", "_Desynthesis"],
    source: "Desynthesis",
};

impl ExtractionRule for SectionLinks {
    fn name(&self) -> &'static str {
        self.name
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        let Some(body) = find_section_heading(root, self.anchor_ids).and_then(section_body) else {
            return Vec::new();
        };

        body.select(&LIST_ITEM)
            .map(|item| {
                let location = clean_text(&NodeList::select(item, &ANCHOR).last_text());
                LootEntry::from(LootDrop::at(self.source, location))
            })
            .collect()
    }
}
