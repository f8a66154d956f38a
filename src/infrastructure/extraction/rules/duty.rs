//! "Duties" section: the list of duties that drop the item

use scraper::ElementRef;

use super::ExtractionRule;
use crate::domain::loot::{LootDrop, LootEntry};
use crate::infrastructure::extraction::navigation::{
    LIST_ITEM, clean_text, find_section_heading, section_elements, text_of,
};
use crate::infrastructure::extraction::patterns::strip_decorations;

/// "Duties" section: one drop per listed duty
pub struct DutyDrops;

impl ExtractionRule for DutyDrops {
    fn name(&self) -> &'static str {
        "duty_drops"
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        let Some(list) = find_section_heading(root, &["Duties"]).and_then(|heading| {
            section_elements(heading).find(|element| element.value().name() == "ul")
        }) else {
            return Vec::new();
        };

        list.select(&LIST_ITEM)
            .map(|duty| {
                let location = clean_text(&strip_decorations(&text_of(duty)));
                LootEntry::from(LootDrop::at("Duty", location))
            })
            .collect()
    }
}
