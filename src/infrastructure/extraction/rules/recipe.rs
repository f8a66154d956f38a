//! Crafting recipe box

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use super::ExtractionRule;
use crate::domain::loot::{LootDrop, LootEntry};
use crate::infrastructure::extraction::navigation::{ANCHOR, DEFINITION, NodeList, clean_text, text_of};

static RECIPE_BOX: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.recipe-box").expect("built-in selector is valid"));

/// Crafting recipe box. The third `dd` links the crafter class (second link),
/// the fourth holds the recipe level.
pub struct Recipe;

impl ExtractionRule for Recipe {
    fn name(&self) -> &'static str {
        "recipe"
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        let Some(recipe_box) = root.select(&RECIPE_BOX).next() else {
            return Vec::new();
        };

        let details = NodeList::select(recipe_box, &DEFINITION);
        let crafter = details.try_get(|dd| dd.get(2)?.select(&ANCHOR).nth(1).map(text_of));

        vec![LootEntry::from(LootDrop::new(
            format!("Crafter Class: {}", clean_text(&crafter)),
            "",
            "",
            clean_text(&details.text(3)),
        ))]
    }
}
