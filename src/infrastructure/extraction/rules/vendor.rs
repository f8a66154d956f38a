//! "Purchase" section: vendors selling the item and what they charge

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::info;

use super::ExtractionRule;
use crate::domain::loot::{LootEntry, LootPurchase};
use crate::infrastructure::extraction::navigation::{
    HEADING3, NodeList, TABLE_CELL, TABLE_ROW, attr, clean_text, text_of,
};
use crate::infrastructure::extraction::patterns::strip_decorations;

static NPC_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.npc").expect("built-in selector is valid"));
static CURRENCY_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span a").expect("built-in selector is valid"));

/// "Purchase" section: vendor, "Zone (x, y)", cost and currency per `table.npc` row
pub struct VendorPurchase;

impl ExtractionRule for VendorPurchase {
    fn name(&self) -> &'static str {
        "vendor_purchase"
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        if !root
            .select(&HEADING3)
            .any(|heading| text_of(heading).contains("Purchase"))
        {
            info!("No Purchase heading on page, skipping vendor table");
            return Vec::new();
        }

        let Some(table) = root.select(&NPC_TABLE).next() else {
            info!("Purchase heading present but no table.npc found");
            return Vec::new();
        };

        let rows = NodeList::select(table, &TABLE_ROW).skip_header();
        if rows.is_empty() {
            info!("Vendor table has no rows after the header");
            return Vec::new();
        }

        rows.into_iter()
            .filter_map(purchase_from_row)
            .map(LootEntry::from)
            .collect()
    }
}

fn purchase_from_row(row: ElementRef<'_>) -> Option<LootPurchase> {
    let cells = NodeList::select(row, &TABLE_CELL);
    if cells.is_empty() {
        return None;
    }

    let (location, flag) = split_location(&cells.text(1));
    let cost = clean_text(&strip_decorations(&cells.text(3)));
    let cost_type = cells.try_get(|cells| {
        let link = cells.get(3)?.select(&CURRENCY_LINK).next()?;
        Some(clean_text(&attr(link, "title")))
    });

    Some(LootPurchase::new(
        clean_text(&cells.text(0)),
        location,
        flag,
        cost,
        cost_type,
    ))
}

/// `"Limsa Lominsa (12.3, 8.1)"` -> `("Limsa Lominsa", "(12.3, 8.1)")`
pub fn split_location(text: &str) -> (String, String) {
    match text.split_once('(') {
        Some((location, rest)) => (clean_text(location), clean_text(&format!("({rest}"))),
        None => (clean_text(text), String::new()),
    }
}
