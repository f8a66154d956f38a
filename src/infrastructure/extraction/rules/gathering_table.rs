//! Gathering role table (`table.gathering-role`)

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use super::ExtractionRule;
use crate::domain::loot::{LootDrop, LootEntry};
use crate::infrastructure::extraction::navigation::{
    ANCHOR, NodeList, TABLE_CELL, TABLE_ROW, child_node_text, clean_text,
};
use crate::infrastructure::extraction::patterns::flag_position;

static GATHERING_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.gathering-role").expect("built-in selector is valid"));

/// `table.gathering-role`: item | node type & zone links | level | coordinates
pub struct GatheringTable;

impl ExtractionRule for GatheringTable {
    fn name(&self) -> &'static str {
        "gathering_table"
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        let Some(table) = root.select(&GATHERING_TABLE).next() else {
            return Vec::new();
        };

        NodeList::select(table, &TABLE_ROW)
            .skip_header()
            .into_iter()
            .filter_map(node_from_row)
            .map(LootEntry::from)
            .collect()
    }
}

fn node_from_row(row: ElementRef<'_>) -> Option<LootDrop> {
    let cells = NodeList::select(row, &TABLE_CELL);
    if cells.is_empty() {
        return None;
    }

    // first child of the item cell is the icon
    let name = cells.try_get(|cells| cells.first().map(|cell| child_node_text(*cell, 1)));
    let links = cells
        .get(1)
        .map(|cell| NodeList::select(cell, &ANCHOR))
        .unwrap_or_default();
    let level = cells.try_get(|cells| cells.get(2).map(|cell| child_node_text(*cell, 0)));

    Some(LootDrop::new(
        clean_text(&name),
        format!("{} - {}", clean_text(&links.text(0)), clean_text(&links.text(1))),
        flag_position(&cells.last_text()).unwrap_or_default(),
        clean_text(&level),
    ))
}
