//! Monster drop table (`table.item`)

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use super::ExtractionRule;
use crate::domain::loot::{LootDrop, LootEntry};
use crate::infrastructure::extraction::navigation::{NodeList, TABLE_CELL, TABLE_ROW, clean_text};
use crate::infrastructure::extraction::patterns::flag_position;

static ITEM_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.item").expect("built-in selector is valid"));

/// `table.item`: monster name, level, and "Zone (x, y)" per row
pub struct MonsterDropTable;

impl ExtractionRule for MonsterDropTable {
    fn name(&self) -> &'static str {
        "monster_drop_table"
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        let Some(table) = root.select(&ITEM_TABLE).next() else {
            return Vec::new();
        };

        NodeList::select(table, &TABLE_ROW)
            .skip_header()
            .into_iter()
            .filter_map(drop_from_row)
            .map(LootEntry::from)
            .collect()
    }
}

fn drop_from_row(row: ElementRef<'_>) -> Option<LootDrop> {
    let cells = NodeList::select(row, &TABLE_CELL);
    if cells.is_empty() {
        return None;
    }

    let zone = cells.last_text();
    let location = zone.split_once('(').map_or(zone.as_str(), |(head, _)| head);

    Some(LootDrop::new(
        clean_text(&cells.text(0)),
        clean_text(location),
        flag_position(&zone).unwrap_or_default(),
        clean_text(&cells.text(1)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_rows_after_header() {
        let html = Html::parse_document(concat!(
            r#"<table class="item"><tbody>"#,
            "<tr><th>Name</th><th>Level</th><th>Location</th></tr>",
            "<tr><td>Goblin\n</td><td>15</td><td>Thanalan (10.0, 20.0)</td></tr>",
            "<tr><td>Wild Dodo</td><td>9-10</td><td>Upper La Noscea</td></tr>",
            "</tbody></table>",
        ));

        let drops = MonsterDropTable.extract(html.root_element());
        assert_eq!(
            drops,
            vec![
                LootEntry::Drop(LootDrop::new("Goblin", "Thanalan", "(10.0,20.0)", "15")),
                LootEntry::Drop(LootDrop::new("Wild Dodo", "Upper La Noscea", "", "9-10")),
            ]
        );
    }

    #[test]
    fn test_header_only_table() {
        let html = Html::parse_document(
            r#"<table class="item"><tr><th>Name</th><th>Level</th></tr></table>"#,
        );
        assert!(MonsterDropTable.extract(html.root_element()).is_empty());
    }

    #[test]
    fn test_missing_columns_degrade_to_empty() {
        let html = Html::parse_document(
            r#"<table class="item"><tr><th>Name</th></tr><tr><td>Goblin</td></tr></table>"#,
        );
        assert_eq!(
            MonsterDropTable.extract(html.root_element()),
            vec![LootEntry::Drop(LootDrop::new("Goblin", "Goblin", "", ""))]
        );
    }
}
