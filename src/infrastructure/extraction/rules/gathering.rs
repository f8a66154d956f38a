//! "Gathering" / "Gathered" section
//!
//! The element after the heading comes in three shapes, tried in this order:
//! a list opened by an "Aetherial Reduction" line, a plain list of nodes, or a
//! single paragraph describing one node. [`classify`] picks exactly one, and
//! each shape has its own rule.

use scraper::ElementRef;

use super::ExtractionRule;
use crate::domain::loot::{LootDrop, LootEntry};
use crate::infrastructure::extraction::navigation::{
    ANCHOR, LIST_ITEM, NodeList, child_node_text, clean_text, find_section_heading,
    next_sibling_text, section_body, text_of,
};
use crate::infrastructure::extraction::patterns;

const GATHERING_ANCHORS: &[&str] = &["Gathering", "Gathered"];
const REDUCTION_MARKER: &str = "Reduction";
const REDUCTION_LOCATION: &str = "Aetherial Reduction";

#[derive(Debug, Clone)]
pub enum GatheringShape<'a> {
    /// Items reduced into this one (marker line already removed)
    Reduction(Vec<ElementRef<'a>>),
    List(Vec<ElementRef<'a>>),
    Node(ElementRef<'a>),
}

/// Shape of the gathering section, if the page has one
pub fn classify(root: ElementRef<'_>) -> Option<GatheringShape<'_>> {
    let body = find_section_heading(root, GATHERING_ANCHORS).and_then(section_body)?;
    let mut items: Vec<_> = body.select(&LIST_ITEM).collect();

    if let Some(first) = items.first() {
        if text_of(*first).contains(REDUCTION_MARKER) {
            items.remove(0);
            return Some(GatheringShape::Reduction(items));
        }
        return Some(GatheringShape::List(items));
    }

    match body.value().name() {
        "table" | "ul" | "ol" => None,
        _ => Some(GatheringShape::Node(body)),
    }
}

/// First link that names a place rather than a gathering method
fn place_name(anchors: &NodeList<'_>) -> Option<String> {
    anchors
        .find(|anchor| !patterns::is_gathering_label(&text_of(anchor)))
        .map(text_of)
}

fn flag_after(anchors: &NodeList<'_>) -> String {
    anchors.try_get(|anchors| patterns::flag_position(&next_sibling_text(*anchors.last()?)))
}

fn leading_level(element: ElementRef<'_>) -> String {
    patterns::level(&child_node_text(element, 0))
        .unwrap_or_default()
        .to_string()
}

/// Plain list: one gathering node per item
pub struct GatheringList;

impl ExtractionRule for GatheringList {
    fn name(&self) -> &'static str {
        "gathering_list"
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        let Some(GatheringShape::List(items)) = classify(root) else {
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(gathered_from_item)
            .map(LootEntry::from)
            .collect()
    }
}

fn gathered_from_item(item: ElementRef<'_>) -> Option<LootDrop> {
    let anchors = NodeList::select(item, &ANCHOR);
    let first = anchors.first()?;

    let location_name = place_name(&anchors).unwrap_or_else(|| {
        patterns::alternate_location(&next_sibling_text(first))
            .unwrap_or_default()
            .to_string()
    });

    Some(LootDrop::new(
        clean_text(&text_of(first)),
        format!("{}-{}", clean_text(&location_name), clean_text(&anchors.last_text())),
        flag_after(&anchors),
        leading_level(item),
    ))
}

/// List opened by an "Aetherial Reduction" line: each item is a source item
pub struct AetherialReduction;

impl ExtractionRule for AetherialReduction {
    fn name(&self) -> &'static str {
        "aetherial_reduction"
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        let Some(GatheringShape::Reduction(items)) = classify(root) else {
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|item| NodeList::select(item, &ANCHOR).last())
            .map(|link| LootEntry::from(LootDrop::at(clean_text(&text_of(link)), REDUCTION_LOCATION)))
            .collect()
    }
}

/// Single element describing one (often timed) node
pub struct GatheringNode;

impl ExtractionRule for GatheringNode {
    fn name(&self) -> &'static str {
        "gathering_node"
    }

    fn extract(&self, root: ElementRef<'_>) -> Vec<LootEntry> {
        let Some(GatheringShape::Node(body)) = classify(root) else {
            return Vec::new();
        };

        let anchors = NodeList::select(body, &ANCHOR);
        let Some(first) = anchors.first() else {
            return Vec::new();
        };

        let location_name = if anchors.len() > 1 {
            place_name(&anchors).unwrap_or_default()
        } else {
            String::new()
        };
        let gather_time = patterns::gather_time(&text_of(body))
            .map(str::to_string)
            .or_else(|| patterns::gather_time(&text_of(root)).map(str::to_string))
            .unwrap_or_default();

        vec![LootEntry::from(LootDrop::new(
            clean_text(&text_of(first)),
            format!(
                "{}-{}-{}",
                clean_text(&location_name),
                clean_text(&anchors.last_text()),
                gather_time
            ),
            flag_after(&anchors),
            leading_level(body),
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn run_all(html: &Html) -> [Vec<LootEntry>; 3] {
        let root = html.root_element();
        [
            GatheringList.extract(root),
            AetherialReduction.extract(root),
            GatheringNode.extract(root),
        ]
    }

    #[test]
    fn test_list_form() {
        let html = Html::parse_document(concat!(
            r#"<h3><span class="mw-headline" id="Gathering">Gathering</span></h3>"#,
            "<ul>",
            "<li>Lv. 10 <a>Mature Tree</a> - <a>Central Shroud</a> (x:12.5, y:20.3)</li>",
            "<li>Lv. 20 <a>Logging</a> - Upper Paths (<a>Harvesting</a>) 30.0 10.0</li>",
            "<li>No links at all</li>",
            "</ul>",
        ));

        let [list, reduction, node] = run_all(&html);
        assert!(reduction.is_empty() && node.is_empty());
        assert_eq!(
            list,
            vec![
                LootEntry::Drop(LootDrop::new(
                    "Mature Tree",
                    "Central Shroud-Central Shroud",
                    "(12.5,20.3)",
                    "10"
                )),
                LootEntry::Drop(LootDrop::new(
                    "Logging",
                    "Upper Paths-Harvesting",
                    "(30.0,10.0)",
                    "20"
                )),
            ]
        );
    }

    #[test]
    fn test_reduction_form() {
        let html = Html::parse_document(concat!(
            r#"<h3><span id="Gathered">Gathered</span></h3>"#,
            "<ul><li>Obtained through Aetherial Reduction of:</li>",
            "<li><a>icon</a> <a>Brightwind Crystal</a></li>",
            "<li><a>Fleeting Brand</a></li></ul>",
        ));

        let [list, reduction, node] = run_all(&html);
        assert!(list.is_empty() && node.is_empty());
        assert_eq!(
            reduction,
            vec![
                LootEntry::Drop(LootDrop::at("Brightwind Crystal", "Aetherial Reduction")),
                LootEntry::Drop(LootDrop::at("Fleeting Brand", "Aetherial Reduction")),
            ]
        );
    }

    #[test]
    fn test_single_node_form() {
        let html = Html::parse_document(concat!(
            r#"<div class="mw-parser-output"><h3><span id="Gathered">Gathered</span></h3>"#,
            "<p>Lv. 50 <a>Unspoiled Mining</a> node in <a>Coerthas Western Highlands</a>",
            " (x:20.2, y:30.1) appearing at 2:00 am</p></div>",
        ));

        let [list, reduction, node] = run_all(&html);
        assert!(list.is_empty() && reduction.is_empty());
        assert_eq!(
            node,
            vec![LootEntry::Drop(LootDrop::new(
                "Unspoiled Mining",
                "Coerthas Western Highlands-Coerthas Western Highlands-2:00 am",
                "(20.2,30.1)",
                "50"
            ))]
        );
    }

    #[test]
    fn test_single_node_time_outside_body() {
        let html = Html::parse_document(concat!(
            r#"<div class="mw-parser-output"><h3><span id="Gathered">Gathered</span></h3>"#,
            "<p>Lv. 50 <a>Unspoiled Mining</a> node in <a>Coerthas Western Highlands</a> (x:20.2, y:30.1)</p>",
            "<div>Appears at 4:00 pm for one Eorzean hour.</div></div>",
        ));

        let [list, reduction, node] = run_all(&html);
        assert!(list.is_empty() && reduction.is_empty());
        assert_eq!(
            node,
            vec![LootEntry::Drop(LootDrop::new(
                "Unspoiled Mining",
                "Coerthas Western Highlands-Coerthas Western Highlands-4:00 pm",
                "(20.2,30.1)",
                "50"
            ))]
        );
    }

    #[test]
    fn test_single_node_without_time() {
        let html = Html::parse_document(concat!(
            r#"<h3><span id="Gathering">Gathering</span></h3>"#,
            "<p>Lv. 15 <a>Mining Point</a> in <a>Middle La Noscea</a> (x:21.0, y:17.5)</p>",
        ));

        assert_eq!(
            GatheringNode.extract(html.root_element()),
            vec![LootEntry::Drop(LootDrop::new(
                "Mining Point",
                "Middle La Noscea-Middle La Noscea-",
                "(21.0,17.5)",
                "15"
            ))]
        );
    }

    #[test]
    fn test_empty_list_fires_no_variant() {
        for list in ["<ul></ul>", "<ol></ol>"] {
            let html = Html::parse_document(&format!(
                r#"<h3><span id="Gathering">Gathering</span></h3>{list}<p>Lv. 5 <a>Tree</a> 1:00 am</p>"#
            ));

            assert!(classify(html.root_element()).is_none(), "{list}");
            assert!(run_all(&html).iter().all(Vec::is_empty), "{list}");
        }
    }

    #[test]
    fn test_table_after_heading_is_left_to_table_rule() {
        let html = Html::parse_document(concat!(
            r#"<h3><span id="Gathering">Gathering</span></h3>"#,
            r#"<table class="gathering-role"><tr><th>Item</th></tr></table>"#,
        ));

        assert!(classify(html.root_element()).is_none());
        assert!(run_all(&html).iter().all(Vec::is_empty));
    }

    #[test]
    fn test_no_heading() {
        let html = Html::parse_document("<h3><span id=\"Duties\">Duties</span></h3><p>x</p>");
        assert!(classify(html.root_element()).is_none());
    }
}
