//! Defensive read-only traversal over the parsed article
//!
//! Every accessor answers "not found" with `None` or an empty string so a
//! column or section removed by a wiki editor shrinks a rule's output instead
//! of aborting it.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Node, Selector};

use crate::infrastructure::extraction_error::{ExtractionError, ExtractionResult};

fn fixed(selector: &str) -> Selector {
    Selector::parse(selector).expect("built-in selector is valid")
}

pub static TABLE_ROW: Lazy<Selector> = Lazy::new(|| fixed("tr"));
pub static TABLE_CELL: Lazy<Selector> = Lazy::new(|| fixed("td"));
pub static ANCHOR: Lazy<Selector> = Lazy::new(|| fixed("a"));
pub static LIST_ITEM: Lazy<Selector> = Lazy::new(|| fixed("li"));
pub static DEFINITION: Lazy<Selector> = Lazy::new(|| fixed("dd"));
pub static HEADING3: Lazy<Selector> = Lazy::new(|| fixed("h3"));
static SPAN_WITH_ID: Lazy<Selector> = Lazy::new(|| fixed("span[id]"));

/// Compile a selector coming from configuration
pub fn compile_selector(selector: &str) -> ExtractionResult<Selector> {
    Selector::parse(selector).map_err(|e| ExtractionError::invalid_selector(selector, e))
}

/// Remove embedded line breaks and surrounding whitespace
pub fn clean_text(text: &str) -> String {
    text.replace(['\n', '\r'], "").trim().to_string()
}

pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn node_text(value: &Node, element: Option<ElementRef<'_>>) -> String {
    match value {
        Node::Text(text) => text.text.to_string(),
        _ => element.map(text_of).unwrap_or_default(),
    }
}

/// Text of the `index`-th child node (text nodes included)
pub fn child_node_text(element: ElementRef<'_>, index: usize) -> String {
    element
        .children()
        .nth(index)
        .map(|node| node_text(node.value(), ElementRef::wrap(node)))
        .unwrap_or_default()
}

/// Text of the node directly after `element`
pub fn next_sibling_text(element: ElementRef<'_>) -> String {
    element
        .next_sibling()
        .map(|node| node_text(node.value(), ElementRef::wrap(node)))
        .unwrap_or_default()
}

pub fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

pub fn attr(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().to_string()
}

/// First `h3` carrying one of `anchor_ids`, either on itself or on a nested `span`
pub fn find_section_heading<'a>(root: ElementRef<'a>, anchor_ids: &[&str]) -> Option<ElementRef<'a>> {
    let matches = |id: Option<&str>| id.is_some_and(|id| anchor_ids.contains(&id));

    root.select(&HEADING3).find(|heading| {
        matches(heading.value().id())
            || heading.select(&SPAN_WITH_ID).any(|span| matches(span.value().id()))
    })
}

fn is_heading_wrapper(element: ElementRef<'_>) -> bool {
    element.value().classes().any(|class| class == "mw-heading")
}

fn is_heading(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
        || is_heading_wrapper(element)
}

/// The heading itself, or its `div.mw-heading` wrapper
fn heading_anchor(heading: ElementRef<'_>) -> ElementRef<'_> {
    heading
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| is_heading_wrapper(*parent))
        .unwrap_or(heading)
}

/// Element following a section heading, looking past a `div.mw-heading` wrapper
pub fn section_body(heading: ElementRef<'_>) -> Option<ElementRef<'_>> {
    next_element(heading_anchor(heading))
}

/// Elements after a section heading, up to the next heading
pub fn section_elements(heading: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    heading_anchor(heading)
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|element| !is_heading(*element))
}

/// Ordered element list with index-safe accessors
#[derive(Debug, Clone, Default)]
pub struct NodeList<'a> {
    nodes: Vec<ElementRef<'a>>,
}

impl<'a> NodeList<'a> {
    pub fn select(scope: ElementRef<'a>, selector: &Selector) -> Self {
        Self {
            nodes: scope.select(selector).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementRef<'a>> + '_ {
        self.nodes.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<ElementRef<'a>> {
        self.nodes.get(index).copied()
    }

    pub fn first(&self) -> Option<ElementRef<'a>> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<ElementRef<'a>> {
        self.nodes.last().copied()
    }

    /// Drops the first element (a table header row)
    #[must_use]
    pub fn skip_header(mut self) -> Self {
        if !self.nodes.is_empty() {
            self.nodes.remove(0);
        }
        self
    }

    pub fn find<P>(&self, mut predicate: P) -> Option<ElementRef<'a>>
    where
        P: FnMut(ElementRef<'a>) -> bool,
    {
        self.iter().find(|node| predicate(*node))
    }

    /// Run an arbitrary lookup over the list; a miss yields an empty string
    pub fn try_get<F>(&self, lookup: F) -> String
    where
        F: FnOnce(&[ElementRef<'a>]) -> Option<String>,
    {
        lookup(&self.nodes).unwrap_or_default()
    }

    pub fn text(&self, index: usize) -> String {
        self.try_get(|nodes| nodes.get(index).copied().map(text_of))
    }

    pub fn last_text(&self) -> String {
        self.try_get(|nodes| nodes.last().copied().map(text_of))
    }
}

impl<'a> IntoIterator for NodeList<'a> {
    type Item = ElementRef<'a>;
    type IntoIter = std::vec::IntoIter<ElementRef<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
