//! Input boundary: turns a fetched page into article HTML
//!
//! The wiki is queried through the MediaWiki `action=parse` API. The body
//! arrives either as the raw JSON envelope or, when it came through a
//! browser-rendering proxy, as that JSON shown inside `<body><pre>`.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;

use super::navigation::text_of;
use crate::infrastructure::extraction_error::{ExtractionError, ExtractionResult};

static WRAPPED_JSON: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body > pre").expect("built-in selector is valid"));

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    parse: Option<ParseSection>,
}

#[derive(Debug, Deserialize)]
struct ParseSection {
    title: Option<String>,
    text: Option<ParseText>,
}

#[derive(Debug, Deserialize)]
struct ParseText {
    #[serde(rename = "*")]
    content: Option<String>,
}

/// Article HTML for one item page
///
/// Holds the markup rather than the parsed tree: parsed trees cannot cross
/// threads, so each extraction worker parses its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPage {
    title: Option<String>,
    html: String,
}

impl WikiPage {
    /// Wrap article HTML that has already been taken out of the API envelope
    pub fn from_html(html: impl Into<String>) -> ExtractionResult<Self> {
        let html = html.into();
        if html.trim().is_empty() {
            return Err(ExtractionError::empty_document("article HTML is blank"));
        }
        Ok(Self { title: None, html })
    }

    /// Decode a MediaWiki parse response, bare or wrapped in `<pre>`
    pub fn from_api_response(raw: &str) -> ExtractionResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ExtractionError::empty_document("response body is blank"));
        }

        let json = if raw.starts_with('{') {
            raw.to_string()
        } else {
            Self::unwrap_pre(raw)?
        };

        let envelope: ApiEnvelope =
            serde_json::from_str(&json).map_err(ExtractionError::envelope_malformed)?;
        let parse = envelope
            .parse
            .ok_or_else(|| ExtractionError::envelope_field_missing("parse"))?;
        let content = parse
            .text
            .and_then(|text| text.content)
            .ok_or_else(|| ExtractionError::envelope_field_missing("parse.text.*"))?;

        debug!(
            "Decoded parse envelope for {:?} ({} bytes of HTML)",
            parse.title,
            content.len()
        );

        let mut page = Self::from_html(content)?;
        page.title = parse.title;
        Ok(page)
    }

    fn unwrap_pre(raw: &str) -> ExtractionResult<String> {
        let document = Html::parse_document(raw);
        document
            .select(&WRAPPED_JSON)
            .next()
            .map(text_of)
            .ok_or_else(|| ExtractionError::envelope_field_missing("body > pre"))
    }

    /// Page title reported by the API, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Article body container, or the whole document when the container is missing
pub fn content_root<'a>(document: &'a Html, selector: &Selector) -> ElementRef<'a> {
    document
        .select(selector)
        .next()
        .unwrap_or_else(|| document.root_element())
}
