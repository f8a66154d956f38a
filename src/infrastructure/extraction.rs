//! Loot extraction from wiki article HTML
//!
//! `document` decodes the page, `navigation` and `patterns` hold the shared
//! tree and text helpers, `rules` holds one recognizer per page layout, and
//! `engine` runs them.

pub mod document;
pub mod engine;
pub mod navigation;
pub mod patterns;
pub mod rules;

pub use document::WikiPage;
pub use engine::ExtractionEngine;
pub use rules::{ExtractionRule, REGISTRY};
