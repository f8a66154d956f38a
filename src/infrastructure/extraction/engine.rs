//! Extraction engine
//!
//! Runs every registered rule against one article and merges their output
//! into the caller's [`LootData`]. Rules are independent, so they can fan out
//! over a fixed rayon pool; the merge happens after every rule has returned.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use scraper::{ElementRef, Selector};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::document::{WikiPage, content_root};
use super::navigation::compile_selector;
use super::rules::{ExtractionRule, REGISTRY};
use crate::domain::loot::{LootData, LootEntry};
use crate::infrastructure::config::ExtractionConfig;
use crate::infrastructure::extraction_error::{ExtractionError, ExtractionResult};

pub struct ExtractionEngine {
    rules: Vec<&'static dyn ExtractionRule>,
    content_root: Selector,
    pool: Option<ThreadPool>,
}

impl ExtractionEngine {
    /// Engine running the full rule registry
    pub fn new(config: &ExtractionConfig) -> ExtractionResult<Self> {
        Self::with_rules(config, REGISTRY.to_vec())
    }

    pub fn with_rules(
        config: &ExtractionConfig,
        rules: Vec<&'static dyn ExtractionRule>,
    ) -> ExtractionResult<Self> {
        let content_root = compile_selector(&config.content_root_selector)?;

        let pool = if config.parallel {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|index| format!("loot-extract-{index}"))
                .build()
                .map_err(|e| ExtractionError::WorkerPoolFailed {
                    reason: e.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };

        debug!(
            "Extraction engine ready: {} rules, parallel={}",
            rules.len(),
            pool.is_some()
        );

        Ok(Self {
            rules,
            content_root,
            pool,
        })
    }

    pub fn rules(&self) -> &[&'static dyn ExtractionRule] {
        &self.rules
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Run all rules on `page` and append their results to `loot`
    pub fn extract(&self, page: &WikiPage, loot: &mut LootData) {
        let entries = match &self.pool {
            Some(pool) => self.run_parallel(pool, page),
            None => self.run_sequential(page),
        };

        loot.merge(entries);

        info!(
            "Extracted {} drops and {} purchases for '{}'",
            loot.drops.len(),
            loot.purchases.len(),
            loot.loot_name
        );
    }

    /// Decode a MediaWiki parse response, then extract from it
    pub fn extract_response(&self, raw: &str, loot: &mut LootData) -> ExtractionResult<()> {
        let page = WikiPage::from_api_response(raw)?;
        self.extract(&page, loot);
        Ok(())
    }

    fn run_sequential(&self, page: &WikiPage) -> Vec<LootEntry> {
        let document = page.parse();
        let root = content_root(&document, &self.content_root);

        self.rules
            .iter()
            .flat_map(|rule| run_rule(*rule, root))
            .collect()
    }

    fn run_parallel(&self, pool: &ThreadPool, page: &WikiPage) -> Vec<LootEntry> {
        pool.install(|| {
            self.rules
                .par_iter()
                .map_init(
                    || page.parse(),
                    |document, rule| run_rule(*rule, content_root(document, &self.content_root)),
                )
                .flatten()
                .collect()
        })
    }

    /// Blocking extraction on a background thread, abandoned if `cancel` fires first.
    /// A running rule is not interrupted; its result is simply discarded.
    pub async fn extract_cancellable(
        self: Arc<Self>,
        page: WikiPage,
        mut loot: LootData,
        cancel: CancellationToken,
    ) -> ExtractionResult<LootData> {
        let item = loot.loot_name.clone();
        let task = tokio::task::spawn_blocking(move || {
            self.extract(&page, &mut loot);
            loot
        });

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!("Extraction for '{}' cancelled by caller", item);
                Err(ExtractionError::Cancelled { item })
            }
            joined = task => joined.map_err(|e| ExtractionError::TaskFailed {
                reason: e.to_string(),
            }),
        }
    }
}

/// Run one rule in isolation; a panicking rule contributes nothing
pub fn run_rule(rule: &dyn ExtractionRule, root: ElementRef<'_>) -> Vec<LootEntry> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.extract(root))) {
        Ok(entries) => {
            debug!("Rule {} produced {} entries", rule.name(), entries.len());
            entries
        }
        Err(_) => {
            error!("Rule {} panicked, dropping its output", rule.name());
            Vec::new()
        }
    }
}
