#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use wiki_loot_extract::infrastructure::config::ConfigOrigin;
use wiki_loot_extract::infrastructure::config::utils::page_url;
use wiki_loot_extract::infrastructure::logging::{init_logging_with_config, log_system_info};
use wiki_loot_extract::{AppConfig, ConfigManager, ExtractionEngine, LootData, WikiPage};

#[derive(Parser, Debug)]
#[command(name = "wiki-loot-extract")]
#[command(about = "Extract item sources (drops, vendors, gathering, recipes) from a saved wiki page")]
#[command(version)]
struct Args {
    /// Saved MediaWiki parse response (or article HTML with --html)
    input: Option<PathBuf>,

    /// Item name the page describes
    #[arg(short, long)]
    item: String,

    /// Configuration file (default: user config directory)
    #[arg(short, long, env = "WIKI_LOOT_CONFIG")]
    config: Option<PathBuf>,

    /// Input is article HTML rather than an API response
    #[arg(long)]
    html: bool,

    /// Run rules one after another instead of on the worker pool
    #[arg(long)]
    sequential: bool,

    /// Print the API request URL for the item and exit
    #[arg(long)]
    url: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let (mut config, origin): (AppConfig, ConfigOrigin) = manager.load_config_with_origin().await?;

    init_logging_with_config(config.logging.clone())?;
    log_system_info();
    log_config_origin(manager.config_path(), &origin);

    let mut loot = LootData::new(args.item.trim());
    if loot.apply_alias(&config.wiki.item_aliases) {
        info!("Looking up '{}' under its page title", loot.loot_name);
    }

    if args.url {
        println!("{}", page_url(&config.wiki, &loot.loot_name)?);
        return Ok(());
    }

    let input = args
        .input
        .context("An input file is required unless --url is given")?;
    let raw = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {:?}", input))?;

    let page = if args.html {
        WikiPage::from_html(raw)?
    } else {
        WikiPage::from_api_response(&raw)?
    };

    if args.sequential {
        config.extraction.parallel = false;
    }
    let engine = Arc::new(ExtractionEngine::new(&config.extraction)?);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        on_interrupt.cancel();
    });

    match engine.extract_cancellable(page, loot, cancel).await {
        Ok(loot) => {
            let output = serde_json::to_string_pretty(&loot).context("Failed to serialize result")?;
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Extraction failed: {}", e);
            Err(e.into())
        }
    }
}

/// Config is read before the subscriber exists, so its outcome is reported here
fn log_config_origin(path: &Path, origin: &ConfigOrigin) {
    match origin {
        ConfigOrigin::Loaded => info!("Loaded configuration from: {:?}", path),
        ConfigOrigin::CreatedDefault => info!("Created default configuration at: {:?}", path),
        ConfigOrigin::ResetCorrupted { reason, backup } => {
            warn!("Configuration at {:?} was unreadable ({}), reset to defaults", path, reason);
            match backup {
                Some(backup) => warn!("Corrupted configuration kept at: {:?}", backup),
                None => warn!("Corrupted configuration could not be backed up"),
            }
        }
    }
}
