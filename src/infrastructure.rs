//! Infrastructure layer: configuration, logging, errors, and HTML extraction

pub mod config;
pub mod extraction;
pub mod extraction_error;
pub mod logging;

pub use config::{AppConfig, ConfigManager, ExtractionConfig, WikiConfig};
pub use extraction::{ExtractionEngine, ExtractionRule, WikiPage};
pub use extraction_error::{ExtractionError, ExtractionResult};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
