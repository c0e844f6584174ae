use thiserror::Error;

use crate::config::ConfigError;
use crate::hub_client::PublishError;

/// Top-level error for a publish run.
/// Configuration failures always surface before any request is made.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}
