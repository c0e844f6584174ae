//! The publish run: validate configuration, assemble, push once, report.
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ConfigError};
use crate::errors::AppError;
use crate::evaluator;
use crate::hub_client::{EntryMetadata, HubClient, HubObject, PublishRequest, Publisher};

/// A named hub entry and what gets pushed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub include_model: bool,
}

pub const SENTIMENT_EVALUATOR_WITH_MODEL: HubEntry = HubEntry {
    name: "sentiment-evaluator-with-model",
    description: "Conversation sentiment evaluator with positive_sentiment boolean output, includes OpenAI model",
    include_model: true,
};

pub const SENTIMENT_EVALUATOR: HubEntry = HubEntry {
    name: "sentiment-evaluator",
    description: "Conversation sentiment evaluator with positive_sentiment boolean output",
    include_model: false,
};

impl HubEntry {
    pub fn object(&self) -> HubObject {
        if self.include_model {
            HubObject::Pipeline(evaluator::sentiment_pipeline())
        } else {
            HubObject::Prompt(evaluator::sentiment_prompt())
        }
    }

    fn label(&self) -> &'static str {
        if self.include_model {
            "Prompt with model"
        } else {
            "Prompt"
        }
    }
}

/// Pushes `entry` with already-validated configuration.
pub async fn push_to_hub(
    publisher: &dyn Publisher,
    config: &Config,
    entry: &HubEntry,
) -> Result<String, AppError> {
    let object = entry.object();
    let credentials = config.credentials();
    let metadata = EntryMetadata {
        description: entry.description.to_string(),
    };

    info!(
        "Pushing {} {} to {}",
        object.kind(),
        entry.name,
        credentials.api_url
    );

    let url = publisher
        .publish(PublishRequest {
            name: entry.name,
            object: &object,
            credentials: &credentials,
            metadata: &metadata,
        })
        .await?;

    info!("Published {} at {url}", entry.name);
    Ok(url)
}

/// Loads configuration, then publishes. A configuration failure returns before
/// the publisher is touched.
pub async fn run<L>(load: L, publisher: &dyn Publisher, entry: &HubEntry) -> Result<String, AppError>
where
    L: FnOnce(bool) -> Result<Config, ConfigError>,
{
    let config = match load(entry.include_model) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e}");
            return Err(e.into());
        }
    };

    println!("📤 Pushing {} to hub...", entry.name);

    match push_to_hub(publisher, &config, entry).await {
        Ok(url) => {
            println!("✅ Success! {} pushed to: {url}", entry.label());
            Ok(url)
        }
        Err(e) => {
            error!("Failed to push {}: {e}", entry.name);
            eprintln!("❌ Failed to push prompt: {e}");
            Err(e)
        }
    }
}

/// Binary entry point shared by both executables.
pub async fn main_for(entry: HubEntry) -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // so RUST_LOG from .env applies too

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {} v{}", entry.name, env!("CARGO_PKG_VERSION"));

    let client = HubClient::new()?;
    run(Config::from_env, &client, &entry).await?;
    Ok(())
}
