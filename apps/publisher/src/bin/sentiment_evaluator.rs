// Pushes the structured prompt alone, without a model attached.
use sentiment_evaluator::publish::{main_for, SENTIMENT_EVALUATOR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    main_for(SENTIMENT_EVALUATOR).await
}
