use sentiment_evaluator::publish::{main_for, SENTIMENT_EVALUATOR_WITH_MODEL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    main_for(SENTIMENT_EVALUATOR_WITH_MODEL).await
}
