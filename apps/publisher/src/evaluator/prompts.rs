// Sentiment evaluator prompt templates.
// Text is registered verbatim with the hub; `{all_messages}` is filled at run time.

pub const SENTIMENT_SYSTEM: &str = r#"You are an expert conversation evaluator. You will be shown a full conversation between a human user and an AI assistant.
Your task is to judge overall user sentiment throughout the duration of this conversation:
Positive responses may include:
Gratitude (thank you, appreciate, helpful)
Resolution indicators (it's fixed, works now, that's clear)
No lingering questions or frustration
Negative responses may include:
Explicit dissatisfaction or confusion
Continued problem statement ("still doesn't work," "not fixed")
Implied negativity without explicit words like "bad," "not working," or "frustrating." For example: "Sure, whatever.", "I'll figure it out myself."
Neutral responses should be classified as positive. Neutral responses may include phrases like: "Okay", "Cool", "Got it"
Since this is a conversational interaction, pay specific attention to the tone of the final human message and weigh it higher than the others"#;

pub const SENTIMENT_HUMAN: &str = "Please grade the following conversation according to the above instructions:

<conversation>
{all_messages}
</conversation>

Extract information from the user's response.";

pub const CONVERSATION_VARIABLE: &str = "all_messages";

pub const SCHEMA_TITLE: &str = "SentimentEvaluation";
pub const SCHEMA_DESCRIPTION: &str =
    "Extract information from the user's response to determine sentiment";
pub const POSITIVE_SENTIMENT_FIELD: &str = "positive_sentiment";
pub const POSITIVE_SENTIMENT_DESCRIPTION: &str = "Was the user sentiment positive?";
