//! Sentiment evaluator: the static schema, prompt and model that get published.
//!
//! Everything here is pure construction from constants. Calling any builder twice
//! yields equal values.

pub mod prompts;

use crate::config::OPENAI_API_KEY;
use crate::models::pipeline::{compose, ModelDescriptor, PipelineSpec, Provider, SecretRef};
use crate::models::prompt::{MessageTemplate, PromptSpec};
use crate::models::schema::{FieldType, OutputSchema};

use prompts::*;

/// Model used for grading. Not configurable from the environment.
pub const MODEL: &str = "gpt-4o-mini";
pub const TEMPERATURE: f32 = 0.0;

pub fn sentiment_schema() -> OutputSchema {
    OutputSchema::new(SCHEMA_TITLE, SCHEMA_DESCRIPTION).field(
        POSITIVE_SENTIMENT_FIELD,
        FieldType::Boolean,
        POSITIVE_SENTIMENT_DESCRIPTION,
        true,
    )
}

pub fn sentiment_prompt() -> PromptSpec {
    PromptSpec::new(MessageTemplate::system(SENTIMENT_SYSTEM), sentiment_schema())
        .message(MessageTemplate::human(SENTIMENT_HUMAN))
}

pub fn grading_model() -> ModelDescriptor {
    ModelDescriptor {
        provider: Provider::OpenAiChat,
        model: MODEL.to_string(),
        temperature: TEMPERATURE,
        api_key: SecretRef::env(OPENAI_API_KEY),
    }
}

pub fn sentiment_pipeline() -> PipelineSpec {
    compose(sentiment_prompt(), grading_model())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prompt::Role;
    use std::collections::HashMap;

    #[test]
    fn test_schema_has_single_required_boolean() {
        let schema = sentiment_schema();
        assert_eq!(schema.fields().len(), 1);

        let field = &schema.fields()[0];
        assert_eq!(field.name, "positive_sentiment");
        assert_eq!(field.field_type, FieldType::Boolean);
        assert!(field.required);
        assert_eq!(schema.required(), vec!["positive_sentiment"]);
    }

    #[test]
    fn test_prompt_has_system_then_human() {
        let prompt = sentiment_prompt();
        let roles: Vec<Role> = prompt.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::Human]);
        assert!(prompt.messages()[1].template.contains("{all_messages}"));
        assert_eq!(prompt.input_variables(), vec!["all_messages"]);
    }

    #[test]
    fn test_system_message_has_no_placeholders() {
        assert!(sentiment_prompt().messages()[0].input_variables().is_empty());
    }

    #[test]
    fn test_model_descriptor_is_fixed() {
        let pipeline = sentiment_pipeline();
        assert_eq!(pipeline.model.provider.as_str(), "openai-chat");
        assert_eq!(pipeline.model.model, "gpt-4o-mini");
        assert_eq!(pipeline.model.temperature, 0.0);
        assert_eq!(pipeline.model.api_key.name(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_assembly_is_deterministic() {
        assert_eq!(sentiment_pipeline(), sentiment_pipeline());
        assert_eq!(sentiment_prompt(), sentiment_prompt());
    }

    #[test]
    fn test_human_message_renders_conversation() {
        let values = HashMap::from([(
            CONVERSATION_VARIABLE.to_string(),
            "human: it works now, thanks!".to_string(),
        )]);
        let rendered = sentiment_prompt().render(&values).unwrap();
        assert!(rendered[1]
            .content
            .contains("<conversation>\nhuman: it works now, thanks!\n</conversation>"));
    }
}
