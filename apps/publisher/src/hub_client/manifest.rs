//! Serialized-constructor manifests understood by the prompt hub.
//!
//! Every object is `{"lc": 1, "type": "constructor", "id": [...], "kwargs": {...}}`.
//! Credentials appear only as `{"lc": 1, "type": "secret", "id": [ENV_NAME]}`.
use serde_json::{json, Value};

use crate::models::pipeline::{ModelDescriptor, PipelineSpec, Provider, SecretRef};
use crate::models::prompt::{MessageTemplate, PromptSpec, Role};

/// The value pushed to the hub: a prompt alone, or a prompt piped into a model.
#[derive(Debug, Clone, PartialEq)]
pub enum HubObject {
    Prompt(PromptSpec),
    Pipeline(PipelineSpec),
}

impl HubObject {
    pub fn kind(&self) -> &'static str {
        match self {
            HubObject::Prompt(_) => "prompt",
            HubObject::Pipeline(_) => "pipeline",
        }
    }

    pub fn to_manifest(&self) -> Value {
        match self {
            HubObject::Prompt(prompt) => prompt_manifest(prompt),
            HubObject::Pipeline(pipeline) => pipeline_manifest(pipeline),
        }
    }
}

fn constructor(id: &[&str], kwargs: Value) -> Value {
    json!({
        "lc": 1,
        "type": "constructor",
        "id": id,
        "kwargs": kwargs,
    })
}

fn secret(secret: &SecretRef) -> Value {
    json!({
        "lc": 1,
        "type": "secret",
        "id": [secret.name()],
    })
}

fn message_manifest(message: &MessageTemplate) -> Value {
    let class = match message.role {
        Role::System => "SystemMessagePromptTemplate",
        Role::Human => "HumanMessagePromptTemplate",
    };
    let template = constructor(
        &["langchain", "prompts", "prompt", "PromptTemplate"],
        json!({
            "input_variables": message.input_variables(),
            "template": message.template,
            "template_format": "f-string",
        }),
    );
    constructor(
        &["langchain", "prompts", "chat", class],
        json!({ "prompt": template }),
    )
}

pub fn prompt_manifest(prompt: &PromptSpec) -> Value {
    let messages: Vec<Value> = prompt.messages().iter().map(message_manifest).collect();
    constructor(
        &["langchain_core", "prompts", "structured", "StructuredPrompt"],
        json!({
            "input_variables": prompt.input_variables(),
            "messages": messages,
            "schema_": prompt.schema().to_json_schema(),
        }),
    )
}

pub fn model_manifest(model: &ModelDescriptor) -> Value {
    match model.provider {
        Provider::OpenAiChat => constructor(
            &["langchain", "chat_models", "openai", "ChatOpenAI"],
            json!({
                "model_name": model.model,
                "temperature": model.temperature,
                "openai_api_key": secret(&model.api_key),
            }),
        ),
    }
}

pub fn pipeline_manifest(pipeline: &PipelineSpec) -> Value {
    constructor(
        &["langchain", "schema", "runnable", "RunnableSequence"],
        json!({
            "first": prompt_manifest(&pipeline.prompt),
            "last": model_manifest(&pipeline.model),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{sentiment_pipeline, sentiment_prompt};

    #[test]
    fn test_prompt_manifest_structure() {
        let manifest = prompt_manifest(&sentiment_prompt());

        assert_eq!(manifest["lc"], 1);
        assert_eq!(manifest["id"][3], "StructuredPrompt");
        assert_eq!(manifest["kwargs"]["input_variables"], json!(["all_messages"]));

        let messages = manifest["kwargs"]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["id"][3], "SystemMessagePromptTemplate");
        assert_eq!(messages[1]["id"][3], "HumanMessagePromptTemplate");
        assert_eq!(
            messages[1]["kwargs"]["prompt"]["kwargs"]["template_format"],
            "f-string"
        );

        let schema = &manifest["kwargs"]["schema_"];
        assert_eq!(schema["title"], "SentimentEvaluation");
        assert_eq!(
            schema["properties"]["positive_sentiment"]["type"],
            "boolean"
        );
    }

    #[test]
    fn test_pipeline_manifest_pipes_prompt_into_model() {
        let manifest = pipeline_manifest(&sentiment_pipeline());

        assert_eq!(manifest["id"][3], "RunnableSequence");
        assert_eq!(manifest["kwargs"]["first"]["id"][3], "StructuredPrompt");

        let model = &manifest["kwargs"]["last"];
        assert_eq!(model["id"][3], "ChatOpenAI");
        assert_eq!(model["kwargs"]["model_name"], "gpt-4o-mini");
        assert_eq!(model["kwargs"]["temperature"], 0.0);
        assert_eq!(
            model["kwargs"]["openai_api_key"],
            json!({"lc": 1, "type": "secret", "id": ["OPENAI_API_KEY"]})
        );
    }

    #[test]
    fn test_hub_object_dispatch() {
        let prompt = HubObject::Prompt(sentiment_prompt());
        let pipeline = HubObject::Pipeline(sentiment_pipeline());

        assert_eq!(prompt.kind(), "prompt");
        assert_eq!(pipeline.kind(), "pipeline");
        assert_eq!(prompt.to_manifest()["id"][3], "StructuredPrompt");
        assert_eq!(pipeline.to_manifest()["id"][3], "RunnableSequence");
    }
}
