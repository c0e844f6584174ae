use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::schema::OutputSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Missing value for template variable '{0}'")]
    MissingVariable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Human => "human",
        }
    }
}

/// One chat message whose text may contain `{name}` placeholders.
/// `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub role: Role,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Brace(char),
    Variable(&'a str),
}

impl MessageTemplate {
    pub fn system(template: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            template: template.into(),
        }
    }

    pub fn human(template: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            template: template.into(),
        }
    }

    /// Placeholder names in order of first appearance.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for segment in segments(&self.template) {
            if let Segment::Variable(name) = segment {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }

    pub fn render(&self, values: &HashMap<String, String>) -> Result<RenderedMessage, PromptError> {
        let mut content = String::with_capacity(self.template.len());
        for segment in segments(&self.template) {
            match segment {
                Segment::Text(text) => content.push_str(text),
                Segment::Brace(c) => content.push(c),
                Segment::Variable(name) => {
                    let value = values
                        .get(name)
                        .ok_or_else(|| PromptError::MissingVariable(name.to_string()))?;
                    content.push_str(value);
                }
            }
        }
        Ok(RenderedMessage {
            role: self.role,
            content,
        })
    }
}

/// Splits an f-string style template. An unmatched `{` or `}` is kept as text.
fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        if pos > 0 {
            out.push(Segment::Text(&rest[..pos]));
        }
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push(Segment::Brace('{'));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push(Segment::Brace('}'));
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            match tail[1..].find(['{', '}']) {
                Some(end) if tail[1 + end..].starts_with('}') && end > 0 => {
                    out.push(Segment::Variable(tail[1..1 + end].trim()));
                    rest = &tail[end + 2..];
                }
                _ => {
                    out.push(Segment::Text(&tail[..1]));
                    rest = &tail[1..];
                }
            }
        } else {
            out.push(Segment::Text(&tail[..1]));
            rest = &tail[1..];
        }
    }

    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}

/// An ordered chat prompt bound to the schema its response must follow.
/// Always holds at least one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    messages: Vec<MessageTemplate>,
    schema: OutputSchema,
}

impl PromptSpec {
    pub fn new(first: MessageTemplate, schema: OutputSchema) -> Self {
        Self {
            messages: vec![first],
            schema,
        }
    }

    pub fn message(mut self, message: MessageTemplate) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(&self) -> &[MessageTemplate] {
        &self.messages
    }

    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// All placeholder names across messages, sorted and de-duplicated.
    pub fn input_variables(&self) -> Vec<String> {
        self.messages
            .iter()
            .flat_map(|m| m.input_variables())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Substitutes every placeholder. Extra values are ignored.
    pub fn render(
        &self,
        values: &HashMap<String, String>,
    ) -> Result<Vec<RenderedMessage>, PromptError> {
        self.messages.iter().map(|m| m.render(values)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::FieldType;

    fn schema() -> OutputSchema {
        OutputSchema::new("Answer", "An answer").field("ok", FieldType::Boolean, "Ok?", true)
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extracts_variables_in_order() {
        let message = MessageTemplate::human("Hi {name}, see {topic} and {name} again");
        assert_eq!(message.input_variables(), vec!["name", "topic"]);
    }

    #[test]
    fn test_escaped_braces_are_not_variables() {
        let message = MessageTemplate::human("Return {{\"ok\": true}} for {input}");
        assert_eq!(message.input_variables(), vec!["input"]);

        let rendered = message.render(&values(&[("input", "x")])).unwrap();
        assert_eq!(rendered.content, "Return {\"ok\": true} for x");
    }

    #[test]
    fn test_unmatched_braces_kept_as_text() {
        let message = MessageTemplate::system("a { b c {} d }");
        assert!(message.input_variables().is_empty());
        assert_eq!(
            message.render(&HashMap::new()).unwrap().content,
            "a { b c {} d }"
        );
    }

    #[test]
    fn test_no_placeholders() {
        let message = MessageTemplate::system("Plain (text) with \"quotes\".");
        assert!(message.input_variables().is_empty());
    }

    #[test]
    fn test_prompt_variables_sorted_and_deduplicated() {
        let prompt = PromptSpec::new(MessageTemplate::system("About {topic}"), schema())
            .message(MessageTemplate::human("{question} on {topic}"));
        assert_eq!(prompt.input_variables(), vec!["question", "topic"]);
    }

    #[test]
    fn test_render_substitutes_all_messages() {
        let prompt = PromptSpec::new(MessageTemplate::system("Be brief."), schema())
            .message(MessageTemplate::human("<c>\n{all_messages}\n</c>"));

        let rendered = prompt
            .render(&values(&[("all_messages", "user: thanks!")]))
            .unwrap();

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].role, Role::System);
        assert_eq!(rendered[1].content, "<c>\nuser: thanks!\n</c>");
    }

    #[test]
    fn test_render_missing_variable() {
        let prompt = PromptSpec::new(MessageTemplate::human("{all_messages}"), schema());
        assert_eq!(
            prompt.render(&HashMap::new()).unwrap_err(),
            PromptError::MissingVariable("all_messages".to_string())
        );
    }
}
