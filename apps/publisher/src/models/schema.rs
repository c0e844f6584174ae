use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// JSON Schema primitive types a structured output field may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    String,
    Integer,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
    pub required: bool,
}

/// Declared shape of a model's structured response.
///
/// Fields are added through [`OutputSchema::field`]; the required set is derived
/// from the fields themselves, so every required name is always a known field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    title: String,
    description: String,
    fields: Vec<SchemaField>,
}

impl OutputSchema {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field. A later field with the same name replaces the earlier one.
    pub fn field(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let field = SchemaField {
            name: name.into(),
            field_type,
            description: description.into(),
            required,
        };
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn required(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Renders the schema as a strict JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| {
                (
                    f.name.clone(),
                    json!({ "type": f.field_type, "description": f.description }),
                )
            })
            .collect();

        json!({
            "title": self.title,
            "description": self.description,
            "type": "object",
            "properties": properties,
            "required": self.required(),
            "strict": true,
        })
    }
}
