//! Function schemas, the JSON-Schema parameter builder, and the dispatch table.

use crate::openai::error::BoxError;
use async_openai::types::ChatCompletionFunctions;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// JSON Schema object describing a function's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParameters(Value);

impl ToolParameters {
    pub fn as_value(&self) -> &Value { &self.0 }

    /// Names listed in `required`.
    pub fn required(&self) -> Vec<&str> {
        self.0
            .get("required")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn declares(&self, name: &str) -> bool {
        self.0.get("properties").and_then(|p| p.get(name)).is_some()
    }

    /// `additionalProperties` defaults to allowed, as in JSON Schema.
    pub fn allows_additional(&self) -> bool {
        self.0
            .get("additionalProperties")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

/// Builder for `{"type": "object", "properties": {...}, "required": [...]}`.
#[derive(Debug, Default)]
pub struct ToolParametersBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
    additional_properties: Option<bool>,
}

impl ToolParametersBuilder {
    pub fn new_object() -> Self { Self::default() }

    pub fn add_string(mut self, name: &str, description: Option<&str>) -> Self {
        let mut prop = json!({ "type": "string" });
        if let Some(d) = description {
            prop["description"] = Value::String(d.to_string());
        }
        self.properties.insert(name.to_string(), prop);
        self
    }

    pub fn required(mut self, name: &str) -> Self {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    pub fn build(self) -> ToolParameters {
        let mut v = json!({
            "type": "object",
            "properties": Value::Object(self.properties),
            "required": self.required,
        });
        if let Some(allowed) = self.additional_properties {
            v["additionalProperties"] = Value::Bool(allowed);
        }
        ToolParameters(v)
    }
}

/// Declaration handed to the model: name, purpose and parameter shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: ToolParameters,
}

impl FunctionSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: ToolParameters) -> Self {
        Self { name: name.into(), description: description.into(), parameters }
    }

    /// Legacy `functions` entry for the chat completion request.
    pub fn as_chat_function(&self) -> ChatCompletionFunctions {
        ChatCompletionFunctions {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            parameters: self.parameters.as_value().clone(),
        }
    }
}

/// Failure reported by a handler; the dispatcher attaches the function name.
#[derive(Debug)]
pub enum HandlerError {
    /// The arguments object did not fit the handler's typed record.
    InvalidArguments(String),
    /// The capability itself failed (I/O, unexpected response shape).
    Failed(BoxError),
}

/// Runs with an arguments object that already passed schema checks and returns the
/// text placed in the `function` message.
pub type ToolHandler = Arc<dyn Fn(&Map<String, Value>) -> Result<String, HandlerError> + Send + Sync + 'static>;

/// Schema plus the local routine that implements it.
#[derive(Clone)]
pub struct ToolDefinition {
    pub schema: FunctionSchema,
    handler: ToolHandler,
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl ToolDefinition {
    pub fn new(schema: FunctionSchema, handler: ToolHandler) -> Self {
        Self { schema, handler }
    }

    pub fn name(&self) -> &str { &self.schema.name }

    pub fn execute(&self, args: &Map<String, Value>) -> Result<String, HandlerError> {
        (self.handler)(args)
    }
}

/// Name → capability map, built once at startup and read-only afterwards.
/// Schemas keep registration order so both completion rounds send the same list.
#[derive(Debug, Default, Clone)]
pub struct DispatchTable {
    schemas: Vec<FunctionSchema>,
    tools: HashMap<String, ToolDefinition>,
}

impl DispatchTable {
    pub fn new(tools: impl IntoIterator<Item = ToolDefinition>) -> Self {
        let mut table = Self::default();
        for t in tools {
            table.register(t);
        }
        table
    }

    /// Register a tool; a later registration with the same name replaces the earlier one.
    pub fn register(&mut self, tool: ToolDefinition) -> &mut Self {
        match self.schemas.iter_mut().find(|s| s.name == tool.schema.name) {
            Some(existing) => *existing = tool.schema.clone(),
            None => self.schemas.push(tool.schema.clone()),
        }
        self.tools.insert(tool.schema.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> { self.tools.get(name) }
    pub fn schemas(&self) -> &[FunctionSchema] { &self.schemas }
    pub fn len(&self) -> usize { self.schemas.len() }
    pub fn is_empty(&self) -> bool { self.schemas.is_empty() }
}
