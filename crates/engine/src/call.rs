//! Pending calls, argument decoding, and per-call results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tools::{Arguments, ToolError};

/// Key that wraps a raw argument string which is not a JSON object.
pub const RAW_INPUT_KEY: &str = "input";

/// Arguments as they arrive from the model.
///
/// Providers send either a JSON object or a JSON-encoded string. Both decode to
/// [`Arguments`] before dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawArguments {
    Encoded(String),
    Structured(Value),
}

impl RawArguments {
    /// Decode into the structured mapping handed to the tool.
    ///
    /// - blank string: empty mapping
    /// - string holding a JSON object: that object
    /// - any other string: `{"input": <string>}`
    /// - `null`: empty mapping
    /// - object: itself
    /// - any other structured value: [`ToolError::InvalidArguments`]
    pub fn decode(&self, tool: &str) -> Result<Arguments, ToolError> {
        match self {
            Self::Encoded(raw) if raw.trim().is_empty() => Ok(Arguments::new()),
            Self::Encoded(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Ok(map),
                _ => {
                    let mut map = Arguments::new();
                    map.insert(RAW_INPUT_KEY.to_string(), Value::String(raw.clone()));
                    Ok(map)
                }
            },
            Self::Structured(Value::Null) => Ok(Arguments::new()),
            Self::Structured(Value::Object(map)) => Ok(map.clone()),
            Self::Structured(other) => Err(ToolError::invalid_arguments(
                tool,
                format!("expected an object, got {}", value_type(other)),
            )),
        }
    }
}

impl Default for RawArguments {
    fn default() -> Self {
        Self::Structured(Value::Object(Arguments::new()))
    }
}

impl From<Arguments> for RawArguments {
    fn from(args: Arguments) -> Self {
        Self::Structured(Value::Object(args))
    }
}

impl From<Value> for RawArguments {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A tool call requested by the model, not yet resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCall {
    /// Provider-assigned identifier used to correlate the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the tool to invoke.
    pub name: String,
    #[serde(default, alias = "input")]
    pub arguments: RawArguments,
}

impl PendingCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<RawArguments>) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// A call whose arguments arrive as an encoded string.
    pub fn encoded(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(name, RawArguments::Encoded(raw.into()))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Outcome of resolving one [`PendingCall`].
///
/// Exactly one of `output` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// The arguments as submitted.
    pub arguments: RawArguments,
    pub output: Option<Value>,
    pub error: Option<ToolError>,
    /// Whether the fallback tool ran in place of an unknown name.
    #[serde(default)]
    pub used_fallback: bool,
}

impl CallResult {
    pub(crate) fn from_outcome(
        call: PendingCall,
        outcome: Result<Value, ToolError>,
        used_fallback: bool,
    ) -> Self {
        let (output, error) = match outcome {
            Ok(value) => (Some(value), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            id: call.id,
            name: call.name,
            arguments: call.arguments,
            output,
            error,
            used_fallback,
        }
    }

    /// The call id, or the tool name when the call had none.
    pub fn correlation_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_outcome(self) -> Result<Value, ToolError> {
        match (self.output, self.error) {
            (_, Some(e)) => Err(e),
            (Some(value), None) => Ok(value),
            (None, None) => Ok(Value::Null),
        }
    }
}
