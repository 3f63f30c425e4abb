//! The capability contract every tool satisfies.

use async_trait::async_trait;
use serde_json::Value;

use crate::{Arguments, Context, ParameterSchema, ToolError, ToolSpec};

/// A named, schema-described capability the engine can invoke.
///
/// Implementations are shared read-only behind `Arc<dyn Tool>`; several tool
/// sets may hold the same instance. Side effects belong entirely to the tool.
///
/// `execute` receives a [`Context`] and should stop early once
/// [`Context::done`] resolves. If it does not, a timed-out invocation keeps
/// running to completion and its result is discarded.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable, non-empty name, unique within a tool set.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Arguments this tool accepts. Validation is the tool's own job.
    fn schema(&self) -> ParameterSchema;

    /// Run the tool.
    async fn execute(&self, ctx: Context, args: Arguments) -> Result<Value, ToolError>;

    /// The definition advertised to a model for function calling.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.schema().to_value(),
        }
    }
}
