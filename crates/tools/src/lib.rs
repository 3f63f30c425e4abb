//! Tool capability contract.
//!
//! Every tool the engine can invoke implements [`Tool`]: a name, a description,
//! a [`ParameterSchema`], and an async `execute` that takes a [`Context`] and
//! structured [`Arguments`].
//!
//! Tools are grouped into a [`ToolSet`] (plain map, externally synchronized) or
//! a [`Registry`] (lock-guarded, safe to mutate while invocations run).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use serde_json::Value;
//! use tools::{Arguments, Context, ParameterSchema, Tool, ToolError, ToolSet};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Tool for Echo {
//!     fn name(&self) -> &str { "echo" }
//!     fn description(&self) -> &str { "Echo the x argument" }
//!     fn schema(&self) -> ParameterSchema {
//!         ParameterSchema::object().required_property("x", "string", "value to echo")
//!     }
//!     async fn execute(&self, _ctx: Context, args: Arguments) -> Result<Value, ToolError> {
//!         Ok(args.get("x").cloned().unwrap_or(Value::Null))
//!     }
//! }
//!
//! let set = ToolSet::new().with(Arc::new(Echo));
//! assert!(set.contains("echo"));
//! ```

mod context;
pub mod errors;
mod set;
mod tool;
mod types;

pub use context::Context;
pub use errors::{ErrorKind, ToolError};
pub use set::{Registry, ToolSet};
pub use tool::Tool;
pub use types::{Arguments, ParameterSchema, PropertySchema, ToolSpec};

// Re-exported so tool implementations need not depend on tokio-util directly.
pub use tokio_util::sync::CancellationToken;
